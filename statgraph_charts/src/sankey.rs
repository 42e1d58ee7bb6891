// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small-multiple flow diagrams.
//!
//! Every instance shares one node list and is laid out inside its own horizontal band of
//! the canvas. Node columns come from the declared node order: the layering is computed
//! once from the union of all instances' links, so instances differ only in magnitudes.
//! Vertical placement follows the usual iterative relaxation (column centering, then
//! alternating right-to-left and left-to-right passes with collision resolution).

use core::fmt;
use std::sync::Arc;

use kurbo::{BezPath, Point, Rect};
use peniko::color::palette::css;
use peniko::{Color, Mix};
use statgraph_scene::{Fragment, Node, Scene, StrokeStyle, TextAnchor, TextSpec, z_order};

use crate::error::{ChartError, Result};
use crate::format::format_number;
use crate::theme::Theme;

const WIDTH: f64 = 500.0;
const HEIGHT: f64 = 500.0;
const EXTENT_RIGHT: f64 = 400.0;
const NODE_WIDTH: f64 = 4.0;
const NODE_PADDING: f64 = 20.0;
const ITERATIONS: usize = 6;

/// Chooses a link color from its endpoint names.
pub type LinkColor = Arc<dyn Fn(&str, &str) -> Color + Send + Sync>;

/// A weighted link between two declared nodes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SankeyLink {
    /// Source node index.
    pub source: usize,
    /// Target node index.
    pub target: usize,
    /// Flow magnitude.
    pub value: f64,
}

impl SankeyLink {
    /// Creates a link.
    pub const fn new(source: usize, target: usize, value: f64) -> Self {
        Self {
            source,
            target,
            value,
        }
    }
}

/// One diagram: a caption and its links.
#[derive(Clone, Debug, PartialEq)]
pub struct SankeyInstance {
    /// Caption printed at the top of the band.
    pub name: String,
    /// Links in drawing order.
    pub links: Vec<SankeyLink>,
}

impl SankeyInstance {
    /// Creates an instance.
    pub fn new(name: impl Into<String>, links: Vec<SankeyLink>) -> Self {
        Self {
            name: name.into(),
            links,
        }
    }
}

/// Where a node's caption goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelPlacement {
    /// First column: a name badge on the left edge.
    Origin,
    /// Middle columns: name and value centered on the node.
    Interior,
    /// Last column: name and value to the right of the node.
    Terminal,
}

/// A positioned node.
#[derive(Clone, Debug, PartialEq)]
pub struct SankeyNodeLayout {
    /// Declared node name.
    pub name: String,
    /// Column index.
    pub layer: usize,
    /// Node rectangle.
    pub rect: Rect,
    /// Larger of inflow and outflow.
    pub value: f64,
    /// Caption style.
    pub label: LabelPlacement,
}

/// A positioned link.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SankeyLinkLayout {
    /// Source node index.
    pub source: usize,
    /// Target node index.
    pub target: usize,
    /// Flow magnitude.
    pub value: f64,
    /// Stroke width.
    pub width: f64,
    /// Center of the link where it leaves the source.
    pub y0: f64,
    /// Center of the link where it enters the target.
    pub y1: f64,
}

/// The laid-out geometry of one instance.
#[derive(Clone, Debug, PartialEq)]
pub struct SankeyLayout {
    /// Instance caption.
    pub name: String,
    /// Top of the instance band.
    pub band_top: f64,
    /// Nodes in declared order.
    pub nodes: Vec<SankeyNodeLayout>,
    /// Links in input order.
    pub links: Vec<SankeyLinkLayout>,
}

/// A stack of flow diagrams sharing one node list.
#[derive(Clone)]
pub struct SankeySpec {
    /// Declared node names; their order fixes the columns.
    pub nodes: Vec<String>,
    /// Diagrams, top to bottom.
    pub instances: Vec<SankeyInstance>,
    /// Link color rule.
    pub link_color: LinkColor,
}

impl fmt::Debug for SankeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SankeySpec")
            .field("nodes", &self.nodes)
            .field("instances", &self.instances)
            .finish_non_exhaustive()
    }
}

/// Column assignment shared by every instance.
#[derive(Clone, Debug)]
struct Topology {
    layers: Vec<usize>,
    layer_count: usize,
}

impl SankeySpec {
    /// Creates an empty diagram stack.
    pub fn new(
        nodes: Vec<String>,
        link_color: impl Fn(&str, &str) -> Color + Send + Sync + 'static,
    ) -> Self {
        Self {
            nodes,
            instances: Vec::new(),
            link_color: Arc::new(link_color),
        }
    }

    /// Sets the instances.
    pub fn with_instances(mut self, instances: Vec<SankeyInstance>) -> Self {
        self.instances = instances;
        self
    }

    fn topology(&self) -> Result<Topology> {
        let count = self.nodes.len();
        let mut pairs = Vec::new();
        for link in self.instances.iter().flat_map(|i| &i.links) {
            if link.source >= count || link.target >= count {
                return Err(ChartError::InvalidSankeyLink {
                    from: link.source,
                    to: link.target,
                    nodes: count,
                });
            }
            if link.source >= link.target {
                return Err(ChartError::BackwardSankeyLink {
                    from: link.source,
                    to: link.target,
                });
            }
            if !pairs.contains(&(link.source, link.target)) {
                pairs.push((link.source, link.target));
            }
        }
        // Links only run forward, so one pass in declared order gives the longest path.
        pairs.sort_unstable();
        let mut depth = vec![0_usize; count];
        let mut has_outgoing = vec![false; count];
        for &(s, t) in &pairs {
            depth[t] = depth[t].max(depth[s] + 1);
            has_outgoing[s] = true;
        }
        let layer_count = depth.iter().max().map_or(1, |d| d + 1);
        let layers = depth
            .iter()
            .zip(&has_outgoing)
            .map(|(d, out)| if *out { *d } else { layer_count - 1 })
            .collect();
        Ok(Topology {
            layers,
            layer_count,
        })
    }

    /// Computes the geometry of every instance.
    pub fn layout(&self) -> Result<Vec<SankeyLayout>> {
        if self.instances.is_empty() {
            return Err(ChartError::EmptyInput { chart: "sankey" });
        }
        let topology = self.topology()?;
        let n = self.instances.len() as f64;
        Ok(self
            .instances
            .iter()
            .enumerate()
            .map(|(k, instance)| {
                let k = k as f64;
                let band_top = k * HEIGHT / n;
                let extent = Rect::new(
                    0.0,
                    5.0 + band_top,
                    EXTENT_RIGHT,
                    (k + 1.0) * HEIGHT / n - 5.0,
                );
                let mut solver = Solver::new(self.nodes.len(), instance, extent);
                solver.run(&topology);
                solver.finish(&self.nodes, &instance.name, band_top, topology.layer_count)
            })
            .collect())
    }

    /// Renders every instance into one canvas.
    pub fn render(&self, theme: &Theme) -> Result<Fragment> {
        let layouts = self.layout()?;
        tracing::debug!(instances = layouts.len(), "sankey layout computed");
        Scene::render(WIDTH, HEIGHT, |scene| {
            for layout in &layouts {
                self.draw_instance(scene, layout, theme);
            }
            Ok(())
        })
    }

    fn draw_instance(&self, scene: &mut Scene, layout: &SankeyLayout, theme: &Theme) {
        for node in &layout.nodes {
            scene.push(Node::rect(node.rect).with_fill(theme.f_high));
        }

        let paths: Vec<_> = layout
            .links
            .iter()
            .map(|link| {
                let from = &layout.nodes[link.source].rect;
                let to = &layout.nodes[link.target].rect;
                (link, horizontal_link(from.x1, link.y0, to.x0, link.y1))
            })
            .collect();
        for (link, path) in &paths {
            scene.push(
                Node::path(path.clone())
                    .with_stroke(StrokeStyle::solid(css::WHITE, link.width))
                    .with_z_index(z_order::SERIES_STROKE),
            );
        }
        for (link, path) in paths {
            let color = (self.link_color)(
                &layout.nodes[link.source].name,
                &layout.nodes[link.target].name,
            );
            scene.push(
                Node::path(path)
                    .with_stroke(StrokeStyle::solid(color, link.width))
                    .with_blend(Mix::Multiply)
                    .with_z_index(z_order::SERIES_STROKE),
            );
        }

        for node in &layout.nodes {
            let mid = (node.rect.y0 + node.rect.y1) / 2.0;
            let x0 = node.rect.x0;
            let value = format_number(node.value);
            match node.label {
                LabelPlacement::Origin => {
                    scene.push(badge(Rect::new(5.0, mid - 20.0, 115.0, mid)));
                    scene.push(
                        Node::text(TextSpec::new(Point::new(5.0, mid - 5.0), node.name.clone()))
                            .with_fill(css::BLACK),
                    );
                }
                LabelPlacement::Interior => {
                    scene.push(badge(Rect::new(x0 - 25.0, mid - 20.0, x0 + 25.0, mid + 20.0)));
                    scene.push(
                        Node::text(
                            TextSpec::new(Point::new(x0, mid - 5.0), node.name.clone())
                                .with_anchor(TextAnchor::Middle),
                        )
                        .with_fill(css::BLACK),
                    );
                    scene.push(
                        Node::text(
                            TextSpec::new(Point::new(x0, mid + 15.0), value)
                                .with_anchor(TextAnchor::Middle),
                        )
                        .with_fill(theme.b_high),
                    );
                }
                LabelPlacement::Terminal => {
                    scene.push(
                        Node::text(
                            TextSpec::new(Point::new(x0 + 55.0, mid - 5.0), node.name.clone())
                                .with_anchor(TextAnchor::Middle),
                        )
                        .with_fill(theme.f_high),
                    );
                    scene.push(
                        Node::text(
                            TextSpec::new(Point::new(x0 + 55.0, mid + 15.0), value)
                                .with_anchor(TextAnchor::Middle),
                        )
                        .with_fill(theme.f_med),
                    );
                }
            }
        }

        scene.push(
            Node::text(TextSpec::new(
                Point::new(5.0, layout.band_top + 15.0),
                layout.name.clone(),
            ))
            .with_fill(theme.f_high)
            .with_z_index(z_order::TITLES),
        );
    }
}

fn badge(rect: Rect) -> Node {
    Node::rounded_rect(rect, 2.0)
        .with_fill(css::WHITE)
        .with_opacity(0.7)
        .with_z_index(z_order::LABEL_BACKDROPS)
}

/// A cubic from `(x0, y0)` to `(x1, y1)` with both control points at the horizontal midpoint.
fn horizontal_link(x0: f64, y0: f64, x1: f64, y1: f64) -> BezPath {
    let mid = (x0 + x1) / 2.0;
    let mut path = BezPath::new();
    path.move_to((x0, y0));
    path.curve_to((mid, y0), (mid, y1), (x1, y1));
    path
}

#[derive(Clone, Debug, Default)]
struct SolverNode {
    layer: usize,
    x0: f64,
    y0: f64,
    y1: f64,
    value: f64,
    source_links: Vec<usize>,
    target_links: Vec<usize>,
}

#[derive(Clone, Debug)]
struct SolverLink {
    source: usize,
    target: usize,
    value: f64,
    width: f64,
}

/// Vertical placement state for one instance.
struct Solver {
    nodes: Vec<SolverNode>,
    links: Vec<SolverLink>,
    extent: Rect,
    py: f64,
}

impl Solver {
    fn new(node_count: usize, instance: &SankeyInstance, extent: Rect) -> Self {
        let mut nodes = vec![SolverNode::default(); node_count];
        let links: Vec<_> = instance
            .links
            .iter()
            .map(|l| SolverLink {
                source: l.source,
                target: l.target,
                value: l.value,
                width: 0.0,
            })
            .collect();
        for (i, link) in links.iter().enumerate() {
            nodes[link.source].source_links.push(i);
            nodes[link.target].target_links.push(i);
        }
        for node in &mut nodes {
            let out: f64 = node.source_links.iter().map(|l| links[*l].value).sum();
            let inflow: f64 = node.target_links.iter().map(|l| links[*l].value).sum();
            node.value = out.max(inflow);
        }
        Self {
            nodes,
            links,
            extent,
            py: NODE_PADDING,
        }
    }

    fn run(&mut self, topology: &Topology) {
        let columns_len = topology.layer_count;
        let kx = if columns_len > 1 {
            (self.extent.width() - NODE_WIDTH) / (columns_len - 1) as f64
        } else {
            0.0
        };
        let mut columns = vec![Vec::new(); columns_len];
        for (i, node) in self.nodes.iter_mut().enumerate() {
            node.layer = topology.layers[i];
            node.x0 = self.extent.x0 + node.layer as f64 * kx;
            columns[node.layer].push(i);
        }
        columns.retain(|c: &Vec<usize>| !c.is_empty());

        let max_len = columns.iter().map(Vec::len).max().unwrap_or(1);
        if max_len > 1 {
            self.py = NODE_PADDING.min(self.extent.height() / (max_len - 1) as f64);
        }
        self.initialize(&columns);
        for i in 0..ITERATIONS {
            let alpha = 0.99_f64.powf(i as f64);
            let beta = (1.0 - alpha).max((i + 1) as f64 / ITERATIONS as f64);
            self.relax_right_to_left(&columns, alpha, beta);
            self.relax_left_to_right(&columns, alpha, beta);
        }
    }

    fn initialize(&mut self, columns: &[Vec<usize>]) {
        let (top, bottom) = (self.extent.y0, self.extent.y1);
        let ky = columns
            .iter()
            .map(|c| {
                let total: f64 = c.iter().map(|n| self.nodes[*n].value).sum();
                (bottom - top - (c.len() - 1) as f64 * self.py) / total
            })
            .filter(|k| k.is_finite())
            .fold(f64::INFINITY, f64::min);
        let ky = if ky.is_finite() { ky.max(0.0) } else { 0.0 };

        for column in columns {
            let mut y = top;
            for &n in column {
                let node = &mut self.nodes[n];
                node.y0 = y;
                node.y1 = y + node.value * ky;
                y = node.y1 + self.py;
                for &l in &node.source_links {
                    self.links[l].width = self.links[l].value * ky;
                }
            }
            let gap = (bottom - y + self.py) / (column.len() + 1) as f64;
            for (i, &n) in column.iter().enumerate() {
                let shift = gap * (i + 1) as f64;
                self.nodes[n].y0 += shift;
                self.nodes[n].y1 += shift;
            }
        }
    }

    fn relax_left_to_right(&mut self, columns: &[Vec<usize>], alpha: f64, beta: f64) {
        for column in columns.iter().skip(1) {
            for &t in column {
                let mut y = 0.0;
                let mut w = 0.0;
                for &l in &self.nodes[t].target_links {
                    let link = &self.links[l];
                    let v = link.value * self.layer_gap(link.source, t);
                    y += self.target_top(link.source, t) * v;
                    w += v;
                }
                if w > 0.0 {
                    self.shift(t, (y / w - self.nodes[t].y0) * alpha);
                }
            }
            self.resolve_collisions(column, beta);
        }
    }

    fn relax_right_to_left(&mut self, columns: &[Vec<usize>], alpha: f64, beta: f64) {
        for column in columns.iter().rev().skip(1) {
            for &s in column {
                let mut y = 0.0;
                let mut w = 0.0;
                for &l in &self.nodes[s].source_links {
                    let link = &self.links[l];
                    let v = link.value * self.layer_gap(s, link.target);
                    y += self.source_top(s, link.target) * v;
                    w += v;
                }
                if w > 0.0 {
                    self.shift(s, (y / w - self.nodes[s].y0) * alpha);
                }
            }
            self.resolve_collisions(column, beta);
        }
    }

    fn layer_gap(&self, source: usize, target: usize) -> f64 {
        self.nodes[target].layer as f64 - self.nodes[source].layer as f64
    }

    fn shift(&mut self, n: usize, dy: f64) {
        self.nodes[n].y0 += dy;
        self.nodes[n].y1 += dy;
    }

    /// The `target.y0` that would give a straight link from `source`.
    fn target_top(&self, source: usize, target: usize) -> f64 {
        let s = &self.nodes[source];
        let mut y = s.y0 - (s.source_links.len() as f64 - 1.0) * self.py / 2.0;
        for &l in &s.source_links {
            let link = &self.links[l];
            if link.target == target {
                break;
            }
            y += link.width + self.py;
        }
        for &l in &self.nodes[target].target_links {
            let link = &self.links[l];
            if link.source == source {
                break;
            }
            y -= link.width;
        }
        y
    }

    /// The `source.y0` that would give a straight link into `target`.
    fn source_top(&self, source: usize, target: usize) -> f64 {
        let t = &self.nodes[target];
        let mut y = t.y0 - (t.target_links.len() as f64 - 1.0) * self.py / 2.0;
        for &l in &t.target_links {
            let link = &self.links[l];
            if link.source == source {
                break;
            }
            y += link.width + self.py;
        }
        for &l in &self.nodes[source].source_links {
            let link = &self.links[l];
            if link.target == target {
                break;
            }
            y -= link.width;
        }
        y
    }

    fn resolve_collisions(&mut self, column: &[usize], alpha: f64) {
        let mid = column.len() / 2;
        let subject = &self.nodes[column[mid]];
        let (above, below) = (subject.y0 - self.py, subject.y1 + self.py);
        self.push_up(&column[..mid], above, alpha);
        self.push_down(&column[mid + 1..], below, alpha);
        self.push_up(column, self.extent.y1, alpha);
        self.push_down(column, self.extent.y0, alpha);
    }

    /// Moves overlapping nodes down, walking from the top.
    fn push_down(&mut self, nodes: &[usize], mut y: f64, alpha: f64) {
        for &n in nodes {
            let dy = (y - self.nodes[n].y0) * alpha;
            if dy > 1e-6 {
                self.shift(n, dy);
            }
            y = self.nodes[n].y1 + self.py;
        }
    }

    /// Moves overlapping nodes up, walking from the bottom.
    fn push_up(&mut self, nodes: &[usize], mut y: f64, alpha: f64) {
        for &n in nodes.iter().rev() {
            let dy = (self.nodes[n].y1 - y) * alpha;
            if dy > 1e-6 {
                self.shift(n, -dy);
            }
            y = self.nodes[n].y0 - self.py;
        }
    }

    fn finish(
        self,
        names: &[String],
        instance: &str,
        band_top: f64,
        layer_count: usize,
    ) -> SankeyLayout {
        let mut links = Vec::with_capacity(self.links.len());
        let mut out_cursor: Vec<f64> = self.nodes.iter().map(|n| n.y0).collect();
        let mut in_cursor = out_cursor.clone();
        for link in &self.links {
            let y0 = out_cursor[link.source] + link.width / 2.0;
            out_cursor[link.source] += link.width;
            let y1 = in_cursor[link.target] + link.width / 2.0;
            in_cursor[link.target] += link.width;
            links.push(SankeyLinkLayout {
                source: link.source,
                target: link.target,
                value: link.value,
                width: link.width,
                y0,
                y1,
            });
        }
        let nodes = self
            .nodes
            .iter()
            .zip(names)
            .map(|(node, name)| SankeyNodeLayout {
                name: name.clone(),
                layer: node.layer,
                rect: Rect::new(node.x0, node.y0, node.x0 + NODE_WIDTH, node.y1),
                value: node.value,
                label: if node.layer == 0 {
                    LabelPlacement::Origin
                } else if node.layer + 1 == layer_count {
                    LabelPlacement::Terminal
                } else {
                    LabelPlacement::Interior
                },
            })
            .collect();
        SankeyLayout {
            name: instance.to_string(),
            band_top,
            nodes,
            links,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::rainbow;

    fn attack_spec(instances: usize) -> SankeySpec {
        let nodes = [
            "IncomingAttacks",
            "Cheese",
            "Clean",
            "Cancelled",
            "CheeseTanked",
            "CleanTanked",
        ]
        .map(String::from)
        .to_vec();
        let links = vec![
            SankeyLink::new(0, 1, 40.0),
            SankeyLink::new(0, 2, 60.0),
            SankeyLink::new(1, 3, 10.0),
            SankeyLink::new(1, 4, 30.0),
            SankeyLink::new(2, 3, 20.0),
            SankeyLink::new(2, 4, 15.0),
            SankeyLink::new(2, 5, 25.0),
        ];
        SankeySpec::new(nodes, |_, to| {
            if to == "CleanTanked" {
                rainbow::GREEN
            } else {
                rainbow::TEAL
            }
        })
        .with_instances(
            (0..instances)
                .map(|i| SankeyInstance::new(format!("p{i}"), links.clone()))
                .collect(),
        )
    }

    #[test]
    fn layers_follow_declared_order() {
        let layouts = attack_spec(1).layout().unwrap();
        let layers: Vec<_> = layouts[0].nodes.iter().map(|n| n.layer).collect();
        assert_eq!(layers, vec![0, 1, 1, 2, 2, 2], "three columns");
        let labels: Vec<_> = layouts[0].nodes.iter().map(|n| n.label).collect();
        assert_eq!(
            labels,
            vec![
                LabelPlacement::Origin,
                LabelPlacement::Interior,
                LabelPlacement::Interior,
                LabelPlacement::Terminal,
                LabelPlacement::Terminal,
                LabelPlacement::Terminal,
            ],
            "one placement per node"
        );
    }

    #[test]
    fn node_values_and_columns() {
        let layout = &attack_spec(1).layout().unwrap()[0];
        assert_eq!(layout.nodes[0].value, 100.0, "origin outflow");
        assert_eq!(layout.nodes[3].value, 30.0, "cancelled inflow");
        assert_eq!(layout.nodes[0].rect.x0, 0.0, "first column at the left edge");
        assert!(
            (layout.nodes[5].rect.x1 - 400.0).abs() < 1e-9,
            "last column ends at the extent"
        );
    }

    #[test]
    fn nodes_stay_inside_their_band() {
        for layout in attack_spec(2).layout().unwrap() {
            let top = layout.band_top + 5.0;
            let bottom = layout.band_top + 250.0 - 5.0;
            for node in &layout.nodes {
                assert!(
                    node.rect.y0 >= top - 1e-6 && node.rect.y1 <= bottom + 1e-6,
                    "{} escaped its band: {:?}",
                    node.name,
                    node.rect
                );
            }
        }
    }

    #[test]
    fn link_widths_are_proportional() {
        let layout = &attack_spec(1).layout().unwrap()[0];
        let ratio = layout.links[1].width / layout.links[0].width;
        assert!((ratio - 1.5).abs() < 1e-9, "60 vs 40");
    }

    #[test]
    fn backward_links_are_rejected() {
        let spec = SankeySpec::new(vec!["a".into(), "b".into()], |_, _| rainbow::RED)
            .with_instances(vec![SankeyInstance::new("x", vec![SankeyLink::new(1, 0, 1.0)])]);
        assert!(
            matches!(spec.layout(), Err(ChartError::BackwardSankeyLink { from: 1, to: 0 })),
            "backward"
        );
        let spec = SankeySpec::new(vec!["a".into()], |_, _| rainbow::RED)
            .with_instances(vec![SankeyInstance::new("x", vec![SankeyLink::new(0, 4, 1.0)])]);
        assert!(
            matches!(spec.layout(), Err(ChartError::InvalidSankeyLink { nodes: 1, .. })),
            "out of range"
        );
    }

    #[test]
    fn render_draws_each_link_twice_and_labels_once() {
        let svg = attack_spec(1).render(&Theme::default()).unwrap();
        let doc = roxmltree::Document::parse(svg.markup()).unwrap();
        let links = doc.descendants().filter(|n| n.has_tag_name("path")).count();
        assert_eq!(links, 14, "white underlay plus colored stroke");
        let multiplied = doc
            .descendants()
            .filter(|n| {
                n.attribute("style")
                    .is_some_and(|s| s.contains("mix-blend-mode:multiply"))
            })
            .count();
        assert_eq!(multiplied, 7, "colored strokes blend");
        let texts: Vec<_> = doc
            .descendants()
            .filter(|n| n.has_tag_name("text"))
            .filter_map(|n| n.text())
            .collect();
        for name in ["IncomingAttacks", "Cheese", "Clean", "Cancelled", "CleanTanked", "p0"] {
            assert_eq!(
                texts.iter().filter(|t| **t == name).count(),
                1,
                "{name} labelled once"
            );
        }
    }
}
