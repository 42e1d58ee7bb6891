// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bucket distributions as bars (one entity) or overlaid step areas (several).

use kurbo::{BezPath, Point, Rect};
use peniko::{Color, Mix};
use statgraph_scene::{Fragment, Node, Scene, StrokeStyle, TextAnchor, TextSpec, z_order};

use crate::axis::{AxisOrient, AxisSpec};
use crate::curve::polyline;
use crate::error::{ChartError, Result};
use crate::format::{format_number, to_fixed};
use crate::layout::Margin;
use crate::legend::{LegendItem, LegendSpec};
use crate::scale::{ScaleBand, ScaleLinear, ScaleLinearSpec};
use crate::theme::{Theme, rainbow};
use crate::title::TitleSpec;

pub(crate) const WIDTH: f64 = 600.0;
pub(crate) const HEIGHT: f64 = 300.0;
const SINGLE_MARGIN: Margin = Margin::new(20.0, 40.0, 30.0, 40.0);
pub(crate) const MULTI_MARGIN: Margin = Margin::new(60.0, 40.0, 30.0, 40.0);

/// Bar colors for a single entity, mirrored around the middle columns.
const COLUMN_PALETTE: [Color; 10] = [
    rainbow::GREEN,
    rainbow::VIOLET,
    rainbow::PURPLE,
    rainbow::BLUE,
    rainbow::PINK,
    rainbow::PINK,
    rainbow::BLUE,
    rainbow::PURPLE,
    rainbow::VIOLET,
    rainbow::GREEN,
];

/// Percentage-of-total distribution over fixed buckets.
#[derive(Clone, Debug)]
pub struct WellColumnsSpec {
    /// Caption drawn top-left.
    pub title: String,
    /// `(entity, bucket counts)`; every vector must have the same length.
    pub entities: Vec<(String, Vec<f64>)>,
}

/// Checks that every entity has the same bucket count and returns it.
pub(crate) fn bucket_count(entities: &[(String, Vec<f64>)], chart: &'static str) -> Result<usize> {
    let Some((_, first)) = entities.first() else {
        return Err(ChartError::EmptyInput { chart });
    };
    let expected = first.len();
    if let Some((_, bad)) = entities.iter().find(|(_, b)| b.len() != expected) {
        return Err(ChartError::RaggedBuckets {
            expected,
            found: bad.len(),
        });
    }
    if expected == 0 {
        return Err(ChartError::EmptyInput { chart });
    }
    Ok(expected)
}

/// A closed, half-transparent overlay area for one entity.
pub(crate) fn overlay_area(path: BezPath, color: Color) -> Node {
    Node::path(path)
        .with_fill(color)
        .with_fill_opacity(0.5)
        .with_stroke(StrokeStyle::solid(color, 2.0))
        .with_blend(Mix::Overlay)
}

/// Left and right percentage axes.
pub(crate) fn percent_axes(y: &ScaleLinear, plot: Rect, theme: &Theme) -> Vec<Node> {
    let percent = |v: f64| format!("{}%", format_number(v));
    let mut nodes = AxisSpec::vertical(AxisOrient::Left, y, 5, percent, plot.x0, theme).nodes();
    nodes.extend(AxisSpec::vertical(AxisOrient::Right, y, 5, percent, plot.x1, theme).nodes());
    nodes
}

/// Legend of entity names in the entity palette.
pub(crate) fn entity_legend(entities: &[(String, Vec<f64>)]) -> Vec<Node> {
    let names: Vec<_> = entities.iter().map(|(n, _)| n.as_str()).collect();
    LegendSpec::new(LegendItem::cycled(&names, &rainbow::ENTITY_PALETTE))
        .with_y(25.0)
        .nodes()
}

impl WellColumnsSpec {
    /// Creates a chart.
    pub fn new(title: impl Into<String>, entities: Vec<(String, Vec<f64>)>) -> Self {
        Self {
            title: title.into(),
            entities,
        }
    }

    /// Each entity's buckets as percentages of its own total (all zero for a zero total).
    pub fn percentages(&self) -> Result<Vec<Vec<f64>>> {
        bucket_count(&self.entities, "well columns")?;
        Ok(self
            .entities
            .iter()
            .map(|(_, buckets)| {
                let total: f64 = buckets.iter().sum();
                buckets
                    .iter()
                    .map(|b| if total != 0.0 { b / total * 100.0 } else { 0.0 })
                    .collect()
            })
            .collect())
    }

    /// Renders bars for a single entity, step areas otherwise.
    pub fn render(&self, theme: &Theme) -> Result<Fragment> {
        let data = self.percentages()?;
        let single = data.len() == 1;
        let margin = if single { SINGLE_MARGIN } else { MULTI_MARGIN };
        let plot = margin.plot(WIDTH, HEIGHT);
        let n = data[0].len();
        let max = data.iter().flatten().copied().fold(0.0, f64::max);
        let max = if max > 0.0 { max } else { 1.0 };
        let x = ScaleBand::new((plot.x0, plot.x1), n);
        let y = ScaleLinearSpec::new((0.0, max))
            .with_nice(true)
            .instantiate((plot.y1, plot.y0));

        Scene::render(WIDTH, HEIGHT, |scene| {
            if single {
                for (i, d) in data[0].iter().enumerate() {
                    let top = y.map(*d);
                    scene.push(
                        Node::rect(Rect::new(x.x(i), top, x.x(i) + x.band_width(), y.map(0.0)))
                            .with_fill(COLUMN_PALETTE[i % COLUMN_PALETTE.len()]),
                    );
                    scene.push(
                        Node::text(
                            TextSpec::new(
                                Point::new(x.center(i), top - 5.0),
                                format!("{}%", to_fixed(*d, 1)),
                            )
                            .with_anchor(TextAnchor::Middle),
                        )
                        .with_fill(theme.f_high),
                    );
                }
                scene.push(
                    Node::text(TextSpec::new(
                        Point::new(120.0, 15.0),
                        self.entities[0].0.clone(),
                    ))
                    .with_fill(theme.f_med)
                    .with_z_index(z_order::TITLES),
                );
            } else {
                let areas = data
                    .iter()
                    .enumerate()
                    .map(|(i, d)| {
                        let palette = &rainbow::ENTITY_PALETTE;
                        overlay_area(step_path(d, &x, &y, plot.x1), palette[i % palette.len()])
                    })
                    .collect();
                scene.push_isolated(z_order::SERIES_FILL, areas);
                scene.extend(entity_legend(&self.entities));
            }

            let labels = (1..=n).map(|i| format!("#{i}"));
            scene.extend(
                AxisSpec::bottom_band(&x, (plot.x0, plot.x1), labels, plot.y1, theme).nodes(),
            );
            scene.extend(percent_axes(&y, plot, theme));
            let title = TitleSpec::new(self.title.clone(), Point::new(10.0, 15.0), theme.f_high);
            scene.extend(title.node());
            Ok(())
        })
    }
}

/// Outline of a step area: flat across each band, closed down to the baseline at `right`.
fn step_path(d: &[f64], x: &ScaleBand, y: &ScaleLinear, right: f64) -> BezPath {
    let n = d.len();
    let mut points = vec![Point::new(x.x(0), y.map(0.0))];
    for j in 0..n - 1 {
        points.push(Point::new(x.x(j), y.map(d[j])));
        points.push(Point::new(x.x(j + 1), y.map(d[j])));
    }
    points.push(Point::new(x.x(n - 1), y.map(d[n - 1])));
    points.push(Point::new(right, y.map(d[n - 1])));
    points.push(Point::new(right, y.map(0.0)));
    polyline(&points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buckets(v: &[f64]) -> Vec<f64> {
        v.to_vec()
    }

    #[test]
    fn percentages_per_entity() {
        let spec = WellColumnsSpec::new(
            "Well Columns",
            vec![
                ("a".into(), buckets(&[1.0, 3.0, 0.0, 0.0])),
                ("b".into(), buckets(&[0.0; 4])),
            ],
        );
        let p = spec.percentages().unwrap();
        assert_eq!(p[0], vec![25.0, 75.0, 0.0, 0.0], "share of total");
        assert_eq!(p[1], vec![0.0; 4], "zero total stays zero");
    }

    #[test]
    fn ragged_buckets_are_rejected() {
        let spec = WellColumnsSpec::new(
            "",
            vec![("a".into(), vec![1.0; 10]), ("b".into(), vec![1.0; 9])],
        );
        assert!(
            matches!(
                spec.percentages(),
                Err(ChartError::RaggedBuckets { expected: 10, found: 9 })
            ),
            "ragged"
        );
    }

    #[test]
    fn single_entity_draws_bars() {
        let mut counts = vec![0.0; 10];
        counts[0] = 3.0;
        counts[9] = 1.0;
        let svg = WellColumnsSpec::new("Well Columns", vec![("solo".into(), counts)])
            .render(&Theme::default())
            .unwrap();
        let doc = roxmltree::Document::parse(svg.markup()).unwrap();
        let texts: Vec<_> = doc.descendants().filter_map(|n| n.text()).collect();
        for expected in ["75.0%", "25.0%", "#1", "#10", "solo"] {
            assert!(texts.contains(&expected), "missing {expected}");
        }
        // Bars start at the left margin and fill the plot width.
        let first = doc
            .descendants()
            .find(|n| n.has_tag_name("rect") && n.attribute("fill") == Some("#95dab6"))
            .unwrap();
        assert_eq!(first.attribute("x"), Some("40"), "first band");
        assert_eq!(first.attribute("width"), Some("52"), "520 / 10");
    }

    #[test]
    fn several_entities_draw_overlays() {
        let svg = WellColumnsSpec::new(
            "",
            vec![("a".into(), vec![1.0; 10]), ("b".into(), vec![2.0; 10])],
        )
        .render(&Theme::default())
        .unwrap();
        let doc = roxmltree::Document::parse(svg.markup()).unwrap();
        let overlays = doc
            .descendants()
            .filter(|n| {
                n.attribute("style")
                    .is_some_and(|s| s.contains("mix-blend-mode:overlay"))
            })
            .count();
        assert_eq!(overlays, 2, "one area per entity");
    }
}
