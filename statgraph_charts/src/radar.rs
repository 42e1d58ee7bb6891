// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polar multi-metric chart.
//!
//! Each axis owns a clamped scale from raw values to a `[0, 1]` radius fraction. Entities
//! are drawn as closed, multiplied polygons. Numeric labels are placed along each axis in
//! entity order; a label whose radial band overlaps one already placed on the same axis is
//! dropped.

use core::f64::consts::PI;

use kurbo::{Affine, BezPath, Point, Rect};
use peniko::Mix;
use statgraph_scene::{Fragment, Node, Scene, StrokeStyle, TextAnchor, TextSpec, z_order};

use crate::error::{ChartError, Result};
use crate::format::to_precision;
use crate::legend::{LegendItem, LegendSpec};
use crate::scale::{ScaleContinuous, ScaleSpec};
use crate::theme::{Theme, rainbow};
use crate::title::TitleSpec;

const WIDTH: f64 = 500.0;
const HEIGHT: f64 = 500.0;
const RADIUS: f64 = 180.0;
const CENTER: (f64, f64) = (WIDTH / 2.0, HEIGHT / 2.0 + 20.0);
const LABEL_BAND: f64 = 15.0;

/// One spoke of the chart.
#[derive(Clone, Debug, PartialEq)]
pub struct RadarAxis {
    /// Caption at the end of the spoke.
    pub label: String,
    /// Value-to-fraction mapping; always applied clamped to `[0, 1]`.
    pub scale: ScaleSpec,
}

impl RadarAxis {
    /// Creates an axis.
    pub fn new(label: impl Into<String>, scale: impl Into<ScaleSpec>) -> Self {
        Self {
            label: label.into(),
            scale: scale.into(),
        }
    }

    fn resolve(&self) -> ScaleContinuous {
        self.scale.clamped().instantiate((0.0, 1.0))
    }

    /// Radius fraction for `value`.
    pub fn fraction(&self, value: f64) -> f64 {
        self.resolve().map(value)
    }
}

/// One polygon: an entity's value on every axis.
#[derive(Clone, Debug, PartialEq)]
pub struct RadarEntity {
    /// Legend label.
    pub name: String,
    /// One value per axis.
    pub values: Vec<f64>,
}

impl RadarEntity {
    /// Creates an entity.
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// An accepted value label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedLabel {
    /// Index among the drawable entities.
    pub entity: usize,
    /// Axis index.
    pub axis: usize,
    /// Inner (negative, axis-local) edge of the label band.
    pub start: f64,
}

/// A radar chart.
#[derive(Clone, Debug)]
pub struct RadarSpec {
    /// Caption drawn top-left.
    pub title: String,
    /// Spokes, clockwise from straight up.
    pub axes: Vec<RadarAxis>,
    /// Polygons, in drawing and label-priority order.
    pub entities: Vec<RadarEntity>,
}

/// Angle of axis `i` of `n`, clockwise from straight up.
fn axis_angle(i: usize, n: usize) -> f64 {
    2.0 * PI * i as f64 / n as f64
}

/// Whether text at `angle` would read upside down.
fn is_reversed(angle: f64) -> bool {
    angle > PI / 2.0 && angle < PI * 3.0 / 2.0
}

/// Point at `fraction` of the radius along `angle`, relative to the center.
fn polar(angle: f64, fraction: f64) -> Point {
    Point::new(
        angle.sin() * fraction * RADIUS,
        -angle.cos() * fraction * RADIUS,
    )
}

fn overlaps(start: f64, end: f64, taken: &[(f64, f64)]) -> bool {
    taken.iter().any(|&(s, e)| start <= e && end >= s)
}

impl RadarSpec {
    /// Creates a chart with no entities.
    pub fn new(title: impl Into<String>, axes: Vec<RadarAxis>) -> Self {
        Self {
            title: title.into(),
            axes,
            entities: Vec::new(),
        }
    }

    /// Sets the entities.
    pub fn with_entities(mut self, entities: Vec<RadarEntity>) -> Self {
        self.entities = entities;
        self
    }

    /// Entities with a finite value on every axis, in input order.
    ///
    /// May be empty when every entity has a missing value; the frame is still drawn.
    pub fn drawable(&self) -> Result<Vec<&RadarEntity>> {
        if self.entities.is_empty() || self.axes.is_empty() {
            return Err(ChartError::EmptyInput { chart: "radar" });
        }
        let mut out = Vec::with_capacity(self.entities.len());
        for entity in &self.entities {
            if entity.values.len() != self.axes.len() {
                return Err(ChartError::MisalignedSeries {
                    expected: self.axes.len(),
                    found: entity.values.len(),
                });
            }
            if entity.values.iter().all(|v| v.is_finite()) {
                out.push(entity);
            } else {
                tracing::warn!(
                    entity = %entity.name,
                    chart = %self.title,
                    "dropping entity with missing radar values"
                );
            }
        }
        Ok(out)
    }

    /// Radius fractions per drawable entity, per axis.
    pub fn fractions(&self) -> Result<Vec<Vec<f64>>> {
        let scales: Vec<_> = self.axes.iter().map(RadarAxis::resolve).collect();
        Ok(self
            .drawable()?
            .iter()
            .map(|e| e.values.iter().zip(&scales).map(|(v, s)| s.map(*v)).collect())
            .collect())
    }

    /// Value labels that survive overlap removal, in placement order.
    pub fn placed_labels(&self) -> Result<Vec<PlacedLabel>> {
        let fractions = self.fractions()?;
        let mut taken = vec![Vec::new(); self.axes.len()];
        let mut placed = Vec::new();
        for (entity, row) in fractions.iter().enumerate() {
            for (axis, f) in row.iter().enumerate() {
                let start = -(RADIUS * f + 20.0);
                let end = start + LABEL_BAND;
                if overlaps(start, end, &taken[axis]) {
                    continue;
                }
                taken[axis].push((start, end));
                placed.push(PlacedLabel {
                    entity,
                    axis,
                    start,
                });
            }
        }
        Ok(placed)
    }

    /// Renders the chart.
    pub fn render(&self, theme: &Theme) -> Result<Fragment> {
        let entities = self.drawable()?;
        let fractions = self.fractions()?;
        let labels = self.placed_labels()?;
        let n = self.axes.len();
        let palette = &rainbow::ENTITY_PALETTE;
        let origin = Affine::translate(CENTER);

        Scene::render(WIDTH, HEIGHT, |scene| {
            scene.push(
                Node::circle(Point::ZERO, RADIUS)
                    .with_fill(theme.background)
                    .with_stroke(StrokeStyle::solid(theme.f_high, 1.0))
                    .with_transform(origin)
                    .with_z_index(z_order::PLOT_BACKGROUND),
            );
            for i in 0..4 {
                scene.push(
                    Node::circle(Point::ZERO, RADIUS * f64::from(i) / 4.0)
                        .with_stroke(StrokeStyle::solid(theme.f_high, 1.0).with_opacity(0.5))
                        .with_transform(origin)
                        .with_z_index(z_order::GRID_LINES),
                );
            }
            for i in 0..n {
                let end = polar(axis_angle(i, n), 1.0);
                let mut spoke = BezPath::new();
                spoke.move_to(end);
                spoke.line_to(Point::ZERO);
                scene.push(
                    Node::path(spoke)
                        .with_stroke(
                            StrokeStyle::solid(theme.f_high, 1.0)
                                .with_opacity(0.5)
                                .with_dash(&[5.0, 1.0]),
                        )
                        .with_transform(origin)
                        .with_z_index(z_order::GRID_LINES),
                );
            }

            let points: Vec<Vec<Point>> = fractions
                .iter()
                .map(|row| {
                    row.iter()
                        .enumerate()
                        .map(|(i, f)| polar(axis_angle(i, n), *f))
                        .collect()
                })
                .collect();

            let curves = points
                .iter()
                .enumerate()
                .map(|(i, pts)| {
                    let color = palette[i % palette.len()];
                    Node::polygon(pts.iter().copied())
                        .with_fill(color)
                        .with_fill_opacity(0.5)
                        .with_stroke(StrokeStyle::solid(color, 1.0))
                        .with_blend(Mix::Multiply)
                        .with_transform(origin)
                })
                .collect();
            scene.push_isolated(z_order::SERIES_FILL, curves);

            for (i, pts) in points.iter().enumerate() {
                let color = palette[i % palette.len()];
                for p in pts {
                    scene.push(
                        Node::circle(*p, 2.0)
                            .with_fill(color)
                            .with_transform(origin)
                            .with_z_index(z_order::SERIES_POINTS),
                    );
                }
            }

            for label in &labels {
                let angle = axis_angle(label.axis, n);
                let reversed = is_reversed(angle);
                let value = entities[label.entity].values[label.axis];
                let f = fractions[label.entity][label.axis];
                scene.push(
                    Node::rounded_rect(
                        Rect::new(-15.0, label.start, 15.0, label.start + LABEL_BAND),
                        2.0,
                    )
                    .with_fill(theme.f_high)
                    .with_fill_opacity(0.7)
                    .with_transform(origin * Affine::rotate(angle))
                    .with_z_index(z_order::LABEL_BACKDROPS),
                );
                let (turn, y) = if reversed {
                    (PI, RADIUS * f + 15.0)
                } else {
                    (0.0, -(RADIUS * f + 10.0))
                };
                scene.push(
                    Node::text(
                        TextSpec::new(Point::new(0.0, y), to_precision(value, 3))
                            .with_anchor(TextAnchor::Middle),
                    )
                    .with_fill(theme.b_med)
                    .with_transform(origin * Affine::rotate(angle + turn)),
                );
            }

            for (i, axis) in self.axes.iter().enumerate() {
                let angle = axis_angle(i, n);
                let reversed = is_reversed(angle);
                let (turn, y) = if reversed { (PI, 30.0) } else { (0.0, -25.0) };
                let end = polar(angle, 1.0).to_vec2();
                scene.push(
                    Node::text(
                        TextSpec::new(Point::new(0.0, y), axis.label.clone())
                            .with_anchor(TextAnchor::Middle),
                    )
                    .with_fill(theme.f_high)
                    .with_transform(
                        origin * Affine::translate(end) * Affine::rotate(angle + turn),
                    )
                    .with_z_index(z_order::AXIS_LABELS),
                );
            }

            let title = TitleSpec::new(self.title.clone(), Point::new(10.0, 20.0), theme.f_high);
            scene.extend(title.node());
            let names: Vec<_> = entities.iter().map(|e| e.name.as_str()).collect();
            scene.extend(
                LegendSpec::new(LegendItem::cycled(&names, palette))
                    .with_y(10.0)
                    .nodes(),
            );
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::{ScaleLinearSpec, ScaleSqrtSpec};

    fn axes() -> Vec<RadarAxis> {
        vec![
            RadarAxis::new("APM", ScaleLinearSpec::new((0.0, 300.0))),
            RadarAxis::new("PPS", ScaleLinearSpec::new((0.0, 5.0))),
            RadarAxis::new(
                "Sec/DS",
                ScaleSpec::from(ScaleSqrtSpec::new((0.0, 20.0))).inverted(),
            ),
        ]
    }

    #[test]
    fn fractions_are_clamped() {
        let axis = &axes()[0];
        assert_eq!(axis.fraction(-50.0), 0.0, "below the domain");
        assert_eq!(axis.fraction(900.0), 1.0, "above the domain");
        assert_eq!(axis.fraction(150.0), 0.5, "inside");
        let inverted = &axes()[2];
        assert_eq!(inverted.fraction(0.0), 1.0, "lower is better");
        assert_eq!(inverted.fraction(40.0), 0.0, "clamped at the far end");
    }

    #[test]
    fn nan_entities_are_dropped() {
        let spec = RadarSpec::new("Surge", axes()).with_entities(vec![
            RadarEntity::new("a", vec![100.0, 2.0, 5.0]),
            RadarEntity::new("b", vec![f64::NAN, 2.0, 5.0]),
        ]);
        let names: Vec<_> = spec.drawable().unwrap().iter().map(|e| e.name.clone()).collect();
        assert_eq!(names, vec!["a".to_string()], "b has a NaN");

        let svg = spec.render(&Theme::default()).unwrap();
        let doc = roxmltree::Document::parse(svg.markup()).unwrap();
        assert!(
            doc.descendants().all(|n| n.text() != Some("b")),
            "b left the legend"
        );
    }

    #[test]
    fn all_nan_still_draws_the_frame() {
        let spec = RadarSpec::new("Surge", axes())
            .with_entities(vec![RadarEntity::new("b", vec![f64::NAN, 2.0, 5.0])]);
        assert!(spec.drawable().unwrap().is_empty(), "b is dropped");
        let svg = spec.render(&Theme::default()).unwrap().markup().to_owned();
        let doc = roxmltree::Document::parse(&svg).unwrap();
        let polygons = doc.descendants().filter(|n| n.has_tag_name("polygon")).count();
        assert_eq!(polygons, 0, "no curves or points");
        let spokes = doc
            .descendants()
            .filter(|n| n.has_tag_name("path") && n.attribute("stroke-dasharray").is_some())
            .count();
        assert_eq!(spokes, 3, "one spoke per axis");
        assert!(svg.contains(">APM<"), "axis labels survive");
    }

    #[test]
    fn no_entities_is_empty_input() {
        let spec = RadarSpec::new("Surge", axes());
        assert!(
            matches!(spec.render(&Theme::default()), Err(ChartError::EmptyInput { .. })),
            "nothing to draw"
        );
    }

    #[test]
    fn earlier_entities_win_label_conflicts() {
        let spec = RadarSpec::new("", axes()).with_entities(vec![
            RadarEntity::new("a", vec![150.0, 1.0, 5.0]),
            RadarEntity::new("b", vec![155.0, 4.0, 5.0]),
        ]);
        let placed = spec.placed_labels().unwrap();
        let on_apm: Vec<_> = placed.iter().filter(|l| l.axis == 0).map(|l| l.entity).collect();
        assert_eq!(on_apm, vec![0], "b overlaps a on APM");
        let on_pps: Vec<_> = placed.iter().filter(|l| l.axis == 1).map(|l| l.entity).collect();
        assert_eq!(on_pps, vec![0, 1], "far apart on PPS");
    }

    #[test]
    fn curves_sit_in_an_isolation_group() {
        let spec = RadarSpec::new("Surge", axes())
            .with_entities(vec![RadarEntity::new("a", vec![100.0, 2.0, 5.0])]);
        let svg = spec.render(&Theme::default()).unwrap();
        let doc = roxmltree::Document::parse(svg.markup()).unwrap();
        let group = doc
            .descendants()
            .find(|n| n.attribute("style") == Some("isolation:isolate"))
            .unwrap();
        assert_eq!(
            group.children().filter(|c| c.has_tag_name("polygon")).count(),
            1,
            "one polygon per entity"
        );
        assert!(
            doc.descendants().any(|n| n.text() == Some("2.00")),
            "three significant digits"
        );
    }

    #[test]
    fn values_paint_over_their_backdrops() {
        let spec = RadarSpec::new("Surge", axes())
            .with_entities(vec![RadarEntity::new("a", vec![100.0, 2.0, 5.0])]);
        let svg = spec.render(&Theme::default()).unwrap();
        let doc = roxmltree::Document::parse(svg.markup()).unwrap();
        let nodes: Vec<_> = doc.descendants().collect();
        let last_backdrop = nodes
            .iter()
            .rposition(|n| n.has_tag_name("rect") && n.attribute("rx").is_some())
            .unwrap();
        let value = nodes.iter().position(|n| n.text() == Some("2.00")).unwrap();
        assert!(value > last_backdrop, "value text is not hidden");
    }

    #[test]
    fn reversed_half() {
        assert!(!is_reversed(0.0), "top");
        assert!(is_reversed(PI), "bottom");
        assert!(!is_reversed(PI / 2.0), "right edge is upright");
    }
}
