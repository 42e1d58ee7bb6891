// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Semicircular speed gauge.
//!
//! The dial runs from straight left (value 0) over the top to straight right (`max`), split
//! into colored zones by a cutoff list. Each reading gets a needle; needle colors are taken
//! round-robin from the entity palette in ascending value order, skipping any color equal
//! to the zone the needle rests in.

use core::f64::consts::PI;

use kurbo::{Affine, Circle, Point, Shape};
use peniko::Color;
use peniko::color::palette::css;
use statgraph_scene::{Fragment, Node, Scene, StrokeStyle, TextAnchor, TextSpec, z_order};

use crate::error::{ChartError, Result};
use crate::format::{format_number, round_half_up};
use crate::legend::{LegendItem, LegendSpec};
use crate::theme::{Theme, rainbow, same_color};
use crate::title::TitleSpec;

const WIDTH: f64 = 500.0;
const MARGIN_VERT: f64 = 40.0;
const MARGIN_HORIZ: f64 = 40.0;
const MARGIN_LEGEND: f64 = 50.0;
const HEIGHT: f64 = WIDTH / 2.0 + MARGIN_VERT + MARGIN_LEGEND;
const RADIUS: f64 = (WIDTH - MARGIN_HORIZ * 2.0) / 2.0;
const INNER: f64 = RADIUS * 0.75;

/// Needle angle in radians for `value` on a dial reaching `max`.
///
/// `0` points left and `π` points right; the result may overshoot either end by 8 degrees.
pub fn needle_angle(value: f64, max: f64) -> f64 {
    (value / max).clamp(-8.0 / 180.0, 188.0 / 180.0) * PI
}

/// A colored band of the dial.
#[derive(Clone, Debug, PartialEq)]
pub struct GaugeZone {
    /// Caption drawn outside the band.
    pub label: String,
    /// Band color.
    pub color: Color,
}

impl GaugeZone {
    /// Creates a zone.
    pub fn new(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            color,
        }
    }
}

/// A gauge with one needle per entity.
#[derive(Clone, Debug)]
pub struct SpeedGaugeSpec {
    /// Caption drawn top-left.
    pub title: String,
    /// Value at the right end of the dial.
    pub max: f64,
    /// Zone boundaries; one more than the number of zones.
    pub cutoffs: Vec<f64>,
    /// Zones, left to right.
    pub zones: Vec<GaugeZone>,
    /// `(entity, value)` pairs in legend order.
    pub readings: Vec<(String, f64)>,
}

impl SpeedGaugeSpec {
    /// Creates a gauge with no readings.
    pub fn new(
        title: impl Into<String>,
        max: f64,
        cutoffs: Vec<f64>,
        zones: Vec<GaugeZone>,
    ) -> Self {
        Self {
            title: title.into(),
            max,
            cutoffs,
            zones,
            readings: Vec::new(),
        }
    }

    /// Sets the readings.
    pub fn with_readings(mut self, readings: Vec<(String, f64)>) -> Self {
        self.readings = readings;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.zones.is_empty() || self.cutoffs.len() != self.zones.len() + 1 {
            return Err(ChartError::InvalidZones {
                cutoffs: self.cutoffs.len(),
                zones: self.zones.len(),
            });
        }
        if !self.max.is_finite() || self.max <= 0.0 {
            return Err(ChartError::DegenerateDomain {
                min: 0.0,
                max: self.max,
            });
        }
        if self.readings.is_empty() {
            return Err(ChartError::EmptyInput { chart: "speed gauge" });
        }
        Ok(())
    }

    /// Index of the zone `value` rests in: the last zone starting at or below it.
    pub fn zone_index(&self, value: f64) -> usize {
        self.zones
            .iter()
            .zip(&self.cutoffs)
            .take_while(|(_, start)| **start <= value)
            .count()
            .saturating_sub(1)
    }

    /// Needle color per reading, in input order.
    pub fn marker_colors(&self) -> Vec<Color> {
        let palette = &rainbow::ENTITY_PALETTE;
        let mut order: Vec<usize> = (0..self.readings.len()).collect();
        // Stable, so equal values keep input order.
        order.sort_by(|a, b| self.readings[*a].1.total_cmp(&self.readings[*b].1));

        let mut colors = vec![rainbow::RED; self.readings.len()];
        let mut cursor = 0;
        for i in order {
            let Some(zone) = self.zones.get(self.zone_index(self.readings[i].1)) else {
                continue;
            };
            // Bounded: the palette holds more than one distinct color.
            for _ in 0..palette.len() {
                if !same_color(palette[cursor], zone.color) {
                    break;
                }
                cursor = (cursor + 1) % palette.len();
            }
            colors[i] = palette[cursor];
            cursor = (cursor + 1) % palette.len();
        }
        colors
    }

    /// Dial angle (0 is up, clockwise) of each cutoff.
    fn cutoff_angles(&self) -> Vec<f64> {
        let first = self.cutoffs.first().copied().unwrap_or(0.0);
        let last = self.cutoffs.last().copied().unwrap_or(1.0);
        let span = last - first;
        self.cutoffs
            .iter()
            .map(|c| {
                let t = if span != 0.0 { (c - first) / span } else { 0.0 };
                -PI / 2.0 + PI * t
            })
            .collect()
    }

    /// Renders the gauge.
    pub fn render(&self, theme: &Theme) -> Result<Fragment> {
        self.validate()?;
        let colors = self.marker_colors();
        let angles = self.cutoff_angles();
        let dial = Affine::translate((WIDTH / 2.0, HEIGHT - MARGIN_VERT));

        Scene::render(WIDTH, HEIGHT, |scene| {
            for (i, zone) in self.zones.iter().enumerate() {
                let (a0, a1) = (angles[i], angles[i + 1]);
                // kurbo measures angles from +x; the dial measures them from straight up.
                let sector = Circle::new(Point::ZERO, RADIUS)
                    .segment(INNER, a0 - PI / 2.0, a1 - a0)
                    .to_path(0.1);
                scene.push(
                    Node::path(sector)
                        .with_fill(zone.color)
                        .with_stroke(StrokeStyle::solid(zone.color, 1.0))
                        .with_transform(dial),
                );
                scene.push(
                    Node::text(
                        TextSpec::new(Point::new(0.0, -(RADIUS + 10.0)), zone.label.clone())
                            .with_anchor(TextAnchor::Middle),
                    )
                    .with_fill(zone.color)
                    .with_transform(dial * Affine::rotate((a0 + a1) / 2.0))
                    .with_z_index(z_order::AXIS_LABELS),
                );
                let bound_fill = if i % 2 == 1 { css::WHITE } else { css::DARK_GRAY };
                scene.push(
                    Node::text(
                        TextSpec::new(
                            Point::new(0.0, -(INNER - 15.0)),
                            format_number(round_half_up(self.cutoffs[i + 1])),
                        )
                        .with_anchor(TextAnchor::Middle),
                    )
                    .with_fill(bound_fill)
                    .with_transform(dial * Affine::rotate(a1))
                    .with_z_index(z_order::AXIS_LABELS),
                );
            }
            scene.push(
                Node::text(
                    TextSpec::new(Point::new(0.0, -(INNER - 15.0)), "0")
                        .with_anchor(TextAnchor::Middle),
                )
                .with_fill(css::WHITE)
                .with_transform(dial * Affine::rotate(-PI / 2.0))
                .with_z_index(z_order::AXIS_LABELS),
            );

            let mut order: Vec<usize> = (0..self.readings.len()).collect();
            order.sort_by(|a, b| self.readings[*a].1.total_cmp(&self.readings[*b].1));
            for i in order {
                let value = self.readings[i].1;
                let color = colors[i];
                let angle = needle_angle(value, self.max);
                let needle = dial * Affine::rotate(angle - PI / 2.0);
                scene.push(
                    Node::polygon([
                        Point::new(0.0, 0.0),
                        Point::new(5.0, -10.0),
                        Point::new(0.0, -RADIUS),
                        Point::new(-5.0, -10.0),
                    ])
                    .with_fill(color)
                    .with_transform(needle)
                    .with_z_index(z_order::SERIES_STROKE),
                );
                let hub = Point::new(
                    -angle.cos() * RADIUS * 0.875,
                    -angle.sin() * RADIUS * 0.875,
                );
                scene.push(
                    Node::circle(hub, 15.0)
                        .with_fill(theme.f_high)
                        .with_stroke(StrokeStyle::solid(color, 1.0))
                        .with_transform(dial)
                        .with_z_index(z_order::SERIES_POINTS),
                );
                scene.push(
                    Node::text(
                        TextSpec::new(
                            Point::new(0.0, -RADIUS + 30.0),
                            format_number(round_half_up(value)),
                        )
                        .with_anchor(TextAnchor::Middle),
                    )
                    .with_fill(theme.b_med)
                    .with_transform(needle),
                );
            }

            let title = TitleSpec::new(self.title.clone(), Point::new(10.0, 20.0), theme.f_high);
            scene.extend(title.node());
            let items = self
                .readings
                .iter()
                .zip(&colors)
                .map(|((name, _), color)| LegendItem::solid(name.clone(), *color))
                .collect();
            scene.extend(LegendSpec::new(items).nodes());
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio_gauge(readings: &[(&str, f64)]) -> SpeedGaugeSpec {
        SpeedGaugeSpec::new(
            "Downstacking Ratio",
            100.0,
            vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0],
            vec![
                GaugeZone::new("upstacker", rainbow::TEAL),
                GaugeZone::new("aggressive", rainbow::GREEN),
                GaugeZone::new("medium", rainbow::YELLOW),
                GaugeZone::new("defensive", rainbow::ORANGE),
                GaugeZone::new("downstacker", rainbow::RED),
            ],
        )
        .with_readings(readings.iter().map(|(n, v)| ((*n).to_string(), *v)).collect())
    }

    #[test]
    fn needle_angle_clamps() {
        assert_eq!(needle_angle(0.0, 100.0), 0.0, "zero");
        assert_eq!(needle_angle(100.0, 100.0), PI, "max");
        assert_eq!(needle_angle(-1.0e9, 100.0), -8.0 / 180.0 * PI, "low overshoot");
        assert_eq!(needle_angle(1.0e9, 100.0), 188.0 / 180.0 * PI, "high overshoot");
    }

    #[test]
    fn zone_lookup_uses_start_cutoffs() {
        let g = ratio_gauge(&[]);
        assert_eq!(g.zone_index(-5.0), 0, "below everything falls back to the first zone");
        assert_eq!(g.zone_index(20.0), 1, "a cutoff starts its zone");
        assert_eq!(g.zone_index(99.0), 4, "last zone");
        assert_eq!(g.zone_index(150.0), 4, "past the end stays in the last zone");
    }

    #[test]
    fn markers_never_match_their_zone() {
        let g = ratio_gauge(&[("a", 90.0)]);
        assert_eq!(g.marker_colors(), vec![rainbow::GREEN], "red zone skips red");

        let g = ratio_gauge(&[("hi", 90.0), ("lo", 10.0)]);
        // Ascending: lo takes red, hi takes green.
        assert_eq!(
            g.marker_colors(),
            vec![rainbow::GREEN, rainbow::RED],
            "input order preserved in the result"
        );
    }

    #[test]
    fn invalid_zones_are_rejected() {
        let mut g = ratio_gauge(&[("a", 1.0)]);
        g.cutoffs.pop();
        assert!(
            matches!(
                g.render(&Theme::default()),
                Err(ChartError::InvalidZones { cutoffs: 5, zones: 5 })
            ),
            "one cutoff short"
        );
    }

    #[test]
    fn renders_one_needle_per_reading() {
        let svg = ratio_gauge(&[("a", 30.0), ("b", 70.0)])
            .render(&Theme::default())
            .unwrap();
        assert_eq!((svg.width(), svg.height()), (500.0, 340.0), "canvas");
        let doc = roxmltree::Document::parse(svg.markup()).unwrap();
        assert_eq!(
            doc.descendants().filter(|n| n.has_tag_name("polygon")).count(),
            2,
            "needles"
        );
        let texts: Vec<_> = doc.descendants().filter_map(|n| n.text()).collect();
        for expected in ["0", "20", "100", "aggressive", "30", "70"] {
            assert!(texts.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn needle_values_round_half_up() {
        let svg = ratio_gauge(&[("a", -2.5), ("b", 12.5)])
            .render(&Theme::default())
            .unwrap();
        let doc = roxmltree::Document::parse(svg.markup()).unwrap();
        let texts: Vec<_> = doc.descendants().filter_map(|n| n.text()).collect();
        assert!(texts.contains(&"-2"), "negative half goes up");
        assert!(texts.contains(&"13"), "positive half goes up");
        assert!(!texts.contains(&"-3"), "not away from zero");
    }
}
