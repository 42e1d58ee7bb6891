// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stacked bars against a fixed ceiling, with overflow tiers and stars.
//!
//! Values stack in raw units. A bar whose total exceeds the ceiling is scaled down to fill
//! it exactly; the excess is reported above the bar as a severity label from a
//! [`TierTable`] and a row of star glyphs, one per full `step`.

use kurbo::{Affine, Point, Rect};
use peniko::Color;
use statgraph_scene::{Fragment, Node, Scene, StrokeStyle, TextAnchor, TextSpec, z_order};

use crate::axis::AxisSpec;
use crate::error::{ChartError, Result};
use crate::format::format_number;
use crate::layout::Margin;
use crate::legend::{LegendItem, LegendSpec};
use crate::scale::{ScaleBand, ScaleLinearSpec};
use crate::series::{CategoryRow, SeriesKey, StackOffset, stack_rows};
use crate::symbol::Symbol;
use crate::theme::{Theme, rainbow};
use crate::title::TitleSpec;

const WIDTH: f64 = 500.0;
const HEIGHT: f64 = 300.0;
const MARGIN: Margin = Margin::new(100.0, 20.0, 50.0, 20.0);
const STAR_AREA: f64 = 40.0;
const STAR_SPACING: f64 = 15.0;

/// A named severity level.
#[derive(Clone, Debug, PartialEq)]
pub struct Tier {
    /// Label drawn above the bar.
    pub name: String,
    /// Label color.
    pub color: Color,
}

/// Ordered severity levels; index 0 means "no overflow worth naming".
#[derive(Clone, Debug, PartialEq)]
pub struct TierTable {
    tiers: Vec<Tier>,
}

impl TierTable {
    /// Creates a table from `(name, color)` pairs, least severe first.
    pub fn new(tiers: impl IntoIterator<Item = (String, Color)>) -> Self {
        Self {
            tiers: tiers
                .into_iter()
                .map(|(name, color)| Tier { name, color })
                .collect(),
        }
    }

    /// The nine loot-rarity tiers, from common to divine.
    pub fn loot(theme: &Theme) -> Self {
        Self::new(
            [
                ("common", theme.f_high),
                ("uncommon", rainbow::GREEN),
                ("rare", rainbow::VIOLET),
                ("epic", rainbow::PURPLE),
                ("legendary", rainbow::BLUE),
                ("mythic", rainbow::PINK),
                ("exotic", rainbow::YELLOW),
                ("ancient", rainbow::ORANGE),
                ("divine", rainbow::RED),
            ]
            .map(|(name, color)| (name.to_string(), color)),
        )
    }

    /// Number of tiers.
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Returns `true` if the table has no tiers.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Tier at `index`.
    pub fn get(&self, index: usize) -> Option<&Tier> {
        self.tiers.get(index)
    }

    /// Tier index for an overflow amount: one tier per full `step`, clamped to the table.
    pub fn index(&self, excess: f64, step: f64) -> usize {
        let last = self.tiers.len().saturating_sub(1);
        full_steps(excess, step).min(last)
    }
}

/// Number of whole `step`s in `excess` (0 for non-positive or non-finite input).
pub fn full_steps(excess: f64, step: f64) -> usize {
    if step.is_nan() || step <= 0.0 || !excess.is_finite() || excess <= 0.0 {
        return 0;
    }
    let steps = (excess / step).floor().min(1_000.0);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "positive and capped"
    )]
    {
        steps as usize
    }
}

/// A capped stacked bar chart.
#[derive(Clone, Debug)]
pub struct OverflowBarSpec {
    /// Caption drawn top-left; may be empty.
    pub title: String,
    /// Series, bottom of the stack first.
    pub keys: Vec<SeriesKey>,
    /// Bars, left to right.
    pub rows: Vec<CategoryRow>,
    /// Top of the value axis.
    pub ceiling: f64,
    /// Overflow per star / tier.
    pub step: f64,
    /// Severity table; defaults to [`TierTable::loot`].
    pub tiers: Option<TierTable>,
}

impl OverflowBarSpec {
    /// Creates an empty chart.
    pub fn new(title: impl Into<String>, keys: Vec<SeriesKey>, ceiling: f64, step: f64) -> Self {
        Self {
            title: title.into(),
            keys,
            rows: Vec::new(),
            ceiling,
            step,
            tiers: None,
        }
    }

    /// Sets the rows.
    pub fn with_rows(mut self, rows: Vec<CategoryRow>) -> Self {
        self.rows = rows;
        self
    }

    /// Overrides the severity table.
    pub fn with_tiers(mut self, tiers: TierTable) -> Self {
        self.tiers = Some(tiers);
        self
    }

    /// Amount by which `row` exceeds the ceiling (never negative).
    pub fn excess(&self, row: &CategoryRow) -> f64 {
        (row.total() - self.ceiling).max(0.0)
    }

    /// Renders the chart.
    pub fn render(&self, theme: &Theme) -> Result<Fragment> {
        if self.rows.is_empty() {
            return Err(ChartError::EmptyInput {
                chart: "overflow bar",
            });
        }
        if !self.ceiling.is_finite() || self.ceiling <= 0.0 {
            return Err(ChartError::DegenerateDomain {
                min: 0.0,
                max: self.ceiling,
            });
        }
        let layers = stack_rows(&self.rows, self.keys.len(), StackOffset::Cap(self.ceiling))?;
        let colors: Vec<_> = self.keys.iter().map(|k| k.color).collect();
        let legend_items = LegendItem::aligned(&self.keys, &colors, |k| k.label.clone())?;
        let tiers = self.tiers.clone().unwrap_or_else(|| TierTable::loot(theme));

        let plot = MARGIN.plot(WIDTH, HEIGHT);
        let band = ScaleBand::new((plot.x0, plot.x1), self.rows.len()).with_padding(0.3, 0.3);
        let y = ScaleLinearSpec::new((0.0, self.ceiling)).instantiate((plot.y1, plot.y0));

        Scene::render(WIDTH, HEIGHT, |scene| {
            scene.extend(LegendSpec::new(legend_items).nodes());

            for i in 0..self.rows.len() {
                let x0 = band.x(i);
                scene.push(
                    Node::rect(Rect::new(x0, plot.y0, x0 + band.band_width(), plot.y1))
                        .with_stroke(StrokeStyle::solid(theme.f_high, 1.0)),
                );
            }

            for (layer, key) in layers.iter().zip(&self.keys) {
                for span in layer {
                    let x0 = band.x(span.row);
                    let (top, bottom) = (y.map(span.y1), y.map(span.y0));
                    scene.push(
                        Node::rect(Rect::new(x0, top, x0 + band.band_width(), bottom))
                            .with_fill(key.color),
                    );
                    if bottom - top > 10.0 {
                        scene.push(
                            Node::text(
                                TextSpec::new(
                                    Point::new(band.center(span.row), (top + bottom) / 2.0 + 2.5),
                                    format_number(span.value),
                                )
                                .with_anchor(TextAnchor::Middle)
                                .with_font_size(10.0),
                            )
                            .with_fill(theme.b_med),
                        );
                    }
                }
            }

            let labels = self.rows.iter().map(|r| r.category.clone());
            scene.extend(
                AxisSpec::bottom_band(&band, (plot.x0, plot.x1), labels, plot.y1, theme).nodes(),
            );

            let star = Symbol::Star.path(STAR_AREA);
            for (i, row) in self.rows.iter().enumerate() {
                let excess = self.excess(row);
                let x0 = band.x(i);
                let tier_index = tiers.index(excess, self.step);
                if let Some(tier) = tiers.get(tier_index).filter(|_| tier_index > 0) {
                    scene.push(
                        Node::text(
                            TextSpec::new(Point::new(x0, plot.y0 - 5.0), tier.name.clone())
                                .with_italic(true)
                                .with_font_size(18.0),
                        )
                        .with_fill(tier.color)
                        .with_z_index(z_order::TITLES),
                    );
                }
                for k in 0..full_steps(excess, self.step) {
                    let at = (x0 + k as f64 * STAR_SPACING + 5.0, plot.y0 - 25.0);
                    scene.push(
                        Node::path(star.clone())
                            .with_fill(rainbow::YELLOW)
                            .with_transform(Affine::translate(at))
                            .with_z_index(z_order::SERIES_POINTS),
                    );
                }
            }

            let title = TitleSpec::new(self.title.clone(), Point::new(10.0, 15.0), theme.f_high);
            scene.extend(title.node());
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(rows: Vec<CategoryRow>) -> OverflowBarSpec {
        OverflowBarSpec::new(
            "",
            vec![
                SeriesKey::new("a", "quadEff", rainbow::BLUE),
                SeriesKey::new("b", "tspinEff", rainbow::PURPLE),
            ],
            90.0,
            30.0,
        )
        .with_rows(rows)
    }

    #[test]
    fn tier_index_counts_full_steps() {
        let table = TierTable::loot(&Theme::default());
        let got: Vec<_> = [0.0, 29.0, 30.0, 61.0]
            .iter()
            .map(|e| table.index(*e, 30.0))
            .collect();
        assert_eq!(got, vec![0, 0, 1, 2], "one tier per full step");
        assert_eq!(table.index(30.0 * 8.0, 30.0), 8, "last tier");
        assert_eq!(table.index(1.0e6, 30.0), 8, "clamped");
    }

    #[test]
    fn tier_index_is_monotonic() {
        let table = TierTable::loot(&Theme::default());
        let mut last = 0;
        for i in 0..400 {
            let idx = table.index(f64::from(i), 30.0);
            assert!(idx >= last, "non-decreasing at {i}");
            last = idx;
        }
    }

    #[test]
    fn overflowing_bar_gets_tier_and_stars() {
        let svg = spec(vec![
            CategoryRow::new("calm", vec![20.0, 20.0]),
            CategoryRow::new("busy", vec![100.0, 50.0]),
        ])
        .render(&Theme::default())
        .unwrap();
        let doc = roxmltree::Document::parse(svg.markup()).unwrap();
        let stars = doc
            .descendants()
            .filter(|n| n.has_tag_name("path") && n.attribute("fill") == Some("#f2e6b1"))
            .count();
        assert_eq!(stars, 2, "60 over the ceiling at step 30");
        let tier = doc
            .descendants()
            .find(|n| n.attribute("font-style") == Some("italic"))
            .and_then(|n| n.text());
        assert_eq!(tier, Some("rare"), "tier index 2");
    }

    #[test]
    fn bars_below_ceiling_have_no_indicators() {
        let svg = spec(vec![CategoryRow::new("calm", vec![20.0, 70.0])])
            .render(&Theme::default())
            .unwrap();
        let doc = roxmltree::Document::parse(svg.markup()).unwrap();
        assert!(
            doc.descendants()
                .all(|n| n.attribute("font-style") != Some("italic")),
            "no tier label"
        );
    }

    #[test]
    fn zero_ceiling_is_degenerate() {
        let mut s = spec(vec![CategoryRow::new("x", vec![1.0, 1.0])]);
        s.ceiling = 0.0;
        assert!(
            matches!(s.render(&Theme::default()), Err(ChartError::DegenerateDomain { .. })),
            "degenerate"
        );
    }
}
