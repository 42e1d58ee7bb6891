// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legend node generation.
//!
//! Legends are a single horizontal row: each entry is a colored swatch as wide as its
//! label's estimated width, with the label centered underneath. The whole row is centered
//! within a fixed horizontal extent.

use kurbo::{Point, Rect};
use peniko::Color;
use peniko::color::palette::css;
use statgraph_scene::{Node, StrokeStyle, TextAnchor, TextSpec, z_order};

use crate::error::{ChartError, Result};
use crate::measure::{FixedAdvanceMeasurer, TextMeasurer};

/// A legend entry.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendItem {
    /// The label string shown under the swatch.
    pub label: String,
    /// Swatch and label color.
    pub color: Color,
}

impl LegendItem {
    /// Convenience constructor for a solid-color entry.
    pub fn solid(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            color,
        }
    }

    /// Pairs each key with the color at the same index.
    ///
    /// Fails if the lists differ in length; series colors and legend colors are looked up
    /// by the same index, so a mismatch would silently mislabel the chart.
    pub fn aligned<K>(
        keys: &[K],
        colors: &[Color],
        display: impl Fn(&K) -> String,
    ) -> Result<Vec<Self>> {
        if keys.len() != colors.len() {
            return Err(ChartError::MisalignedSeries {
                expected: keys.len(),
                found: colors.len(),
            });
        }
        Ok(keys
            .iter()
            .zip(colors)
            .map(|(k, c)| Self::solid(display(k), *c))
            .collect())
    }

    /// Assigns `palette[i % palette.len()]` to the i-th label.
    pub fn cycled<S: AsRef<str>>(labels: &[S], palette: &[Color]) -> Vec<Self> {
        labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let color = palette
                    .get(i % palette.len().max(1))
                    .copied()
                    .unwrap_or(css::BLACK);
                Self::solid(label.as_ref(), color)
            })
            .collect()
    }
}

/// A centered legend row.
#[derive(Clone, Debug)]
pub struct LegendSpec {
    /// Entries, left to right.
    pub items: Vec<LegendItem>,
    /// Left edge of the horizontal extent the row is centered in.
    pub x: f64,
    /// Width of the horizontal extent.
    pub extent_width: f64,
    /// Top of the swatches.
    pub y: f64,
    /// Swatch height.
    pub swatch_height: f64,
    /// Gap between the swatch bottom and the label baseline.
    pub label_gap: f64,
    /// Label font size.
    pub font_size: f64,
    /// Label width estimator; swatch widths equal the estimated label widths.
    pub measurer: FixedAdvanceMeasurer,
}

impl LegendSpec {
    /// Default vertical offset of the row.
    pub const DEFAULT_Y: f64 = 28.0;

    /// Creates a legend centered across `[0, 500]` at the default offset.
    pub fn new(items: Vec<LegendItem>) -> Self {
        Self {
            items,
            x: 0.0,
            extent_width: 500.0,
            y: Self::DEFAULT_Y,
            swatch_height: 7.0,
            label_gap: 8.0,
            font_size: 12.0,
            measurer: FixedAdvanceMeasurer::LEGEND,
        }
    }

    /// Sets the vertical offset.
    pub fn with_y(mut self, y: f64) -> Self {
        self.y = y;
        self
    }

    /// Sets the horizontal extent the row is centered in.
    pub fn with_extent(mut self, x: f64, width: f64) -> Self {
        self.x = x;
        self.extent_width = width;
        self
    }

    fn entry_width(&self, item: &LegendItem) -> f64 {
        self.measurer.measure(&item.label, self.font_size).0
    }

    /// Total width of the row.
    pub fn block_width(&self) -> f64 {
        self.items.iter().map(|i| self.entry_width(i)).sum()
    }

    /// Left edge of each entry, in item order.
    pub fn entry_offsets(&self) -> Vec<f64> {
        let mut x = self.x + (self.extent_width - self.block_width()) / 2.0;
        self.items
            .iter()
            .map(|item| {
                let at = x;
                x += self.entry_width(item);
                at
            })
            .collect()
    }

    /// Generates the swatch and label nodes.
    pub fn nodes(&self) -> Vec<Node> {
        let mut out = Vec::with_capacity(self.items.len() * 2);
        // Later entries paint first; positions do not depend on paint order.
        for (item, x) in self.items.iter().zip(self.entry_offsets()).rev() {
            let w = self.entry_width(item);
            out.push(
                Node::rect(Rect::new(x, self.y, x + w, self.y + self.swatch_height))
                    .with_fill(item.color)
                    .with_stroke(StrokeStyle::solid(item.color, 1.0))
                    .with_z_index(z_order::LEGEND_SWATCHES),
            );
            out.push(
                Node::text(
                    TextSpec::new(
                        Point::new(x + w / 2.0, self.y + self.swatch_height + self.label_gap),
                        item.label.clone(),
                    )
                    .with_anchor(TextAnchor::Middle)
                    .with_dy_em(0.35)
                    .with_font_size(self.font_size),
                )
                .with_fill(item.color)
                .with_z_index(z_order::LEGEND_LABELS),
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::rainbow;

    #[test]
    fn row_is_centered_in_extent() {
        let legend = LegendSpec::new(vec![
            LegendItem::solid("abc", rainbow::RED),
            LegendItem::solid("de", rainbow::BLUE),
        ]);
        assert_eq!(legend.block_width(), 50.0, "10px per char");
        assert_eq!(legend.entry_offsets(), vec![225.0, 255.0], "centered in 500");
    }

    #[test]
    fn extent_shifts_offsets() {
        let legend = LegendSpec::new(vec![LegendItem::solid("abcd", rainbow::RED)])
            .with_extent(40.0, 440.0)
            .with_y(32.0);
        assert_eq!(legend.entry_offsets(), vec![240.0], "40 + (440 - 40) / 2");
        let nodes = legend.nodes();
        let text = nodes.iter().find_map(Node::as_text).unwrap();
        assert_eq!(text.pos, Point::new(260.0, 47.0), "label under swatch center");
    }

    #[test]
    fn aligned_rejects_length_mismatch() {
        let err = LegendItem::aligned(&["a", "b"], &[rainbow::RED], |k| (*k).to_string());
        assert!(
            matches!(
                err,
                Err(ChartError::MisalignedSeries {
                    expected: 2,
                    found: 1
                })
            ),
            "mismatch"
        );
    }

    #[test]
    fn cycled_wraps_palette() {
        let items = LegendItem::cycled(&["a", "b", "c"], &[rainbow::RED, rainbow::BLUE]);
        assert_eq!(items[2].color, rainbow::RED, "wraps to the start");
    }
}
