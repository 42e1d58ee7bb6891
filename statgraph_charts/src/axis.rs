// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis node generation.
//!
//! An axis is a domain path with outer ticks, one tick line per tick, and a label offset
//! by `tick_size + tick_padding`.

use kurbo::{BezPath, Point};
use peniko::Color;
use statgraph_scene::{Node, StrokeStyle, TextAnchor, TextSpec, z_order};

use crate::scale::{ScaleBand, ScaleLinear};
use crate::theme::Theme;

/// Axis orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisOrient {
    /// A horizontal axis with ticks pointing down.
    Bottom,
    /// A vertical axis with ticks pointing left.
    Left,
    /// A vertical axis with ticks pointing right.
    Right,
}

/// Axis styling.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisStyle {
    /// Style for the axis domain line and tick marks.
    pub rule: StrokeStyle,
    /// Fill for tick labels.
    pub label_fill: Color,
    /// Font size for tick labels.
    pub label_font_size: f64,
}

impl AxisStyle {
    /// Rules and labels in the theme's high-emphasis foreground.
    pub fn themed(theme: &Theme) -> Self {
        Self {
            rule: StrokeStyle::solid(theme.f_high, 1.0),
            label_fill: theme.f_high,
            label_font_size: 10.0,
        }
    }
}

/// A resolved axis: orientation, placement, range extent and tick list.
#[derive(Clone, Debug)]
pub struct AxisSpec {
    /// Axis placement.
    pub orient: AxisOrient,
    /// Cross-axis position (y for horizontal axes, x for vertical ones).
    pub offset: f64,
    /// Extent of the domain line along the axis.
    pub range: (f64, f64),
    /// `(position, label)` per tick.
    pub ticks: Vec<(f64, String)>,
    /// Tick line length.
    pub tick_size: f64,
    /// Gap between the tick end and its label.
    pub tick_padding: f64,
    /// Styling.
    pub style: AxisStyle,
}

impl AxisSpec {
    fn new(
        orient: AxisOrient,
        offset: f64,
        range: (f64, f64),
        ticks: Vec<(f64, String)>,
        theme: &Theme,
    ) -> Self {
        Self {
            orient,
            offset,
            range,
            ticks,
            tick_size: 6.0,
            tick_padding: 3.0,
            style: AxisStyle::themed(theme),
        }
    }

    /// A bottom axis with one tick at each band center.
    pub fn bottom_band(
        band: &ScaleBand,
        range: (f64, f64),
        labels: impl IntoIterator<Item = String>,
        y: f64,
        theme: &Theme,
    ) -> Self {
        let ticks = labels
            .into_iter()
            .take(band.count())
            .enumerate()
            .map(|(i, label)| (band.center(i), label))
            .collect();
        Self::new(AxisOrient::Bottom, y, range, ticks, theme)
    }

    /// A bottom axis with ticks at explicit domain values.
    pub fn bottom_linear(
        scale: &ScaleLinear,
        values: &[f64],
        format: impl Fn(f64) -> String,
        y: f64,
        theme: &Theme,
    ) -> Self {
        let ticks = values.iter().map(|v| (scale.map(*v), format(*v))).collect();
        Self::new(AxisOrient::Bottom, y, scale.range(), ticks, theme)
    }

    /// A vertical axis with roughly `count` round ticks.
    pub fn vertical(
        orient: AxisOrient,
        scale: &ScaleLinear,
        count: usize,
        format: impl Fn(f64) -> String,
        x: f64,
        theme: &Theme,
    ) -> Self {
        let ticks = scale
            .ticks(count)
            .into_iter()
            .map(|v| (scale.map(v), format(v)))
            .collect();
        Self::new(orient, x, scale.range(), ticks, theme)
    }

    /// Overrides the styling.
    pub fn with_style(mut self, style: AxisStyle) -> Self {
        self.style = style;
        self
    }

    fn point(&self, along: f64, across: f64) -> Point {
        match self.orient {
            AxisOrient::Bottom => Point::new(along, self.offset + across),
            AxisOrient::Left | AxisOrient::Right => Point::new(self.offset + across, along),
        }
    }

    /// Generates the domain path, tick lines and tick labels.
    pub fn nodes(&self) -> Vec<Node> {
        let k = match self.orient {
            AxisOrient::Bottom | AxisOrient::Right => 1.0,
            AxisOrient::Left => -1.0,
        };
        let outer = k * self.tick_size;
        let mut out = Vec::with_capacity(1 + self.ticks.len() * 2);

        let mut domain = BezPath::new();
        domain.move_to(self.point(self.range.0, outer));
        domain.line_to(self.point(self.range.0, 0.0));
        domain.line_to(self.point(self.range.1, 0.0));
        domain.line_to(self.point(self.range.1, outer));
        out.push(
            Node::path(domain)
                .with_stroke(self.style.rule.clone())
                .with_z_index(z_order::AXIS_RULES),
        );

        let (anchor, dy) = match self.orient {
            AxisOrient::Bottom => (TextAnchor::Middle, 0.71),
            AxisOrient::Left => (TextAnchor::End, 0.32),
            AxisOrient::Right => (TextAnchor::Start, 0.32),
        };
        let label_offset = k * (self.tick_size + self.tick_padding);
        for (pos, label) in &self.ticks {
            let mut tick = BezPath::new();
            tick.move_to(self.point(*pos, 0.0));
            tick.line_to(self.point(*pos, outer));
            out.push(
                Node::path(tick)
                    .with_stroke(self.style.rule.clone())
                    .with_z_index(z_order::AXIS_RULES),
            );
            out.push(
                Node::text(
                    TextSpec::new(self.point(*pos, label_offset), label.clone())
                        .with_anchor(anchor)
                        .with_dy_em(dy)
                        .with_font_size(self.style.label_font_size),
                )
                .with_fill(self.style.label_fill)
                .with_z_index(z_order::AXIS_LABELS),
            );
        }
        out
    }
}
