// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fill, stroke, and compositing state attached to scene nodes.

use peniko::color::palette::css;
use peniko::{Brush, Mix};
use smallvec::SmallVec;

/// Stroke paint plus geometry options.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke paint.
    pub brush: Brush,
    /// Stroke width in scene coordinates.
    pub stroke_width: f64,
    /// Optional stroke opacity in `[0, 1]`.
    pub opacity: Option<f64>,
    /// Dash pattern (`stroke-dasharray`); empty for a solid line.
    pub dash: SmallVec<[f64; 4]>,
}

impl StrokeStyle {
    /// Convenience for a solid stroke.
    pub fn solid(brush: impl Into<Brush>, stroke_width: f64) -> Self {
        Self {
            brush: brush.into(),
            stroke_width,
            opacity: None,
            dash: SmallVec::new(),
        }
    }

    /// Sets the stroke opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Sets the dash pattern.
    pub fn with_dash(mut self, dash: &[f64]) -> Self {
        self.dash = dash.iter().copied().collect();
        self
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::solid(css::BLACK, 1.0)
    }
}

/// Paint state for one node.
///
/// A missing fill serializes as `fill="none"`; a missing stroke omits the stroke entirely.
#[derive(Clone, Debug, PartialEq)]
pub struct Paint {
    /// Fill paint.
    pub fill: Option<Brush>,
    /// Extra fill opacity multiplied with the brush alpha.
    pub fill_opacity: Option<f64>,
    /// Stroke.
    pub stroke: Option<StrokeStyle>,
    /// Whole-node opacity.
    pub opacity: Option<f64>,
    /// Blend mode used when compositing the node onto what is beneath it.
    pub blend: Mix,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            fill: None,
            fill_opacity: None,
            stroke: None,
            opacity: None,
            blend: Mix::Normal,
        }
    }
}

impl Paint {
    /// A paint with only a fill.
    pub fn filled(fill: impl Into<Brush>) -> Self {
        Self {
            fill: Some(fill.into()),
            ..Self::default()
        }
    }

    /// A paint with only a stroke.
    pub fn stroked(stroke: StrokeStyle) -> Self {
        Self {
            stroke: Some(stroke),
            ..Self::default()
        }
    }
}
