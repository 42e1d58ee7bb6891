// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed canvas geometry shared by the charts.

use kurbo::Rect;

/// Space reserved around a plot area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margin {
    /// Top margin.
    pub top: f64,
    /// Right margin.
    pub right: f64,
    /// Bottom margin.
    pub bottom: f64,
    /// Left margin.
    pub left: f64,
}

impl Margin {
    /// Creates a margin from CSS-order values.
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// The plot rectangle inside a `width × height` canvas.
    pub fn plot(&self, width: f64, height: f64) -> Rect {
        Rect::new(
            self.left,
            self.top,
            width - self.right,
            height - self.bottom,
        )
    }
}
