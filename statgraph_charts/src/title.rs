// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart titles and free-standing captions.

use kurbo::Point;
use peniko::Color;
use statgraph_scene::{Node, TextSpec, z_order};

/// A single-line caption placed at a fixed point.
#[derive(Clone, Debug)]
pub struct TitleSpec {
    /// Caption text.
    pub text: String,
    /// Baseline-left anchor point.
    pub pos: Point,
    /// Fill color.
    pub fill: Color,
    /// Font size; `None` leaves the rasterizer default.
    pub font_size: Option<f64>,
}

impl TitleSpec {
    /// Creates a caption at `pos`.
    pub fn new(text: impl Into<String>, pos: Point, fill: Color) -> Self {
        Self {
            text: text.into(),
            pos,
            fill,
            font_size: None,
        }
    }

    /// Generates the caption node, or nothing for an empty caption.
    pub fn node(&self) -> Option<Node> {
        if self.text.is_empty() {
            return None;
        }
        let mut spec = TextSpec::new(self.pos, self.text.clone());
        if let Some(size) = self.font_size {
            spec = spec.with_font_size(size);
        }
        Some(
            Node::text(spec)
                .with_fill(self.fill)
                .with_z_index(z_order::TITLES),
        )
    }
}
