// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// A serialized chart: a standalone SVG document plus its pixel size.
///
/// Downstream consumers (grid composition, rasterizers) treat the markup as opaque.
#[derive(Clone, Debug, PartialEq)]
pub struct Fragment {
    markup: String,
    width: f64,
    height: f64,
}

impl Fragment {
    /// Wraps already-serialized markup of the given size.
    pub fn new(markup: String, width: f64, height: f64) -> Self {
        Self {
            markup,
            width,
            height,
        }
    }

    /// The SVG document.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Pixel width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Pixel height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Consumes the fragment, returning the SVG document.
    pub fn into_markup(self) -> String {
        self.markup
    }
}
