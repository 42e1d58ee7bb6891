// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement hooks for guide layout.
//!
//! Shaping happens downstream in the rasterizer, so guides estimate label extents with a
//! measurer before placing anything.

/// A minimal text measurement interface used by guide generators.
pub trait TextMeasurer {
    /// Returns `(width, height)` in the same coordinate system as the nodes.
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64);
}

/// A measurer that charges a fixed advance per character, regardless of font size.
///
/// Legends size their swatches with this so layout does not depend on font metrics.
#[derive(Clone, Copy, Debug)]
pub struct FixedAdvanceMeasurer {
    /// Advance per character in px.
    pub advance: f64,
}

impl FixedAdvanceMeasurer {
    /// Ten pixels per character.
    pub const LEGEND: Self = Self { advance: 10.0 };
}

impl TextMeasurer for FixedAdvanceMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64) {
        (self.advance * text.chars().count() as f64, font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_advance_ignores_font_size() {
        let m = FixedAdvanceMeasurer::LEGEND;
        assert_eq!(m.measure("Spike", 12.0).0, 50.0, "5 chars");
        assert_eq!(m.measure("Spike", 40.0).0, 50.0, "size independent");
    }
}
