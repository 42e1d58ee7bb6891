// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Theme colors and the fixed rainbow palette.

use peniko::Color;

/// The nine theme colors every chart draws with.
///
/// Foreground levels (`f_*`) are used for text and rules, background levels (`b_*`) for
/// contrast text on colored fills.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    /// Canvas background.
    pub background: Color,
    /// High-emphasis foreground.
    pub f_high: Color,
    /// Medium-emphasis foreground.
    pub f_med: Color,
    /// Low-emphasis foreground.
    pub f_low: Color,
    /// Inverted foreground.
    pub f_inv: Color,
    /// High-emphasis background.
    pub b_high: Color,
    /// Medium-emphasis background.
    pub b_med: Color,
    /// Low-emphasis background.
    pub b_low: Color,
    /// Inverted background.
    pub b_inv: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::from_rgb8(0x00, 0x00, 0x00),
            f_high: Color::from_rgb8(0xff, 0xff, 0xff),
            f_med: Color::from_rgb8(0x77, 0x77, 0x77),
            f_low: Color::from_rgb8(0x44, 0x44, 0x44),
            f_inv: Color::from_rgb8(0x00, 0x00, 0x00),
            b_high: Color::from_rgb8(0xee, 0xee, 0xee),
            b_med: Color::from_rgb8(0x72, 0xde, 0xc2),
            b_low: Color::from_rgb8(0x44, 0x44, 0x44),
            b_inv: Color::from_rgb8(0xff, 0xb5, 0x45),
        }
    }
}

/// The compiled-in nine-entry rainbow.
pub mod rainbow {
    use peniko::Color;

    /// Pink.
    pub const PINK: Color = Color::from_rgb8(0xf8, 0xc8, 0xdc);
    /// Red.
    pub const RED: Color = Color::from_rgb8(0xdc, 0x85, 0x80);
    /// Yellow.
    pub const YELLOW: Color = Color::from_rgb8(0xf2, 0xe6, 0xb1);
    /// Orange.
    pub const ORANGE: Color = Color::from_rgb8(0xe7, 0xb6, 0x99);
    /// Blue.
    pub const BLUE: Color = Color::from_rgb8(0x83, 0xb2, 0xd0);
    /// Purple.
    pub const PURPLE: Color = Color::from_rgb8(0x86, 0x86, 0xce);
    /// Violet.
    pub const VIOLET: Color = Color::from_rgb8(0x88, 0x5a, 0xcc);
    /// Green.
    pub const GREEN: Color = Color::from_rgb8(0x95, 0xda, 0xb6);
    /// Teal.
    pub const TEAL: Color = Color::from_rgb8(0x8c, 0xad, 0xa7);

    /// Per-entity series colors, cycled by entity index.
    pub const ENTITY_PALETTE: [Color; 8] = [RED, GREEN, PURPLE, ORANGE, VIOLET, PINK, YELLOW, BLUE];
}

/// Compares two colors at 8-bit precision.
pub fn same_color(a: Color, b: Color) -> bool {
    let (a, b) = (a.to_rgba8(), b.to_rgba8());
    (a.r, a.g, a.b, a.a) == (b.r, b.g, b.b, b.a)
}

/// YIQ luminance of a color in `[0, 255]`.
pub fn yiq(color: Color) -> f64 {
    let c = color.to_rgba8();
    (f64::from(c.r) * 299.0 + f64::from(c.g) * 587.0 + f64::from(c.b) * 114.0) / 1000.0
}
