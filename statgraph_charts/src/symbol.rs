// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Symbol helpers for glyph-like marks.

use core::f64::consts::{PI, TAU};

use kurbo::BezPath;

/// A small set of symbol shapes, sized by area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// A five-pointed star.
    Star,
    /// A square (axis-aligned).
    Square,
}

impl Symbol {
    /// Returns a path for this symbol centered at the origin with the given area in px².
    pub fn path(self, area: f64) -> BezPath {
        match self {
            Self::Star => star_path(area),
            Self::Square => square_path(area),
        }
    }
}

fn star_path(area: f64) -> BezPath {
    // Inner-to-outer radius ratio of a regular pentagram, and the area scale factor that
    // makes `area` the enclosed area.
    const KA: f64 = 0.890_813_091_529_285_2;
    let kr = (PI / 10.0).sin() / (7.0 * PI / 10.0).sin();
    let kx = (TAU / 10.0).sin() * kr;
    let ky = -(TAU / 10.0).cos() * kr;

    let r = (area * KA).sqrt();
    let x = kx * r;
    let y = ky * r;
    let mut p = BezPath::new();
    p.move_to((0.0, -r));
    p.line_to((x, y));
    for i in 1..5 {
        let a = TAU * f64::from(i) / 5.0;
        let (s, c) = a.sin_cos();
        p.line_to((s * r, -c * r));
        p.line_to((c * x - s * y, s * x + c * y));
    }
    p.close_path();
    p
}

fn square_path(area: f64) -> BezPath {
    let half = area.sqrt() * 0.5;
    let mut p = BezPath::new();
    p.move_to((-half, -half));
    p.line_to((half, -half));
    p.line_to((half, half));
    p.line_to((-half, half));
    p.close_path();
    p
}
