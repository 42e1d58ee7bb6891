// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tiling rendered fragments into one composite document.

use core::fmt::Write as _;

use statgraph_scene::{Fragment, fmt_num};

use crate::error::{ChartError, Result};

/// Splits `n` into `(a, n / a)` with `a` the largest divisor not above `√n`.
///
/// `n` must be a positive whole number.
pub fn factor_pair(n: f64) -> Result<(usize, usize)> {
    if !n.is_finite() || n <= 0.0 || n.fract() != 0.0 || n > f64::from(u32::MAX) {
        return Err(ChartError::InvalidFragmentCount(n));
    }
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "positive whole number checked above"
    )]
    let n = n as usize;
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "square root of a checked usize"
    )]
    let mut a = (n as f64).sqrt().floor() as usize;
    while a > 1 && n % a != 0 {
        a -= 1;
    }
    let a = a.max(1);
    Ok((a, n / a))
}

/// Lays fragments out left to right, `a` per row, where `(a, _) = factor_pair(len)`.
///
/// Each row is advanced by the tallest fragment seen so far, not only in that row.
pub fn compose_grid(fragments: &[Fragment]) -> Result<Fragment> {
    let (columns, _) = factor_pair(fragments.len() as f64)?;
    let mut body = String::new();
    let (mut dx, mut dy) = (0.0_f64, 0.0_f64);
    let (mut max_x, mut max_y) = (0.0_f64, 0.0_f64);
    let mut tallest = 0.0_f64;
    for (i, fragment) in fragments.iter().enumerate() {
        let _ = writeln!(
            body,
            r#"<g transform="translate({},{})">"#,
            fmt_num(dx),
            fmt_num(dy)
        );
        body.push_str(fragment.markup().trim_end());
        body.push_str("\n</g>\n");

        dx += fragment.width();
        max_x = max_x.max(dx);
        tallest = tallest.max(fragment.height());
        if (i + 1) % columns == 0 {
            dx = 0.0;
            dy += tallest;
            max_y = max_y.max(dy);
        }
    }
    tracing::debug!(
        fragments = fragments.len(),
        columns,
        width = max_x,
        height = max_y,
        "composed grid"
    );

    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = fmt_num(max_x),
        h = fmt_num(max_y),
    );
    out.push_str(&body);
    out.push_str("</svg>\n");
    Ok(Fragment::new(out, max_x, max_y))
}
