// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Number formatting for labels.

/// Shortest decimal form; integral values print without a fraction.
pub fn format_number(v: f64) -> String {
    if !v.is_finite() {
        return "NaN".to_string();
    }
    if v == v.trunc() && v.abs() < 1e15 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "integral and bounded well inside i64"
        )]
        return format!("{}", v as i64);
    }
    format!("{v}")
}

/// Rounds to the nearest integer, halves toward positive infinity (`-2.5` -> `-2`).
pub fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Formats with exactly `digits` decimals.
pub fn to_fixed(v: f64, digits: usize) -> String {
    format!("{v:.digits$}")
}

/// Formats with `precision` significant digits, switching to exponent notation for very
/// large or very small magnitudes.
pub fn to_precision(v: f64, precision: usize) -> String {
    let precision = precision.max(1);
    if !v.is_finite() {
        return "NaN".to_string();
    }
    if v == 0.0 {
        return to_fixed(0.0, precision - 1);
    }
    // Let the exponent formatter do the rounding so 99.96 -> 1.00e2.
    let sci = format!("{v:.prec$e}", prec = precision - 1);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    #[allow(
        clippy::cast_possible_wrap,
        clippy::cast_possible_truncation,
        reason = "precision is a small digit count"
    )]
    let p = precision as i32;
    if exponent < -6 || exponent >= p {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{}", exponent.abs());
    }
    #[allow(clippy::cast_sign_loss, reason = "p - 1 - exponent is positive here")]
    let decimals = (p - 1 - exponent) as usize;
    to_fixed(v, decimals)
}

/// Formats a fraction as a whole percentage (`0.256` -> `26%`).
pub fn percent0(v: f64) -> String {
    format!("{}%", format_number((v * 100.0).round()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_drops_integral_fraction() {
        assert_eq!(format_number(3.0), "3", "integral");
        assert_eq!(format_number(2.25), "2.25", "fractional");
        assert_eq!(format_number(-0.5), "-0.5", "negative");
    }

    #[test]
    fn precision_matches_significant_digits() {
        assert_eq!(to_precision(123.456, 3), "123", "three integer digits");
        assert_eq!(to_precision(12.3456, 3), "12.3", "one decimal");
        assert_eq!(to_precision(0.5, 3), "0.500", "padded");
        assert_eq!(to_precision(1234.0, 3), "1.23e+3", "large magnitude");
        assert_eq!(to_precision(99.96, 3), "100", "rounding carries");
        assert_eq!(to_precision(0.0, 3), "0.00", "zero");
    }

    #[test]
    fn fixed_and_percent() {
        assert_eq!(to_fixed(12.345, 1), "12.3", "one decimal");
        assert_eq!(percent0(0.256), "26%", "rounded percent");
        assert_eq!(percent0(1.0), "100%", "full");
    }

    #[test]
    fn halves_round_toward_positive_infinity() {
        assert_eq!(round_half_up(2.5), 3.0, "positive half");
        assert_eq!(round_half_up(-2.5), -2.0, "negative half");
        assert_eq!(round_half_up(-2.6), -3.0, "below the half");
        assert_eq!(format_number(round_half_up(-0.4)), "0", "no negative zero");
    }
}
