// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tiny scale utilities.
//!
//! Continuous scales ([`ScaleLinear`], [`ScaleSqrt`]) map a numeric domain onto a numeric
//! range; [`ScaleBand`] divides a range into equal slots for ordinal categories. Specs carry
//! the domain and options only and are resolved against a range once, at chart
//! construction time.

/// A continuous scale specification (domain + options, no range yet).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScaleSpec {
    /// Linear interpolation.
    Linear(ScaleLinearSpec),
    /// Square-root interpolation.
    Sqrt(ScaleSqrtSpec),
}

impl From<ScaleLinearSpec> for ScaleSpec {
    fn from(value: ScaleLinearSpec) -> Self {
        Self::Linear(value)
    }
}

impl From<ScaleSqrtSpec> for ScaleSpec {
    fn from(value: ScaleSqrtSpec) -> Self {
        Self::Sqrt(value)
    }
}

impl ScaleSpec {
    /// Returns the same spec with its domain endpoints swapped.
    ///
    /// Used for "lower is better" metrics: small raw values land at the far end of the
    /// range.
    pub fn inverted(self) -> Self {
        match self {
            Self::Linear(s) => Self::Linear(ScaleLinearSpec {
                domain: (s.domain.1, s.domain.0),
                ..s
            }),
            Self::Sqrt(s) => Self::Sqrt(ScaleSqrtSpec {
                domain: (s.domain.1, s.domain.0),
                ..s
            }),
        }
    }

    /// Returns the same spec with clamping enabled.
    pub fn clamped(self) -> Self {
        match self {
            Self::Linear(s) => Self::Linear(s.with_clamp(true)),
            Self::Sqrt(s) => Self::Sqrt(s.with_clamp(true)),
        }
    }

    /// Domain as authored.
    pub fn domain(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.domain,
            Self::Sqrt(s) => s.domain,
        }
    }

    /// Instantiates a concrete scale for a given output range.
    pub fn instantiate(&self, range: (f64, f64)) -> ScaleContinuous {
        match self {
            Self::Linear(s) => ScaleContinuous::Linear(s.instantiate(range)),
            Self::Sqrt(s) => ScaleContinuous::Sqrt(s.instantiate(range)),
        }
    }
}

/// A continuous scale instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScaleContinuous {
    /// Linear scale.
    Linear(ScaleLinear),
    /// Square-root scale.
    Sqrt(ScaleSqrt),
}

impl ScaleContinuous {
    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        match self {
            Self::Linear(s) => s.map(x),
            Self::Sqrt(s) => s.map(x),
        }
    }

    /// Returns tick values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain();
        ticks(d0, d1, count)
    }

    /// Returns the resolved domain.
    pub fn domain(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.domain,
            Self::Sqrt(s) => s.domain,
        }
    }
}

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
    clamp: bool,
}

/// Specification for a linear scale (domain + options, no range yet).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinearSpec {
    /// Domain in data units.
    pub domain: (f64, f64),
    /// Whether to extend the domain outward to round tick values.
    pub nice: bool,
    /// Whether to clamp inputs into the domain before mapping.
    pub clamp: bool,
}

impl ScaleLinear {
    /// Creates a new (unclamped) scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            clamp: false,
        }
    }

    /// Enables or disables clamping.
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        let x = if self.clamp { clamp_to(x, d0, d1) } else { x };
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Domain after resolution.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Output range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns round tick values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }
}

impl ScaleLinearSpec {
    /// Creates a new linear scale spec.
    pub fn new(domain: (f64, f64)) -> Self {
        Self {
            domain,
            nice: false,
            clamp: false,
        }
    }

    /// Enables or disables nice-domain behavior.
    pub fn with_nice(mut self, nice: bool) -> Self {
        self.nice = nice;
        self
    }

    /// Enables or disables clamping.
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Returns the effective domain after applying `nice` (if enabled).
    pub fn resolved_domain(&self, tick_count: usize) -> (f64, f64) {
        if self.nice {
            nice_domain(self.domain.0, self.domain.1, tick_count)
        } else {
            self.domain
        }
    }

    /// Instantiates a concrete scale for a given output range.
    ///
    /// `nice` uses the default tick count of 10.
    pub fn instantiate(&self, range: (f64, f64)) -> ScaleLinear {
        ScaleLinear::new(self.resolved_domain(10), range).with_clamp(self.clamp)
    }
}

/// A square-root mapping: interpolates linearly between `sqrt(d0)` and `sqrt(d1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleSqrt {
    domain: (f64, f64),
    range: (f64, f64),
    clamp: bool,
}

/// Specification for a square-root scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleSqrtSpec {
    /// Domain in data units.
    pub domain: (f64, f64),
    /// Whether to clamp inputs into the domain before mapping.
    pub clamp: bool,
}

impl ScaleSqrt {
    /// Creates a new (unclamped) square-root scale.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            clamp: false,
        }
    }

    /// Enables or disables clamping.
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let (t0, t1) = (signed_sqrt(d0), signed_sqrt(d1));
        let denom = t1 - t0;
        if denom == 0.0 {
            return r0;
        }
        let x = if self.clamp { clamp_to(x, d0, d1) } else { x };
        let t = (signed_sqrt(x) - t0) / denom;
        r0 + t * (r1 - r0)
    }
}

impl ScaleSqrtSpec {
    /// Creates a new square-root scale spec.
    pub fn new(domain: (f64, f64)) -> Self {
        Self {
            domain,
            clamp: false,
        }
    }

    /// Enables or disables clamping.
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Instantiates a concrete scale for a given output range.
    pub fn instantiate(&self, range: (f64, f64)) -> ScaleSqrt {
        ScaleSqrt::new(self.domain, range).with_clamp(self.clamp)
    }
}

fn signed_sqrt(x: f64) -> f64 {
    if x < 0.0 { -(-x).sqrt() } else { x.sqrt() }
}

fn clamp_to(x: f64, a: f64, b: f64) -> f64 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    x.max(lo).min(hi)
}

const E10: f64 = 7.071_067_811_865_476;
const E5: f64 = 3.162_277_660_168_379_5;
const E2: f64 = core::f64::consts::SQRT_2;

/// Tick spec as integer multiples: `(i1, i2, inc)`; a negative `inc` means "divide by
/// `-inc`", which keeps sub-unit steps exact.
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10_f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let inv = 10_f64.powf(-power) / factor;
        i1 = (start * inv).round();
        i2 = (stop * inv).round();
        if i1 / inv < start {
            i1 += 1.0;
        }
        if i2 / inv > stop {
            i2 -= 1.0;
        }
        inc = -inv;
    } else {
        inc = 10_f64.powf(power) * factor;
        i1 = (start / inc).round();
        i2 = (stop / inc).round();
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
    }
    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    tick_spec(start, stop, count as f64).2
}

/// Returns round tick values within `[min, max]` (in either order), roughly `count` of them.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let (i1, i2, inc) = tick_spec(lo, hi, count as f64);
    if i1.is_nan() || i2.is_nan() || i2 < i1 || !inc.is_finite() {
        return Vec::new();
    }
    let n = (i2 - i1 + 1.0).min(10_000.0);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "guarded by the ordering check and capped at 10k"
    )]
    let n = n as usize;
    let mut out: Vec<f64> = (0..n)
        .map(|i| {
            let k = i1 + i as f64;
            if inc < 0.0 { k / -inc } else { k * inc }
        })
        .collect();
    if reverse {
        out.reverse();
    }
    out
}

/// Extends `[d0, d1]` outward so both ends land on round tick values.
pub fn nice_domain(d0: f64, d1: f64, count: usize) -> (f64, f64) {
    if !d0.is_finite() || !d1.is_finite() || count == 0 {
        return (d0, d1);
    }
    let reverse = d1 < d0;
    let (mut start, mut stop) = if reverse { (d1, d0) } else { (d0, d1) };
    let mut prestep = f64::NAN;
    for _ in 0..10 {
        let step = tick_increment(start, stop, count);
        if step == prestep {
            break;
        } else if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else if step < 0.0 {
            start = (start * step).ceil() / step;
            stop = (stop * step).floor() / step;
        } else {
            break;
        }
        prestep = step;
    }
    if reverse { (stop, start) } else { (start, stop) }
}

/// A band scale for ordinal categories.
///
/// Padding is expressed as a fraction of the step: `padding_inner` shrinks each band,
/// `padding_outer` adds gutters before the first and after the last band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleBand {
    range: (f64, f64),
    count: usize,
    padding_inner: f64,
    padding_outer: f64,
}

impl ScaleBand {
    /// Creates a new band scale covering `count` bands over `range`, without padding.
    pub fn new(range: (f64, f64), count: usize) -> Self {
        Self {
            range,
            count,
            padding_inner: 0.0,
            padding_outer: 0.0,
        }
    }

    /// Sets inner and outer padding as fractions of the step.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.clamp(0.0, 1.0);
        self.padding_outer = outer.max(0.0);
        self
    }

    /// Distance between the starts of adjacent bands.
    pub fn step(&self) -> f64 {
        let (r0, r1) = self.range;
        let n = self.count as f64;
        let span = (r1 - r0).abs();
        span / (n - self.padding_inner + 2.0 * self.padding_outer).max(1.0)
    }

    /// Returns the computed band width.
    pub fn band_width(&self) -> f64 {
        self.step() * (1.0 - self.padding_inner)
    }

    /// Returns the number of bands.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the start position of the band at `index`.
    pub fn x(&self, index: usize) -> f64 {
        let (r0, r1) = self.range;
        let n = self.count as f64;
        let step = self.step();
        let start = r0.min(r1);
        let span = (r1 - r0).abs();
        let offset = (span - step * (n - self.padding_inner)) * 0.5;
        start + offset + step * index as f64
    }

    /// Returns the center of the band at `index`.
    pub fn center(&self, index: usize) -> f64 {
        self.x(index) + self.band_width() / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_clamps_into_range() {
        let s = ScaleLinearSpec::new((0.0, 300.0))
            .with_clamp(true)
            .instantiate((0.0, 1.0));
        assert_eq!(s.map(-50.0), 0.0, "below the domain");
        assert_eq!(s.map(600.0), 1.0, "above the domain");
        assert_eq!(s.map(150.0), 0.5, "midpoint");
    }

    #[test]
    fn unclamped_linear_extrapolates() {
        let s = ScaleLinear::new((0.0, 10.0), (0.0, 100.0));
        assert_eq!(s.map(20.0), 200.0, "extrapolated");
    }

    #[test]
    fn inverted_sqrt_puts_low_values_far_out() {
        let spec = ScaleSpec::from(ScaleSqrtSpec::new((0.0, 40.0)).with_clamp(true)).inverted();
        let s = spec.instantiate((0.0, 1.0));
        assert_eq!(s.map(0.0), 1.0, "zero maps to the far end");
        assert_eq!(s.map(40.0), 0.0, "domain max maps to the origin");
        assert_eq!(s.map(100.0), 0.0, "clamped above");
        assert_eq!(s.map(-5.0), 1.0, "clamped below");
        assert!((s.map(10.0) - 0.5).abs() < 1e-12, "sqrt-space midpoint");
    }

    #[test]
    fn degenerate_domain_maps_to_range_start() {
        let s = ScaleLinear::new((3.0, 3.0), (10.0, 20.0));
        assert_eq!(s.map(3.0), 10.0, "collapsed domain");
    }

    #[test]
    fn ticks_are_round() {
        assert_eq!(ticks(0.0, 1.0, 2), vec![0.0, 0.5, 1.0], "halves");
        assert_eq!(
            ticks(0.0, 30.0, 5),
            vec![0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0],
            "fives"
        );
        assert_eq!(ticks(0.0, 0.3, 3), vec![0.0, 0.1, 0.2, 0.3], "tenths stay exact");
        assert!(ticks(0.0, 1.0, 0).is_empty(), "no ticks requested");
    }

    #[test]
    fn nice_extends_outward() {
        assert_eq!(nice_domain(0.0, 0.93, 10), (0.0, 1.0), "fraction");
        assert_eq!(nice_domain(3.0, 47.0, 10), (0.0, 50.0), "integers");
        assert_eq!(nice_domain(47.0, 3.0, 10), (50.0, 0.0), "reversed");
        let spec = ScaleLinearSpec::new((0.0, 23.4)).with_nice(true);
        assert_eq!(spec.instantiate((0.0, 1.0)).domain(), (0.0, 24.0), "resolved");
    }

    #[test]
    fn band_positions_follow_padding() {
        let band = ScaleBand::new((0.0, 440.0), 2).with_padding(0.3, 0.3);
        let step = 440.0 / 2.3;
        assert!((band.step() - step).abs() < 1e-9, "step");
        assert!((band.band_width() - step * 0.7).abs() < 1e-9, "band width");
        assert!((band.x(0) - step * 0.3).abs() < 1e-9, "outer gutter");
        assert!((band.x(1) - step * 1.3).abs() < 1e-9, "second band");
    }

    #[test]
    fn band_without_padding_tiles_range() {
        let band = ScaleBand::new((40.0, 560.0), 10);
        assert_eq!(band.band_width(), 52.0, "width");
        assert_eq!(band.x(0), 40.0, "first");
        assert_eq!(band.x(9), 508.0, "last");
    }
}
