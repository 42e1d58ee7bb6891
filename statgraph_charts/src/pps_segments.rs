// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement-speed distribution curves.
//!
//! Buckets are fifths of a piece-per-second. Every entity is drawn over the same window:
//! from the earliest nonzero bucket of any entity to the latest.

use kurbo::Point;
use statgraph_scene::{Fragment, Scene, z_order};

use crate::axis::AxisSpec;
use crate::curve::cardinal;
use crate::error::{ChartError, Result};
use crate::format::format_number;
use crate::scale::ScaleLinearSpec;
use crate::theme::{Theme, rainbow};
use crate::title::TitleSpec;
use crate::well_columns::{
    HEIGHT, MULTI_MARGIN, WIDTH, bucket_count, entity_legend, overlay_area, percent_axes,
};

/// Buckets per piece-per-second.
const BUCKETS_PER_PPS: f64 = 5.0;

/// Folds adjacent pairs of raw fractions into one percentage bucket.
pub fn merge_buckets(raw: &[f64]) -> Vec<f64> {
    raw.chunks(2).map(|pair| pair.iter().sum::<f64>() * 100.0).collect()
}

/// Overlaid smoothed distributions.
#[derive(Clone, Debug)]
pub struct PpsSegmentsSpec {
    /// Caption drawn top-left.
    pub title: String,
    /// `(entity, buckets)`; every vector must have the same length.
    pub entities: Vec<(String, Vec<f64>)>,
}

impl PpsSegmentsSpec {
    /// Creates a chart.
    pub fn new(title: impl Into<String>, entities: Vec<(String, Vec<f64>)>) -> Self {
        Self {
            title: title.into(),
            entities,
        }
    }

    /// Shared `[first, last]` bucket window containing every nonzero value.
    ///
    /// A single-bucket window is widened by one bucket on each side.
    pub fn window(&self) -> Result<(usize, usize)> {
        let count = bucket_count(&self.entities, "pps segments")?;
        let mut lo = usize::MAX;
        let mut hi = 0;
        for (_, buckets) in &self.entities {
            if let Some(first) = buckets.iter().position(|v| *v != 0.0) {
                lo = lo.min(first);
            }
            if let Some(last) = buckets.iter().rposition(|v| *v != 0.0) {
                hi = hi.max(last);
            }
        }
        if lo == usize::MAX {
            return Err(ChartError::DegenerateDomain { min: 0.0, max: 0.0 });
        }
        if lo == hi {
            return Ok((lo.saturating_sub(1), (hi + 1).min(count)));
        }
        Ok((lo, hi))
    }

    /// Renders the chart.
    pub fn render(&self, theme: &Theme) -> Result<Fragment> {
        let (lo, hi) = self.window()?;
        let plot = MULTI_MARGIN.plot(WIDTH, HEIGHT);
        let x = ScaleLinearSpec::new((lo as f64, hi as f64))
            .with_nice(true)
            .instantiate((plot.x0, plot.x1));
        let max = self
            .entities
            .iter()
            .flat_map(|(_, b)| b.iter().copied())
            .fold(0.0, f64::max);
        let y = ScaleLinearSpec::new((0.0, max))
            .with_nice(true)
            .instantiate((plot.y1, plot.y0));

        let palette = &rainbow::ENTITY_PALETTE;
        let areas = self
            .entities
            .iter()
            .enumerate()
            .map(|(i, (_, buckets))| {
                let mut points = vec![Point::new(x.map(lo as f64), y.map(0.0))];
                points.extend((lo..=hi).map(|j| {
                    let v = buckets.get(j).copied().unwrap_or(0.0);
                    Point::new(x.map(j as f64), y.map(v))
                }));
                points.push(Point::new(x.map(hi as f64), y.map(0.0)));
                overlay_area(cardinal(&points, 0.0), palette[i % palette.len()])
            })
            .collect();

        let tick_count = (hi - lo) / 5;
        let ticks: Vec<f64> = x
            .ticks(tick_count)
            .into_iter()
            .filter(|v| v % BUCKETS_PER_PPS == 0.0)
            .collect();
        tracing::debug!(lo, hi, ticks = ticks.len(), "pps window");

        Scene::render(WIDTH, HEIGHT, |scene| {
            scene.push_isolated(z_order::SERIES_FILL, areas);
            scene.extend(
                AxisSpec::bottom_linear(
                    &x,
                    &ticks,
                    |v| format!("{}PPS", format_number(v / BUCKETS_PER_PPS)),
                    plot.y1,
                    theme,
                )
                .nodes(),
            );
            scene.extend(percent_axes(&y, plot, theme));
            let title = TitleSpec::new(self.title.clone(), Point::new(10.0, 15.0), theme.f_high);
            scene.extend(title.node());
            scene.extend(entity_legend(&self.entities));
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(nonzero: &[(usize, f64)]) -> Vec<f64> {
        let mut v = vec![0.0; 50];
        for (i, x) in nonzero {
            v[*i] = *x;
        }
        v
    }

    #[test]
    fn merge_folds_pairs_into_percent() {
        assert_eq!(
            merge_buckets(&[0.1, 0.2, 0.0, 0.5]),
            vec![(0.1 + 0.2) * 100.0, 50.0],
            "pairs summed and scaled"
        );
        assert_eq!(merge_buckets(&[0.0; 100]).len(), 50, "100 raw buckets fold to 50");
    }

    #[test]
    fn window_spans_all_entities() {
        let spec = PpsSegmentsSpec::new(
            "Placement PPS",
            vec![
                ("a".into(), series(&[(10, 1.0), (14, 2.0)])),
                ("b".into(), series(&[(12, 1.0), (20, 3.0)])),
            ],
        );
        assert_eq!(spec.window().unwrap(), (10, 20), "earliest to latest");
    }

    #[test]
    fn single_bucket_window_widens() {
        let spec = PpsSegmentsSpec::new("", vec![("a".into(), series(&[(7, 4.0)]))]);
        assert_eq!(spec.window().unwrap(), (6, 8), "one bucket each side");
    }

    #[test]
    fn all_zero_is_degenerate() {
        let spec = PpsSegmentsSpec::new("", vec![("a".into(), vec![0.0; 50])]);
        assert!(
            matches!(spec.window(), Err(ChartError::DegenerateDomain { .. })),
            "nothing to window"
        );
    }

    #[test]
    fn ticks_are_whole_pps() {
        let spec = PpsSegmentsSpec::new(
            "Placement PPS",
            vec![("a".into(), series(&[(5, 1.0), (25, 2.0)]))],
        );
        let svg = spec.render(&Theme::default()).unwrap();
        let doc = roxmltree::Document::parse(svg.markup()).unwrap();
        let texts: Vec<_> = doc.descendants().filter_map(|n| n.text()).collect();
        assert!(texts.contains(&"1PPS"), "5 buckets");
        assert!(texts.contains(&"5PPS"), "25 buckets");
        assert!(
            !texts.iter().any(|t| t.ends_with("PPS") && t.contains('.')),
            "no fractional ticks"
        );
    }
}
