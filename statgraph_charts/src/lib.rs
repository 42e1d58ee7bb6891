// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hard-wired statistic charts for `statgraph`.
//!
//! Every chart is a small spec struct that owns its data and renders into a fresh
//! [`statgraph_scene::Scene`], returning a [`Fragment`]:
//! - **Scales** ([`ScaleLinear`], [`ScaleSqrt`], [`ScaleBand`]) map values to pixels.
//! - **Guides** ([`AxisSpec`], [`LegendSpec`], [`TitleSpec`]) generate plain nodes.
//! - **Charts** ([`StackedBarSpec`], [`OverflowBarSpec`], [`SankeySpec`], [`RadarSpec`],
//!   [`SpeedGaugeSpec`], [`WellColumnsSpec`], [`PpsSegmentsSpec`]) combine the two.
//!
//! [`compose_grid`] tiles finished fragments into one document.
//!
//! Charts are deterministic: the same input always produces the same markup.

mod axis;
mod curve;
mod error;
mod format;
mod gauge;
mod grid;
mod layout;
mod legend;
mod measure;
mod overflow_bar;
mod pps_segments;
mod radar;
mod sankey;
mod scale;
mod series;
mod stacked_bar;
mod symbol;
pub mod theme;
mod title;
mod well_columns;

pub use axis::{AxisOrient, AxisSpec, AxisStyle};
pub use curve::{cardinal, polyline};
pub use error::{ChartError, Result};
pub use format::{format_number, percent0, round_half_up, to_fixed, to_precision};
pub use gauge::{GaugeZone, SpeedGaugeSpec, needle_angle};
pub use grid::{compose_grid, factor_pair};
pub use layout::Margin;
pub use legend::{LegendItem, LegendSpec};
pub use measure::{FixedAdvanceMeasurer, TextMeasurer};
pub use overflow_bar::{OverflowBarSpec, Tier, TierTable, full_steps};
pub use pps_segments::{PpsSegmentsSpec, merge_buckets};
pub use radar::{PlacedLabel, RadarAxis, RadarEntity, RadarSpec};
pub use sankey::{
    LabelPlacement, LinkColor, SankeyInstance, SankeyLayout, SankeyLink, SankeyLinkLayout,
    SankeyNodeLayout, SankeySpec,
};
pub use scale::{
    ScaleBand, ScaleContinuous, ScaleLinear, ScaleLinearSpec, ScaleSpec, ScaleSqrt,
    ScaleSqrtSpec, nice_domain, ticks,
};
pub use series::{CategoryRow, SeriesKey, StackOffset, StackedSpan, stack_rows};
pub use stacked_bar::{MIN_LABEL_HEIGHT, StackedBarSpec};
pub use statgraph_scene::Fragment;
pub use symbol::Symbol;
pub use theme::Theme;
pub use title::TitleSpec;
pub use well_columns::WellColumnsSpec;
