// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gameplay statistics in, SVG documents out.
//!
//! [`parse_stats`] reads a JSON mapping of entity name to [`StatRecord`]; [`parse_theme`]
//! reads the nine theme colors. [`build_graphs`] then renders the fixed catalogue of
//! charts, tiling related ones into a single document, and returns the markup of every
//! document in order. A batch either completes or fails as a whole; [`BatchControl`]
//! adds cancellation and a deadline.
//!
//! ```no_run
//! use statgraph_graphs::{Theme, build_graphs, parse_stats};
//!
//! let stats = parse_stats(&std::fs::read_to_string("stats.json")?)?;
//! for (i, markup) in build_graphs(&stats, &Theme::default())?.iter().enumerate() {
//!     std::fs::write(format!("graph_{:02}.svg", i + 1), markup)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod batch;
mod error;
mod graphs;
mod stats;
mod theme;

pub use batch::BatchControl;
pub use error::{Error, Result};
pub use graphs::{ChartId, DOCUMENT_COUNT, build_graphs, build_graphs_with};
pub use statgraph_charts::{ChartError, Theme};
pub use stats::{StatRecord, StatsMapping, parse_stats, stats_from_value};
pub use theme::{THEME_KEYS, parse_hex, parse_theme, theme_from_value};
