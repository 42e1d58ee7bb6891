// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use statgraph_charts::ChartError;

use crate::graphs::ChartId;

/// Errors raised while loading inputs or building a graph batch.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The theme lacks one or more of the nine required colors.
    #[error("theme is missing {}", missing.join(", "))]
    ThemeIncomplete {
        /// Absent or null keys, in declaration order.
        missing: Vec<String>,
    },
    /// A theme color is present but not `#RGB` or `#RRGGBB`.
    #[error("theme color {key} = {value:?} is not #RGB or #RRGGBB")]
    InvalidThemeColor {
        /// Theme key.
        key: String,
        /// Offending value.
        value: String,
    },
    /// The statistics mapping is empty.
    #[error("statistics mapping has no entities")]
    NoEntities,
    /// A chart needs a metric the entity's record does not carry.
    #[error("{entity} has no metric {key:?}")]
    MissingMetric {
        /// Entity name.
        entity: String,
        /// Metric key.
        key: String,
    },
    /// A chart that cannot drop entities received a NaN or infinite value.
    #[error("{entity} has a non-finite value for {key:?}")]
    NonFiniteMetric {
        /// Entity name.
        entity: String,
        /// Metric key.
        key: String,
    },
    /// A chart builder rejected its input.
    #[error("failed to generate the {chart} graph")]
    GraphGenerationFailed {
        /// Chart that failed.
        chart: ChartId,
        /// Underlying chart error.
        source: ChartError,
    },
    /// Tiling a group of finished charts failed.
    #[error("failed to compose the {group} group")]
    Composition {
        /// Group name.
        group: &'static str,
        /// Underlying chart error.
        source: ChartError,
    },
    /// The batch was cancelled before it finished.
    #[error("graph batch cancelled")]
    Cancelled,
    /// The batch deadline passed before it finished.
    #[error("graph batch exceeded its deadline after {completed} charts")]
    DeadlineExceeded {
        /// Charts rendered before the deadline was noticed.
        completed: usize,
    },
    /// Input JSON could not be parsed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result alias for graph construction.
pub type Result<T, E = Error> = core::result::Result<T, E>;
