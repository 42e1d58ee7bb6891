// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Errors raised while building a chart or composing fragments.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// The chart received no entities (or none survived filtering).
    #[error("{chart} received no entities to draw")]
    EmptyInput {
        /// Chart kind.
        chart: &'static str,
    },
    /// A data-driven scale domain collapsed to a point or was not finite.
    #[error("degenerate scale domain [{min}, {max}]")]
    DegenerateDomain {
        /// Lower end.
        min: f64,
        /// Upper end.
        max: f64,
    },
    /// Two lists that must be index-aligned have different lengths.
    #[error("expected {expected} entries, found {found}")]
    MisalignedSeries {
        /// Required length.
        expected: usize,
        /// Actual length.
        found: usize,
    },
    /// A category row is missing one of the declared keys.
    #[error("{entity} has no value for {key:?}")]
    MissingMetric {
        /// Entity name.
        entity: String,
        /// Missing key.
        key: String,
    },
    /// A sankey link refers to a node outside the declared list.
    #[error("sankey link {from}->{to} is outside the {nodes} declared nodes")]
    InvalidSankeyLink {
        /// Source node index.
        from: usize,
        /// Target node index.
        to: usize,
        /// Number of declared nodes.
        nodes: usize,
    },
    /// A sankey link points from a later declared node to an earlier one.
    #[error("sankey link {from}->{to} runs against the declared node order")]
    BackwardSankeyLink {
        /// Source node index.
        from: usize,
        /// Target node index.
        to: usize,
    },
    /// Gauge cutoffs do not bound the declared zones.
    #[error("{cutoffs} cutoffs cannot bound {zones} zones")]
    InvalidZones {
        /// Number of cutoffs.
        cutoffs: usize,
        /// Number of zones.
        zones: usize,
    },
    /// Grid composition needs a positive whole number of fragments.
    #[error("cannot tile {0} fragments")]
    InvalidFragmentCount(f64),
    /// Bucket vectors differ in length across entities.
    #[error("expected {expected} buckets, found {found}")]
    RaggedBuckets {
        /// Bucket count of the first entity.
        expected: usize,
        /// Bucket count of the offending entity.
        found: usize,
    },
}

/// Result alias for chart construction.
pub type Result<T, E = ChartError> = core::result::Result<T, E>;
