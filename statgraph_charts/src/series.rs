// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed category rows and stacking.

use peniko::Color;

use crate::error::{ChartError, Result};

/// One stacked series: the metric key it reads, its display label and its color.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesKey {
    /// Metric key.
    pub key: String,
    /// Legend label.
    pub label: String,
    /// Fill color.
    pub color: Color,
}

impl SeriesKey {
    /// Creates a series key.
    pub fn new(key: impl Into<String>, label: impl Into<String>, color: Color) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            color,
        }
    }
}

/// Values for one category (bar), index-aligned with a key list.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryRow {
    /// Category name (band label).
    pub category: String,
    /// One value per key, in key order.
    pub values: Vec<f64>,
}

impl CategoryRow {
    /// Creates a row from already-aligned values.
    pub fn new(category: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            category: category.into(),
            values,
        }
    }

    /// Picks each key's value out of an unordered `(key, value)` list.
    pub fn from_pairs<K: AsRef<str>>(
        category: impl Into<String>,
        pairs: &[(K, f64)],
        keys: &[SeriesKey],
    ) -> Result<Self> {
        let category = category.into();
        let values = keys
            .iter()
            .map(|k| {
                pairs
                    .iter()
                    .find(|(name, _)| name.as_ref() == k.key)
                    .map(|(_, v)| *v)
                    .ok_or_else(|| ChartError::MissingMetric {
                        entity: category.clone(),
                        key: k.key.clone(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { category, values })
    }

    /// Sum of the row's values.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// How a row's values are turned into stacked spans.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StackOffset {
    /// Stack raw values from 0.
    Zero,
    /// Divide by the row total so every stack spans `[0, 1]`.
    Normalize,
    /// Stack raw values, scaling the whole row down to the ceiling when its total exceeds it.
    Cap(f64),
}

/// A stacked span of one value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackedSpan {
    /// Row index.
    pub row: usize,
    /// Key index.
    pub key: usize,
    /// Lower end in stacked units.
    pub y0: f64,
    /// Upper end in stacked units.
    pub y1: f64,
    /// The raw (unscaled) value.
    pub value: f64,
}

/// Stacks every row, returning one layer per key (bottom layer first).
///
/// Rows must already be aligned with `key_count`.
pub fn stack_rows(
    rows: &[CategoryRow],
    key_count: usize,
    offset: StackOffset,
) -> Result<Vec<Vec<StackedSpan>>> {
    if let Some(bad) = rows.iter().find(|r| r.values.len() != key_count) {
        return Err(ChartError::MisalignedSeries {
            expected: key_count,
            found: bad.values.len(),
        });
    }
    let mut layers = vec![Vec::with_capacity(rows.len()); key_count];
    for (row_index, row) in rows.iter().enumerate() {
        let total = row.total();
        let factor = match offset {
            StackOffset::Zero => 1.0,
            StackOffset::Normalize if total > 0.0 => 1.0 / total,
            // Nothing to normalize: draw an empty stack.
            StackOffset::Normalize => 0.0,
            StackOffset::Cap(ceiling) if total > ceiling => ceiling / total,
            StackOffset::Cap(_) => 1.0,
        };
        let mut y = 0.0;
        for (key, value) in row.values.iter().enumerate() {
            let y1 = y + value * factor;
            layers[key].push(StackedSpan {
                row: row_index,
                key,
                y0: y,
                y1,
                value: *value,
            });
            y = y1;
        }
    }
    Ok(layers)
}
