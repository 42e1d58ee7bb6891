// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-entity statistics records.
//!
//! A record is read from a JSON object. Numbers become metrics, `null` becomes a NaN
//! metric, nested objects become dotted metric keys (`killStats.Spike`) and arrays become
//! histograms. Member order is preserved throughout.

use hashbrown::HashMap;
use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer, Error as _};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Entity name to statistics record, in input order.
pub type StatsMapping = IndexMap<String, StatRecord>;

/// Named metrics and histograms for one entity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatRecord {
    metrics: Vec<(String, f64)>,
    histograms: Vec<(String, Vec<f64>)>,
}

impl StatRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a metric.
    pub fn with_metric(mut self, key: impl Into<String>, value: f64) -> Self {
        self.metrics.push((key.into(), value));
        self
    }

    /// Appends a histogram.
    pub fn with_histogram(mut self, key: impl Into<String>, values: Vec<f64>) -> Self {
        self.histograms.push((key.into(), values));
        self
    }

    /// Metrics in input order.
    pub fn metrics(&self) -> &[(String, f64)] {
        &self.metrics
    }

    /// Histograms in input order.
    pub fn histograms(&self) -> &[(String, Vec<f64>)] {
        &self.histograms
    }

    /// Looks up a metric by key. The last occurrence wins.
    pub fn metric(&self, key: &str) -> Option<f64> {
        self.metrics
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }

    /// Looks up a histogram by key. The last occurrence wins.
    pub fn histogram(&self, key: &str) -> Option<&[f64]> {
        self.histograms
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    fn collect(&mut self, prefix: Option<&str>, object: &Map<String, Value>) -> Result<(), String> {
        for (name, value) in object {
            let key = match prefix {
                Some(prefix) => format!("{prefix}.{name}"),
                None => name.clone(),
            };
            match value {
                Value::Null => self.metrics.push((key, f64::NAN)),
                Value::Number(n) => self.metrics.push((key, n.as_f64().unwrap_or(f64::NAN))),
                Value::Object(inner) => self.collect(Some(&key), inner)?,
                Value::Array(items) => {
                    let values = items
                        .iter()
                        .map(|item| match item {
                            Value::Null => Ok(f64::NAN),
                            Value::Number(n) => Ok(n.as_f64().unwrap_or(f64::NAN)),
                            _ => Err(format!("histogram {key:?} holds a non-numeric entry")),
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    self.histograms.push((key, values));
                }
                Value::Bool(_) | Value::String(_) => {
                    tracing::trace!(key = %key, "skipping non-numeric statistic");
                }
            }
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for StatRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = Map::<String, Value>::deserialize(deserializer)?;
        let mut record = Self::default();
        record.collect(None, &object).map_err(D::Error::custom)?;
        Ok(record)
    }
}

/// Parses a statistics mapping from JSON text.
pub fn parse_stats(json: &str) -> Result<StatsMapping> {
    Ok(serde_json::from_str(json)?)
}

/// Converts an already-parsed JSON value into a statistics mapping.
pub fn stats_from_value(value: Value) -> Result<StatsMapping> {
    Ok(serde_json::from_value(value)?)
}

/// Keyed view of one record, with presence and finiteness checks.
#[derive(Debug)]
pub(crate) struct EntityMetrics<'a> {
    entity: &'a str,
    metrics: HashMap<&'a str, f64>,
    histograms: HashMap<&'a str, &'a [f64]>,
}

impl<'a> EntityMetrics<'a> {
    pub(crate) fn new(entity: &'a str, record: &'a StatRecord) -> Self {
        Self {
            entity,
            metrics: record
                .metrics
                .iter()
                .map(|(k, v)| (k.as_str(), *v))
                .collect(),
            histograms: record
                .histograms
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_slice()))
                .collect(),
        }
    }

    pub(crate) fn entity(&self) -> &'a str {
        self.entity
    }

    /// The metric as stored; NaN passes through.
    pub(crate) fn raw(&self, key: &str) -> Result<f64> {
        self.metrics
            .get(key)
            .copied()
            .ok_or_else(|| self.missing(key))
    }

    pub(crate) fn finite(&self, key: &str) -> Result<f64> {
        let value = self.raw(key)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(self.non_finite(key))
        }
    }

    pub(crate) fn histogram(&self, key: &str) -> Result<&'a [f64]> {
        let values = self
            .histograms
            .get(key)
            .copied()
            .ok_or_else(|| self.missing(key))?;
        if values.iter().all(|v| v.is_finite()) {
            Ok(values)
        } else {
            Err(self.non_finite(key))
        }
    }

    fn missing(&self, key: &str) -> Error {
        Error::MissingMetric {
            entity: self.entity.to_owned(),
            key: key.to_owned(),
        }
    }

    fn non_finite(&self, key: &str) -> Error {
        Error::NonFiniteMetric {
            entity: self.entity.to_owned(),
            key: key.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn flattens_nested_objects_and_keeps_order() {
        let stats = stats_from_value(json!({
            "alice": {
                "PPS": 2.5,
                "killStats": { "Spike": 3, "Pressure": 1 },
                "ppsSegments": [0.1, 0.2],
                "surgeRate": null,
                "note": "ignored"
            },
            "bob": { "PPS": 1.0 }
        }))
        .unwrap();
        let names: Vec<&str> = stats.keys().map(String::as_str).collect();
        assert_eq!(names, ["alice", "bob"], "entity order follows input");

        let alice = &stats["alice"];
        let keys: Vec<&str> = alice.metrics().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            ["PPS", "killStats.Spike", "killStats.Pressure", "surgeRate"],
            "metric order follows input"
        );
        assert_eq!(alice.metric("killStats.Spike"), Some(3.0), "nested metric");
        assert!(alice.metric("surgeRate").unwrap().is_nan(), "null reads as NaN");
        assert_eq!(alice.histogram("ppsSegments"), Some(&[0.1, 0.2][..]), "histogram");
        assert_eq!(alice.metric("note"), None, "strings are skipped");
    }

    #[test]
    fn rejects_non_numeric_histograms() {
        let err = stats_from_value(json!({ "alice": { "wellColumns": [1, "x"] } })).unwrap_err();
        assert!(matches!(err, Error::Json(_)), "got {err:?}");
        assert!(err.to_string().contains("wellColumns"), "names the key: {err}");
    }

    #[test]
    fn parses_text() {
        let stats = parse_stats(r#"{"alice": {"APM": 120}}"#).unwrap();
        assert_eq!(stats["alice"].metric("APM"), Some(120.0), "APM");
        assert!(parse_stats("[1, 2]").is_err(), "top level must be an object");
    }

    #[test]
    fn entity_metrics_check_presence_and_finiteness() {
        let record = StatRecord::new()
            .with_metric("APM", 100.0)
            .with_metric("PPS", f64::NAN)
            .with_histogram("wellColumns", vec![1.0, f64::INFINITY]);
        let view = EntityMetrics::new("alice", &record);

        assert_eq!(view.entity(), "alice", "entity");
        assert_eq!(view.finite("APM").unwrap(), 100.0, "finite metric");
        assert!(view.raw("PPS").unwrap().is_nan(), "raw passes NaN through");
        assert!(
            matches!(
                view.finite("PPS"),
                Err(Error::NonFiniteMetric { ref key, .. }) if key == "PPS"
            ),
            "NaN is rejected"
        );
        assert!(
            matches!(
                view.raw("VS"),
                Err(Error::MissingMetric { ref entity, .. }) if entity == "alice"
            ),
            "missing metric"
        );
        assert!(
            matches!(view.histogram("wellColumns"), Err(Error::NonFiniteMetric { .. })),
            "infinite histogram entry"
        );
    }
}
