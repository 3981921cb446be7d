//! Tabular input types.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// A single row: feature name to numeric value, `None` meaning missing.
///
/// Non-finite values are treated as missing on read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    values: BTreeMap<String, Option<f64>>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for a present value.
    pub fn with(mut self, feature: impl Into<String>, value: f64) -> Self {
        self.set(feature, Some(value));
        self
    }

    /// Builder-style setter for an explicitly missing value.
    pub fn with_missing(mut self, feature: impl Into<String>) -> Self {
        self.set(feature, None);
        self
    }

    /// Set or clear a feature value.
    pub fn set(&mut self, feature: impl Into<String>, value: Option<f64>) {
        self.values.insert(feature.into(), value);
    }

    /// The usable value of a feature, if present and finite.
    pub fn get(&self, feature: &str) -> Option<f64> {
        self.values
            .get(feature)
            .copied()
            .flatten()
            .filter(|v| v.is_finite())
    }

    /// Whether the record names this feature at all (present or missing).
    pub fn has_feature(&self, feature: &str) -> bool {
        self.values.contains_key(feature)
    }

    /// Feature names carried by this record, sorted.
    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, Option<f64>)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Option<f64>)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// An ordered batch of records. Position is the record's identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Build a single-feature dataset from a series, in order.
    pub fn from_series(feature: &str, values: &[f64]) -> Self {
        Self::new(
            values
                .iter()
                .map(|&v| Record::new().with(feature, v))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Every feature named by any record, sorted.
    pub fn feature_names(&self) -> Vec<String> {
        self.records
            .iter()
            .flat_map(Record::features)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Features with at least one present value, sorted.
    pub fn numeric_features(&self) -> Vec<String> {
        self.feature_names()
            .into_iter()
            .filter(|name| self.records.iter().any(|r| r.get(name).is_some()))
            .collect()
    }

    /// Whether any record names the feature.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.records.iter().any(|r| r.has_feature(feature))
    }

    /// Column view of one feature, or `None` if no record names it.
    pub fn column(&self, feature: &str) -> Option<FeatureColumn> {
        if !self.has_feature(feature) {
            return None;
        }
        Some(FeatureColumn {
            name: feature.to_string(),
            values: self.records.iter().map(|r| r.get(feature)).collect(),
        })
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

/// Read-only values of one feature across all records, same order as the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureColumn {
    name: String,
    values: Vec<Option<f64>>,
}

impl FeatureColumn {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values: values
                .into_iter()
                .map(|v| v.filter(|x| x.is_finite()))
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// `(record index, value)` pairs for present values, in record order.
    pub fn present(&self) -> Vec<(usize, f64)> {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|x| (i, x)))
            .collect()
    }

    /// Present values only, in record order.
    pub fn present_values(&self) -> Vec<f64> {
        self.values.iter().flatten().copied().collect()
    }

    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}
