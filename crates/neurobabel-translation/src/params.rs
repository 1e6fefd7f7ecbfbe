// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Ordered parameter dictionaries
//!
//! `ParameterSet` maps parameter names to values with stable (sorted)
//! iteration order, so error reporting and serialized output are
//! deterministic regardless of insertion order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{TranslationError, TranslationResult};
use crate::value::ParameterValue;

/// A name -> value mapping for standard or native parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet {
    entries: BTreeMap<String, ParameterValue>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParameterValue>) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Parameter names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// A copy of `self` with every entry of `overlay` applied on top
    pub fn merged_with(&self, overlay: &ParameterSet) -> ParameterSet {
        let mut merged = self.clone();
        for (name, value) in overlay.iter() {
            merged.insert(name, value.clone());
        }
        merged
    }

    /// Validate that all array-valued entries share one length.
    ///
    /// Returns that length, or `None` when every value is a scalar. The
    /// first array (in sorted name order) sets the expected length.
    pub fn uniform_length(&self) -> TranslationResult<Option<usize>> {
        let mut expected: Option<usize> = None;
        for (name, value) in self.iter() {
            if let Some(len) = value.len() {
                match expected {
                    None => expected = Some(len),
                    Some(e) if e != len => {
                        return Err(TranslationError::ShapeMismatch {
                            name: name.to_string(),
                            expected: e,
                            actual: len,
                        });
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(expected)
    }

    /// Entrywise equality within a floating-point tolerance
    pub fn approx_eq(&self, other: &ParameterSet, tolerance: f64) -> bool {
        self.len() == other.len()
            && self.iter().all(|(name, value)| {
                other
                    .get(name)
                    .map(|o| value.approx_eq(o, tolerance))
                    .unwrap_or(false)
            })
    }
}

impl<N: Into<String>, V: Into<ParameterValue>> FromIterator<(N, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut set = ParameterSet::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}
