// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Declarative model definition documents
//!
//! A [`ModelDefinition`] is the serialized form of a [`ModelType`]: the
//! same defaults, rules, applicability set, overrides, and constraints,
//! expressed as data so backend adapter catalogs can live in JSON
//! documents next to the code. Building a definition runs the full
//! table and model validation; a document that would fail at runtime
//! fails at load time instead.

use serde::{Deserialize, Serialize};

use neurobabel_translation::{ParameterSet, RuleSpec, TranslationTable};

use crate::error::{ModelError, ModelResult};
use crate::model_type::{HardConstraint, ModelType};

/// Serialized model definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDefinition {
    pub name: String,
    #[serde(default)]
    pub defaults: ParameterSet,
    #[serde(default)]
    pub initial_values: ParameterSet,
    pub rules: Vec<RuleSpec>,
    pub applicable_native_models: Vec<String>,
    #[serde(default)]
    pub overrides: ParameterSet,
    #[serde(default)]
    pub hard_constraints: Vec<HardConstraint>,
}

impl ModelDefinition {
    /// Parse a JSON document
    pub fn from_json(document: &str) -> ModelResult<Self> {
        serde_json::from_str(document).map_err(|e| ModelError::InvalidDefinition {
            model: "<document>".to_string(),
            detail: e.to_string(),
        })
    }

    /// Validate and build the immutable [`ModelType`]
    pub fn build(&self) -> ModelResult<ModelType> {
        let table = TranslationTable::from_specs(self.rules.iter().cloned())?;
        let mut builder = ModelType::builder(&self.name)
            .table(table)
            .applicable_native_models(self.applicable_native_models.iter().cloned());
        for (name, value) in self.defaults.iter() {
            builder = builder.default_parameter(name, value.clone());
        }
        for (name, value) in self.initial_values.iter() {
            builder = builder.initial_value(name, value.clone());
        }
        for (name, value) in self.overrides.iter() {
            builder = builder.override_native(name, value.clone());
        }
        for constraint in &self.hard_constraints {
            builder = builder.hard_constraint(
                &constraint.standard_name,
                constraint.required,
                &constraint.detail,
            );
        }
        builder.build()
    }
}
