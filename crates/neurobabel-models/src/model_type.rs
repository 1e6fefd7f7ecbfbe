// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Backend-specific, translation-aware model definitions
//!
//! A [`ModelType`] bundles everything needed to turn a user-supplied
//! standard parameter mapping into a backend-native one:
//!
//! - `defaults` - the recognized standard names and their default values
//! - `default_initial_values` - state-variable initial values, independent
//!   of the translation table
//! - `translation_table` - the bidirectional mapping for this backend
//! - `applicable_native_models` - native implementations (in preference
//!   order) the translation is valid for
//! - `post_translation_overrides` - backend-only constants injected after
//!   translation
//! - `hard_constraints` - standard parameters a backend pins to one exact
//!   value; deviation fails construction instead of being overridden
//!
//! Definitions are immutable once built and safe to share across threads.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use neurobabel_backend::BackendDescriptor;
use neurobabel_translation::{ParameterSet, ParameterValue, TranslationTable};

use crate::error::{ModelError, ModelResult};
use crate::instance::ModelInstance;

/// A standard parameter the backend pins to one exact value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardConstraint {
    pub standard_name: String,
    pub required: f64,
    pub detail: String,
}

/// A backend-specific model definition
#[derive(Debug, Clone, PartialEq)]
pub struct ModelType {
    name: String,
    defaults: ParameterSet,
    default_initial_values: ParameterSet,
    translation_table: TranslationTable,
    applicable_native_models: Vec<String>,
    post_translation_overrides: ParameterSet,
    hard_constraints: Vec<HardConstraint>,
    translation_context: ParameterSet,
}

impl ModelType {
    pub fn builder(name: impl Into<String>) -> ModelTypeBuilder {
        ModelTypeBuilder {
            name: name.into(),
            defaults: ParameterSet::new(),
            default_initial_values: ParameterSet::new(),
            translation_table: None,
            applicable_native_models: Vec::new(),
            post_translation_overrides: ParameterSet::new(),
            hard_constraints: Vec::new(),
            translation_context: ParameterSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Recognized standard parameter names with their defaults
    pub fn defaults(&self) -> &ParameterSet {
        &self.defaults
    }

    /// Default initial values for state variables
    pub fn default_initial_values(&self) -> &ParameterSet {
        &self.default_initial_values
    }

    pub fn translation_table(&self) -> &TranslationTable {
        &self.translation_table
    }

    /// Native model implementations this translation targets, in
    /// preference order
    pub fn applicable_native_models(&self) -> &[String] {
        &self.applicable_native_models
    }

    pub fn post_translation_overrides(&self) -> &ParameterSet {
        &self.post_translation_overrides
    }

    pub fn hard_constraints(&self) -> &[HardConstraint] {
        &self.hard_constraints
    }

    pub(crate) fn translation_context(&self) -> &ParameterSet {
        &self.translation_context
    }

    /// Whether `name` is a recognized standard parameter of this model
    pub fn has_parameter(&self, name: &str) -> bool {
        self.defaults.contains(name)
    }

    /// Reject any supplied key that is not a recognized standard name
    pub(crate) fn check_known(&self, supplied: &ParameterSet) -> ModelResult<()> {
        for name in supplied.names() {
            if !self.defaults.contains(name) {
                return Err(ModelError::UnknownParameter {
                    model: self.name.clone(),
                    parameter: name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Enforce hard backend constants against a merged standard set
    pub(crate) fn check_constraints(&self, merged: &ParameterSet) -> ModelResult<()> {
        for constraint in &self.hard_constraints {
            let value = merged.get(&constraint.standard_name);
            let satisfied = match value {
                Some(ParameterValue::Scalar(x)) => *x == constraint.required,
                Some(ParameterValue::Array(a)) => a.iter().all(|&x| x == constraint.required),
                None => true, // absent means the (validated) default applies
            };
            if !satisfied {
                return Err(ModelError::UnsupportedConfiguration {
                    model: self.name.clone(),
                    parameter: constraint.standard_name.clone(),
                    required: constraint.required,
                    detail: constraint.detail.clone(),
                });
            }
        }
        Ok(())
    }

    /// Run the full translation pipeline over a complete standard set:
    /// translate, then inject the post-translation overrides
    pub(crate) fn resolve_native(&self, merged: &ParameterSet) -> ModelResult<ParameterSet> {
        let mut native = self
            .translation_table
            .to_native(merged, &self.translation_context)?;
        for (name, value) in self.post_translation_overrides.iter() {
            native.insert(name, value.clone());
        }
        Ok(native)
    }

    /// Pick the first applicable native model the backend provides
    pub(crate) fn select_native_model(&self, backend: &BackendDescriptor) -> ModelResult<&str> {
        self.applicable_native_models
            .iter()
            .map(String::as_str)
            .find(|model| backend.provides(model))
            .ok_or_else(|| ModelError::BackendIncompatibility {
                model: self.name.clone(),
                backend: backend.name().to_string(),
                candidates: self.applicable_native_models.clone(),
            })
    }

    /// Construct a model instance: validate the supplied keys, merge
    /// defaults, enforce hard constraints, check backend applicability,
    /// translate, and inject overrides.
    pub fn instantiate(
        &self,
        supplied: &ParameterSet,
        backend: &BackendDescriptor,
    ) -> ModelResult<ModelInstance> {
        self.check_known(supplied)?;
        let merged = self.defaults.merged_with(supplied);
        self.check_constraints(&merged)?;
        let native_model = self.select_native_model(backend)?.to_string();
        let native = self.resolve_native(&merged)?;
        info!(
            model = %self.name,
            backend = backend.name(),
            native_model = %native_model,
            "model instantiated"
        );
        Ok(ModelInstance::new(
            self.clone(),
            backend.name().to_string(),
            native_model,
            merged,
            native,
        ))
    }
}

/// Fluent builder for [`ModelType`]
#[derive(Debug)]
pub struct ModelTypeBuilder {
    name: String,
    defaults: ParameterSet,
    default_initial_values: ParameterSet,
    translation_table: Option<TranslationTable>,
    applicable_native_models: Vec<String>,
    post_translation_overrides: ParameterSet,
    hard_constraints: Vec<HardConstraint>,
    translation_context: ParameterSet,
}

impl ModelTypeBuilder {
    /// Declare a standard parameter and its default value
    pub fn default_parameter(
        mut self,
        name: impl Into<String>,
        value: impl Into<ParameterValue>,
    ) -> Self {
        self.defaults.insert(name, value);
        self
    }

    /// Declare a state variable's default initial value
    pub fn initial_value(
        mut self,
        name: impl Into<String>,
        value: impl Into<ParameterValue>,
    ) -> Self {
        self.default_initial_values.insert(name, value);
        self
    }

    pub fn table(mut self, table: TranslationTable) -> Self {
        self.translation_table = Some(table);
        self
    }

    /// Declare the native implementations this translation targets, most
    /// preferred first
    pub fn applicable_native_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applicable_native_models = models.into_iter().map(Into::into).collect();
        self
    }

    /// Inject a fixed native value after translation
    pub fn override_native(
        mut self,
        name: impl Into<String>,
        value: impl Into<ParameterValue>,
    ) -> Self {
        self.post_translation_overrides.insert(name, value);
        self
    }

    /// Pin a standard parameter to one exact value on this backend
    pub fn hard_constraint(
        mut self,
        standard_name: impl Into<String>,
        required: f64,
        detail: impl Into<String>,
    ) -> Self {
        self.hard_constraints.push(HardConstraint {
            standard_name: standard_name.into(),
            required,
            detail: detail.into(),
        });
        self
    }

    /// Supply a native-only constant formulas may reference (must be
    /// declared as a context name on the table)
    pub fn context_value(
        mut self,
        name: impl Into<String>,
        value: impl Into<ParameterValue>,
    ) -> Self {
        self.translation_context.insert(name, value);
        self
    }

    /// Validate the definition as a whole and produce the immutable type
    pub fn build(self) -> ModelResult<ModelType> {
        let invalid = |detail: String| ModelError::InvalidDefinition {
            model: self.name.clone(),
            detail,
        };
        let table = self
            .translation_table
            .ok_or_else(|| invalid("no translation table".to_string()))?;

        // Defaults and table must agree on the standard name set: a rule
        // without a default could never translate, a default without a rule
        // could never reach the backend.
        for name in table.standard_names() {
            if !self.defaults.contains(name) {
                return Err(invalid(format!("no default for parameter '{}'", name)));
            }
        }
        for name in self.defaults.names() {
            if !table.contains_standard(name) {
                return Err(invalid(format!(
                    "default '{}' has no translation rule",
                    name
                )));
            }
        }
        for constraint in &self.hard_constraints {
            if !self.defaults.contains(&constraint.standard_name) {
                return Err(invalid(format!(
                    "hard constraint on unknown parameter '{}'",
                    constraint.standard_name
                )));
            }
        }
        if self.applicable_native_models.is_empty() {
            return Err(invalid("empty applicable native model set".to_string()));
        }

        let model = ModelType {
            name: self.name,
            defaults: self.defaults,
            default_initial_values: self.default_initial_values,
            translation_table: table,
            applicable_native_models: self.applicable_native_models,
            post_translation_overrides: self.post_translation_overrides,
            hard_constraints: self.hard_constraints,
            translation_context: self.translation_context,
        };

        // The defaults themselves must satisfy the constraints and
        // translate cleanly; catching that here keeps every later
        // instantiation failure attributable to caller input.
        model.check_constraints(model.defaults())?;
        model.resolve_native(model.defaults())?;

        debug!(model = %model.name, parameters = model.defaults.len(), "model type defined");
        Ok(model)
    }
}
