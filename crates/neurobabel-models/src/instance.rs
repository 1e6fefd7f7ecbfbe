// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Resolved parameter stores for instantiated models
//!
//! A [`ModelInstance`] owns the merged standard dictionary and the resolved
//! native dictionary for one model configuration (one homogeneous
//! population). The native set is produced once at construction; partial
//! updates re-translate only the affected rules, computed from the table's
//! static dependency graph, and commit all-or-nothing.
//!
//! Instances are safe for concurrent read-only access once constructed;
//! hosts must serialize `update` calls per instance.

use tracing::debug;

use neurobabel_backend::{ModelHandle, Simulator};
use neurobabel_translation::ParameterSet;

use crate::error::ModelResult;
use crate::model_type::ModelType;

/// One model instantiation's resolved parameters
#[derive(Debug, Clone)]
pub struct ModelInstance {
    model_type: ModelType,
    backend_name: String,
    native_model: String,
    standard: ParameterSet,
    native: ParameterSet,
}

impl ModelInstance {
    pub(crate) fn new(
        model_type: ModelType,
        backend_name: String,
        native_model: String,
        standard: ParameterSet,
        native: ParameterSet,
    ) -> Self {
        Self {
            model_type,
            backend_name,
            native_model,
            standard,
            native,
        }
    }

    pub fn model_type(&self) -> &ModelType {
        &self.model_type
    }

    /// The backend this instance was resolved for
    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// The native model implementation selected at construction
    pub fn native_model(&self) -> &str {
        &self.native_model
    }

    /// The complete standard parameter set (defaults merged with supplied
    /// values and any later updates)
    pub fn standard_parameters(&self) -> &ParameterSet {
        &self.standard
    }

    /// Read view of the resolved native parameter set
    pub fn native_parameters(&self) -> &ParameterSet {
        &self.native
    }

    /// Default initial values for this model's state variables
    pub fn initial_values(&self) -> &ParameterSet {
        self.model_type.default_initial_values()
    }

    /// Update a subset of standard parameters, re-translating only the
    /// rules owning the changed names plus their transitive dependents.
    ///
    /// All-or-nothing: on any error the instance is left unchanged.
    pub fn update(&mut self, partial: &ParameterSet) -> ModelResult<()> {
        if partial.is_empty() {
            return Ok(());
        }
        self.model_type.check_known(partial)?;
        let updated_standard = self.standard.merged_with(partial);
        self.model_type.check_constraints(&updated_standard)?;

        let table = self.model_type.translation_table();
        let affected = table.affected_rules(partial.names())?;
        let mut updated_native = table.retranslate_subset(
            &affected,
            &updated_standard,
            &self.native,
            self.model_type.translation_context(),
        )?;

        // Overrides keep precedence over anything re-translation computed
        let overrides = self.model_type.post_translation_overrides();
        let pinned: Vec<String> = updated_native
            .names()
            .filter(|name| overrides.contains(name))
            .map(str::to_string)
            .collect();
        for name in pinned {
            if let Some(value) = overrides.get(&name) {
                updated_native.insert(name, value.clone());
            }
        }

        debug!(
            model = self.model_type.name(),
            changed = partial.len(),
            retranslated = updated_native.len(),
            "instance updated"
        );

        self.standard = updated_standard;
        for (name, value) in updated_native.iter() {
            self.native.insert(name, value.clone());
        }
        Ok(())
    }

    /// Preview the native mapping for (current standard values ⊕ `partial`)
    /// without mutating the instance. Runs the same validation as
    /// construction.
    pub fn translate(&self, partial: &ParameterSet) -> ModelResult<ParameterSet> {
        self.model_type.check_known(partial)?;
        let merged = self.standard.merged_with(partial);
        self.model_type.check_constraints(&merged)?;
        self.model_type.resolve_native(&merged)
    }

    /// Hand the resolved native set to the external simulator, returning
    /// its opaque handle
    pub fn realize(&self, simulator: &mut dyn Simulator) -> ModelResult<ModelHandle> {
        Ok(simulator.instantiate(&self.native_model, &self.native)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::model_type::ModelType;
    use neurobabel_backend::BackendDescriptor;
    use neurobabel_translation::{ParameterSet, ParameterValue, TranslationTable};

    fn dependent_table() -> TranslationTable {
        // y's forward formula reads x, the native output of the first rule
        TranslationTable::builder()
            .scaled("a", "x", 2.0)
            .computed("b", "y", "b*x", "y/x")
            .rename("c", "z")
            .build()
            .unwrap()
    }

    fn instance() -> ModelInstance {
        let model = ModelType::builder("dependent")
            .table(dependent_table())
            .default_parameter("a", 1.0)
            .default_parameter("b", 3.0)
            .default_parameter("c", 7.0)
            .applicable_native_models(["native_dep"])
            .build()
            .unwrap();
        let backend = BackendDescriptor::new("mock", ["native_dep"]);
        model.instantiate(&ParameterSet::new(), &backend).unwrap()
    }

    #[test]
    fn test_update_retranslates_dependents() {
        let mut instance = instance();
        // x = 2, y = 3*2 = 6, z = 7
        assert_eq!(
            instance.native_parameters().get("y"),
            Some(&ParameterValue::Scalar(6.0))
        );

        let mut partial = ParameterSet::new();
        partial.insert("a", 5.0);
        instance.update(&partial).unwrap();

        // x = 10 and the dependent y follows; z is untouched
        assert_eq!(
            instance.native_parameters().get("x"),
            Some(&ParameterValue::Scalar(10.0))
        );
        assert_eq!(
            instance.native_parameters().get("y"),
            Some(&ParameterValue::Scalar(30.0))
        );
        assert_eq!(
            instance.native_parameters().get("z"),
            Some(&ParameterValue::Scalar(7.0))
        );
        assert_eq!(
            instance.standard_parameters().get("a"),
            Some(&ParameterValue::Scalar(5.0))
        );
    }

    #[test]
    fn test_update_is_all_or_nothing() {
        let mut instance = instance();
        let before_standard = instance.standard_parameters().clone();
        let before_native = instance.native_parameters().clone();

        let mut partial = ParameterSet::new();
        partial.insert("a", 2.0);
        partial.insert("nope", 1.0);
        let err = instance.update(&partial).unwrap_err();
        assert!(matches!(err, ModelError::UnknownParameter { .. }));

        assert_eq!(instance.standard_parameters(), &before_standard);
        assert_eq!(instance.native_parameters(), &before_native);
    }

    #[test]
    fn test_translate_preview_does_not_mutate() {
        let instance = instance();
        let mut partial = ParameterSet::new();
        partial.insert("b", 10.0);

        let preview = instance.translate(&partial).unwrap();
        assert_eq!(preview.get("y"), Some(&ParameterValue::Scalar(20.0)));
        // Instance untouched
        assert_eq!(
            instance.native_parameters().get("y"),
            Some(&ParameterValue::Scalar(6.0))
        );
    }
}
