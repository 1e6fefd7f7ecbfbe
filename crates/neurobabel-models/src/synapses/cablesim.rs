// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Synapse plasticity models for the cablesim backend

use neurobabel_translation::TableBuilder;

use crate::model_type::ModelType;

/// Tsodyks-Markram short-term facilitation/depression.
///
/// cablesim implements the mechanism as a conductance-based synapse point
/// process; the release-state variables `x0`/`y0` are internal to the
/// native model and not exposed.
pub fn tsodyks_markram_mechanism() -> ModelType {
    let table = TableBuilder::new()
        .rename("U", "U")
        .rename("tau_rec", "tau_rec")
        .rename("tau_facil", "tau_facil")
        .rename("u0", "u0")
        .build()
        .expect("tsodyks-markram table is statically valid");
    ModelType::builder("tsodyks_markram_mechanism")
        .table(table)
        .default_parameter("U", 0.5)
        .default_parameter("tau_rec", 100.0)
        .default_parameter("tau_facil", 0.0)
        .default_parameter("u0", 0.0)
        .applicable_native_models(["tm_conductance_synapse"])
        .build()
        .expect("catalog definition is statically valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use neurobabel_backend::BackendDescriptor;
    use neurobabel_translation::{ParameterSet, ParameterValue};

    #[test]
    fn test_conductance_synapse_required() {
        let model = tsodyks_markram_mechanism();
        let current_only = BackendDescriptor::new("cablesim", ["standard_if_exp_current"]);
        assert!(model
            .instantiate(&ParameterSet::new(), &current_only)
            .is_err());

        let backend = BackendDescriptor::new("cablesim", ["tm_conductance_synapse"]);
        let instance = model.instantiate(&ParameterSet::new(), &backend).unwrap();
        assert_eq!(
            instance.native_parameters().get("U"),
            Some(&ParameterValue::Scalar(0.5))
        );
    }
}
