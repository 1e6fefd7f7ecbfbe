// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Synapse plasticity models for the kernelsim backend
//!
//! kernelsim's `stdp_synapse` expresses weight dependence through the
//! exponents `mu_plus`/`mu_minus` (0 = additive, 1 = multiplicative) and
//! parameterizes depression as the ratio `alpha = A_minus / A_plus`, hence
//! the formula pair on `A_minus`. The synapse has no adjustable minimum
//! weight; a non-zero `w_min` cannot be expressed and fails construction.

use neurobabel_translation::{TableBuilder, TranslationTable};

use crate::model_type::ModelType;

fn weight_dependence_table() -> TranslationTable {
    TableBuilder::new()
        .scaled("w_max", "Wmax", 1000.0) // unit conversion
        .rename("w_min", "w_min_unused")
        .rename("A_plus", "lambda")
        .computed("A_minus", "alpha", "A_minus/A_plus", "alpha*lambda")
        .build()
        .expect("weight dependence table is statically valid")
}

fn weight_dependence(name: &str, mu: f64) -> ModelType {
    ModelType::builder(name)
        .table(weight_dependence_table())
        .default_parameter("w_min", 0.0)
        .default_parameter("w_max", 1.0)
        .default_parameter("A_plus", 0.01)
        .default_parameter("A_minus", 0.01)
        .hard_constraint("w_min", 0.0, "the backend fixes the minimum weight at zero")
        .override_native("mu_plus", mu)
        .override_native("mu_minus", mu)
        .applicable_native_models(["stdp_synapse"])
        .build()
        .expect("catalog definition is statically valid")
}

/// Additive weight dependence: the weight change amplitude is fixed for
/// depression (`A_minus`) and potentiation (`A_plus`), clipped to
/// `[w_min, w_max]`
pub fn additive_weight_dependence() -> ModelType {
    weight_dependence("additive_weight_dependence", 0.0)
}

/// Multiplicative weight dependence: the weight change amplitude scales
/// with the distance to the bound (`w - w_min` for depression,
/// `w_max - w` for potentiation)
pub fn multiplicative_weight_dependence() -> ModelType {
    weight_dependence("multiplicative_weight_dependence", 1.0)
}

/// Spike-pair timing dependence with separate potentiation and depression
/// time constants.
///
/// The depression time constant lives on the post-synaptic neuron in this
/// backend, hence the capitalized native name.
pub fn spike_pair_rule() -> ModelType {
    let table = TableBuilder::new()
        .rename("tau_plus", "tau_plus")
        .rename("tau_minus", "Tau_minus")
        .build()
        .expect("spike pair table is statically valid");
    ModelType::builder("spike_pair_rule")
        .table(table)
        .default_parameter("tau_plus", 20.0)
        .default_parameter("tau_minus", 20.0)
        .applicable_native_models(["stdp_synapse"])
        .build()
        .expect("catalog definition is statically valid")
}

/// Tsodyks-Markram short-term facilitation/depression
pub fn tsodyks_markram_mechanism() -> ModelType {
    let table = TableBuilder::new()
        .rename("U", "U")
        .rename("tau_rec", "tau_rec")
        .rename("tau_facil", "tau_fac")
        .rename("u0", "u")
        .rename("x0", "x")
        .rename("y0", "y")
        .build()
        .expect("tsodyks-markram table is statically valid");
    ModelType::builder("tsodyks_markram_mechanism")
        .table(table)
        .default_parameter("U", 0.5)
        .default_parameter("tau_rec", 100.0)
        .default_parameter("tau_facil", 0.0)
        .default_parameter("u0", 0.0)
        .default_parameter("x0", 1.0)
        .default_parameter("y0", 0.0)
        .applicable_native_models(["tsodyks_synapse"])
        .build()
        .expect("catalog definition is statically valid")
}
