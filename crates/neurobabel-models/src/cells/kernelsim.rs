// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Cell models for the kernelsim backend
//!
//! kernelsim integrates point-neuron kernels with its own unit
//! conventions: capacitance in pF (standard side uses nF) and currents in
//! pA (standard side uses nA), hence the scale-factor rules. Synapse
//! kinetics select between the `iaf_psc_*` (current) and `iaf_cond_*`
//! (conductance) implementation families.

use neurobabel_translation::{TableBuilder, TranslationTable};

use crate::model_type::{ModelType, ModelTypeBuilder};

fn iaf_table(conductance: bool) -> TranslationTable {
    let mut builder = TableBuilder::new()
        .rename("v_rest", "E_L")
        .scaled("cm", "C_m", 1000.0) // nF -> pF
        .rename("tau_m", "tau_m")
        .rename("tau_refrac", "t_ref")
        .rename("v_thresh", "V_th")
        .rename("v_reset", "V_reset")
        .scaled("i_offset", "I_e", 1000.0) // nA -> pA
        .rename("tau_syn_E", "tau_syn_ex")
        .rename("tau_syn_I", "tau_syn_in")
        .rename("v_init", "V_m");
    if conductance {
        builder = builder.rename("e_rev_E", "E_ex").rename("e_rev_I", "E_in");
    }
    builder.build().expect("iaf table is statically valid")
}

fn iaf_defaults(builder: ModelTypeBuilder, conductance: bool) -> ModelTypeBuilder {
    let builder = builder
        .default_parameter("tau_m", 20.0)
        .default_parameter("cm", 1.0)
        .default_parameter("v_rest", -65.0)
        .default_parameter("v_thresh", -55.0)
        .default_parameter("v_reset", -65.0)
        .default_parameter("tau_refrac", 2.0)
        .default_parameter("i_offset", 0.0)
        .default_parameter("tau_syn_E", 5.0)
        .default_parameter("tau_syn_I", 5.0)
        .default_parameter("v_init", -65.0)
        .initial_value("v", -65.0);
    if conductance {
        builder
            .default_parameter("e_rev_E", 0.0)
            .default_parameter("e_rev_I", -70.0)
    } else {
        builder
    }
}

fn iaf_cell(name: &str, conductance: bool, native_model: &str) -> ModelType {
    iaf_defaults(
        ModelType::builder(name).table(iaf_table(conductance)),
        conductance,
    )
    .applicable_native_models([native_model])
    .build()
    .expect("catalog definition is statically valid")
}

/// Leaky integrate-and-fire, alpha-function synaptic current
pub fn if_curr_alpha() -> ModelType {
    iaf_cell("if_curr_alpha", false, "iaf_psc_alpha")
}

/// Leaky integrate-and-fire, decaying-exponential synaptic current
pub fn if_curr_exp() -> ModelType {
    iaf_cell("if_curr_exp", false, "iaf_psc_exp")
}

/// Leaky integrate-and-fire, alpha-function synaptic conductance
pub fn if_cond_alpha() -> ModelType {
    iaf_cell("if_cond_alpha", true, "iaf_cond_alpha")
}

/// Leaky integrate-and-fire, exponentially-decaying synaptic conductance
pub fn if_cond_exp() -> ModelType {
    iaf_cell("if_cond_exp", true, "iaf_cond_exp")
}

/// Poisson spike source.
///
/// kernelsim's generator takes an absolute stop time rather than a
/// duration; the forward formula reads the `start` value alongside the
/// standard `duration`.
pub fn spike_source_poisson() -> ModelType {
    let table = TableBuilder::new()
        .rename("start", "start")
        .rename("rate", "rate")
        .computed("duration", "stop", "start+duration", "stop-start")
        .build()
        .expect("poisson generator table is statically valid");
    ModelType::builder("spike_source_poisson")
        .table(table)
        .default_parameter("start", 0.0)
        .default_parameter("rate", 1.0)
        .default_parameter("duration", 1.0e6)
        .applicable_native_models(["poisson_generator"])
        .build()
        .expect("catalog definition is statically valid")
}
