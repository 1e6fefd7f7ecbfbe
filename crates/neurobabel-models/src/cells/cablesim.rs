// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Cell models for the cablesim backend
//!
//! cablesim builds point neurons out of single-compartment cable sections,
//! so most standard names map one-to-one onto section-level parameters
//! (`cm -> c_m`, `tau_refrac -> t_refrac`, ...). Current-based vs
//! conductance-based synapses and alpha vs exponential kinetics are
//! distinct native model implementations, selected through the
//! applicability set rather than through extra parameters.

use neurobabel_translation::{ParameterValue, TableBuilder, TranslationTable};

use crate::model_type::{ModelType, ModelTypeBuilder};

/// Membrane time constant, threshold, reset and synapse time constants
/// shared by all plain IF cells
fn standard_if_table(conductance: bool) -> TranslationTable {
    let mut builder = TableBuilder::new()
        .rename("tau_m", "tau_m")
        .rename("cm", "c_m")
        .rename("v_rest", "v_rest")
        .rename("v_thresh", "v_thresh")
        .rename("v_reset", "v_reset")
        .rename("tau_refrac", "t_refrac")
        .rename("i_offset", "i_offset")
        .rename("tau_syn_E", "tau_e")
        .rename("tau_syn_I", "tau_i")
        .rename("v_init", "v_init");
    if conductance {
        builder = builder.rename("e_rev_E", "e_e").rename("e_rev_I", "e_i");
    }
    builder
        .build()
        .expect("standard IF table is statically valid")
}

fn standard_if_defaults(builder: ModelTypeBuilder, conductance: bool) -> ModelTypeBuilder {
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

fn standard_if(name: &str, conductance: bool, native_model: &str) -> ModelType {
    standard_if_defaults(
        ModelType::builder(name).table(standard_if_table(conductance)),
        conductance,
    )
    .applicable_native_models([native_model])
    .build()
    .expect("catalog definition is statically valid")
}

/// Leaky integrate-and-fire, fixed threshold, alpha-function synaptic current
pub fn if_curr_alpha() -> ModelType {
    standard_if("if_curr_alpha", false, "standard_if_alpha_current")
}

/// Leaky integrate-and-fire, fixed threshold, decaying-exponential synaptic
/// current
pub fn if_curr_exp() -> ModelType {
    standard_if("if_curr_exp", false, "standard_if_exp_current")
}

/// Leaky integrate-and-fire, fixed threshold, alpha-function synaptic
/// conductance
pub fn if_cond_alpha() -> ModelType {
    standard_if("if_cond_alpha", true, "standard_if_alpha_conductance")
}

/// Leaky integrate-and-fire, fixed threshold, exponentially-decaying
/// synaptic conductance
pub fn if_cond_exp() -> ModelType {
    standard_if("if_cond_exp", true, "standard_if_exp_conductance")
}

/// Leaky IF cell as resembled by stage-1 analogue neuromorphic hardware.
///
/// The hardware exposes a leak conductance instead of a membrane time
/// constant (`tau_m = 0.2 * 1000 / g_leak` at the fixed 0.2 nF capacitance)
/// and pins capacitance, refractory period, offset current, and the
/// excitatory reversal potential to fabrication constants.
pub fn if_facets_hardware1() -> ModelType {
    let table = TableBuilder::new()
        .rename("v_rest", "v_rest")
        .rename("v_thresh", "v_thresh")
        .rename("v_reset", "v_reset")
        .computed("g_leak", "tau_m", "0.2*1000.0/g_leak", "0.2*1000.0/tau_m")
        .rename("tau_syn_E", "tau_e")
        .rename("tau_syn_I", "tau_i")
        .rename("e_rev_I", "e_i")
        .build()
        .expect("hardware IF table is statically valid");
    ModelType::builder("if_facets_hardware1")
        .table(table)
        .default_parameter("g_leak", 40.0)
        .default_parameter("tau_syn_E", 30.0)
        .default_parameter("tau_syn_I", 30.0)
        .default_parameter("v_reset", -80.0)
        .default_parameter("e_rev_I", -80.0)
        .default_parameter("v_rest", -75.0)
        .default_parameter("v_thresh", -55.0)
        .initial_value("v", -75.0)
        .override_native("i_offset", 0.0)
        .override_native("c_m", 0.2)
        .override_native("t_refrac", 1.0)
        .override_native("e_e", 0.0)
        .applicable_native_models(["standard_if_exp_conductance"])
        .build()
        .expect("catalog definition is statically valid")
}

fn adaptive_exp_if(name: &str, native_model: &str) -> ModelType {
    let table = TableBuilder::new()
        .rename("v_init", "v_init")
        .rename("w_init", "w_init")
        .rename("cm", "c_m")
        .rename("tau_refrac", "t_refrac")
        .rename("v_spike", "v_spike")
        .rename("v_reset", "v_reset")
        .rename("v_rest", "v_rest")
        .rename("tau_m", "tau_m")
        .rename("i_offset", "i_offset")
        .scaled("a", "A", 0.001) // nS -> uS
        .rename("b", "B")
        .rename("delta_T", "delta")
        .rename("tau_w", "tau_w")
        .rename("v_thresh", "v_thresh")
        .rename("e_rev_E", "e_e")
        .rename("tau_syn_E", "tau_e")
        .rename("e_rev_I", "e_i")
        .rename("tau_syn_I", "tau_i")
        .build()
        .expect("adaptive exponential IF table is statically valid");
    ModelType::builder(name)
        .table(table)
        .default_parameter("cm", 0.281)
        .default_parameter("tau_m", 9.3667)
        .default_parameter("v_rest", -70.6)
        .default_parameter("v_thresh", -50.4)
        .default_parameter("v_reset", -70.6)
        .default_parameter("v_spike", 0.0)
        .default_parameter("tau_refrac", 0.1)
        .default_parameter("i_offset", 0.0)
        .default_parameter("a", 4.0)
        .default_parameter("b", 0.0805)
        .default_parameter("delta_T", 2.0)
        .default_parameter("tau_w", 144.0)
        .default_parameter("tau_syn_E", 5.0)
        .default_parameter("tau_syn_I", 5.0)
        .default_parameter("e_rev_E", 0.0)
        .default_parameter("e_rev_I", -80.0)
        .default_parameter("v_init", -70.6)
        .default_parameter("w_init", 0.0)
        .initial_value("v", -70.6)
        .initial_value("w", 0.0)
        .applicable_native_models([native_model])
        .build()
        .expect("catalog definition is statically valid")
}

/// Adaptive exponential integrate-and-fire (Brette & Gerstner 2005) with
/// spike-triggered and sub-threshold adaptation, alpha-function synapses
pub fn eif_cond_alpha_isfa_ista() -> ModelType {
    adaptive_exp_if("eif_cond_alpha_isfa_ista", "adexp_if_alpha_conductance")
}

/// Like [`eif_cond_alpha_isfa_ista`], with single-exponential synapses
pub fn eif_cond_exp_isfa_ista() -> ModelType {
    adaptive_exp_if("eif_cond_exp_isfa_ista", "adexp_if_exp_conductance")
}

/// Poisson spike source.
///
/// The native generator is parameterized by mean inter-spike interval and
/// total spike count, so both translations are formula pairs; `number`
/// reads the `interval` produced by the rule before it.
pub fn spike_source_poisson() -> ModelType {
    let table = TableBuilder::new()
        .rename("start", "start")
        .computed("rate", "interval", "1000.0/rate", "1000.0/interval")
        .computed(
            "duration",
            "number",
            "rate/1000.0*duration",
            "number*interval",
        )
        .build()
        .expect("poisson source table is statically valid");
    ModelType::builder("spike_source_poisson")
        .table(table)
        .default_parameter("start", 0.0)
        .default_parameter("rate", 1.0)
        .default_parameter("duration", 1.0e6)
        .applicable_native_models(["random_spike_source"])
        .build()
        .expect("catalog definition is statically valid")
}

/// Spike source replaying a caller-supplied spike time array
pub fn spike_source_array() -> ModelType {
    let table = TableBuilder::new()
        .rename("spike_times", "spike_times")
        .build()
        .expect("spike array table is statically valid");
    ModelType::builder("spike_source_array")
        .table(table)
        .default_parameter("spike_times", ParameterValue::from(Vec::<f64>::new()))
        .applicable_native_models(["vector_spike_source"])
        .build()
        .expect("catalog definition is statically valid")
}
