// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Round-trip and determinism properties of the translator
//!
//! These cover the engine's central contract: `to_standard(to_native(S))`
//! reproduces `S` within floating-point tolerance for every rule shape, and
//! translation of identical inputs is bit-identical.

use neurobabel_translation::{ParameterSet, ParameterValue, TranslationError, TranslationTable};

const TOLERANCE: f64 = 1e-9;

fn scalar_params(pairs: &[(&str, f64)]) -> ParameterSet {
    pairs.iter().map(|&(n, v)| (n, v)).collect()
}

fn stdp_weight_table() -> TranslationTable {
    TranslationTable::builder()
        .scaled("w_max", "Wmax", 1000.0)
        .rename("w_min", "w_min_unused")
        .rename("A_plus", "lambda")
        .computed("A_minus", "alpha", "A_minus/A_plus", "alpha*lambda")
        .build()
        .unwrap()
}

#[test]
fn rename_and_scale_scenario() {
    // Table [("w_max","Wmax",1000.0), ("A_plus","lambda")] with input
    // {w_max: 1.0, A_plus: 0.01} must produce {Wmax: 1000.0, lambda: 0.01}
    let table = TranslationTable::builder()
        .scaled("w_max", "Wmax", 1000.0)
        .rename("A_plus", "lambda")
        .build()
        .unwrap();
    let standard = scalar_params(&[("w_max", 1.0), ("A_plus", 0.01)]);
    let native = table.to_native(&standard, &ParameterSet::new()).unwrap();

    assert_eq!(native.get("Wmax"), Some(&ParameterValue::Scalar(1000.0)));
    assert_eq!(native.get("lambda"), Some(&ParameterValue::Scalar(0.01)));

    let back = table.to_standard(&native, &ParameterSet::new()).unwrap();
    assert!(back.approx_eq(&standard, TOLERANCE));
}

#[test]
fn formula_pair_scenario() {
    // ("A_minus","alpha","A_minus/A_plus","alpha*lambda"): with
    // {A_minus: 0.02, A_plus: 0.01}, forward yields alpha = 2.0; reverse of
    // {alpha: 2.0, lambda: 0.01} yields A_minus = 0.02
    let table = stdp_weight_table();
    let standard = scalar_params(&[
        ("w_max", 1.0),
        ("w_min", 0.0),
        ("A_plus", 0.01),
        ("A_minus", 0.02),
    ]);
    let native = table.to_native(&standard, &ParameterSet::new()).unwrap();
    assert!(native
        .get("alpha")
        .unwrap()
        .approx_eq(&ParameterValue::Scalar(2.0), TOLERANCE));

    let back = table.to_standard(&native, &ParameterSet::new()).unwrap();
    assert!(back
        .get("A_minus")
        .unwrap()
        .approx_eq(&ParameterValue::Scalar(0.02), TOLERANCE));
    assert!(back.approx_eq(&standard, TOLERANCE));
}

#[test]
fn round_trip_covers_all_rule_shapes() {
    let table = stdp_weight_table();
    let cases = [
        scalar_params(&[("w_max", 1.0), ("w_min", 0.0), ("A_plus", 0.01), ("A_minus", 0.01)]),
        scalar_params(&[("w_max", 0.25), ("w_min", 0.0), ("A_plus", 0.005), ("A_minus", 0.02)]),
        scalar_params(&[("w_max", 2.5), ("w_min", 0.0), ("A_plus", 1.0), ("A_minus", 3.0)]),
    ];
    for standard in &cases {
        let native = table.to_native(standard, &ParameterSet::new()).unwrap();
        let back = table.to_standard(&native, &ParameterSet::new()).unwrap();
        assert!(
            back.approx_eq(standard, TOLERANCE),
            "round trip failed for {:?}",
            standard
        );
    }
}

#[test]
fn round_trip_with_division_formulas() {
    // Poisson-style table: interval = 1000/rate, number depends on the
    // interval computed by the earlier rule
    let table = TranslationTable::builder()
        .rename("start", "start")
        .computed("rate", "interval", "1000.0/rate", "1000.0/interval")
        .computed(
            "duration",
            "number",
            "rate/1000.0*duration",
            "number*interval",
        )
        .build()
        .unwrap();
    let standard = scalar_params(&[("start", 0.0), ("rate", 40.0), ("duration", 2000.0)]);
    let native = table.to_native(&standard, &ParameterSet::new()).unwrap();

    assert!(native
        .get("interval")
        .unwrap()
        .approx_eq(&ParameterValue::Scalar(25.0), TOLERANCE));
    assert!(native
        .get("number")
        .unwrap()
        .approx_eq(&ParameterValue::Scalar(80.0), TOLERANCE));

    let back = table.to_standard(&native, &ParameterSet::new()).unwrap();
    assert!(back.approx_eq(&standard, TOLERANCE));
}

#[test]
fn translation_is_deterministic() {
    let table = stdp_weight_table();
    let standard = scalar_params(&[
        ("w_max", 0.37),
        ("w_min", 0.0),
        ("A_plus", 0.013),
        ("A_minus", 0.029),
    ]);
    let first = table.to_native(&standard, &ParameterSet::new()).unwrap();
    let second = table.to_native(&standard, &ParameterSet::new()).unwrap();
    // Bit-identical, not merely within tolerance
    assert_eq!(first, second);
}

#[test]
fn array_broadcast_through_scale_rule() {
    let table = stdp_weight_table();
    let mut standard = scalar_params(&[("w_min", 0.0), ("A_plus", 0.01), ("A_minus", 0.02)]);
    standard.insert("w_max", vec![1.0, 2.0, 0.5]);

    let native = table.to_native(&standard, &ParameterSet::new()).unwrap();
    assert!(native
        .get("Wmax")
        .unwrap()
        .approx_eq(&ParameterValue::from(vec![1000.0, 2000.0, 500.0]), TOLERANCE));
    // Scalar inputs stay scalar
    assert!(native.get("lambda").unwrap().is_scalar());

    let back = table.to_standard(&native, &ParameterSet::new()).unwrap();
    assert!(back.approx_eq(&standard, TOLERANCE));
}

#[test]
fn array_broadcast_through_formula_rule() {
    // Array A_minus against scalar A_plus: alpha comes out per-member
    let table = stdp_weight_table();
    let mut standard = scalar_params(&[("w_max", 1.0), ("w_min", 0.0), ("A_plus", 0.01)]);
    standard.insert("A_minus", vec![0.01, 0.02, 0.04]);

    let native = table.to_native(&standard, &ParameterSet::new()).unwrap();
    assert!(native
        .get("alpha")
        .unwrap()
        .approx_eq(&ParameterValue::from(vec![1.0, 2.0, 4.0]), TOLERANCE));

    let back = table.to_standard(&native, &ParameterSet::new()).unwrap();
    assert!(back.approx_eq(&standard, TOLERANCE));
}

#[test]
fn inconsistent_array_lengths_rejected() {
    let table = stdp_weight_table();
    let mut standard = scalar_params(&[("w_min", 0.0), ("A_plus", 0.01)]);
    standard.insert("w_max", vec![1.0, 2.0]);
    standard.insert("A_minus", vec![0.01, 0.02, 0.03]);

    let err = table.to_native(&standard, &ParameterSet::new()).unwrap_err();
    assert!(matches!(err, TranslationError::ShapeMismatch { .. }));
}

#[test]
fn round_trip_preserves_array_shape() {
    let table = TranslationTable::builder()
        .rename("spike_times", "spike_times")
        .build()
        .unwrap();
    let mut standard = ParameterSet::new();
    standard.insert("spike_times", vec![1.0, 5.0, 12.5, 40.0]);

    let native = table.to_native(&standard, &ParameterSet::new()).unwrap();
    let back = table.to_standard(&native, &ParameterSet::new()).unwrap();
    assert_eq!(back, standard);
}
