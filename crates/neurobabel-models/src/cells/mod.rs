// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Standard cell model catalog
//!
//! One standard (simulator-independent) vocabulary, one module per
//! reference backend. The same standard parameter names and defaults
//! appear on every backend; only the translation tables, native model
//! identifiers, and backend constants differ:
//!
//! - [`cablesim`] - a compartmental cable simulator (native names like
//!   `c_m`, `t_refrac`, `tau_e`)
//! - [`kernelsim`] - a point-neuron kernel simulator (native names like
//!   `C_m`, `t_ref`, `tau_syn_ex`; capacitance in pF, currents in pA)
//!
//! Catalog constructors return ready-built [`ModelType`](crate::ModelType)s.

pub mod cablesim;
pub mod kernelsim;
