// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # neurobabel - One Model Description, Many Simulators
//!
//! neurobabel lets a single, simulator-independent description of neuron and
//! synapse models execute unchanged on multiple backend simulation engines,
//! each with its own native parameter names, units, and value semantics.
//!
//! The heart of the crate is a declarative, bidirectional parameter
//! translation engine:
//!
//! - **Translation tables** map standard parameter names onto backend-native
//!   names, via renames, scale factors (unit conversion), or forward/reverse
//!   formula pairs for derived parameters.
//! - **Model types** bundle a translation table with default values,
//!   backend-only constants, and the set of native model implementations the
//!   translation is valid for.
//! - **Model instances** hold the resolved native parameter dictionary for
//!   one model configuration and support minimal re-translation on partial
//!   parameter updates.
//!
//! ## Quick Start
//!
//! ```rust
//! use neurobabel::prelude::*;
//!
//! // A backend that provides the plain leaky integrate-and-fire cells
//! let backend = BackendDescriptor::new(
//!     "kernelsim",
//!     ["iaf_psc_alpha", "iaf_psc_exp", "stdp_synapse"],
//! );
//!
//! // Standard model description, translated to kernelsim's native names
//! let cell = cells::kernelsim::if_curr_alpha();
//! let mut params = ParameterSet::new();
//! params.insert("tau_m", ParameterValue::Scalar(12.5));
//! let instance = cell.instantiate(&params, &backend).unwrap();
//!
//! assert_eq!(
//!     instance.native_parameters().get("tau_m"),
//!     Some(&ParameterValue::Scalar(12.5)),
//! );
//! ```
//!
//! ## Crates
//!
//! - [`neurobabel_translation`] - parameter values, the formula evaluator,
//!   translation rules/tables, and the bidirectional translator
//! - [`neurobabel_backend`] - the external simulator interface (descriptors,
//!   the [`Simulator`](neurobabel_backend::Simulator) trait, opaque handles)
//! - [`neurobabel_models`] - model types, instances, and the standard model
//!   catalog for the reference backends

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use neurobabel_backend as backend;
pub use neurobabel_models as models;
pub use neurobabel_translation as translation;

// Re-export the types almost every caller needs
pub use neurobabel_backend::{BackendDescriptor, MockSimulator, ModelHandle, Simulator};
pub use neurobabel_models::{cells, synapses, ModelDefinition, ModelInstance, ModelType};
pub use neurobabel_translation::{
    ParameterSet, ParameterValue, RuleSpec, TranslationError, TranslationTable,
};

/// Convenience prelude: `use neurobabel::prelude::*;`
pub mod prelude {
    pub use neurobabel_backend::{BackendDescriptor, MockSimulator, ModelHandle, Simulator};
    pub use neurobabel_models::{
        cells, synapses, ModelDefinition, ModelError, ModelInstance, ModelType, StdpMechanism,
        SynapseDynamics,
    };
    pub use neurobabel_translation::{
        ParameterSet, ParameterValue, RuleSpec, TableBuilder, TranslationError, TranslationTable,
    };
}
