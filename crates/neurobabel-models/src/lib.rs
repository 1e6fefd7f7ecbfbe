// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# neurobabel-models

Translation-aware model definitions on top of `neurobabel-translation`:

- [`ModelType`] - a backend-specific model definition: recognized standard
  parameters with defaults, a translation table, applicable native model
  implementations, post-translation overrides, and hard backend constraints
- [`ModelInstance`] - the resolved parameter store for one instantiation,
  with minimal re-translation on partial updates
- [`ModelDefinition`] - the same definitions as declarative JSON documents
- [`cells`] / [`synapses`] - the standard model catalog for the two
  reference backends, `cablesim` and `kernelsim`

Construction pipeline: validate supplied keys, merge defaults, enforce hard
constraints, check backend applicability, translate, inject overrides. Any
failure aborts construction; nothing is silently masked.
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cells;
pub mod definition;
pub mod error;
pub mod instance;
pub mod model_type;
pub mod synapses;

pub use definition::ModelDefinition;
pub use error::{ModelError, ModelResult};
pub use instance::ModelInstance;
pub use model_type::{HardConstraint, ModelType, ModelTypeBuilder};
pub use synapses::{StdpMechanism, SynapseDynamics};
