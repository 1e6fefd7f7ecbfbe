// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# neurobabel-backend

The boundary between the translation engine and the external simulator
engines. A backend is described by the set of native model implementations
it provides; a [`Simulator`] consumes a native model identifier plus a
resolved native parameter set and returns an opaque [`ModelHandle`]. The
engine never inspects a handle's internals and never hands a backend a
mutable view of its parameter store.

[`MockSimulator`] is an in-memory implementation for tests and dry runs: it
records every instantiation it receives.
*/

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use neurobabel_translation::ParameterSet;

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Errors surfaced by a simulator backend
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SimulatorError {
    /// The backend does not provide the requested native model
    #[error("backend '{backend}' does not provide native model '{model}'")]
    UnknownModel { backend: String, model: String },

    /// The backend rejected the instantiation request
    #[error("backend rejected model instantiation: {0}")]
    Rejected(String),
}

pub type SimulatorResult<T> = Result<T, SimulatorError>;

/// What a backend offers: its name and the native model implementations it
/// provides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendDescriptor {
    name: String,
    native_models: BTreeSet<String>,
}

impl BackendDescriptor {
    pub fn new<I, S>(name: impl Into<String>, native_models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            native_models: native_models.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this backend provides the given native model implementation
    pub fn provides(&self, native_model: &str) -> bool {
        self.native_models.contains(native_model)
    }

    pub fn native_models(&self) -> impl Iterator<Item = &str> {
        self.native_models.iter().map(String::as_str)
    }
}

/// Opaque reference to an instantiated backend model.
///
/// Only the issuing backend knows what it refers to; the engine stores and
/// forwards it without interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelHandle(u64);

impl ModelHandle {
    /// Mint a handle. Intended for backend implementations.
    pub fn from_raw(raw: u64) -> Self {
        ModelHandle(raw)
    }
}

/// The external simulator collaborator.
///
/// Implementations receive a read-only view of the resolved native
/// parameter set; the engine retains ownership.
pub trait Simulator {
    /// The backend this simulator implements
    fn descriptor(&self) -> &BackendDescriptor;

    /// Instantiate a native model with the given resolved parameters
    fn instantiate(
        &mut self,
        native_model: &str,
        parameters: &ParameterSet,
    ) -> SimulatorResult<ModelHandle>;
}

/// In-memory simulator for tests: accepts anything its descriptor provides
/// and records it
#[derive(Debug)]
pub struct MockSimulator {
    descriptor: BackendDescriptor,
    instantiated: Vec<(String, ParameterSet)>,
}

impl MockSimulator {
    pub fn new(descriptor: BackendDescriptor) -> Self {
        Self {
            descriptor,
            instantiated: Vec::new(),
        }
    }

    /// Every (native model, parameters) pair received, in order
    pub fn instantiated(&self) -> &[(String, ParameterSet)] {
        &self.instantiated
    }
}

impl Simulator for MockSimulator {
    fn descriptor(&self) -> &BackendDescriptor {
        &self.descriptor
    }

    fn instantiate(
        &mut self,
        native_model: &str,
        parameters: &ParameterSet,
    ) -> SimulatorResult<ModelHandle> {
        if !self.descriptor.provides(native_model) {
            return Err(SimulatorError::UnknownModel {
                backend: self.descriptor.name().to_string(),
                model: native_model.to_string(),
            });
        }
        debug!(
            backend = self.descriptor.name(),
            model = native_model,
            parameters = parameters.len(),
            "mock instantiation"
        );
        self.instantiated
            .push((native_model.to_string(), parameters.clone()));
        Ok(ModelHandle::from_raw(self.instantiated.len() as u64 - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_provides() {
        let backend = BackendDescriptor::new("kernelsim", ["stdp_synapse", "iaf_psc_alpha"]);
        assert!(backend.provides("stdp_synapse"));
        assert!(!backend.provides("tsodyks_synapse"));
    }

    #[test]
    fn test_mock_simulator_records_instantiations() {
        let mut sim =
            MockSimulator::new(BackendDescriptor::new("kernelsim", ["iaf_psc_alpha"]));
        let mut params = ParameterSet::new();
        params.insert("tau_m", 20.0);

        let handle = sim.instantiate("iaf_psc_alpha", &params).unwrap();
        assert_eq!(handle, ModelHandle::from_raw(0));
        assert_eq!(sim.instantiated().len(), 1);
        assert_eq!(sim.instantiated()[0].0, "iaf_psc_alpha");
    }

    #[test]
    fn test_mock_simulator_rejects_unknown_model() {
        let mut sim =
            MockSimulator::new(BackendDescriptor::new("kernelsim", ["iaf_psc_alpha"]));
        let err = sim.instantiate("iaf_cond_exp", &ParameterSet::new()).unwrap_err();
        assert_eq!(
            err,
            SimulatorError::UnknownModel {
                backend: "kernelsim".to_string(),
                model: "iaf_cond_exp".to_string(),
            }
        );
    }
}
