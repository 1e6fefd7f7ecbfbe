// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! STDP mechanism assembly and the synapse dynamics container

use tracing::debug;

use neurobabel_translation::ParameterSet;

use crate::error::{ModelError, ModelResult};
use crate::instance::ModelInstance;

/// A long-term plasticity mechanism assembled from a timing dependence and
/// a weight dependence.
///
/// Both components must have been resolved for the same backend and the
/// same native synapse implementation; their native parameter sets merge
/// into one dictionary for that implementation.
#[derive(Debug, Clone)]
pub struct StdpMechanism {
    timing: ModelInstance,
    weight: ModelInstance,
    native: ParameterSet,
    dendritic_delay_fraction: f64,
}

impl StdpMechanism {
    /// Assemble a mechanism.
    ///
    /// `dendritic_delay_fraction` must be 1.0: the reference backends apply
    /// the whole connection delay on the dendritic side for the purpose of
    /// STDP bookkeeping, and a split delay cannot be expressed.
    pub fn new(
        timing: ModelInstance,
        weight: ModelInstance,
        dendritic_delay_fraction: f64,
    ) -> ModelResult<Self> {
        if dendritic_delay_fraction != 1.0 {
            return Err(ModelError::UnsupportedConfiguration {
                model: "stdp_mechanism".to_string(),
                parameter: "dendritic_delay_fraction".to_string(),
                required: 1.0,
                detail: "axonal delays are not supported; all delays are treated as dendritic"
                    .to_string(),
            });
        }
        if timing.native_model() != weight.native_model()
            || timing.backend_name() != weight.backend_name()
        {
            return Err(ModelError::BackendIncompatibility {
                model: "stdp_mechanism".to_string(),
                backend: weight.backend_name().to_string(),
                candidates: vec![
                    timing.native_model().to_string(),
                    weight.native_model().to_string(),
                ],
            });
        }

        let mut native = ParameterSet::new();
        for (name, value) in timing.native_parameters().iter() {
            native.insert(name, value.clone());
        }
        for (name, value) in weight.native_parameters().iter() {
            if native.contains(name) {
                return Err(ModelError::InvalidDefinition {
                    model: "stdp_mechanism".to_string(),
                    detail: format!(
                        "components '{}' and '{}' both produce native parameter '{}'",
                        timing.model_type().name(),
                        weight.model_type().name(),
                        name
                    ),
                });
            }
            native.insert(name, value.clone());
        }

        debug!(
            timing = timing.model_type().name(),
            weight = weight.model_type().name(),
            native_model = timing.native_model(),
            "stdp mechanism assembled"
        );

        Ok(Self {
            timing,
            weight,
            native,
            dendritic_delay_fraction,
        })
    }

    pub fn timing_dependence(&self) -> &ModelInstance {
        &self.timing
    }

    pub fn weight_dependence(&self) -> &ModelInstance {
        &self.weight
    }

    pub fn dendritic_delay_fraction(&self) -> f64 {
        self.dendritic_delay_fraction
    }

    /// The native synapse implementation both components resolved to
    pub fn native_model(&self) -> &str {
        self.timing.native_model()
    }

    /// Merged native parameter set of both components
    pub fn native_parameters(&self) -> &ParameterSet {
        &self.native
    }
}

/// Short-term and long-term plasticity for one projection
#[derive(Debug, Clone, Default)]
pub struct SynapseDynamics {
    fast: Option<ModelInstance>,
    slow: Option<StdpMechanism>,
}

impl SynapseDynamics {
    pub fn new(fast: Option<ModelInstance>, slow: Option<StdpMechanism>) -> Self {
        Self { fast, slow }
    }

    pub fn fast(&self) -> Option<&ModelInstance> {
        self.fast.as_ref()
    }

    pub fn slow(&self) -> Option<&StdpMechanism> {
        self.slow.as_ref()
    }

    /// Whether any plasticity is configured at all
    pub fn is_static(&self) -> bool {
        self.fast.is_none() && self.slow.is_none()
    }
}
