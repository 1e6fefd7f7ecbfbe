// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for model construction and mutation
//!
//! All variants abort the operation that raised them and leave prior state
//! unchanged; none indicate a transient condition worth retrying.

use thiserror::Error;

use neurobabel_backend::SimulatorError;
use neurobabel_translation::TranslationError;

/// Errors raised by model types, instances, and synapse assemblies
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ModelError {
    /// An error from the underlying translation engine
    #[error(transparent)]
    Translation(#[from] TranslationError),

    /// A caller-supplied key is not a recognized standard parameter
    #[error("model '{model}' has no parameter '{parameter}'")]
    UnknownParameter { model: String, parameter: String },

    /// A supplied standard value contradicts a hard backend constant.
    /// Failing fast here is deliberate: silently overriding the value would
    /// mask a configuration the backend cannot express.
    #[error(
        "model '{model}': parameter '{parameter}' must be {required} on this backend ({detail})"
    )]
    UnsupportedConfiguration {
        model: String,
        parameter: String,
        required: f64,
        detail: String,
    },

    /// The target backend provides none of the native model implementations
    /// this translation is valid for
    #[error(
        "backend '{backend}' provides none of the native models required by '{model}' \
         (candidates: {candidates:?})"
    )]
    BackendIncompatibility {
        model: String,
        backend: String,
        candidates: Vec<String>,
    },

    /// The model definition itself is inconsistent (defaults vs table, empty
    /// applicability set, colliding component names, ...)
    #[error("invalid definition for model '{model}': {detail}")]
    InvalidDefinition { model: String, detail: String },

    /// The external simulator rejected a request
    #[error(transparent)]
    Simulator(#[from] SimulatorError),
}

pub type ModelResult<T> = Result<T, ModelError>;
