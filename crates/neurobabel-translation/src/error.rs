// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for the translation engine
//!
//! Table-construction errors ([`TranslationError::MalformedRule`],
//! [`TranslationError::UndefinedReference`]) are fatal to building a table;
//! no partially-valid table is ever returned. The remaining variants are
//! surfaced at translation time and always name the offending parameter.

use thiserror::Error;

/// Errors raised while building or evaluating a translation table
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TranslationError {
    /// A rule specification is structurally invalid (bad arity, colliding
    /// names, a lone forward/reverse expression, or an unparsable formula)
    #[error("malformed translation rule: {0}")]
    MalformedRule(String),

    /// A formula references a name that is not available at its position in
    /// evaluation order. Caught statically at table-build time.
    #[error("rule '{rule}' references undefined name '{name}'")]
    UndefinedReference { rule: String, name: String },

    /// A caller-supplied parameter name is not part of the translation table
    #[error("unknown parameter: '{0}'")]
    UnknownParameter(String),

    /// A required parameter value was not supplied
    #[error("missing value for parameter '{0}'")]
    MissingParameter(String),

    /// Array-valued parameters have inconsistent lengths
    #[error("array length mismatch for '{name}': expected {expected}, got {actual}")]
    ShapeMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}

pub type TranslationResult<T> = Result<T, TranslationError>;
