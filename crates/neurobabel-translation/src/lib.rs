// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# neurobabel-translation

Declarative, bidirectional parameter translation between a
simulator-independent (standard) parameter vocabulary and a backend-native
one:

- [`ParameterValue`] / [`ParameterSet`] - scalar or per-member array values
  in ordered dictionaries
- [`Formula`] - a restricted arithmetic expression evaluator (literals,
  named references, `+ - * /`, parentheses) with parse-time free-variable
  extraction
- [`RuleSpec`] / [`TranslationRule`] - rename, scale-factor, and
  formula-pair rules
- [`TranslationTable`] - ordered rule collections with build-time reference
  validation, a static dependency graph for minimal re-translation, and the
  `to_native` / `to_standard` translators

Translation is a pure function of its inputs and the immutable table:
tables are `Send + Sync` and safe for concurrent read-only use.

The central correctness property: for any standard parameter set `S`
accepted by a table, `to_standard(to_native(S))` equals `S` within
floating-point tolerance, for every rule shape.
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod expr;
pub mod params;
pub mod rule;
pub mod table;
pub mod value;

pub use error::{TranslationError, TranslationResult};
pub use expr::{Formula, FormulaError, Namespace};
pub use params::ParameterSet;
pub use rule::{RuleSpec, TranslationRule};
pub use table::{TableBuilder, TranslationTable};
pub use value::ParameterValue;
