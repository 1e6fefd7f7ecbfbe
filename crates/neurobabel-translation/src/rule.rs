// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Translation rules
//!
//! A rule maps one standard-name parameter onto one native-name parameter.
//! Three shapes exist:
//!
//! - **rename**: the value passes through unchanged
//! - **scale**: multiply standard -> native, divide native -> standard
//! - **computed**: a forward formula derives the native value and a reverse
//!   formula recovers the standard value; both are required since arbitrary
//!   formulas, unlike scale factors, are not trivially invertible
//!
//! `RuleSpec` is the declarative form callers build tables from, either in
//! code or from a JSON document where each rule is a 2-, 3- or 4-element
//! array (`[standard, native]`, `[standard, native, scale]`,
//! `[standard, native, forward, reverse]`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{TranslationError, TranslationResult};
use crate::expr::Formula;

/// Declarative rule specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub standard_name: String,
    pub native_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse_expression: Option<String>,
}

impl RuleSpec {
    /// Pure renaming: the native parameter takes the standard value as-is
    pub fn rename(standard_name: impl Into<String>, native_name: impl Into<String>) -> Self {
        Self {
            standard_name: standard_name.into(),
            native_name: native_name.into(),
            scale_factor: None,
            forward_expression: None,
            reverse_expression: None,
        }
    }

    /// Unit conversion by a constant factor
    pub fn scaled(
        standard_name: impl Into<String>,
        native_name: impl Into<String>,
        scale_factor: f64,
    ) -> Self {
        Self {
            standard_name: standard_name.into(),
            native_name: native_name.into(),
            scale_factor: Some(scale_factor),
            forward_expression: None,
            reverse_expression: None,
        }
    }

    /// Derived parameter with an explicit forward/reverse formula pair
    pub fn computed(
        standard_name: impl Into<String>,
        native_name: impl Into<String>,
        forward_expression: impl Into<String>,
        reverse_expression: impl Into<String>,
    ) -> Self {
        Self {
            standard_name: standard_name.into(),
            native_name: native_name.into(),
            scale_factor: None,
            forward_expression: Some(forward_expression.into()),
            reverse_expression: Some(reverse_expression.into()),
        }
    }

    /// Parse the JSON array form. Arity selects the rule shape; anything
    /// other than 2, 3 or 4 elements is malformed.
    pub fn from_json_row(row: &Value) -> TranslationResult<Self> {
        let items = row.as_array().ok_or_else(|| {
            TranslationError::MalformedRule(format!("rule must be a JSON array, got {}", row))
        })?;
        let name = |index: usize| -> TranslationResult<String> {
            items[index]
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| {
                    TranslationError::MalformedRule(format!(
                        "rule element {} must be a string, got {}",
                        index, items[index]
                    ))
                })
        };
        match items.len() {
            2 => Ok(RuleSpec::rename(name(0)?, name(1)?)),
            3 => {
                let factor = items[2].as_f64().ok_or_else(|| {
                    TranslationError::MalformedRule(format!(
                        "scale factor must be a number, got {}",
                        items[2]
                    ))
                })?;
                Ok(RuleSpec::scaled(name(0)?, name(1)?, factor))
            }
            4 => Ok(RuleSpec::computed(name(0)?, name(1)?, name(2)?, name(3)?)),
            arity => Err(TranslationError::MalformedRule(format!(
                "rule must have 2, 3 or 4 elements, got {}",
                arity
            ))),
        }
    }

    /// Compile this specification, validating the transform combination and parsing
    /// any formulas. Name availability is checked by the table builder.
    pub(crate) fn compile(&self) -> TranslationResult<TranslationRule> {
        let label = format!("'{}' -> '{}'", self.standard_name, self.native_name);
        if self.standard_name.is_empty() || self.native_name.is_empty() {
            return Err(TranslationError::MalformedRule(format!(
                "{}: parameter names must be non-empty",
                label
            )));
        }
        let transform = match (
            self.scale_factor,
            &self.forward_expression,
            &self.reverse_expression,
        ) {
            (None, None, None) => Transform::Rename,
            (Some(factor), None, None) => Transform::Scale(factor),
            (None, Some(forward), Some(reverse)) => {
                let parse = |source: &str| {
                    Formula::parse(source).map_err(|e| {
                        TranslationError::MalformedRule(format!(
                            "{}: cannot parse formula \"{}\": {}",
                            label, source, e
                        ))
                    })
                };
                Transform::Computed {
                    forward: parse(forward)?,
                    reverse: parse(reverse)?,
                }
            }
            (None, Some(_), None) | (None, None, Some(_)) => {
                return Err(TranslationError::MalformedRule(format!(
                    "{}: forward and reverse expressions must be given together",
                    label
                )));
            }
            (Some(_), _, _) => {
                return Err(TranslationError::MalformedRule(format!(
                    "{}: a rule takes a scale factor or an expression pair, not both",
                    label
                )));
            }
        };
        Ok(TranslationRule {
            standard_name: self.standard_name.clone(),
            native_name: self.native_name.clone(),
            transform,
        })
    }
}

/// How a compiled rule maps its value
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Transform {
    Rename,
    Scale(f64),
    Computed { forward: Formula, reverse: Formula },
}

/// One compiled, immutable entry of a translation table
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRule {
    pub(crate) standard_name: String,
    pub(crate) native_name: String,
    pub(crate) transform: Transform,
}

impl TranslationRule {
    pub fn standard_name(&self) -> &str {
        &self.standard_name
    }

    pub fn native_name(&self) -> &str {
        &self.native_name
    }

    pub fn is_computed(&self) -> bool {
        matches!(self.transform, Transform::Computed { .. })
    }

    /// Names the forward formula references, if any
    pub(crate) fn forward_refs(&self) -> Option<&std::collections::BTreeSet<String>> {
        match &self.transform {
            Transform::Computed { forward, .. } => Some(forward.free_variables()),
            _ => None,
        }
    }

    pub(crate) fn reverse_refs(&self) -> Option<&std::collections::BTreeSet<String>> {
        match &self.transform {
            Transform::Computed { reverse, .. } => Some(reverse.free_variables()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_row_arities() {
        let rename = RuleSpec::from_json_row(&json!(["w_min", "w_min_unused"])).unwrap();
        assert_eq!(rename, RuleSpec::rename("w_min", "w_min_unused"));

        let scaled = RuleSpec::from_json_row(&json!(["w_max", "Wmax", 1000.0])).unwrap();
        assert_eq!(scaled, RuleSpec::scaled("w_max", "Wmax", 1000.0));

        let computed =
            RuleSpec::from_json_row(&json!(["A_minus", "alpha", "A_minus/A_plus", "alpha*lambda"]))
                .unwrap();
        assert_eq!(
            computed,
            RuleSpec::computed("A_minus", "alpha", "A_minus/A_plus", "alpha*lambda")
        );
    }

    #[test]
    fn test_json_row_bad_arity() {
        let err = RuleSpec::from_json_row(&json!(["only_one"])).unwrap_err();
        assert!(matches!(err, TranslationError::MalformedRule(_)));
        let err = RuleSpec::from_json_row(&json!(["a", "b", 1.0, "x", "y"])).unwrap_err();
        assert!(matches!(err, TranslationError::MalformedRule(_)));
    }

    #[test]
    fn test_lone_expression_is_malformed() {
        let spec = RuleSpec {
            standard_name: "a".into(),
            native_name: "b".into(),
            scale_factor: None,
            forward_expression: Some("a*2.0".into()),
            reverse_expression: None,
        };
        assert!(matches!(
            spec.compile(),
            Err(TranslationError::MalformedRule(_))
        ));
    }

    #[test]
    fn test_scale_and_expressions_conflict() {
        let spec = RuleSpec {
            standard_name: "a".into(),
            native_name: "b".into(),
            scale_factor: Some(2.0),
            forward_expression: Some("a*2.0".into()),
            reverse_expression: Some("b/2.0".into()),
        };
        assert!(matches!(
            spec.compile(),
            Err(TranslationError::MalformedRule(_))
        ));
    }

    #[test]
    fn test_unparsable_formula_is_malformed() {
        let spec = RuleSpec::computed("a", "b", "a +* 2", "b");
        assert!(matches!(
            spec.compile(),
            Err(TranslationError::MalformedRule(_))
        ));
    }
}
