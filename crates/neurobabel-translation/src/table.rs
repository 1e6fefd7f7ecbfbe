// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Translation tables and the bidirectional translator
//!
//! A table is an ordered sequence of compiled rules. Order is semantically
//! significant: a forward formula may reference the native output of any
//! *earlier* rule, so evaluation always walks the table in insertion order
//! (and in reverse order for the native -> standard direction).
//!
//! All reference checking happens at build time. Every forward formula's
//! free variables are checked against the names that will be available at
//! that rule's position, every reverse formula's against the full native
//! name set; a table that would fail at translation time is never returned.
//! The same free-variable sets feed a static dependency graph over rule
//! indices, used for minimal re-translation on partial parameter updates.

use std::collections::BTreeSet;

use ahash::AHashMap;
use serde_json::Value;
use tracing::debug;

use crate::error::{TranslationError, TranslationResult};
use crate::expr::{EvalError, Namespace};
use crate::params::ParameterSet;
use crate::rule::{RuleSpec, Transform, TranslationRule};
use crate::value::ParameterValue;

/// Fluent builder for [`TranslationTable`]
#[derive(Debug, Default)]
pub struct TableBuilder {
    specs: Vec<RuleSpec>,
    context_names: BTreeSet<String>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule specification
    pub fn rule(mut self, spec: RuleSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Append a pure renaming rule
    pub fn rename(self, standard_name: &str, native_name: &str) -> Self {
        self.rule(RuleSpec::rename(standard_name, native_name))
    }

    /// Append a scale-factor rule
    pub fn scaled(self, standard_name: &str, native_name: &str, factor: f64) -> Self {
        self.rule(RuleSpec::scaled(standard_name, native_name, factor))
    }

    /// Append a computed rule with a forward/reverse formula pair
    pub fn computed(
        self,
        standard_name: &str,
        native_name: &str,
        forward: &str,
        reverse: &str,
    ) -> Self {
        self.rule(RuleSpec::computed(standard_name, native_name, forward, reverse))
    }

    /// Declare a context name formulas may reference. Context values are
    /// native-only constants supplied at translation time rather than
    /// produced by a rule.
    pub fn context_name(mut self, name: &str) -> Self {
        self.context_names.insert(name.to_string());
        self
    }

    /// Compile and statically validate the table
    pub fn build(self) -> TranslationResult<TranslationTable> {
        TranslationTable::compile(self.specs, self.context_names)
    }
}

/// An ordered, immutable collection of translation rules
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationTable {
    rules: Vec<TranslationRule>,
    by_standard: AHashMap<String, usize>,
    by_native: AHashMap<String, usize>,
    context_names: BTreeSet<String>,
    /// dependents[i] = indices of rules whose forward formula reads rule
    /// i's standard or native name
    dependents: Vec<Vec<usize>>,
}

impl TranslationTable {
    pub fn builder() -> TableBuilder {
        TableBuilder::new()
    }

    /// Build a table from a list of rule specifications
    pub fn from_specs(specs: impl IntoIterator<Item = RuleSpec>) -> TranslationResult<Self> {
        Self::compile(specs.into_iter().collect(), BTreeSet::new())
    }

    /// Build a table from a JSON document: an array of 2-, 3- or 4-element
    /// rule rows
    pub fn from_json(document: &str) -> TranslationResult<Self> {
        let value: Value = serde_json::from_str(document).map_err(|e| {
            TranslationError::MalformedRule(format!("invalid table document: {}", e))
        })?;
        let rows = value.as_array().ok_or_else(|| {
            TranslationError::MalformedRule("table document must be a JSON array".to_string())
        })?;
        let specs = rows
            .iter()
            .map(RuleSpec::from_json_row)
            .collect::<TranslationResult<Vec<_>>>()?;
        Self::from_specs(specs)
    }

    fn compile(
        specs: Vec<RuleSpec>,
        context_names: BTreeSet<String>,
    ) -> TranslationResult<Self> {
        let mut rules = Vec::with_capacity(specs.len());
        let mut by_standard = AHashMap::with_capacity(specs.len());
        let mut by_native = AHashMap::with_capacity(specs.len());

        for spec in &specs {
            let rule = spec.compile()?;
            if by_standard.contains_key(rule.standard_name()) {
                return Err(TranslationError::MalformedRule(format!(
                    "duplicate standard name '{}'",
                    rule.standard_name()
                )));
            }
            if by_native.contains_key(rule.native_name()) {
                return Err(TranslationError::MalformedRule(format!(
                    "duplicate native name '{}'",
                    rule.native_name()
                )));
            }
            by_standard.insert(rule.standard_name().to_string(), rules.len());
            by_native.insert(rule.native_name().to_string(), rules.len());
            rules.push(rule);
        }

        let all_standard: BTreeSet<&str> =
            rules.iter().map(TranslationRule::standard_name).collect();
        let all_native: BTreeSet<&str> = rules.iter().map(TranslationRule::native_name).collect();

        // Static reference validation: a forward formula may reference any
        // standard name, the native output of an earlier rule, or a declared
        // context name. A reverse formula may reference any native name or
        // context name.
        for (index, rule) in rules.iter().enumerate() {
            if let Some(refs) = rule.forward_refs() {
                for name in refs {
                    let is_earlier_native = by_native
                        .get(name.as_str())
                        .map(|&i| i < index)
                        .unwrap_or(false);
                    if !all_standard.contains(name.as_str())
                        && !is_earlier_native
                        && !context_names.contains(name)
                    {
                        return Err(TranslationError::UndefinedReference {
                            rule: rule.standard_name().to_string(),
                            name: name.clone(),
                        });
                    }
                }
            }
            if let Some(refs) = rule.reverse_refs() {
                for name in refs {
                    if !all_native.contains(name.as_str()) && !context_names.contains(name) {
                        return Err(TranslationError::UndefinedReference {
                            rule: rule.standard_name().to_string(),
                            name: name.clone(),
                        });
                    }
                }
            }
        }

        // Static dependency graph over rule indices, from forward formula
        // free-variable sets. A native value computed by an earlier rule
        // shadows a same-named standard value in the evaluation namespace,
        // so the earlier-native interpretation wins here too.
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); rules.len()];
        for (index, rule) in rules.iter().enumerate() {
            if let Some(refs) = rule.forward_refs() {
                for name in refs {
                    let source = by_native
                        .get(name.as_str())
                        .filter(|&&i| i < index)
                        .or_else(|| by_standard.get(name.as_str()));
                    if let Some(&source) = source {
                        if source != index && !dependents[source].contains(&index) {
                            dependents[source].push(index);
                        }
                    }
                }
            }
        }
        for edges in &mut dependents {
            edges.sort_unstable();
        }

        debug!(rules = rules.len(), "translation table built");

        Ok(TranslationTable {
            rules,
            by_standard,
            by_native,
            context_names,
            dependents,
        })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[TranslationRule] {
        &self.rules
    }

    pub fn contains_standard(&self, name: &str) -> bool {
        self.by_standard.contains_key(name)
    }

    pub fn contains_native(&self, name: &str) -> bool {
        self.by_native.contains_key(name)
    }

    /// Standard names in table order
    pub fn standard_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(TranslationRule::standard_name)
    }

    /// Native names in table order
    pub fn native_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(TranslationRule::native_name)
    }

    /// Translate a complete standard parameter set to native names.
    ///
    /// `context` supplies values for declared context names; it may be empty.
    pub fn to_native(
        &self,
        standard: &ParameterSet,
        context: &ParameterSet,
    ) -> TranslationResult<ParameterSet> {
        for rule in &self.rules {
            if !standard.contains(rule.standard_name()) {
                return Err(TranslationError::MissingParameter(
                    rule.standard_name().to_string(),
                ));
            }
        }
        standard.merged_with(context).uniform_length()?;

        let mut namespace = Namespace::new();
        for (name, value) in standard.iter().chain(context.iter()) {
            namespace.insert(name, value.clone());
        }

        let mut native = ParameterSet::new();
        for rule in &self.rules {
            let value = self.forward_value(rule, standard, &namespace)?;
            namespace.insert(rule.native_name(), value.clone());
            native.insert(rule.native_name(), value);
        }
        Ok(native)
    }

    /// Translate a complete native parameter set back to standard names,
    /// iterating rules in reverse evaluation order
    pub fn to_standard(
        &self,
        native: &ParameterSet,
        context: &ParameterSet,
    ) -> TranslationResult<ParameterSet> {
        for rule in &self.rules {
            if !native.contains(rule.native_name()) {
                return Err(TranslationError::MissingParameter(
                    rule.native_name().to_string(),
                ));
            }
        }
        native.merged_with(context).uniform_length()?;

        let mut namespace = Namespace::new();
        for (name, value) in native.iter().chain(context.iter()) {
            namespace.insert(name, value.clone());
        }

        let mut standard = ParameterSet::new();
        for rule in self.rules.iter().rev() {
            let value = match &rule.transform {
                Transform::Rename => self.native_input(native, rule.native_name())?,
                Transform::Scale(factor) => {
                    self.native_input(native, rule.native_name())?.unscale(*factor)
                }
                Transform::Computed { reverse, .. } => reverse
                    .evaluate(&namespace)
                    .map_err(|e| self.eval_error(rule, e))?,
            };
            standard.insert(rule.standard_name(), value);
        }
        Ok(standard)
    }

    /// Rule indices that must re-translate when the given standard names
    /// change: the rules owning those names plus all transitive dependents
    /// per the static dependency graph. Result is sorted (evaluation order).
    pub fn affected_rules<'a>(
        &self,
        changed: impl IntoIterator<Item = &'a str>,
    ) -> TranslationResult<Vec<usize>> {
        let mut pending: Vec<usize> = Vec::new();
        for name in changed {
            let &index = self
                .by_standard
                .get(name)
                .ok_or_else(|| TranslationError::UnknownParameter(name.to_string()))?;
            pending.push(index);
        }
        let mut affected = BTreeSet::new();
        while let Some(index) = pending.pop() {
            if affected.insert(index) {
                pending.extend(self.dependents[index].iter().copied());
            }
        }
        Ok(affected.into_iter().collect())
    }

    /// Re-translate exactly the rules in `subset` (indices in evaluation
    /// order, as returned by [`affected_rules`](Self::affected_rules)).
    ///
    /// `standard` must be the complete post-update standard set;
    /// `previous_native` supplies native values for rules outside the
    /// subset. Returns only the re-translated native entries.
    pub fn retranslate_subset(
        &self,
        subset: &[usize],
        standard: &ParameterSet,
        previous_native: &ParameterSet,
        context: &ParameterSet,
    ) -> TranslationResult<ParameterSet> {
        standard.merged_with(context).uniform_length()?;
        let selected: BTreeSet<usize> = subset.iter().copied().collect();

        let mut namespace = Namespace::new();
        for (name, value) in standard.iter().chain(context.iter()) {
            namespace.insert(name, value.clone());
        }

        let mut updated = ParameterSet::new();
        for (index, rule) in self.rules.iter().enumerate() {
            let value = if selected.contains(&index) {
                let value = self.forward_value(rule, standard, &namespace)?;
                updated.insert(rule.native_name(), value.clone());
                value
            } else {
                self.native_input(previous_native, rule.native_name())?
            };
            namespace.insert(rule.native_name(), value);
        }
        Ok(updated)
    }

    fn forward_value(
        &self,
        rule: &TranslationRule,
        standard: &ParameterSet,
        namespace: &Namespace,
    ) -> TranslationResult<ParameterValue> {
        match &rule.transform {
            Transform::Rename => self.standard_input(standard, rule.standard_name()),
            Transform::Scale(factor) => Ok(self
                .standard_input(standard, rule.standard_name())?
                .scale(*factor)),
            Transform::Computed { forward, .. } => forward
                .evaluate(namespace)
                .map_err(|e| self.eval_error(rule, e)),
        }
    }

    fn standard_input(
        &self,
        standard: &ParameterSet,
        name: &str,
    ) -> TranslationResult<ParameterValue> {
        standard
            .get(name)
            .cloned()
            .ok_or_else(|| TranslationError::MissingParameter(name.to_string()))
    }

    fn native_input(
        &self,
        native: &ParameterSet,
        name: &str,
    ) -> TranslationResult<ParameterValue> {
        native
            .get(name)
            .cloned()
            .ok_or_else(|| TranslationError::MissingParameter(name.to_string()))
    }

    fn eval_error(&self, rule: &TranslationRule, error: EvalError) -> TranslationError {
        match error {
            EvalError::Undefined(name) => TranslationError::UndefinedReference {
                rule: rule.standard_name().to_string(),
                name,
            },
            EvalError::Shape { expected, actual } => TranslationError::ShapeMismatch {
                name: rule.native_name().to_string(),
                expected,
                actual,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, f64)]) -> ParameterSet {
        pairs.iter().map(|&(n, v)| (n, v)).collect()
    }

    #[test]
    fn test_duplicate_standard_name_rejected() {
        let result = TranslationTable::builder()
            .rename("a", "x")
            .scaled("a", "y", 2.0)
            .build();
        assert!(matches!(result, Err(TranslationError::MalformedRule(_))));
    }

    #[test]
    fn test_duplicate_native_name_rejected() {
        let result = TranslationTable::builder()
            .rename("a", "x")
            .rename("b", "x")
            .build();
        assert!(matches!(result, Err(TranslationError::MalformedRule(_))));
    }

    #[test]
    fn test_forward_may_reference_earlier_native() {
        let table = TranslationTable::builder()
            .computed("rate", "interval", "1000.0/rate", "1000.0/interval")
            .computed("duration", "number", "duration/interval", "number*interval")
            .build()
            .unwrap();
        let native = table
            .to_native(&params(&[("rate", 10.0), ("duration", 500.0)]), &ParameterSet::new())
            .unwrap();
        assert!(native
            .get("interval")
            .unwrap()
            .approx_eq(&ParameterValue::Scalar(100.0), 1e-12));
        assert!(native
            .get("number")
            .unwrap()
            .approx_eq(&ParameterValue::Scalar(5.0), 1e-12));
    }

    #[test]
    fn test_forward_referencing_later_native_fails_at_build() {
        // Same rules, inverse order: 'duration' now reads 'interval' before
        // the rule producing it
        let result = TranslationTable::builder()
            .computed("duration", "number", "duration/interval", "number*interval")
            .computed("rate", "interval", "1000.0/rate", "1000.0/interval")
            .build();
        assert_eq!(
            result.unwrap_err(),
            TranslationError::UndefinedReference {
                rule: "duration".to_string(),
                name: "interval".to_string(),
            }
        );
    }

    #[test]
    fn test_context_name_satisfies_static_check() {
        let table = TranslationTable::builder()
            .computed("g", "g_total", "g*membrane_area", "g_total/membrane_area")
            .context_name("membrane_area")
            .build()
            .unwrap();
        let mut context = ParameterSet::new();
        context.insert("membrane_area", 2.0);
        let native = table
            .to_native(&params(&[("g", 3.0)]), &context)
            .unwrap();
        assert_eq!(native.get("g_total"), Some(&ParameterValue::Scalar(6.0)));
        let standard = table.to_standard(&native, &context).unwrap();
        assert_eq!(standard.get("g"), Some(&ParameterValue::Scalar(3.0)));
    }

    #[test]
    fn test_undeclared_context_reference_fails_at_build() {
        let result = TranslationTable::builder()
            .computed("g", "g_total", "g*membrane_area", "g_total/membrane_area")
            .build();
        assert!(matches!(
            result,
            Err(TranslationError::UndefinedReference { .. })
        ));
    }

    #[test]
    fn test_missing_input_parameter() {
        let table = TranslationTable::builder().rename("a", "x").build().unwrap();
        let err = table
            .to_native(&ParameterSet::new(), &ParameterSet::new())
            .unwrap_err();
        assert_eq!(err, TranslationError::MissingParameter("a".to_string()));
    }

    #[test]
    fn test_affected_rules_transitive() {
        // b's forward reads a's native output; c is independent
        let table = TranslationTable::builder()
            .scaled("a", "x", 2.0)
            .computed("b", "y", "b+x", "y-x")
            .rename("c", "z")
            .build()
            .unwrap();
        assert_eq!(table.affected_rules(["a"]).unwrap(), vec![0, 1]);
        assert_eq!(table.affected_rules(["b"]).unwrap(), vec![1]);
        assert_eq!(table.affected_rules(["c"]).unwrap(), vec![2]);
    }

    #[test]
    fn test_affected_rules_unknown_name() {
        let table = TranslationTable::builder().rename("a", "x").build().unwrap();
        assert_eq!(
            table.affected_rules(["nope"]).unwrap_err(),
            TranslationError::UnknownParameter("nope".to_string())
        );
    }

    #[test]
    fn test_retranslate_subset_uses_previous_native_for_rest() {
        let table = TranslationTable::builder()
            .scaled("a", "x", 2.0)
            .computed("b", "y", "b+x", "y-x")
            .rename("c", "z")
            .build()
            .unwrap();
        let standard = params(&[("a", 1.0), ("b", 10.0), ("c", 5.0)]);
        let native = table.to_native(&standard, &ParameterSet::new()).unwrap();

        let updated_standard = params(&[("a", 3.0), ("b", 10.0), ("c", 5.0)]);
        let subset = table.affected_rules(["a"]).unwrap();
        let updated = table
            .retranslate_subset(&subset, &updated_standard, &native, &ParameterSet::new())
            .unwrap();

        // x = 6, y = b + x = 16; z untouched and absent from the result
        assert_eq!(updated.get("x"), Some(&ParameterValue::Scalar(6.0)));
        assert_eq!(updated.get("y"), Some(&ParameterValue::Scalar(16.0)));
        assert_eq!(updated.get("z"), None);
    }

    #[test]
    fn test_from_json_document() {
        let table = TranslationTable::from_json(
            r#"[
                ["w_max", "Wmax", 1000.0],
                ["A_plus", "lambda"]
            ]"#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        let native = table
            .to_native(&params(&[("w_max", 1.0), ("A_plus", 0.01)]), &ParameterSet::new())
            .unwrap();
        assert_eq!(native.get("Wmax"), Some(&ParameterValue::Scalar(1000.0)));
        assert_eq!(native.get("lambda"), Some(&ParameterValue::Scalar(0.01)));
    }
}
