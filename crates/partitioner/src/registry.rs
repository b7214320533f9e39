// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The operator rule registry.
//!
//! A registry maps canonical operator names to [`OperatorRule`]s. It is
//! assembled once per backend through [`RegistryBuilder`], which is where
//! every configuration error surfaces; matching itself never fails.

use crate::{OperatorRule, PartitionError, PrecisionSet};
use graph_ir::{op, Node};
use std::collections::HashMap;

/// Rules keyed by canonical operator name.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, OperatorRule>,
}

impl RuleRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Returns the rule for `node`'s operator, if any.
    ///
    /// Non-call nodes never match.
    pub fn match_node(&self, node: &Node) -> Option<&OperatorRule> {
        if !node.is_call() {
            return None;
        }
        node.canonical_target().and_then(|op| self.rules.get(op))
    }

    /// Looks up a rule by (possibly qualified) operator name.
    pub fn get(&self, target: &str) -> Option<&OperatorRule> {
        self.rules.get(op::canonical_name(target))
    }

    pub fn contains(&self, target: &str) -> bool {
        self.get(target).is_some()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Registered operator names, sorted.
    pub fn ops(&self) -> Vec<&str> {
        let mut ops: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        ops.sort_unstable();
        ops
    }

    /// Rules sorted by operator name.
    pub fn iter(&self) -> impl Iterator<Item = &OperatorRule> {
        let mut rules: Vec<&OperatorRule> = self.rules.values().collect();
        rules.sort_unstable_by(|a, b| a.op().cmp(b.op()));
        rules.into_iter()
    }
}

/// Collects rules and precision overrides, then checks them all at once.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    rules: Vec<OperatorRule>,
    overrides: Vec<(String, PrecisionSet)>,
    restriction: Option<PrecisionSet>,
}

impl RegistryBuilder {
    pub fn register(mut self, rule: OperatorRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn extend(mut self, rules: impl IntoIterator<Item = OperatorRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Sets the enabled precisions of one operator's rule.
    ///
    /// Every mode must be supported by the rule; checked in [`Self::build`].
    pub fn enable_precisions(mut self, target: &str, enabled: PrecisionSet) -> Self {
        self.overrides
            .push((op::canonical_name(target).to_string(), enabled));
        self
    }

    /// Limits every rule to `allowed` precisions. Rules left with nothing
    /// enabled are dropped rather than reported, since the restriction
    /// comes from the backend and not from a per-operator request.
    pub fn restrict_precisions(mut self, allowed: PrecisionSet) -> Self {
        self.restriction = Some(match self.restriction {
            Some(current) => current.intersection(allowed),
            None => allowed,
        });
        self
    }

    /// Validates and freezes the registry.
    ///
    /// # Errors
    /// - [`PartitionError::DuplicateRule`] if two rules share an operator.
    /// - [`PartitionError::UnknownRule`] if an override names no rule.
    /// - [`PartitionError::UnsupportedPrecision`] if an override enables a
    ///   mode the rule does not support.
    /// - [`PartitionError::NoEnabledPrecision`] if an override is empty.
    pub fn build(self) -> Result<RuleRegistry, PartitionError> {
        let mut rules: HashMap<String, OperatorRule> = HashMap::with_capacity(self.rules.len());
        for rule in self.rules {
            if rules.contains_key(rule.op()) {
                return Err(PartitionError::DuplicateRule {
                    op: rule.op().to_string(),
                });
            }
            rules.insert(rule.op().to_string(), rule);
        }

        for (op, enabled) in self.overrides {
            let rule = rules
                .get_mut(&op)
                .ok_or_else(|| PartitionError::UnknownRule { op: op.clone() })?;
            if let Some(precision) = enabled.iter().find(|m| !rule.supported().contains(*m)) {
                return Err(PartitionError::UnsupportedPrecision { op, precision });
            }
            if enabled.is_empty() {
                return Err(PartitionError::NoEnabledPrecision { op });
            }
            rule.set_enabled(enabled);
        }

        if let Some(allowed) = self.restriction {
            rules.retain(|op, rule| {
                let enabled = rule.enabled().intersection(allowed);
                if enabled.is_empty() {
                    tracing::debug!("dropping rule '{op}': none of {allowed} enabled");
                    return false;
                }
                rule.set_enabled(enabled);
                true
            });
        }

        Ok(RuleRegistry { rules })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PrecisionMode;
    use graph_ir::{Arg, GraphBuilder};

    fn sample() -> RegistryBuilder {
        RuleRegistry::builder()
            .register(OperatorRule::new("add.Tensor", PrecisionSet::FP32 | PrecisionSet::STATIC_QUANT))
            .register(OperatorRule::new("abs.default", PrecisionSet::FP32))
            .register(OperatorRule::new("linear.default", PrecisionSet::ALL))
    }

    #[test]
    fn test_build_and_lookup() {
        let r = sample().build().unwrap();
        assert_eq!(r.len(), 3);
        assert!(r.contains("exir_ops.edge.aten.add.Tensor"));
        assert!(r.contains("abs"));
        assert!(!r.contains("mul"));
        assert_eq!(r.ops(), vec!["abs", "add", "linear"]);
        let ops: Vec<&str> = r.iter().map(|rule| rule.op()).collect();
        assert_eq!(ops, vec!["abs", "add", "linear"]);
    }

    #[test]
    fn test_duplicate_rule_after_canonicalization() {
        let err = sample()
            .register(OperatorRule::new("aten.add.Scalar", PrecisionSet::FP32))
            .build()
            .unwrap_err();
        assert!(matches!(err, PartitionError::DuplicateRule { op } if op == "add"));
    }

    #[test]
    fn test_enable_precisions_subset() {
        let r = sample()
            .enable_precisions("add", PrecisionSet::FP32)
            .build()
            .unwrap();
        assert_eq!(r.get("add").unwrap().enabled(), PrecisionSet::FP32);
        assert_eq!(
            r.get("add").unwrap().supported(),
            PrecisionSet::FP32 | PrecisionSet::STATIC_QUANT
        );
    }

    #[test]
    fn test_enable_unsupported_precision() {
        let err = sample()
            .enable_precisions("abs", PrecisionSet::STATIC_QUANT)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            PartitionError::UnsupportedPrecision { precision: PrecisionMode::StaticQuant, .. }
        ));
    }

    #[test]
    fn test_enable_unknown_rule() {
        let err = sample()
            .enable_precisions("conv2d", PrecisionSet::FP32)
            .build()
            .unwrap_err();
        assert!(matches!(err, PartitionError::UnknownRule { .. }));
    }

    #[test]
    fn test_enable_empty_set() {
        let err = sample()
            .enable_precisions("add", PrecisionSet::EMPTY)
            .build()
            .unwrap_err();
        assert!(matches!(err, PartitionError::NoEnabledPrecision { .. }));
    }

    #[test]
    fn test_restrict_drops_rules() {
        let r = sample()
            .restrict_precisions(PrecisionSet::DYNAMIC_QUANT)
            .build()
            .unwrap();
        assert_eq!(r.ops(), vec!["linear"]);
        assert_eq!(r.get("linear").unwrap().enabled(), PrecisionSet::DYNAMIC_QUANT);
    }

    #[test]
    fn test_match_node() {
        let mut b = GraphBuilder::new("m");
        let x = b.placeholder("x");
        let a = b.call("abs", "exir_ops.edge.aten.abs.default", vec![Arg::Node(x)]);
        let s = b.call("sig", "aten.sigmoid.default", vec![Arg::Node(a)]);
        let g = b.build().validate().unwrap();

        let r = sample().build().unwrap();
        assert_eq!(r.match_node(g.node(a)).map(|rule| rule.op()), Some("abs"));
        assert!(r.match_node(g.node(s)).is_none());
        assert!(r.match_node(g.node(x)).is_none());
    }
}
