// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-operator delegation rules.

use crate::PrecisionSet;
use graph_ir::graph::Validated;
use graph_ir::{op, Graph, Node};
use std::fmt;

/// Backend-specific legality check, evaluated after precision
/// classification succeeds. Must be a pure function of the node and
/// its graph neighbourhood.
pub type Constraint = fn(&Node, &Graph<Validated>) -> bool;

/// What a backend can do with one operator.
///
/// Rules are plain records keyed by canonical operator name; backends
/// differ only in which rules they register and with which constraints.
///
/// # Example
/// ```
/// use partitioner::{OperatorRule, PrecisionMode, PrecisionSet};
///
/// let add = OperatorRule::new("aten.add.Tensor", PrecisionSet::FP32 | PrecisionSet::STATIC_QUANT)
///     .with_fused_activations(&["relu.default"]);
/// assert_eq!(add.op(), "add");
/// assert!(add.fuses("relu"));
/// assert!(add.enabled().contains(PrecisionMode::StaticQuant));
/// ```
#[derive(Clone)]
pub struct OperatorRule {
    op: String,
    supported: PrecisionSet,
    enabled: PrecisionSet,
    fused_activations: Vec<String>,
    constraint: Option<Constraint>,
    multi_consumer: bool,
}

impl OperatorRule {
    /// Creates a rule for `target` (canonicalized) with every supported
    /// precision enabled.
    pub fn new(target: &str, supported: PrecisionSet) -> Self {
        Self {
            op: op::canonical_name(target).to_string(),
            supported,
            enabled: supported,
            fused_activations: Vec::new(),
            constraint: None,
            multi_consumer: false,
        }
    }

    /// Operators that may be folded into this one's quantized kernel.
    pub fn with_fused_activations(mut self, targets: &[&str]) -> Self {
        self.fused_activations = targets
            .iter()
            .map(|t| op::canonical_name(t).to_string())
            .collect();
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    /// Allows the quantized form to feed several quantize markers
    /// (cat-like operators). Activation fusion is not attempted then.
    pub fn multi_consumer(mut self) -> Self {
        self.multi_consumer = true;
        self
    }

    /// Canonical operator name this rule matches.
    pub fn op(&self) -> &str {
        &self.op
    }

    /// Precisions the backend kernel can execute.
    pub fn supported(&self) -> PrecisionSet {
        self.supported
    }

    /// Precisions the partitioner is allowed to use; a subset of
    /// [`Self::supported`].
    pub fn enabled(&self) -> PrecisionSet {
        self.enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: PrecisionSet) {
        self.enabled = enabled;
    }

    pub fn fused_activations(&self) -> &[String] {
        &self.fused_activations
    }

    /// Returns `true` if the canonical operator `op` can be fused.
    pub fn fuses(&self, op: &str) -> bool {
        self.fused_activations.iter().any(|f| f == op)
    }

    pub fn is_multi_consumer(&self) -> bool {
        self.multi_consumer
    }

    pub fn has_constraint(&self) -> bool {
        self.constraint.is_some()
    }

    /// Runs the legality predicate; rules without one accept every node.
    pub fn check_constraints(&self, node: &Node, graph: &Graph<Validated>) -> bool {
        self.constraint.map_or(true, |check| check(node, graph))
    }
}

impl fmt::Debug for OperatorRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorRule")
            .field("op", &self.op)
            .field("supported", &self.supported)
            .field("enabled", &self.enabled)
            .field("fused_activations", &self.fused_activations)
            .field("constraint", &self.constraint.is_some())
            .field("multi_consumer", &self.multi_consumer)
            .finish()
    }
}
