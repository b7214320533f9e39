// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The partitioner engine.
//!
//! Walks a validated graph once, in declaration order, and decides for
//! every node whether it is delegated to the backend or stays on the host.
//!
//! # Visit order
//!
//! Ordinary nodes are visited first. Quantization helpers (quantize and
//! dequantize markers, `choose_qparams` and its `getitem` projections) are
//! deferred to a trailing sweep, so the compute node they belong to can
//! claim them as part of its fusion group. Helpers nobody claimed are then
//! evaluated on their own.
//!
//! # Node states
//!
//! ```text
//! UNVISITED ──▶ DELEGATED   (anchor of a committed group, or absorbed)
//!           └─▶ REJECTED    (with a RejectReason)
//! ```
//!
//! A decision is final: absorbed nodes are not re-evaluated.
//!
//! # Merging
//!
//! Committing a group unions its members into one partition, then merges
//! in every delegated neighbour's partition unless the merged set would
//! feed an outside node that feeds back into it. Such merges are skipped
//! and the partitions stay separate.

use crate::fusion::{self, FusionGroup};
use crate::partition::{leaves_and_returns, PartitionSets};
use crate::precision::{self, Ineligible};
use crate::{PartitionMap, PrecisionMode, RuleRegistry};
use graph_ir::graph::Validated;
use graph_ir::{op, Graph, Node, NodeId};
use std::collections::HashSet;
use std::fmt;

/// Per-run options of a [`Partitioner`].
#[derive(Debug, Clone)]
pub struct PartitionOptions {
    /// Backend label carried into the [`PartitionMap`].
    pub backend: String,
    /// Node names never delegated.
    pub skip_node_ids: HashSet<String>,
    /// Canonical operator names never delegated.
    pub skip_ops: HashSet<String>,
    /// Whether nodes with symbolic output dims may be delegated.
    pub allow_dynamic_shapes: bool,
}

impl PartitionOptions {
    pub fn new(backend: &str) -> Self {
        Self {
            backend: backend.to_string(),
            skip_node_ids: HashSet::new(),
            skip_ops: HashSet::new(),
            allow_dynamic_shapes: true,
        }
    }

    pub fn with_skip_node_ids<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_node_ids.extend(names.into_iter().map(Into::into));
        self
    }

    /// Adds operators to skip; names are canonicalized.
    pub fn with_skip_ops<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.skip_ops.extend(
            targets
                .into_iter()
                .map(|t| op::canonical_name(t.as_ref()).to_string()),
        );
        self
    }

    pub fn with_dynamic_shapes(mut self, allow: bool) -> Self {
        self.allow_dynamic_shapes = allow;
        self
    }

    fn rejects_shape(&self, node: &Node) -> bool {
        !self.allow_dynamic_shapes && node.meta.as_ref().is_some_and(|m| !m.shape.is_static())
    }
}

impl Default for PartitionOptions {
    fn default() -> Self {
        Self::new("default")
    }
}

/// Why a node was left on the host.
///
/// None of these is an error: the node simply runs without acceleration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    /// Placeholders, constants and the output node.
    NotCallable,
    SkippedById,
    SkippedByOp,
    NoRule { op: String },
    /// Symbolic output dims on a backend without dynamic-shape support.
    DynamicShape,
    PrecisionNotEnabled { op: String, precision: PrecisionMode },
    BrokenQuantChain { op: String, detail: String },
    ConstraintFailed { op: String },
    /// A fusion group member was rejected, skipped, or has a dynamic shape.
    MemberUnavailable { member: NodeId },
    /// The group overlaps a partition it cannot join without a cycle.
    WouldCreateCycle { member: NodeId },
    /// The group feeds an outside node that feeds back into it.
    NonConvexGroup,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotCallable => write!(f, "not a call node"),
            Self::SkippedById => write!(f, "skipped by node name"),
            Self::SkippedByOp => write!(f, "skipped by operator"),
            Self::NoRule { op } => write!(f, "no rule for '{op}'"),
            Self::DynamicShape => write!(f, "dynamic output shape"),
            Self::PrecisionNotEnabled { op, precision } => {
                write!(f, "{precision} not enabled for '{op}'")
            }
            Self::BrokenQuantChain { op, detail } => {
                write!(f, "broken quantization chain at '{op}': {detail}")
            }
            Self::ConstraintFailed { op } => write!(f, "'{op}' constraint not satisfied"),
            Self::MemberUnavailable { member } => write!(f, "fusion member {member} unavailable"),
            Self::WouldCreateCycle { member } => {
                write!(f, "joining the partition of {member} would create a cycle")
            }
            Self::NonConvexGroup => {
                write!(f, "fusion group feeds an outside node that feeds back into it")
            }
        }
    }
}

/// Final decision for one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeDecision {
    Delegated {
        partition: usize,
        precision: PrecisionMode,
        /// Node whose fusion group brought this one in (itself for anchors).
        anchor: NodeId,
    },
    Rejected(RejectReason),
}

impl NodeDecision {
    pub fn is_delegated(&self) -> bool {
        matches!(self, Self::Delegated { .. })
    }
}

/// Result of one partitioning run.
#[derive(Debug, Clone)]
pub struct PartitionOutcome {
    pub map: PartitionMap,
    decisions: Vec<NodeDecision>,
}

impl PartitionOutcome {
    /// Decision for `node`.
    ///
    /// # Panics
    /// If `node` does not belong to the partitioned graph.
    pub fn decision(&self, node: NodeId) -> &NodeDecision {
        &self.decisions[node.index()]
    }

    /// All decisions, indexed by node id.
    pub fn decisions(&self) -> &[NodeDecision] {
        &self.decisions
    }

    /// Rejected call nodes with their reasons, in declaration order.
    pub fn rejected(&self) -> impl Iterator<Item = (NodeId, &RejectReason)> {
        self.decisions
            .iter()
            .enumerate()
            .filter_map(|(i, d)| match d {
                NodeDecision::Rejected(RejectReason::NotCallable) => None,
                NodeDecision::Rejected(reason) => Some((NodeId(i), reason)),
                NodeDecision::Delegated { .. } => None,
            })
    }

    pub fn summary(&self) -> String {
        format!(
            "{}, {} call nodes left on host",
            self.map.summary(),
            self.rejected().count(),
        )
    }
}

/// Splits a graph into backend partitions according to a rule registry.
///
/// # Example
/// ```
/// use graph_ir::{Arg, GraphBuilder};
/// use partitioner::{OperatorRule, PartitionOptions, Partitioner, PrecisionSet, RuleRegistry};
///
/// let mut b = GraphBuilder::new("g");
/// let x = b.placeholder("x");
/// let a = b.call("abs", "aten.abs.default", vec![Arg::Node(x)]);
/// let s = b.call("sin", "aten.sin.default", vec![Arg::Node(a)]);
/// b.output(vec![s]);
/// let graph = b.build().validate().unwrap();
///
/// let registry = RuleRegistry::builder()
///     .register(OperatorRule::new("abs", PrecisionSet::FP32))
///     .build()
///     .unwrap();
/// let outcome = Partitioner::new(registry, PartitionOptions::new("demo")).partition(&graph);
/// assert_eq!(outcome.map.partition_of(a), Some(0));
/// assert_eq!(outcome.map.partition_of(s), None);
/// ```
#[derive(Debug, Clone)]
pub struct Partitioner {
    registry: RuleRegistry,
    options: PartitionOptions,
}

impl Partitioner {
    pub fn new(registry: RuleRegistry, options: PartitionOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn options(&self) -> &PartitionOptions {
        &self.options
    }

    /// Evaluates `node` in isolation: skip lists, rule lookup, precision
    /// classification, legality constraint, and fusion expansion.
    ///
    /// Does not consider decisions already taken for other nodes.
    pub fn evaluate(
        &self,
        graph: &Graph<Validated>,
        node: &Node,
    ) -> Result<FusionGroup, RejectReason> {
        if !node.is_call() {
            return Err(RejectReason::NotCallable);
        }
        if self.options.skip_node_ids.contains(&node.name) {
            return Err(RejectReason::SkippedById);
        }
        let op = node.canonical_target().unwrap_or_default();
        if self.options.skip_ops.contains(op) {
            return Err(RejectReason::SkippedByOp);
        }
        let Some(rule) = self.registry.match_node(node) else {
            return Err(RejectReason::NoRule { op: op.to_string() });
        };
        if self.options.rejects_shape(node) {
            return Err(RejectReason::DynamicShape);
        }

        let pattern = precision::classify(graph, node, rule).map_err(|e| match e {
            Ineligible::PrecisionNotEnabled(precision) => RejectReason::PrecisionNotEnabled {
                op: op.to_string(),
                precision,
            },
            Ineligible::BrokenQuantChain(detail) => RejectReason::BrokenQuantChain {
                op: op.to_string(),
                detail,
            },
        })?;

        if !rule.check_constraints(node, graph) {
            return Err(RejectReason::ConstraintFailed { op: op.to_string() });
        }

        let group = fusion::expand(&pattern);
        for member in group.absorbed() {
            let m = graph.node(member);
            let skipped = self.options.skip_node_ids.contains(&m.name)
                || m.canonical_target().is_some_and(|t| self.options.skip_ops.contains(t));
            if skipped || self.options.rejects_shape(m) {
                return Err(RejectReason::MemberUnavailable { member });
            }
        }
        Ok(group)
    }

    /// Partitions `graph`. Never fails: unsupported nodes are rejected.
    pub fn partition(&self, graph: &Graph<Validated>) -> PartitionOutcome {
        let num_nodes = graph.num_nodes();
        let mut sets = PartitionSets::new(num_nodes);
        let mut state: Vec<Option<Visit>> = vec![None; num_nodes];

        let (deferred, leading): (Vec<&Node>, Vec<&Node>) =
            graph.iter_nodes().partition(|n| is_quant_helper(graph, n));

        for node in leading.into_iter().chain(deferred) {
            if state[node.id.index()].is_some() {
                continue;
            }

            let group = self
                .evaluate(graph, node)
                .and_then(|group| claimable(&state, &group).map(|()| group))
                .and_then(|group| commit(graph, &mut sets, &group).map(|()| group));

            match group {
                Ok(group) => {
                    tracing::debug!(
                        "{} '{}' delegated as {} with {} fused nodes",
                        node.id,
                        node.name,
                        group.precision,
                        group.len() - 1,
                    );
                    for &member in group.nodes() {
                        state[member.index()].get_or_insert(Visit::Delegated {
                            precision: group.precision,
                            anchor: group.anchor,
                        });
                    }
                }
                Err(reason) => {
                    if reason != RejectReason::NotCallable {
                        tracing::debug!("{} '{}' rejected: {reason}", node.id, node.name);
                    }
                    state[node.id.index()] = Some(Visit::Rejected(reason));
                }
            }
        }

        let map = sets.finish(&self.options.backend, graph);
        let decisions = state
            .into_iter()
            .enumerate()
            .map(|(i, visit)| match visit {
                Some(Visit::Delegated { precision, anchor }) => NodeDecision::Delegated {
                    partition: map.partition_of(NodeId(i)).unwrap_or_default(),
                    precision,
                    anchor,
                },
                Some(Visit::Rejected(reason)) => NodeDecision::Rejected(reason),
                None => NodeDecision::Rejected(RejectReason::NotCallable),
            })
            .collect();

        let outcome = PartitionOutcome { map, decisions };
        tracing::info!("graph '{}': {}", graph.name, outcome.summary());
        outcome
    }
}

#[derive(Debug, Clone)]
enum Visit {
    Delegated {
        precision: PrecisionMode,
        anchor: NodeId,
    },
    Rejected(RejectReason),
}

/// Quantize/dequantize markers and run-time parameter producers.
fn is_quant_helper(graph: &Graph<Validated>, node: &Node) -> bool {
    if !node.is_call() {
        return false;
    }
    let Some(target) = node.target.as_deref() else {
        return false;
    };
    if op::is_quant_marker(target) || op::is_choose_qparams(target) {
        return true;
    }
    op::is_getitem(target)
        && graph
            .input_nodes(node.id)
            .iter()
            .any(|&i| graph.node(i).target.as_deref().is_some_and(op::is_choose_qparams))
}

/// Fails if a member was already rejected.
fn claimable(state: &[Option<Visit>], group: &FusionGroup) -> Result<(), RejectReason> {
    match group
        .absorbed()
        .find(|m| matches!(state[m.index()], Some(Visit::Rejected(_))))
    {
        Some(member) => Err(RejectReason::MemberUnavailable { member }),
        None => Ok(()),
    }
}

/// Unions `group` into the partition sets and merges adjacent partitions.
fn commit(
    graph: &Graph<Validated>,
    sets: &mut PartitionSets,
    group: &FusionGroup,
) -> Result<(), RejectReason> {
    // A group must be convex on its own, e.g. a dequantize input that also
    // feeds a branch rejoining the anchor cannot be lowered with it.
    if leaves_and_returns(graph, group.nodes()) {
        return Err(RejectReason::NonConvexGroup);
    }

    // Members already owned by a partition force a merge with it; refuse
    // the group if that merge is not convex.
    let overlapping: Vec<NodeId> = group
        .nodes()
        .iter()
        .copied()
        .filter(|&m| sets.is_delegated(m))
        .collect();
    if let Some(&first) = overlapping.first() {
        let mut candidate = group.nodes().to_vec();
        let mut roots = HashSet::new();
        for &m in &overlapping {
            if roots.insert(sets.find(m)) {
                candidate.extend_from_slice(sets.members_of(m));
            }
        }
        candidate.sort_unstable();
        candidate.dedup();
        if leaves_and_returns(graph, &candidate) {
            return Err(RejectReason::WouldCreateCycle { member: first });
        }
    }

    for &m in group.nodes() {
        sets.mark_delegated(m);
        sets.union(group.anchor, m);
    }

    for &m in group.nodes() {
        let neighbours = graph
            .input_nodes(m)
            .into_iter()
            .chain(graph.users(m).iter().copied());
        for n in neighbours {
            if !sets.is_delegated(n) || sets.find(n) == sets.find(m) {
                continue;
            }
            let mut candidate = sets.members_of(m).to_vec();
            candidate.extend_from_slice(sets.members_of(n));
            if leaves_and_returns(graph, &candidate) {
                tracing::debug!("not merging partitions of {m} and {n}: would create a cycle");
                continue;
            }
            sets.union(m, n);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OperatorRule, PrecisionSet};
    use graph_ir::{Arg, DType, Dim, GraphBuilder, Shape, TensorMeta};

    const DQ: &str = "quantized_decomposed.dequantize_per_tensor.default";
    const Q: &str = "quantized_decomposed.quantize_per_tensor.default";

    fn qargs(input: NodeId) -> Vec<Arg> {
        vec![input.into(), Arg::Float(0.05), Arg::Int(0), Arg::Int(-128), Arg::Int(127)]
    }

    fn registry() -> RuleRegistry {
        RuleRegistry::builder()
            .register(
                OperatorRule::new("add.Tensor", PrecisionSet::FP32 | PrecisionSet::STATIC_QUANT)
                    .with_fused_activations(&["relu.default"]),
            )
            .register(OperatorRule::new("relu.default", PrecisionSet::FP32 | PrecisionSet::STATIC_QUANT))
            .register(OperatorRule::new("abs.default", PrecisionSet::FP32))
            .register(OperatorRule::new(Q, PrecisionSet::STATIC_QUANT))
            .register(OperatorRule::new(DQ, PrecisionSet::STATIC_QUANT))
            .build()
            .unwrap()
    }

    fn run(graph: &Graph<Validated>, options: PartitionOptions) -> PartitionOutcome {
        let outcome = Partitioner::new(registry(), options).partition(graph);
        outcome.map.validate(graph).unwrap();
        outcome
    }

    /// x, y ─▶ q ─▶ dq ─▶ add ─▶ relu ─▶ q
    fn quantized_add() -> (Graph<Validated>, Vec<NodeId>) {
        let mut b = GraphBuilder::new("qadd");
        let x = b.placeholder("x");
        let y = b.placeholder("y");
        let qx = b.call("qx", Q, qargs(x));
        let qy = b.call("qy", Q, qargs(y));
        let dx = b.call("dx", DQ, qargs(qx));
        let dy = b.call("dy", DQ, qargs(qy));
        let add = b.call("add", "aten.add.Tensor", vec![dx.into(), dy.into()]);
        let relu = b.call("relu", "aten.relu.default", vec![add.into()]);
        let qo = b.call("qo", Q, qargs(relu));
        b.output(vec![qo]);
        let g = b.build().validate().unwrap();
        (g, vec![qx, qy, dx, dy, add, relu, qo])
    }

    #[test]
    fn test_quantized_group_in_one_partition() {
        let (g, ids) = quantized_add();
        let [qx, qy, dx, dy, add, relu, qo] = ids[..] else { unreachable!() };
        let outcome = run(&g, PartitionOptions::new("test"));

        let p = outcome.map.partition_of(add).unwrap();
        for id in [dx, dy, relu, qo] {
            assert_eq!(outcome.map.partition_of(id), Some(p));
            assert_eq!(
                outcome.decision(id),
                &NodeDecision::Delegated {
                    partition: p,
                    precision: PrecisionMode::StaticQuant,
                    anchor: add,
                }
            );
        }
        // The input quantize markers are delegated on their own and merged in.
        assert_eq!(outcome.map.partition_of(qx), Some(p));
        assert_eq!(outcome.map.partition_of(qy), Some(p));
        assert_eq!(outcome.map.num_partitions(), 1);
        assert_eq!(outcome.rejected().count(), 0);
    }

    #[test]
    fn test_skipped_member_rejects_anchor() {
        let (g, ids) = quantized_add();
        let add = ids[4];
        let relu = ids[5];
        let outcome = run(&g, PartitionOptions::new("test").with_skip_node_ids(["relu"]));
        assert_eq!(
            outcome.decision(add),
            &NodeDecision::Rejected(RejectReason::MemberUnavailable { member: relu })
        );
        assert_eq!(
            outcome.decision(relu),
            &NodeDecision::Rejected(RejectReason::SkippedById)
        );
    }

    #[test]
    fn test_skip_ops_canonicalized() {
        let (g, ids) = quantized_add();
        let outcome = run(
            &g,
            PartitionOptions::new("test").with_skip_ops(["exir_ops.edge.aten.add.Tensor"]),
        );
        assert_eq!(
            outcome.decision(ids[4]),
            &NodeDecision::Rejected(RejectReason::SkippedByOp)
        );
        // Unclaimed markers fall back to standalone quantized ops.
        assert!(outcome.decision(ids[2]).is_delegated());
    }

    #[test]
    fn test_fp32_chain_merges_and_no_rule_splits() {
        let mut b = GraphBuilder::new("chain");
        let x = b.placeholder("x");
        let a = b.call("a", "aten.abs.default", vec![x.into()]);
        let r = b.call("r", "aten.relu.default", vec![a.into()]);
        let s = b.call("s", "aten.sin.default", vec![r.into()]);
        let c = b.call("c", "aten.abs.default", vec![s.into()]);
        b.output(vec![c]);
        let g = b.build().validate().unwrap();

        let outcome = run(&g, PartitionOptions::new("test"));
        assert_eq!(outcome.map.num_partitions(), 2);
        assert_eq!(outcome.map.partition_of(a), Some(0));
        assert_eq!(outcome.map.partition_of(r), Some(0));
        assert_eq!(outcome.map.partition_of(c), Some(1));
        assert_eq!(
            outcome.decision(s),
            &NodeDecision::Rejected(RejectReason::NoRule { op: "sin".into() })
        );
        assert_eq!(
            outcome.decision(x),
            &NodeDecision::Rejected(RejectReason::NotCallable)
        );
        assert_eq!(outcome.rejected().count(), 1);
    }

    #[test]
    fn test_merge_refused_when_it_would_create_cycle() {
        // a ─▶ sin ─▶ add, a ─▶ add: a and add must not share a partition.
        let mut b = GraphBuilder::new("diamond");
        let x = b.placeholder("x");
        let a = b.call("a", "aten.abs.default", vec![x.into()]);
        let s = b.call("s", "aten.sin.default", vec![a.into()]);
        let add = b.call("add", "aten.add.Tensor", vec![a.into(), s.into()]);
        b.output(vec![add]);
        let g = b.build().validate().unwrap();

        let outcome = run(&g, PartitionOptions::new("test"));
        assert_eq!(outcome.map.num_partitions(), 2);
        assert_ne!(outcome.map.partition_of(a), outcome.map.partition_of(add));
    }

    #[test]
    fn test_group_with_shared_dequant_input_rejected() {
        // d1 feeds both add and a sin branch that re-enters add through d2.
        let mut b = GraphBuilder::new("residual");
        let x = b.placeholder("x");
        let qx = b.call("qx", Q, qargs(x));
        let d1 = b.call("d1", DQ, qargs(qx));
        let s = b.call("s", "aten.sin.default", vec![d1.into()]);
        let qs = b.call("qs", Q, qargs(s));
        let d2 = b.call("d2", DQ, qargs(qs));
        let add = b.call("add", "aten.add.Tensor", vec![d1.into(), d2.into()]);
        let qo = b.call("qo", Q, qargs(add));
        b.output(vec![qo]);
        let g = b.build().validate().unwrap();

        let outcome = run(&g, PartitionOptions::new("test"));
        assert_eq!(
            outcome.decision(add),
            &NodeDecision::Rejected(RejectReason::NonConvexGroup)
        );
        // The markers fall back to standalone delegation without joining
        // across the host-side sin.
        assert!(outcome.decision(d1).is_delegated());
        assert!(outcome.decision(d2).is_delegated());
        assert_ne!(outcome.map.partition_of(d1), outcome.map.partition_of(d2));
    }

    #[test]
    fn test_dynamic_shape_rejected_when_disallowed() {
        let mut b = GraphBuilder::new("dyn");
        let x = b.placeholder("x");
        let meta = TensorMeta::new(
            Shape::from_dims(vec![Dim::Symbolic("batch".into()), Dim::Fixed(8)]),
            DType::F32,
        );
        let a = b.call_with_meta("a", "aten.abs.default", vec![x.into()], meta);
        b.output(vec![a]);
        let g = b.build().validate().unwrap();

        let allowed = run(&g, PartitionOptions::new("test"));
        assert!(allowed.decision(a).is_delegated());

        let refused = run(&g, PartitionOptions::new("test").with_dynamic_shapes(false));
        assert_eq!(
            refused.decision(a),
            &NodeDecision::Rejected(RejectReason::DynamicShape)
        );
        assert_eq!(refused.map.num_partitions(), 0);
    }

    #[test]
    fn test_precision_not_enabled() {
        // abs only runs fp32, but here its inputs are all dequantized.
        let mut b = GraphBuilder::new("qabs");
        let x = b.placeholder("x");
        let q = b.call("q", Q, qargs(x));
        let dq = b.call("dq", DQ, qargs(q));
        let a = b.call("a", "aten.abs.default", vec![dq.into()]);
        let qo = b.call("qo", Q, qargs(a));
        b.output(vec![qo]);
        let g = b.build().validate().unwrap();

        let outcome = run(&g, PartitionOptions::new("test"));
        assert_eq!(
            outcome.decision(a),
            &NodeDecision::Rejected(RejectReason::PrecisionNotEnabled {
                op: "abs".into(),
                precision: PrecisionMode::StaticQuant,
            })
        );
    }

    #[test]
    fn test_deterministic() {
        let (g, _) = quantized_add();
        let first = run(&g, PartitionOptions::new("test"));
        let second = run(&g, PartitionOptions::new("test"));
        assert_eq!(first.map.partitions(), second.map.partitions());
        assert_eq!(first.decisions(), second.decisions());
    }

    #[test]
    fn test_summary() {
        let (g, _) = quantized_add();
        let s = run(&g, PartitionOptions::new("test")).summary();
        assert!(s.contains("1 partitions"));
        assert!(s.contains("0 call nodes left on host"));
    }
}
