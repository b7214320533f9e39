// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Precision classification.
//!
//! Decides whether a node runs as plain floating point or as part of a
//! quantized kernel, by looking at the quantize/dequantize markers around
//! it. The walk is bounded to three stages:
//!
//! ```text
//! dequantize inputs ─▶ node ─▶ [fused activation] ─▶ quantize output
//! ```
//!
//! A node whose inputs are only *partly* dequantized simply runs as fp32.
//! A node whose inputs are all dequantized but whose output chain does not
//! end in a quantize marker is a broken pattern and is not delegated.

use crate::OperatorRule;
use graph_ir::graph::Validated;
use graph_ir::{op, Graph, Node, NodeId};
use std::fmt;
use std::ops::BitOr;

/// Numeric execution mode of a node or fusion group.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PrecisionMode {
    /// Plain floating point.
    Fp32,
    /// Quantized with parameters fixed at export time.
    StaticQuant,
    /// Quantized with parameters chosen at run time (`choose_qparams`).
    DynamicQuant,
}

impl PrecisionMode {
    pub const ALL: [PrecisionMode; 3] = [Self::Fp32, Self::StaticQuant, Self::DynamicQuant];

    /// Parses a precision name, accepting a few common spellings.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "fp32" | "float" | "float32" => Some(Self::Fp32),
            "static_quant" | "static" | "qs8" => Some(Self::StaticQuant),
            "dynamic_quant" | "dynamic" | "qd8" => Some(Self::DynamicQuant),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fp32 => "fp32",
            Self::StaticQuant => "static_quant",
            Self::DynamicQuant => "dynamic_quant",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Self::Fp32 => 0b001,
            Self::StaticQuant => 0b010,
            Self::DynamicQuant => 0b100,
        }
    }
}

impl fmt::Display for PrecisionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of [`PrecisionMode`]s.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PrecisionSet(u8);

impl PrecisionSet {
    pub const EMPTY: Self = Self(0);
    pub const FP32: Self = Self(0b001);
    pub const STATIC_QUANT: Self = Self(0b010);
    pub const DYNAMIC_QUANT: Self = Self(0b100);
    pub const ALL: Self = Self(0b111);

    pub fn contains(self, mode: PrecisionMode) -> bool {
        self.0 & mode.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_subset(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Modes in the set, in declaration order.
    pub fn iter(self) -> impl Iterator<Item = PrecisionMode> {
        PrecisionMode::ALL.into_iter().filter(move |m| self.contains(*m))
    }
}

impl BitOr for PrecisionSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl From<PrecisionMode> for PrecisionSet {
    fn from(mode: PrecisionMode) -> Self {
        Self(mode.bit())
    }
}

impl FromIterator<PrecisionMode> for PrecisionSet {
    fn from_iter<I: IntoIterator<Item = PrecisionMode>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, |acc, m| acc | m.into())
    }
}

impl fmt::Debug for PrecisionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for PrecisionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|m| m.as_str()).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

/// The quantization pattern detected around an anchor node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantPattern {
    pub anchor: NodeId,
    pub precision: PrecisionMode,
    /// Dequantize markers feeding the anchor (empty for fp32).
    pub dequant_inputs: Vec<NodeId>,
    /// Activation folded into the quantized kernel, if any.
    pub fused_activation: Option<NodeId>,
    /// Quantize markers consuming the (possibly fused) output.
    pub quant_outputs: Vec<NodeId>,
    /// Producers of run-time quantization parameters (dynamic mode only).
    pub dynamic_chain: Vec<NodeId>,
}

impl QuantPattern {
    fn single(anchor: NodeId, precision: PrecisionMode) -> Self {
        Self {
            anchor,
            precision,
            dequant_inputs: Vec::new(),
            fused_activation: None,
            quant_outputs: Vec::new(),
            dynamic_chain: Vec::new(),
        }
    }
}

/// Why a node failed classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ineligible {
    /// The detected mode is not enabled on the node's rule.
    PrecisionNotEnabled(PrecisionMode),
    /// All inputs are dequantized but the output chain is malformed.
    BrokenQuantChain(String),
}

/// Classifies `node` under `rule`.
///
/// The returned pattern's precision is always enabled on the rule.
pub fn classify(
    graph: &Graph<Validated>,
    node: &Node,
    rule: &OperatorRule,
) -> Result<QuantPattern, Ineligible> {
    let pattern = detect(graph, node, rule)?;
    if !rule.enabled().contains(pattern.precision) {
        return Err(Ineligible::PrecisionNotEnabled(pattern.precision));
    }
    Ok(pattern)
}

fn detect(
    graph: &Graph<Validated>,
    node: &Node,
    rule: &OperatorRule,
) -> Result<QuantPattern, Ineligible> {
    // Stray markers are delegated on their own as quantized ops.
    if node.is_quant_marker() {
        return Ok(QuantPattern::single(node.id, PrecisionMode::StaticQuant));
    }

    let inputs = graph.input_nodes(node.id);
    let users = graph.users(node.id);

    let touches_markers = inputs.iter().any(|&i| graph.node(i).is_quant_marker())
        || users.iter().any(|&u| graph.node(u).is_quantize());
    if !touches_markers {
        return Ok(QuantPattern::single(node.id, PrecisionMode::Fp32));
    }

    if inputs.is_empty() || !inputs.iter().all(|&i| graph.node(i).is_dequantize()) {
        return Ok(QuantPattern::single(node.id, PrecisionMode::Fp32));
    }

    let dynamic_chain = dynamic_chain(graph, &inputs);
    if !dynamic_chain.is_empty() {
        return Ok(QuantPattern {
            anchor: node.id,
            precision: PrecisionMode::DynamicQuant,
            dequant_inputs: inputs,
            fused_activation: None,
            quant_outputs: Vec::new(),
            dynamic_chain,
        });
    }

    let (fused_activation, quant_outputs) = quantized_outputs(graph, node, rule)?;
    Ok(QuantPattern {
        anchor: node.id,
        precision: PrecisionMode::StaticQuant,
        dequant_inputs: inputs,
        fused_activation,
        quant_outputs,
        dynamic_chain: Vec::new(),
    })
}

/// Walks `node → [fused activation] → quantize`.
fn quantized_outputs(
    graph: &Graph<Validated>,
    node: &Node,
    rule: &OperatorRule,
) -> Result<(Option<NodeId>, Vec<NodeId>), Ineligible> {
    let users = graph.users(node.id);

    if rule.is_multi_consumer() && users.len() > 1 {
        if users.iter().all(|&u| graph.node(u).is_quantize()) {
            return Ok((None, users.to_vec()));
        }
        return Err(Ineligible::BrokenQuantChain(format!(
            "'{}' has {} consumers that are not all quantize markers",
            node.name,
            users.len(),
        )));
    }

    let [first] = users else {
        return Err(Ineligible::BrokenQuantChain(format!(
            "'{}' has {} consumers, expected exactly one",
            node.name,
            users.len(),
        )));
    };

    let mut output = *first;
    let mut fused = None;
    let candidate = graph.node(output);
    if candidate.is_call() && candidate.canonical_target().is_some_and(|t| rule.fuses(t)) {
        fused = Some(output);
        if let [next] = graph.users(output) {
            output = *next;
        }
    }

    if !graph.node(output).is_quantize() {
        return Err(Ineligible::BrokenQuantChain(format!(
            "'{}' output feeds '{}' instead of a quantize marker",
            node.name,
            graph.node(output).name,
        )));
    }

    Ok((fused, vec![output]))
}

/// Collects the run-time quantization chain behind the dequantize inputs.
///
/// For each dequantize input, looks one level up for `choose_qparams`
/// (directly or through a `getitem` projection) among its own inputs and
/// the inputs of the quantize marker that produced it. Returns an empty
/// list when every dequantize input uses export-time parameters.
fn dynamic_chain(graph: &Graph<Validated>, dequant_inputs: &[NodeId]) -> Vec<NodeId> {
    let mut chain = Vec::new();

    for &dq in dequant_inputs {
        let mut producers = Vec::new();
        let mut qparams = Vec::new();
        for input in graph.input_nodes(dq) {
            if graph.node(input).is_quantize() {
                producers.push(input);
                for q_input in graph.input_nodes(input) {
                    qparams_source(graph, q_input, &mut qparams);
                }
            } else {
                qparams_source(graph, input, &mut qparams);
            }
        }
        if !qparams.is_empty() {
            chain.extend(producers);
            chain.extend(qparams);
        }
    }

    let mut seen = std::collections::HashSet::new();
    chain.retain(|id| seen.insert(*id));
    chain
}

fn qparams_source(graph: &Graph<Validated>, id: NodeId, found: &mut Vec<NodeId>) {
    let Some(target) = graph.node(id).target.as_deref() else {
        return;
    };
    if op::is_choose_qparams(target) {
        found.push(id);
    } else if op::is_getitem(target) {
        let sources: Vec<NodeId> = graph
            .input_nodes(id)
            .into_iter()
            .filter(|&s| graph.node(s).target.as_deref().is_some_and(op::is_choose_qparams))
            .collect();
        if !sources.is_empty() {
            found.push(id);
            found.extend(sources);
        }
    }
}
