// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Graph nodes and their arguments.
//!
//! A [`Node`] is immutable once the graph is built. It references its
//! inputs by [`NodeId`] through its arguments; consumers are tracked by
//! the validated [`crate::Graph`], never by the node itself.

use crate::op;
use crate::TensorMeta;
use std::collections::BTreeMap;
use std::fmt;

/// Index of a node in graph declaration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// What role a node plays in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A graph input.
    Placeholder,
    /// A parameter or constant buffer.
    GetAttr,
    /// An operator invocation; the only kind eligible for delegation.
    CallFunction,
    /// The graph's return value.
    Output,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Placeholder => "placeholder",
            Self::GetAttr => "get_attr",
            Self::CallFunction => "call_function",
            Self::Output => "output",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A positional or keyword argument of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A reference to another node's output.
    Node(NodeId),
    List(Vec<Arg>),
}

impl Arg {
    pub fn is_none(&self) -> bool {
        matches!(self, Arg::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Arg::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Arg::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Arg::Node(id) => Some(*id),
            _ => None,
        }
    }

    /// Interprets the argument as a list of integers (e.g. `kernel_size`).
    ///
    /// A bare integer is accepted as a one-element list.
    pub fn as_int_list(&self) -> Option<Vec<i64>> {
        match self {
            Arg::Int(i) => Some(vec![*i]),
            Arg::List(items) => items.iter().map(Arg::as_int).collect(),
            _ => None,
        }
    }

    /// Appends every node referenced by this argument, recursing into lists.
    fn collect_refs(&self, out: &mut Vec<NodeId>) {
        match self {
            Arg::Node(id) => out.push(*id),
            Arg::List(items) => items.iter().for_each(|a| a.collect_refs(out)),
            _ => {}
        }
    }
}

impl From<NodeId> for Arg {
    fn from(id: NodeId) -> Self {
        Arg::Node(id)
    }
}

/// One operation in the data-flow graph.
#[derive(Debug, Clone)]
pub struct Node {
    /// Position in declaration order.
    pub id: NodeId,
    /// Unique, human-readable name (e.g. `"aten_add_tensor_3"`).
    pub name: String,
    pub kind: NodeKind,
    /// Operator target for `call_function` nodes, as emitted by the exporter.
    pub target: Option<String>,
    /// Ordered positional arguments.
    pub args: Vec<Arg>,
    /// Keyword arguments.
    pub kwargs: BTreeMap<String, Arg>,
    /// Inferred output metadata, when the exporter recorded it.
    pub meta: Option<TensorMeta>,
}

impl Node {
    /// Returns `true` if this node invokes an operator.
    pub fn is_call(&self) -> bool {
        self.kind == NodeKind::CallFunction
    }

    /// Returns the canonical operator name, for call nodes.
    pub fn canonical_target(&self) -> Option<&str> {
        self.target.as_deref().map(op::canonical_name)
    }

    /// Returns `true` if this is a call to a quantize marker.
    pub fn is_quantize(&self) -> bool {
        self.is_call() && self.target.as_deref().is_some_and(op::is_quantize)
    }

    /// Returns `true` if this is a call to a dequantize marker.
    pub fn is_dequantize(&self) -> bool {
        self.is_call() && self.target.as_deref().is_some_and(op::is_dequantize)
    }

    /// Returns `true` if this is either kind of quantization marker.
    pub fn is_quant_marker(&self) -> bool {
        self.is_quantize() || self.is_dequantize()
    }

    /// Distinct input nodes, positional arguments first, in first-seen order.
    pub fn input_ids(&self) -> Vec<NodeId> {
        let mut refs = Vec::new();
        for arg in self.args.iter().chain(self.kwargs.values()) {
            arg.collect_refs(&mut refs);
        }
        let mut seen = std::collections::HashSet::new();
        refs.retain(|id| seen.insert(*id));
        refs
    }

    /// Returns the positional argument at `index`, falling back to the
    /// keyword argument `name` when the positional one was omitted.
    pub fn arg_or_kwarg(&self, index: usize, name: &str) -> Option<&Arg> {
        self.args.get(index).or_else(|| self.kwargs.get(name))
    }

    /// Returns a concise summary string for display.
    pub fn summary(&self) -> String {
        let target = self.target.as_deref().unwrap_or("-");
        let meta = self
            .meta
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "?".into());
        let inputs: Vec<usize> = self.input_ids().iter().map(|i| i.0).collect();
        format!(
            "{} {} ({}) {} <- {:?} : {}",
            self.id, self.name, self.kind, target, inputs, meta,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(id: usize, target: &str, args: Vec<Arg>) -> Node {
        Node {
            id: NodeId(id),
            name: format!("n{id}"),
            kind: NodeKind::CallFunction,
            target: Some(target.into()),
            args,
            kwargs: BTreeMap::new(),
            meta: None,
        }
    }

    #[test]
    fn test_input_ids_dedup_and_order() {
        let n = call(
            3,
            "aten.cat.default",
            vec![
                Arg::List(vec![Arg::Node(NodeId(2)), Arg::Node(NodeId(0)), Arg::Node(NodeId(2))]),
                Arg::Int(1),
            ],
        );
        assert_eq!(n.input_ids(), vec![NodeId(2), NodeId(0)]);
    }

    #[test]
    fn test_input_ids_include_kwargs() {
        let mut n = call(2, "aten.add.Tensor", vec![Arg::Node(NodeId(0))]);
        n.kwargs.insert("other".into(), Arg::Node(NodeId(1)));
        assert_eq!(n.input_ids(), vec![NodeId(0), NodeId(1)]);
    }

    #[test]
    fn test_arg_or_kwarg() {
        let mut n = call(1, "aten.max_pool2d.default", vec![Arg::Node(NodeId(0))]);
        n.kwargs.insert("ceil_mode".into(), Arg::Bool(true));
        assert_eq!(n.arg_or_kwarg(5, "ceil_mode"), Some(&Arg::Bool(true)));
        assert_eq!(n.arg_or_kwarg(0, "input"), Some(&Arg::Node(NodeId(0))));
        assert_eq!(n.arg_or_kwarg(4, "dilation"), None);
    }

    #[test]
    fn test_marker_detection() {
        let q = call(1, "quantized_decomposed.quantize_per_tensor.default", vec![]);
        let dq = call(2, "quantized_decomposed.dequantize_per_tensor.default", vec![]);
        assert!(q.is_quantize() && !q.is_dequantize());
        assert!(dq.is_dequantize() && dq.is_quant_marker());

        let mut placeholder = call(0, "quantize_per_tensor", vec![]);
        placeholder.kind = NodeKind::Placeholder;
        assert!(!placeholder.is_quantize());
    }

    #[test]
    fn test_int_list() {
        assert_eq!(Arg::Int(3).as_int_list(), Some(vec![3]));
        assert_eq!(
            Arg::List(vec![Arg::Int(2), Arg::Int(2)]).as_int_list(),
            Some(vec![2, 2])
        );
        assert_eq!(Arg::List(vec![Arg::Int(2), Arg::Bool(true)]).as_int_list(), None);
        assert_eq!(Arg::None.as_int_list(), None);
    }

    #[test]
    fn test_canonical_target() {
        let n = call(0, "exir_ops.edge.aten._softmax.default", vec![]);
        assert_eq!(n.canonical_target(), Some("_softmax"));
    }
}
