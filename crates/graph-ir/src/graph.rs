// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The data-flow graph handed to the partitioner.
//!
//! # Type-State Pattern
//!
//! ```text
//! Graph<Loaded>     — nodes parsed or built, not yet checked.
//!       │  .validate()
//!       ▼
//! Graph<Validated>  — references checked, consumer lists built.
//! ```
//!
//! The partitioner only accepts `Graph<Validated>`, so every node it sees
//! has resolvable inputs and declaration order is a topological order.

use crate::{GraphError, Node, NodeId, NodeKind};
use std::collections::HashSet;
use std::fmt;

// ── Type-state markers ─────────────────────────────────────────────

/// Marker: graph has been loaded but not validated.
#[derive(Debug, Clone)]
pub struct Loaded;

/// Marker: graph has been validated and is ready for partitioning.
#[derive(Debug, Clone)]
pub struct Validated;

/// Sealed trait for graph states.
pub trait GraphState: fmt::Debug + Clone {}
impl GraphState for Loaded {}
impl GraphState for Validated {}

// ── Graph ──────────────────────────────────────────────────────────

/// A computation graph: nodes in declaration order plus, once validated,
/// the consumers ("users") of every node.
#[derive(Debug, Clone)]
pub struct Graph<S: GraphState = Loaded> {
    /// Human-readable graph name (e.g., `"phi-3-mini"`).
    pub name: String,
    nodes: Vec<Node>,
    /// `users[i]` lists the nodes consuming node `i`, in declaration order.
    /// Empty until validation.
    users: Vec<Vec<NodeId>>,
    _state: std::marker::PhantomData<S>,
}

// ── Loaded state ───────────────────────────────────────────────────

impl Graph<Loaded> {
    /// Creates a new graph in the `Loaded` state.
    pub fn new(name: String, nodes: Vec<Node>) -> Self {
        Self {
            name,
            nodes,
            users: Vec::new(),
            _state: std::marker::PhantomData,
        }
    }

    /// Returns the nodes as loaded.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Validates the graph and transitions to the `Validated` state.
    ///
    /// # Checks
    /// - The graph is non-empty.
    /// - Node ids are consecutive starting from 0.
    /// - Node names are unique.
    /// - Every `call_function` node has a target.
    /// - Every referenced node exists and is declared earlier, so the
    ///   graph is acyclic and declaration order is topological.
    /// - `output` nodes have no consumers.
    pub fn validate(self) -> Result<Graph<Validated>, GraphError> {
        if self.nodes.is_empty() {
            return Err(GraphError::InvalidGraph("graph contains no nodes".into()));
        }

        let mut names = HashSet::new();
        for (i, node) in self.nodes.iter().enumerate() {
            if node.id.index() != i {
                return Err(GraphError::InvalidNode {
                    node: node.name.clone(),
                    detail: format!("expected id {i}, got {}", node.id.index()),
                });
            }
            if !names.insert(node.name.as_str()) {
                return Err(GraphError::InvalidNode {
                    node: node.name.clone(),
                    detail: "duplicate node name".into(),
                });
            }
            if node.kind == NodeKind::CallFunction && node.target.is_none() {
                return Err(GraphError::InvalidNode {
                    node: node.name.clone(),
                    detail: "call_function node has no target".into(),
                });
            }
        }

        let mut users = vec![Vec::new(); self.nodes.len()];
        for node in &self.nodes {
            for input in node.input_ids() {
                if input.index() >= node.id.index() {
                    let reference = self
                        .nodes
                        .get(input.index())
                        .map(|n| n.name.clone())
                        .unwrap_or_else(|| input.to_string());
                    return Err(GraphError::UnknownNode {
                        node: node.name.clone(),
                        reference,
                    });
                }
                if self.nodes[input.index()].kind == NodeKind::Output {
                    return Err(GraphError::InvalidNode {
                        node: node.name.clone(),
                        detail: "consumes an output node".into(),
                    });
                }
                users[input.index()].push(node.id);
            }
        }

        let dangling = self
            .nodes
            .iter()
            .filter(|n| n.is_call() && users[n.id.index()].is_empty())
            .count();
        if dangling > 0 {
            tracing::debug!("graph '{}' has {dangling} call nodes without consumers", self.name);
        }

        Ok(Graph {
            name: self.name,
            nodes: self.nodes,
            users,
            _state: std::marker::PhantomData,
        })
    }
}

// ── Validated state ────────────────────────────────────────────────

impl Graph<Validated> {
    /// Returns the total number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of `call_function` nodes.
    pub fn num_call_nodes(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_call()).count()
    }

    /// Returns all nodes in declaration (topological) order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns an iterator over the nodes in declaration order.
    pub fn iter_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Returns a node by id.
    ///
    /// # Panics
    /// If `id` does not belong to this graph. Ids handed out by the graph
    /// itself are always valid.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Returns a node by id, or `None` if out of range.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Looks up a node by name.
    pub fn find(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Distinct input nodes of `id`.
    pub fn input_nodes(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id).input_ids()
    }

    /// Nodes consuming the output of `id`, in declaration order.
    pub fn users(&self, id: NodeId) -> &[NodeId] {
        &self.users[id.index()]
    }

    /// Returns a summary string describing the graph.
    pub fn summary(&self) -> String {
        let markers = self.nodes.iter().filter(|n| n.is_quant_marker()).count();
        format!(
            "Graph '{}': {} nodes, {} calls, {} quantization markers",
            self.name,
            self.num_nodes(),
            self.num_call_nodes(),
            markers,
        )
    }
}

// ── Shared implementations ─────────────────────────────────────────

impl<S: GraphState> fmt::Display for Graph<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Graph '{}' ({} nodes):", self.name, self.nodes.len())?;
        for node in &self.nodes {
            writeln!(f, "  {}", node.summary())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Arg, GraphBuilder};
    use std::collections::BTreeMap;

    fn chain(n: usize) -> Graph<Loaded> {
        let mut b = GraphBuilder::new("chain");
        let mut prev = b.placeholder("x");
        for i in 0..n {
            prev = b.call(&format!("relu_{i}"), "aten.relu.default", vec![Arg::Node(prev)]);
        }
        b.output(vec![prev]);
        b.build()
    }

    #[test]
    fn test_validate_ok() {
        let g = chain(3).validate().unwrap();
        assert_eq!(g.num_nodes(), 5);
        assert_eq!(g.num_call_nodes(), 3);
        assert_eq!(g.users(NodeId(1)), &[NodeId(2)]);
        assert_eq!(g.input_nodes(NodeId(2)), vec![NodeId(1)]);
        assert!(g.users(NodeId(4)).is_empty());
    }

    #[test]
    fn test_validate_empty() {
        let g = Graph::new("empty".into(), vec![]);
        assert!(g.validate().is_err());
    }

    #[test]
    fn test_validate_bad_id() {
        let mut nodes = chain(2).nodes().to_vec();
        nodes[1].id = NodeId(7);
        assert!(Graph::new("bad".into(), nodes).validate().is_err());
    }

    #[test]
    fn test_validate_forward_reference() {
        let mut nodes = chain(2).nodes().to_vec();
        nodes[1].args = vec![Arg::Node(NodeId(2))];
        let err = Graph::new("fwd".into(), nodes).validate().unwrap_err();
        assert!(matches!(err, GraphError::UnknownNode { .. }));
    }

    #[test]
    fn test_validate_duplicate_name() {
        let mut nodes = chain(2).nodes().to_vec();
        nodes[2].name = nodes[1].name.clone();
        assert!(Graph::new("dup".into(), nodes).validate().is_err());
    }

    #[test]
    fn test_validate_call_without_target() {
        let mut nodes = chain(1).nodes().to_vec();
        nodes[1].target = None;
        assert!(Graph::new("nt".into(), nodes).validate().is_err());
    }

    #[test]
    fn test_validate_output_consumed() {
        let mut nodes = chain(1).nodes().to_vec();
        nodes.push(Node {
            id: NodeId(3),
            name: "after".into(),
            kind: NodeKind::CallFunction,
            target: Some("aten.relu.default".into()),
            args: vec![Arg::Node(NodeId(2))],
            kwargs: BTreeMap::new(),
            meta: None,
        });
        assert!(Graph::new("oc".into(), nodes).validate().is_err());
    }

    #[test]
    fn test_users_preserve_order_and_fanout() {
        let mut b = GraphBuilder::new("fan");
        let x = b.placeholder("x");
        let a = b.call("a", "aten.relu.default", vec![Arg::Node(x)]);
        let c = b.call("c", "aten.sigmoid.default", vec![Arg::Node(x)]);
        let d = b.call("d", "aten.add.Tensor", vec![Arg::Node(a), Arg::Node(c)]);
        b.output(vec![d]);
        let g = b.build().validate().unwrap();
        assert_eq!(g.users(x), &[a, c]);
        assert_eq!(g.find("d").map(|n| n.id), Some(d));
    }

    #[test]
    fn test_summary_and_display() {
        let g = chain(2).validate().unwrap();
        assert!(g.summary().contains("2 calls"));
        let display = format!("{g}");
        assert!(display.contains("relu_0"));
        assert!(display.contains("relu_1"));
    }
}
