// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! JSON graph manifest parsing.
//!
//! # Format
//! ```json
//! {
//!   "name": "tiny-cnn",
//!   "nodes": [
//!     { "name": "x", "op": "placeholder",
//!       "meta": { "shape": [1, 3, 32, 32], "dtype": "f32" } },
//!     { "name": "pool", "op": "call_function",
//!       "target": "aten.avg_pool2d.default",
//!       "args": [{ "node": "x" }, [2, 2], [2, 2], [0, 0], false, false] },
//!     { "name": "output", "op": "output", "args": [[{ "node": "pool" }]] }
//!   ]
//! }
//! ```
//!
//! Node references are written `{ "node": "<name>" }` and must name a node
//! declared earlier in the list.

use crate::{Arg, Graph, GraphError, Node, NodeId, NodeKind, TensorMeta};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Top-level graph manifest, deserialized from JSON.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GraphManifest {
    /// Human-readable graph name.
    pub name: String,
    /// Nodes in declaration (topological) order.
    pub nodes: Vec<ManifestNode>,
}

/// A single node entry in the manifest.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ManifestNode {
    pub name: String,
    pub op: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default)]
    pub args: Vec<ManifestArg>,
    #[serde(default)]
    pub kwargs: BTreeMap<String, ManifestArg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<TensorMeta>,
}

/// An argument as written in JSON; node references are by name.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ManifestArg {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Ref { node: String },
    List(Vec<ManifestArg>),
}

impl ManifestArg {
    fn resolve(&self, owner: &str, ids: &HashMap<&str, NodeId>) -> Result<Arg, GraphError> {
        Ok(match self {
            ManifestArg::Null => Arg::None,
            ManifestArg::Bool(b) => Arg::Bool(*b),
            ManifestArg::Int(i) => Arg::Int(*i),
            ManifestArg::Float(f) => Arg::Float(*f),
            ManifestArg::Str(s) => Arg::Str(s.clone()),
            ManifestArg::Ref { node } => {
                let id = ids.get(node.as_str()).ok_or_else(|| GraphError::UnknownNode {
                    node: owner.to_string(),
                    reference: node.clone(),
                })?;
                Arg::Node(*id)
            }
            ManifestArg::List(items) => Arg::List(
                items
                    .iter()
                    .map(|a| a.resolve(owner, ids))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }
}

impl GraphManifest {
    /// Loads a manifest from a JSON file path.
    pub fn from_file(path: &Path) -> Result<Self, GraphError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let manifest: Self = serde_json::from_str(json)?;
        Ok(manifest)
    }

    /// Converts the manifest into an (unvalidated) graph.
    ///
    /// Names are resolved to ids as the node list is walked, so a reference
    /// to a later node fails here with [`GraphError::UnknownNode`].
    pub fn into_graph(self) -> Result<Graph, GraphError> {
        let mut ids: HashMap<&str, NodeId> = HashMap::with_capacity(self.nodes.len());
        let mut nodes = Vec::with_capacity(self.nodes.len());

        for (i, entry) in self.nodes.iter().enumerate() {
            let args = entry
                .args
                .iter()
                .map(|a| a.resolve(&entry.name, &ids))
                .collect::<Result<Vec<_>, _>>()?;
            let kwargs = entry
                .kwargs
                .iter()
                .map(|(k, a)| Ok((k.clone(), a.resolve(&entry.name, &ids)?)))
                .collect::<Result<BTreeMap<_, _>, GraphError>>()?;

            if ids.insert(entry.name.as_str(), NodeId(i)).is_some() {
                return Err(GraphError::InvalidNode {
                    node: entry.name.clone(),
                    detail: "duplicate node name".into(),
                });
            }

            nodes.push(Node {
                id: NodeId(i),
                name: entry.name.clone(),
                kind: entry.op,
                target: entry.target.clone(),
                args,
                kwargs,
                meta: entry.meta.clone(),
            });
        }

        Ok(Graph::new(self.name, nodes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dim;

    fn sample_json() -> &'static str {
        r#"{
            "name": "qadd",
            "nodes": [
                { "name": "x", "op": "placeholder", "meta": { "shape": [1, "seq", 8], "dtype": "f32" } },
                { "name": "y", "op": "placeholder" },
                { "name": "dq_x", "op": "call_function",
                  "target": "quantized_decomposed.dequantize_per_tensor.default",
                  "args": [{ "node": "x" }, 0.5, 0, -128, 127, "i8"] },
                { "name": "dq_y", "op": "call_function",
                  "target": "quantized_decomposed.dequantize_per_tensor.default",
                  "args": [{ "node": "y" }, 0.5, 0, -128, 127, "i8"] },
                { "name": "add", "op": "call_function", "target": "aten.add.Tensor",
                  "args": [{ "node": "dq_x" }, { "node": "dq_y" }], "kwargs": { "alpha": 1 } },
                { "name": "output", "op": "output", "args": [[{ "node": "add" }]] }
            ]
        }"#
    }

    #[test]
    fn test_parse_manifest() {
        let m = GraphManifest::from_json(sample_json()).unwrap();
        assert_eq!(m.name, "qadd");
        assert_eq!(m.nodes.len(), 6);
        assert_eq!(m.nodes[4].op, NodeKind::CallFunction);
        assert_eq!(m.nodes[2].args[1], ManifestArg::Float(0.5));
        assert_eq!(m.nodes[2].args[2], ManifestArg::Int(0));
    }

    #[test]
    fn test_into_graph_resolves_refs() {
        let g = GraphManifest::from_json(sample_json())
            .unwrap()
            .into_graph()
            .unwrap()
            .validate()
            .unwrap();
        let add = g.find("add").unwrap();
        assert_eq!(add.input_ids(), vec![NodeId(2), NodeId(3)]);
        assert_eq!(add.kwargs.get("alpha"), Some(&Arg::Int(1)));
        let x = g.find("x").unwrap();
        assert_eq!(x.meta.as_ref().unwrap().shape.dims()[1], Dim::Symbolic("seq".into()));
    }

    #[test]
    fn test_forward_reference_rejected() {
        let json = r#"{ "name": "fwd", "nodes": [
            { "name": "a", "op": "call_function", "target": "aten.relu.default", "args": [{ "node": "b" }] },
            { "name": "b", "op": "placeholder" }
        ]}"#;
        let err = GraphManifest::from_json(json).unwrap().into_graph().unwrap_err();
        assert!(matches!(err, GraphError::UnknownNode { .. }));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let json = r#"{ "name": "dup", "nodes": [
            { "name": "a", "op": "placeholder" },
            { "name": "a", "op": "placeholder" }
        ]}"#;
        assert!(GraphManifest::from_json(json).unwrap().into_graph().is_err());
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            GraphManifest::from_json("{ not json"),
            Err(GraphError::ParseError(_))
        ));
    }

    #[test]
    fn test_null_args() {
        let json = r#"{ "name": "n", "nodes": [
            { "name": "x", "op": "placeholder" },
            { "name": "p", "op": "call_function", "target": "aten.avg_pool2d.default",
              "args": [{ "node": "x" }, [2, 2], [2, 2], [0, 0], false, false, null] }
        ]}"#;
        let g = GraphManifest::from_json(json).unwrap().into_graph().unwrap();
        assert_eq!(g.nodes()[1].args[6], Arg::None);
    }
}
