// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Programmatic graph construction.

use crate::graph::Loaded;
use crate::{Arg, Graph, Node, NodeId, NodeKind, TensorMeta};
use std::collections::BTreeMap;

/// Appends nodes in declaration order and hands back their ids.
///
/// Ids are assigned sequentially, so a builder-produced graph always
/// passes the id check in [`Graph::validate`].
#[derive(Debug)]
pub struct GraphBuilder {
    name: String,
    nodes: Vec<Node>,
}

impl GraphBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nodes: Vec::new(),
        }
    }

    fn push(
        &mut self,
        name: &str,
        kind: NodeKind,
        target: Option<&str>,
        args: Vec<Arg>,
        kwargs: BTreeMap<String, Arg>,
        meta: Option<TensorMeta>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            id,
            name: name.to_string(),
            kind,
            target: target.map(str::to_string),
            args,
            kwargs,
            meta,
        });
        id
    }

    /// Adds a graph input with known metadata.
    pub fn input(&mut self, name: &str, meta: TensorMeta) -> NodeId {
        self.push(name, NodeKind::Placeholder, None, vec![], BTreeMap::new(), Some(meta))
    }

    /// Adds a graph input without metadata.
    pub fn placeholder(&mut self, name: &str) -> NodeId {
        self.push(name, NodeKind::Placeholder, None, vec![], BTreeMap::new(), None)
    }

    /// Adds a parameter / constant buffer.
    pub fn constant(&mut self, name: &str, meta: Option<TensorMeta>) -> NodeId {
        self.push(name, NodeKind::GetAttr, None, vec![], BTreeMap::new(), meta)
    }

    /// Adds an operator call.
    pub fn call(&mut self, name: &str, target: &str, args: Vec<Arg>) -> NodeId {
        self.push(name, NodeKind::CallFunction, Some(target), args, BTreeMap::new(), None)
    }

    /// Adds an operator call whose output metadata is known.
    pub fn call_with_meta(
        &mut self,
        name: &str,
        target: &str,
        args: Vec<Arg>,
        meta: TensorMeta,
    ) -> NodeId {
        self.push(name, NodeKind::CallFunction, Some(target), args, BTreeMap::new(), Some(meta))
    }

    /// Adds an operator call with keyword arguments.
    pub fn call_with_kwargs(
        &mut self,
        name: &str,
        target: &str,
        args: Vec<Arg>,
        kwargs: Vec<(&str, Arg)>,
    ) -> NodeId {
        let kwargs = kwargs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        self.push(name, NodeKind::CallFunction, Some(target), args, kwargs, None)
    }

    /// Adds the graph output, returning the given nodes as a tuple.
    pub fn output(&mut self, values: Vec<NodeId>) -> NodeId {
        let list = Arg::List(values.into_iter().map(Arg::Node).collect());
        self.push("output", NodeKind::Output, None, vec![list], BTreeMap::new(), None)
    }

    /// Finishes construction. The result still has to be validated.
    pub fn build(self) -> Graph<Loaded> {
        Graph::new(self.name, self.nodes)
    }
}
