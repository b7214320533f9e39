// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Partition map: the output of the partitioner.
//!
//! A partition is a connected, convex set of delegated nodes that the
//! backend lowers as one unit. Nodes outside every partition stay on the
//! host runtime. The map is the contract between the partitioner and
//! whatever lowers the graph.

use crate::PartitionError;
use graph_ir::graph::Validated;
use graph_ir::{Graph, NodeId};
use std::collections::{HashSet, VecDeque};

/// A set of nodes delegated together.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Partition {
    /// Index of this partition; partitions are ordered by smallest node id.
    pub id: usize,
    /// Member nodes, ascending.
    pub nodes: Vec<NodeId>,
    /// Outside nodes feeding members, ascending.
    pub inputs: Vec<NodeId>,
    /// Members consumed outside the partition, ascending.
    pub outputs: Vec<NodeId>,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.binary_search(&id).is_ok()
    }
}

/// All partitions produced for one backend.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PartitionMap {
    /// Backend the partitions are destined for.
    pub backend: String,
    partitions: Vec<Partition>,
    #[serde(skip)]
    assignment: Vec<Option<usize>>,
}

impl PartitionMap {
    /// Returns the partition id of `node`, or `None` if it stays on the host.
    pub fn partition_of(&self, node: NodeId) -> Option<usize> {
        self.assignment.get(node.index()).copied().flatten()
    }

    pub fn partition(&self, id: usize) -> Option<&Partition> {
        self.partitions.get(id)
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    pub fn num_partitions(&self) -> usize {
        self.partitions.len()
    }

    /// Total number of delegated nodes.
    pub fn num_delegated(&self) -> usize {
        self.partitions.iter().map(Partition::len).sum()
    }

    /// Checks the map against the graph it was computed for.
    ///
    /// Checks:
    /// - Partition ids are consecutive starting from 0.
    /// - No partition is empty.
    /// - No node belongs to two partitions, and the node assignment agrees
    ///   with the partition lists.
    /// - Every partition is connected.
    /// - No path leaves a partition and re-enters it.
    pub fn validate(&self, graph: &Graph<Validated>) -> Result<(), PartitionError> {
        let fail = |detail: String| PartitionError::InvalidPartition {
            backend: self.backend.clone(),
            detail,
        };

        let mut owner: Vec<Option<usize>> = vec![None; graph.num_nodes()];
        for (expected, partition) in self.partitions.iter().enumerate() {
            if partition.id != expected {
                return Err(fail(format!(
                    "expected partition id {expected}, got {}",
                    partition.id
                )));
            }
            if partition.is_empty() {
                return Err(fail(format!("partition {} is empty", partition.id)));
            }
            for &node in &partition.nodes {
                let slot = owner
                    .get_mut(node.index())
                    .ok_or_else(|| fail(format!("{node} is not in graph '{}'", graph.name)))?;
                if let Some(other) = slot.replace(partition.id) {
                    return Err(fail(format!(
                        "{node} belongs to partitions {other} and {}",
                        partition.id
                    )));
                }
            }
            if !is_connected(graph, &partition.nodes) {
                return Err(fail(format!("partition {} is not connected", partition.id)));
            }
            if leaves_and_returns(graph, &partition.nodes) {
                return Err(fail(format!(
                    "partition {} both feeds and consumes an outside node",
                    partition.id
                )));
            }
        }

        for (index, expected) in owner.iter().enumerate() {
            if self.partition_of(NodeId(index)) != *expected {
                return Err(fail(format!(
                    "assignment of %{index} disagrees with the partition lists"
                )));
            }
        }
        Ok(())
    }

    /// Returns a human-readable summary of the map.
    pub fn summary(&self) -> String {
        let sizes: Vec<usize> = self.partitions.iter().map(Partition::len).collect();
        format!(
            "Partitions for '{}': {} partitions, {} delegated nodes, sizes: {:?}",
            self.backend,
            self.num_partitions(),
            self.num_delegated(),
            sizes,
        )
    }
}

/// Whether `members` are connected through data edges, ignoring direction.
fn is_connected(graph: &Graph<Validated>, members: &[NodeId]) -> bool {
    let Some(&start) = members.first() else {
        return true;
    };
    let inside: HashSet<NodeId> = members.iter().copied().collect();
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(id) = queue.pop_front() {
        let neighbours = graph
            .input_nodes(id)
            .into_iter()
            .chain(graph.users(id).iter().copied());
        for n in neighbours {
            if inside.contains(&n) && seen.insert(n) {
                queue.push_back(n);
            }
        }
    }
    seen.len() == inside.len()
}

/// Whether some path leaves `members` and comes back into them.
///
/// Such a set cannot be lowered as one unit: the outside node would need
/// the partition's output before the partition could finish.
pub(crate) fn leaves_and_returns(graph: &Graph<Validated>, members: &[NodeId]) -> bool {
    let inside: HashSet<NodeId> = members.iter().copied().collect();
    let Some(&last) = members.iter().max() else {
        return false;
    };

    // Users always come later in declaration order, so nothing past the
    // last member can lead back in.
    let mut stack: Vec<NodeId> = members
        .iter()
        .flat_map(|&m| graph.users(m).iter().copied())
        .filter(|u| !inside.contains(u) && *u < last)
        .collect();
    let mut seen = HashSet::new();
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        for &user in graph.users(id) {
            if inside.contains(&user) {
                return true;
            }
            if user < last {
                stack.push(user);
            }
        }
    }
    false
}

// ── Union-find over node indices ───────────────────────────────────

/// Disjoint sets of delegated nodes, grown while the partitioner walks
/// the graph. Each root keeps its member list so cycle checks can look
/// at a whole partition.
pub(crate) struct PartitionSets {
    parent: Vec<usize>,
    members: Vec<Vec<NodeId>>,
    delegated: Vec<bool>,
}

impl PartitionSets {
    pub fn new(num_nodes: usize) -> Self {
        Self {
            parent: (0..num_nodes).collect(),
            members: (0..num_nodes).map(|i| vec![NodeId(i)]).collect(),
            delegated: vec![false; num_nodes],
        }
    }

    pub fn is_delegated(&self, id: NodeId) -> bool {
        self.delegated[id.index()]
    }

    pub fn mark_delegated(&mut self, id: NodeId) {
        self.delegated[id.index()] = true;
    }

    pub fn find(&mut self, id: NodeId) -> usize {
        let mut root = id.index();
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = id.index();
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Members of the set containing `id`.
    pub fn members_of(&mut self, id: NodeId) -> &[NodeId] {
        let root = self.find(id);
        &self.members[root]
    }

    pub fn union(&mut self, a: NodeId, b: NodeId) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        let (big, small) = if self.members[ra].len() >= self.members[rb].len() {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[small] = big;
        let moved = std::mem::take(&mut self.members[small]);
        self.members[big].extend(moved);
    }

    /// Freezes the sets into a [`PartitionMap`]. Partitions are numbered
    /// by their smallest member id.
    pub fn finish(mut self, backend: &str, graph: &Graph<Validated>) -> PartitionMap {
        let num_nodes = self.parent.len();
        let delegated: Vec<usize> = (0..num_nodes).filter(|&i| self.delegated[i]).collect();
        let mut roots: Vec<usize> = delegated.into_iter().map(|i| self.find(NodeId(i))).collect();
        let mut seen = HashSet::new();
        roots.retain(|r| seen.insert(*r));

        let mut groups: Vec<Vec<NodeId>> = roots
            .into_iter()
            .map(|r| {
                let mut nodes = std::mem::take(&mut self.members[r]);
                nodes.sort_unstable();
                nodes
            })
            .collect();
        groups.sort_unstable_by_key(|nodes| nodes[0]);

        let mut assignment = vec![None; num_nodes];
        let mut partitions = Vec::with_capacity(groups.len());
        for (id, nodes) in groups.into_iter().enumerate() {
            for n in &nodes {
                assignment[n.index()] = Some(id);
            }
            let inside: HashSet<NodeId> = nodes.iter().copied().collect();
            let mut inputs: Vec<NodeId> = nodes
                .iter()
                .flat_map(|&n| graph.input_nodes(n))
                .filter(|i| !inside.contains(i))
                .collect();
            inputs.sort_unstable();
            inputs.dedup();
            let outputs: Vec<NodeId> = nodes
                .iter()
                .copied()
                .filter(|&n| graph.users(n).iter().any(|u| !inside.contains(u)))
                .collect();
            partitions.push(Partition {
                id,
                nodes,
                inputs,
                outputs,
            });
        }

        PartitionMap {
            backend: backend.to_string(),
            partitions,
            assignment,
        }
    }
}
