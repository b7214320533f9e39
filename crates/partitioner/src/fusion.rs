// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fusion groups: the nodes that must share a partition with an anchor.

use crate::{PrecisionMode, QuantPattern};
use graph_ir::NodeId;

/// An anchor node plus everything its quantization pattern absorbs.
///
/// Members are either all delegated together or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FusionGroup {
    pub anchor: NodeId,
    pub precision: PrecisionMode,
    nodes: Vec<NodeId>,
}

impl FusionGroup {
    /// Members in fusion order, anchor first.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a group contains at least its anchor.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Members other than the anchor.
    pub fn absorbed(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied().filter(move |&id| id != self.anchor)
    }
}

/// Expands a classified pattern into its fusion group.
///
/// Order: anchor, dequantize inputs, fused activation, quantize outputs,
/// then the dynamic quantization chain. Duplicates keep their first slot.
pub fn expand(pattern: &QuantPattern) -> FusionGroup {
    let mut nodes = Vec::with_capacity(
        1 + pattern.dequant_inputs.len()
            + usize::from(pattern.fused_activation.is_some())
            + pattern.quant_outputs.len()
            + pattern.dynamic_chain.len(),
    );
    let members = std::iter::once(pattern.anchor)
        .chain(pattern.dequant_inputs.iter().copied())
        .chain(pattern.fused_activation)
        .chain(pattern.quant_outputs.iter().copied())
        .chain(pattern.dynamic_chain.iter().copied());
    for id in members {
        if !nodes.contains(&id) {
            nodes.push(id);
        }
    }

    FusionGroup {
        anchor: pattern.anchor,
        precision: pattern.precision,
        nodes,
    }
}
