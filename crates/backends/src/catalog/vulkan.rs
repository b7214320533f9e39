// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Vulkan capability table. Floating point only.

use partitioner::{OperatorRule, PrecisionSet};

const OPS: &[&str] = &[
    "aten.add.Tensor",
    "aten.sub.Tensor",
    "aten.mul.Tensor",
    "aten.div.Tensor",
    "aten.pow.Tensor_Tensor",
    "aten.abs.default",
    "aten.clamp.default",
    "aten.hardtanh.default",
    "aten.relu.default",
    "aten.sigmoid.default",
    "aten.tanh.default",
    "aten.linear.default",
    "aten.addmm.default",
    "aten.mm.default",
    "aten.bmm.default",
    "aten.convolution.default",
    "aten.max_pool2d_with_indices.default",
    "aten._softmax.default",
    "aten._log_softmax.default",
    "aten.native_layer_norm.default",
    "aten.mean.dim",
    "aten.sum.dim_IntList",
    "aten.permute_copy.default",
    "aten.view_copy.default",
    "aten.unsqueeze_copy.default",
    "aten.select_copy.int",
    "aten.slice_copy.Tensor",
    "aten.cat.default",
];

pub(super) fn rules() -> Vec<OperatorRule> {
    OPS.iter()
        .map(|target| OperatorRule::new(target, PrecisionSet::FP32))
        .collect()
}
