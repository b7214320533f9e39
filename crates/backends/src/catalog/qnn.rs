// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Qualcomm AI Engine Direct (QNN) capability table.

use super::{DEQUANTIZE_PER_TENSOR, QUANTIZE_PER_TENSOR};
use partitioner::{OperatorRule, PrecisionSet};

const OPS: &[&str] = &[
    "aten.add.Tensor",
    "aten.sub.Tensor",
    "aten.mul.Tensor",
    "aten.div.Tensor",
    "aten.rsqrt.default",
    "aten.relu.default",
    "aten.hardtanh.default",
    "aten.sigmoid.default",
    "aten.tanh.default",
    "aten.gelu.default",
    "aten.linear.default",
    "aten.convolution.default",
    "aten.bmm.default",
    "aten._softmax.default",
    "aten.native_layer_norm.default",
    "aten.mean.dim",
    "aten.embedding.default",
    "aten.permute_copy.default",
    "aten.view_copy.default",
    "aten.slice_copy.Tensor",
    "aten.cat.default",
];

pub(super) fn rules() -> Vec<OperatorRule> {
    let both = PrecisionSet::FP32 | PrecisionSet::STATIC_QUANT;
    OPS.iter()
        .map(|target| match *target {
            "aten.linear.default" | "aten.convolution.default" => {
                OperatorRule::new(target, both).with_fused_activations(&["relu.default"])
            }
            "aten.cat.default" => OperatorRule::new(target, both).multi_consumer(),
            _ => OperatorRule::new(target, both),
        })
        .chain([
            OperatorRule::new(QUANTIZE_PER_TENSOR, PrecisionSet::STATIC_QUANT),
            OperatorRule::new(DEQUANTIZE_PER_TENSOR, PrecisionSet::STATIC_QUANT),
        ])
        .collect()
}
