// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Apple backends: MPS (Metal Performance Shaders) and Core ML.

use partitioner::{OperatorRule, PrecisionSet};

/// Operators both Apple backends lower in floating point.
const FLOAT_OPS: &[&str] = &[
    "aten.add.Tensor",
    "aten.sub.Tensor",
    "aten.mul.Tensor",
    "aten.div.Tensor",
    "aten.pow.Tensor_Scalar",
    "aten.rsqrt.default",
    "aten.neg.default",
    "aten.relu.default",
    "aten.gelu.default",
    "aten.sigmoid.default",
    "aten.silu.default",
    "aten.tanh.default",
    "aten._softmax.default",
    "aten.native_layer_norm.default",
    "aten.mean.dim",
    "aten.embedding.default",
    "aten.bmm.default",
    "aten.mm.default",
    "aten.permute_copy.default",
    "aten.view_copy.default",
    "aten.expand_copy.default",
    "aten.slice_copy.Tensor",
    "aten.cat.default",
    "aten.index.Tensor",
];

/// GEMM-like operators Core ML also runs statically quantized.
const LINEAR_OPS: &[&str] = &[
    "aten.linear.default",
    "aten.addmm.default",
    "aten.convolution.default",
];

pub(super) fn mps_rules() -> Vec<OperatorRule> {
    FLOAT_OPS
        .iter()
        .chain(LINEAR_OPS)
        .map(|target| OperatorRule::new(target, PrecisionSet::FP32))
        .collect()
}

pub(super) fn coreml_rules() -> Vec<OperatorRule> {
    let quantized = PrecisionSet::FP32 | PrecisionSet::STATIC_QUANT;
    FLOAT_OPS
        .iter()
        .map(|target| OperatorRule::new(target, PrecisionSet::FP32))
        .chain(LINEAR_OPS.iter().map(|target| {
            OperatorRule::new(target, quantized).with_fused_activations(&["relu.default"])
        }))
        .collect()
}
