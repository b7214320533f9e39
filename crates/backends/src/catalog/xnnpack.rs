// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! XNNPACK capability table.
//!
//! Covers fp32 and statically quantized elementwise, pooling and GEMM
//! operators, plus dynamically quantized linear layers.

use super::{DEQUANTIZE_PER_TENSOR, QUANTIZE_PER_TENSOR};
use graph_ir::graph::Validated;
use graph_ir::{Arg, Graph, Node};
use partitioner::{OperatorRule, PrecisionSet};

const FP32: PrecisionSet = PrecisionSet::FP32;
const FP32_QS8: PrecisionSet = PrecisionSet::FP32.union(PrecisionSet::STATIC_QUANT);

pub(super) fn rules() -> Vec<OperatorRule> {
    vec![
        // GEMM
        OperatorRule::new("aten.linear.default", PrecisionSet::ALL)
            .with_fused_activations(&["relu.default", "hardtanh.default"]),
        OperatorRule::new("aten.addmm.default", PrecisionSet::ALL)
            .with_fused_activations(&["relu.default", "hardtanh.default"]),
        OperatorRule::new("aten.convolution.default", FP32_QS8)
            .with_fused_activations(&["relu.default", "hardtanh.default"]),
        OperatorRule::new("aten._native_batch_norm_legit_no_training.default", FP32),
        // Single node
        OperatorRule::new("aten.hardtanh.default", FP32_QS8),
        OperatorRule::new("aten.abs.default", FP32),
        OperatorRule::new("aten.avg_pool2d.default", FP32).with_constraint(avg_pool2d_supported),
        OperatorRule::new("aten.add.Tensor", FP32_QS8).with_fused_activations(&["relu.default"]),
        OperatorRule::new("aten.cat.default", FP32_QS8)
            .with_constraint(cat_supported)
            .multi_consumer(),
        OperatorRule::new("aten.ceil.default", FP32),
        OperatorRule::new("aten.clamp.default", FP32_QS8),
        OperatorRule::new("aten.div.Tensor", FP32),
        OperatorRule::new("aten.max.dim", FP32),
        OperatorRule::new("aten.max_pool2d.default", FP32_QS8).with_constraint(max_pool2d_supported),
        OperatorRule::new("aten.maximum.default", FP32),
        OperatorRule::new("aten.mul.Tensor", FP32_QS8),
        OperatorRule::new("aten._softmax.default", FP32).with_constraint(softmax_supported),
        OperatorRule::new("aten.sigmoid.default", FP32),
        OperatorRule::new("aten.permute_copy.default", FP32_QS8),
        OperatorRule::new("aten.relu.default", FP32_QS8),
        // Quantization markers
        OperatorRule::new(QUANTIZE_PER_TENSOR, PrecisionSet::STATIC_QUANT),
        OperatorRule::new(DEQUANTIZE_PER_TENSOR, PrecisionSet::STATIC_QUANT),
    ]
}

/// `avg_pool2d(input, kernel_size, stride, padding, ceil_mode,
/// count_include_pad, divisor_override)`.
///
/// XNNPACK supports neither `ceil_mode` nor `count_include_pad`, and only
/// a `divisor_override` equal to the pooling region.
fn avg_pool2d_supported(node: &Node, _graph: &Graph<Validated>) -> bool {
    let flag = |index: usize, name: &str, default: bool| {
        node.arg_or_kwarg(index, name)
            .and_then(Arg::as_bool)
            .unwrap_or(default)
    };
    let ceil_mode = flag(4, "ceil_mode", false);
    let count_include_pad = flag(5, "count_include_pad", true);

    let Some(kernel) = node.arg_or_kwarg(1, "kernel_size").and_then(Arg::as_int_list) else {
        return false;
    };
    let region = match kernel[..] {
        [k] => k.checked_mul(k),
        [h, w] => h.checked_mul(w),
        _ => None,
    };
    let Some(region) = region else {
        return false;
    };

    // An explicit None counts as not supplied.
    let divisor = match node.arg_or_kwarg(6, "divisor_override") {
        None | Some(Arg::None) => region,
        Some(arg) => match arg.as_int() {
            Some(d) => d,
            None => return false,
        },
    };

    !(ceil_mode || count_include_pad) && divisor == region
}

/// `max_pool2d(input, kernel_size, stride, padding, dilation, ceil_mode)`.
fn max_pool2d_supported(node: &Node, _graph: &Graph<Validated>) -> bool {
    let ceil_mode = node
        .arg_or_kwarg(5, "ceil_mode")
        .and_then(Arg::as_bool)
        .unwrap_or(false);
    !ceil_mode
}

/// Concatenation of 2 to 4 distinct tensors.
fn cat_supported(node: &Node, _graph: &Graph<Validated>) -> bool {
    (2..=4).contains(&node.input_ids().len())
}

/// `_softmax(input, dim, half_to_float)` over the last dimension only.
fn softmax_supported(node: &Node, graph: &Graph<Validated>) -> bool {
    let Some(dim) = node.arg_or_kwarg(1, "dim").and_then(Arg::as_int) else {
        return false;
    };
    let rank = node
        .arg_or_kwarg(0, "self")
        .and_then(Arg::as_node)
        .and_then(|input| graph.get(input))
        .and_then(|input| input.meta.as_ref())
        .map(|meta| meta.rank() as i64);
    match rank {
        Some(rank) => dim == -1 || dim == rank - 1,
        None => false,
    }
}
