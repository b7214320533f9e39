// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Operator target names.
//!
//! Exporters spell the same operator in many ways:
//! `exir_ops.edge.aten.add.Tensor`, `aten::add.Tensor`, `add.Tensor`.
//! Rules and skip lists compare **canonical names**, which strip
//! namespace and overload qualifiers down to the bare operator (`add`).

/// Namespace segments dropped from the front of a dotted target.
const NAMESPACES: &[&str] = &[
    "torch",
    "ops",
    "exir_ops",
    "edge",
    "aten",
    "quantized_decomposed",
    "prims",
];

const QUANTIZE_OPS: &[&str] = &[
    "quantize_per_tensor",
    "quantize_per_channel",
    "quantize_per_token",
];

const DEQUANTIZE_OPS: &[&str] = &[
    "dequantize_per_tensor",
    "dequantize_per_channel",
    "dequantize_per_token",
];

const CHOOSE_QPARAMS_OPS: &[&str] = &[
    "choose_qparams",
    "choose_qparams_tensor",
    "choose_qparams_per_token_asymmetric",
];

/// Canonicalizes an operator target to its bare operator name.
///
/// # Examples
/// ```
/// use graph_ir::op::canonical_name;
/// assert_eq!(canonical_name("exir_ops.edge.aten.add.Tensor"), "add");
/// assert_eq!(canonical_name("aten::max_pool2d.default"), "max_pool2d");
/// assert_eq!(canonical_name("quantized_decomposed.quantize_per_tensor.default"), "quantize_per_tensor");
/// assert_eq!(canonical_name("relu"), "relu");
/// ```
pub fn canonical_name(target: &str) -> &str {
    let target = target.rsplit("::").next().unwrap_or(target).trim();
    let mut segments = target.split('.').filter(|s| !s.is_empty()).peekable();

    let mut last = "";
    while let Some(&seg) = segments.peek() {
        last = seg;
        if NAMESPACES.contains(&seg) {
            segments.next();
        } else {
            break;
        }
    }

    // First remaining segment is the operator; anything after it is the
    // overload qualifier. A target made only of namespaces keeps its last one.
    segments.next().unwrap_or(last)
}

/// Returns `true` if the canonical name is a quantize marker.
pub fn is_quantize(name: &str) -> bool {
    QUANTIZE_OPS.contains(&canonical_name(name))
}

/// Returns `true` if the canonical name is a dequantize marker.
pub fn is_dequantize(name: &str) -> bool {
    DEQUANTIZE_OPS.contains(&canonical_name(name))
}

/// Returns `true` for either kind of quantization marker.
pub fn is_quant_marker(name: &str) -> bool {
    is_quantize(name) || is_dequantize(name)
}

/// Returns `true` if the operator computes quantization parameters at run time.
pub fn is_choose_qparams(name: &str) -> bool {
    CHOOSE_QPARAMS_OPS.contains(&canonical_name(name))
}

/// Returns `true` for tuple projections (`operator.getitem`).
pub fn is_getitem(name: &str) -> bool {
    canonical_name(name) == "getitem" || name.ends_with("getitem")
}
