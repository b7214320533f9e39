// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-backend capability tables.
//!
//! Each backend declares which operators it can execute, at which
//! precisions, and under which argument constraints. The constraints
//! reflect limitations of the backend's kernel library, so they are
//! declared per backend rather than shared.

mod apple;
mod qnn;
mod vulkan;
mod xnnpack;

use crate::BackendKind;
use partitioner::OperatorRule;

/// Quantize/dequantize marker targets registered by quantizing backends.
pub(crate) const QUANTIZE_PER_TENSOR: &str = "quantized_decomposed.quantize_per_tensor.default";
pub(crate) const DEQUANTIZE_PER_TENSOR: &str =
    "quantized_decomposed.dequantize_per_tensor.default";

/// Returns the operator rules `kind` ships with.
pub fn rules(kind: BackendKind) -> Vec<OperatorRule> {
    match kind {
        BackendKind::Xnnpack => xnnpack::rules(),
        BackendKind::Vulkan => vulkan::rules(),
        BackendKind::Mps => apple::mps_rules(),
        BackendKind::CoreMl => apple::coreml_rules(),
        BackendKind::Qnn => qnn::rules(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partitioner::RuleRegistry;

    #[test]
    fn test_every_catalog_builds() {
        for kind in BackendKind::ALL {
            let registry = RuleRegistry::builder().extend(rules(kind)).build();
            assert!(registry.is_ok(), "{kind} catalog is invalid");
            assert!(!registry.unwrap().is_empty());
        }
    }
}
