// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Backend configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! backend = "xnnpack"
//! quantization_mode = "8da4w"
//! use_kv_cache = true
//! skip_node_op_set = ["aten.sin.default"]
//!
//! [enabled_precision_types]
//! "add.Tensor" = ["fp32"]
//! ```

use crate::{BackendError, BackendKind};
use partitioner::{PrecisionMode, PrecisionSet};
use std::collections::BTreeMap;
use std::path::Path;

/// Configuration for selecting and tuning a backend.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BackendConfig {
    /// Backend name: `"xnnpack"`, `"vulkan"`, `"mps"`, `"coreml"`, `"qnn"`.
    pub backend: String,
    /// Model dtype the export was forced to (e.g. `"fp32"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dtype_override: Option<String>,
    /// Quantization scheme applied before partitioning (e.g. `"8da4w"`,
    /// `"coreml_8a_c8w"`, `"qnn_16a4w"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantization_mode: Option<String>,
    /// Whether the model was exported with a KV cache (static shapes).
    #[serde(default)]
    pub use_kv_cache: bool,
    /// Whether the backend must accept symbolic dimensions.
    #[serde(default)]
    pub require_dynamic_shapes: bool,
    /// Compute precision hint: `"fp32"` or `"fp16"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute_precision: Option<String>,
    /// Target SoC for QNN.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chipset: Option<String>,
    /// Node names never delegated.
    #[serde(default)]
    pub skip_node_id_set: Vec<String>,
    /// Operators never delegated (any spelling; canonicalized).
    #[serde(default)]
    pub skip_node_op_set: Vec<String>,
    /// Per-operator precision overrides.
    #[serde(default)]
    pub enabled_precision_types: BTreeMap<String, Vec<String>>,
}

/// Floating-point width the backend computes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputePrecision {
    Fp32,
    Fp16,
}

impl ComputePrecision {
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fp32" | "float32" | "float" => Some(Self::Fp32),
            "fp16" | "float16" | "half" => Some(Self::Fp16),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fp32 => "fp32",
            Self::Fp16 => "fp16",
        }
    }
}

impl BackendConfig {
    /// Creates a configuration for `backend` with every option unset.
    pub fn new(backend: BackendKind) -> Self {
        Self {
            backend: backend.as_str().to_string(),
            ..Default::default()
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, BackendError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BackendError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, BackendError> {
        toml::from_str(toml_str)
            .map_err(|e| BackendError::ConfigError(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, BackendError> {
        toml::to_string_pretty(self)
            .map_err(|e| BackendError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// Resolves the backend name.
    pub fn kind(&self) -> Result<BackendKind, BackendError> {
        BackendKind::from_str_loose(&self.backend).ok_or_else(|| {
            BackendError::ConfigError(format!(
                "unknown backend '{}'; expected one of 'xnnpack', 'vulkan', 'mps', 'coreml', 'qnn'",
                self.backend
            ))
        })
    }

    /// Parses the compute precision hint, if any.
    pub fn parse_compute_precision(&self) -> Result<Option<ComputePrecision>, BackendError> {
        self.compute_precision
            .as_deref()
            .map(|s| {
                ComputePrecision::from_str_loose(s).ok_or_else(|| {
                    BackendError::ConfigError(format!(
                        "invalid compute_precision '{s}'; expected 'fp32' or 'fp16'"
                    ))
                })
            })
            .transpose()
    }

    /// Parses the per-operator precision overrides.
    pub fn parse_precision_overrides(&self) -> Result<Vec<(String, PrecisionSet)>, BackendError> {
        self.enabled_precision_types
            .iter()
            .map(|(op, modes)| {
                let set = modes
                    .iter()
                    .map(|m| {
                        PrecisionMode::from_str_loose(m).ok_or_else(|| {
                            BackendError::ConfigError(format!(
                                "invalid precision '{m}' for operator '{op}'"
                            ))
                        })
                    })
                    .collect::<Result<PrecisionSet, _>>()?;
                Ok((op.clone(), set))
            })
            .collect()
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Xnnpack.as_str().to_string(),
            dtype_override: None,
            quantization_mode: None,
            use_kv_cache: false,
            require_dynamic_shapes: false,
            compute_precision: None,
            chipset: None,
            skip_node_id_set: Vec::new(),
            skip_node_op_set: Vec::new(),
            enabled_precision_types: BTreeMap::new(),
        }
    }
}
