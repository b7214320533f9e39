// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Backend selection.
//!
//! [`BackendSelector::select`] turns a [`BackendConfig`] into a ready
//! [`SelectedBackend`]: it checks plugin availability, applies each
//! backend's configuration rules, and builds the backend's rule
//! registry. Every configuration problem is reported here, before any
//! graph is traversed.

use crate::catalog;
use crate::config::ComputePrecision;
use crate::{Availability, BackendConfig, BackendError, BackendKind, PluginRegistry};
use graph_ir::graph::Validated;
use graph_ir::Graph;
use partitioner::{
    PartitionOptions, PartitionOutcome, Partitioner, PrecisionSet, RuleRegistry,
};
use std::fmt;

/// Default QNN target SoC.
pub const DEFAULT_QNN_CHIPSET: &str = "SM8650";

/// QNN quantization dtypes that are not supported yet.
const QNN_UNFINISHED_DTYPES: &[&str] = &["8a8w", "16a16w", "16a4w"];

/// Minimum iOS deployment target for Core ML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeploymentTarget {
    Ios15,
    Ios16,
    Ios17,
    Ios18,
}

impl DeploymentTarget {
    /// Lowest target able to run a model quantized with `mode`.
    ///
    /// Quantization needs iOS16, 8-bit activations iOS17, and 4-bit
    /// weight compression iOS18.
    pub fn for_quantization(mode: Option<&str>) -> Self {
        match mode {
            None => Self::Ios15,
            Some("coreml_c4w" | "coreml_8a_c4w" | "coreml_baseline_8a_c4w") => Self::Ios18,
            Some("coreml_8a_c8w" | "coreml_baseline_8a_c8w") => Self::Ios17,
            Some(_) => Self::Ios16,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ios15 => "iOS15",
            Self::Ios16 => "iOS16",
            Self::Ios17 => "iOS17",
            Self::Ios18 => "iOS18",
        }
    }
}

impl fmt::Display for DeploymentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compile options resolved for the selected backend.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendOptions {
    pub require_dynamic_shapes: bool,
    pub compute_precision: ComputePrecision,
    /// Core ML only.
    pub deployment_target: Option<DeploymentTarget>,
    /// QNN only.
    pub chipset: Option<String>,
    /// Only dynamically quantized patterns are delegated.
    pub dynamic_quant_only: bool,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            require_dynamic_shapes: false,
            compute_precision: ComputePrecision::Fp32,
            deployment_target: None,
            chipset: None,
            dynamic_quant_only: false,
        }
    }
}

/// A backend ready to partition graphs.
#[derive(Debug, Clone)]
pub struct SelectedBackend {
    pub kind: BackendKind,
    pub options: BackendOptions,
    registry: RuleRegistry,
    skip_node_ids: Vec<String>,
    skip_ops: Vec<String>,
}

impl SelectedBackend {
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Builds a partitioner for this backend.
    pub fn partitioner(&self) -> Partitioner {
        let options = PartitionOptions::new(self.kind.as_str())
            .with_skip_node_ids(self.skip_node_ids.iter().cloned())
            .with_skip_ops(&self.skip_ops)
            .with_dynamic_shapes(self.kind.supports_dynamic_shapes());
        Partitioner::new(self.registry.clone(), options)
    }

    /// Partitions `graph` for this backend.
    pub fn partition(&self, graph: &Graph<Validated>) -> PartitionOutcome {
        self.partitioner().partition(graph)
    }
}

/// Resolves configurations against the available plugins.
#[derive(Debug, Clone, Default)]
pub struct BackendSelector {
    plugins: PluginRegistry,
}

impl BackendSelector {
    pub fn new(plugins: PluginRegistry) -> Self {
        Self { plugins }
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    /// Validates `config` and builds the backend it names.
    ///
    /// # Errors
    /// - [`BackendError::ConfigError`] for unknown names or values.
    /// - [`BackendError::Unavailable`] if the plugin is not compiled in.
    /// - [`BackendError::UnsupportedConfig`] if the backend cannot honour
    ///   the configuration.
    /// - [`BackendError::Partition`] if a precision override is invalid.
    pub fn select(&self, config: &BackendConfig) -> Result<SelectedBackend, BackendError> {
        let kind = config.kind()?;
        if let Availability::Unavailable { missing } = self.plugins.availability(kind) {
            return Err(BackendError::Unavailable {
                backend: kind.to_string(),
                missing: missing.clone(),
            });
        }

        if config.require_dynamic_shapes && !kind.supports_dynamic_shapes() {
            return Err(unsupported(kind, "dynamic shapes are not supported"));
        }

        let requested_precision = config.parse_compute_precision()?;
        let options = match kind {
            BackendKind::Xnnpack => xnnpack_options(config),
            BackendKind::Vulkan => vulkan_options(config, requested_precision)?,
            BackendKind::Mps => mps_options(config, requested_precision)?,
            BackendKind::CoreMl => coreml_options(config, requested_precision)?,
            BackendKind::Qnn => qnn_options(config, requested_precision)?,
        };

        let mut builder = RuleRegistry::builder().extend(catalog::rules(kind));
        if options.dynamic_quant_only {
            builder = builder.restrict_precisions(PrecisionSet::DYNAMIC_QUANT);
        }
        for (op, enabled) in config.parse_precision_overrides()? {
            builder = builder.enable_precisions(&op, enabled);
        }
        let registry = builder.build()?;

        tracing::info!(
            "selected backend '{kind}': {} rules, compute {}",
            registry.len(),
            options.compute_precision.as_str(),
        );
        Ok(SelectedBackend {
            kind,
            options,
            registry,
            skip_node_ids: config.skip_node_id_set.clone(),
            skip_ops: config.skip_node_op_set.clone(),
        })
    }
}

fn unsupported(kind: BackendKind, detail: impl Into<String>) -> BackendError {
    BackendError::UnsupportedConfig {
        backend: kind.to_string(),
        detail: detail.into(),
    }
}

/// Backends with KV-cache exports only, since they need static shapes.
fn require_kv_cache(kind: BackendKind, config: &BackendConfig) -> Result<(), BackendError> {
    if config.use_kv_cache {
        Ok(())
    } else {
        Err(unsupported(
            kind,
            "only static shapes are supported; set use_kv_cache = true",
        ))
    }
}

fn xnnpack_options(config: &BackendConfig) -> BackendOptions {
    if config.compute_precision.is_some() {
        tracing::warn!("xnnpack ignores compute_precision");
    }
    BackendOptions {
        require_dynamic_shapes: config.require_dynamic_shapes,
        // Quantized exports only go through the dynamically quantized path.
        dynamic_quant_only: config.quantization_mode.is_some(),
        ..Default::default()
    }
}

fn vulkan_options(
    config: &BackendConfig,
    requested: Option<ComputePrecision>,
) -> Result<BackendOptions, BackendError> {
    let kind = BackendKind::Vulkan;
    if let Some(dtype) = config.dtype_override.as_deref() {
        if dtype != "fp32" {
            return Err(unsupported(kind, format!("dtype '{dtype}' is not supported, only fp32")));
        }
    }
    if let Some(mode) = config.quantization_mode.as_deref() {
        return Err(unsupported(kind, format!("quantization ('{mode}') is not supported")));
    }
    if requested == Some(ComputePrecision::Fp16) {
        return Err(unsupported(kind, "fp16 compute is not supported"));
    }
    if !config.require_dynamic_shapes {
        tracing::warn!("vulkan always requires dynamic shapes; overriding require_dynamic_shapes");
    }
    Ok(BackendOptions {
        require_dynamic_shapes: true,
        ..Default::default()
    })
}

fn mps_options(
    config: &BackendConfig,
    requested: Option<ComputePrecision>,
) -> Result<BackendOptions, BackendError> {
    require_kv_cache(BackendKind::Mps, config)?;
    Ok(BackendOptions {
        compute_precision: requested.unwrap_or(ComputePrecision::Fp16),
        ..Default::default()
    })
}

fn coreml_options(
    config: &BackendConfig,
    requested: Option<ComputePrecision>,
) -> Result<BackendOptions, BackendError> {
    require_kv_cache(BackendKind::CoreMl, config)?;
    let target = DeploymentTarget::for_quantization(config.quantization_mode.as_deref());
    tracing::debug!("coreml minimum deployment target {target}");
    Ok(BackendOptions {
        compute_precision: requested.unwrap_or(ComputePrecision::Fp16),
        deployment_target: Some(target),
        ..Default::default()
    })
}

fn qnn_options(
    config: &BackendConfig,
    requested: Option<ComputePrecision>,
) -> Result<BackendOptions, BackendError> {
    let kind = BackendKind::Qnn;
    require_kv_cache(kind, config)?;

    let mut compute_precision = requested.unwrap_or(ComputePrecision::Fp16);
    if let Some(mode) = config.quantization_mode.as_deref() {
        let dtype = mode.strip_prefix("qnn_").unwrap_or(mode);
        if QNN_UNFINISHED_DTYPES.contains(&dtype) {
            return Err(unsupported(kind, format!("{dtype} quantization is still under development")));
        }
        compute_precision = ComputePrecision::Fp32;
    }

    Ok(BackendOptions {
        compute_precision,
        chipset: Some(
            config
                .chipset
                .clone()
                .unwrap_or_else(|| DEFAULT_QNN_CHIPSET.to_string()),
        ),
        ..Default::default()
    })
}
