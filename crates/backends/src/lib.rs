// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # backends
//!
//! Backend selection for the delegation partitioner.
//!
//! - [`BackendKind`] names the supported accelerators: XNNPACK, Vulkan,
//!   MPS, Core ML and QNN.
//! - [`PluginRegistry`] reports which of them this build can use. XNNPACK
//!   is always present; the others sit behind cargo features.
//! - [`catalog`] holds each backend's capability table: operator rules,
//!   precisions and legality constraints.
//! - [`BackendConfig`] is the TOML-facing configuration, and
//!   [`BackendSelector`] validates it into a [`SelectedBackend`] that
//!   partitions graphs.
//!
//! # Example
//! ```
//! use backends::{BackendConfig, BackendKind, BackendSelector};
//! use graph_ir::{Arg, GraphBuilder};
//!
//! let mut b = GraphBuilder::new("g");
//! let x = b.placeholder("x");
//! let r = b.call("relu", "aten.relu.default", vec![Arg::Node(x)]);
//! b.output(vec![r]);
//! let graph = b.build().validate().unwrap();
//!
//! let backend = BackendSelector::default()
//!     .select(&BackendConfig::new(BackendKind::Xnnpack))
//!     .unwrap();
//! let outcome = backend.partition(&graph);
//! assert_eq!(outcome.map.num_partitions(), 1);
//! ```

pub mod catalog;
mod config;
mod error;
mod kind;
mod plugin;
mod selector;

pub use config::{BackendConfig, ComputePrecision};
pub use error::BackendError;
pub use kind::BackendKind;
pub use plugin::{Availability, PluginRegistry};
pub use selector::{
    BackendOptions, BackendSelector, DeploymentTarget, SelectedBackend, DEFAULT_QNN_CHIPSET,
};
