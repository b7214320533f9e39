// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for backend selection.

/// Errors raised while selecting and configuring a backend.
///
/// All of these surface before graph traversal starts.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The backend's plugin is not compiled in.
    #[error("backend '{backend}' is unavailable: missing {missing}")]
    Unavailable { backend: String, missing: String },

    /// The backend cannot honour the requested configuration.
    #[error("backend '{backend}' does not support this configuration: {detail}")]
    UnsupportedConfig { backend: String, detail: String },

    /// The configuration file could not be read or parsed.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The backend's rule registry is invalid.
    #[error("rule registry error: {0}")]
    Partition(#[from] partitioner::PartitionError),

    /// The graph could not be loaded.
    #[error("graph error: {0}")]
    Graph(#[from] graph_ir::GraphError),
}
