// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for graph construction and loading.

/// Errors that can occur when building, loading or validating a graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The graph file could not be read.
    #[error("failed to read graph: {0}")]
    ReadError(#[from] std::io::Error),

    /// The graph JSON is malformed.
    #[error("failed to parse graph: {0}")]
    ParseError(#[from] serde_json::Error),

    /// A node references another node that does not exist (or is declared later).
    #[error("node '{node}' references unknown node '{reference}'")]
    UnknownNode { node: String, reference: String },

    /// A node definition is invalid.
    #[error("invalid node '{node}': {detail}")]
    InvalidNode { node: String, detail: String },

    /// The graph as a whole is malformed.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),
}
