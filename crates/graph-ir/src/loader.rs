// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Graph loading from disk.

use crate::graph::Validated;
use crate::{Graph, GraphError, GraphManifest};
use std::path::Path;

/// Loads a graph manifest from disk into a validated [`Graph`].
///
/// # Example
/// ```no_run
/// use graph_ir::GraphLoader;
/// use std::path::Path;
///
/// let graph = GraphLoader::load(Path::new("./graphs/mobilenet.json")).unwrap();
/// println!("{}", graph.summary());
/// ```
pub struct GraphLoader;

impl GraphLoader {
    /// Parses, resolves and validates a JSON graph file.
    pub fn load(path: &Path) -> Result<Graph<Validated>, GraphError> {
        let manifest = GraphManifest::from_file(path)?;
        let graph = Self::from_manifest(manifest)?;
        tracing::info!("loaded {} from '{}'", graph.summary(), path.display());
        Ok(graph)
    }

    /// Resolves and validates an in-memory manifest.
    pub fn from_manifest(manifest: GraphManifest) -> Result<Graph<Validated>, GraphError> {
        manifest.into_graph()?.validate()
    }
}
