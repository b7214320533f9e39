// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # graph-ir
//!
//! A read-only view of a tensor data-flow graph, as handed to the
//! delegation partitioner by an upstream exporter.
//!
//! The crate deliberately models only what partitioning needs:
//!
//! - [`Node`] — one operation: operator target, positional and keyword
//!   [`Arg`]s, and the [`TensorMeta`] inferred for its output.
//! - [`Graph`] — nodes in declaration (topological) order, with a
//!   **type-state pattern** (`Loaded` → `Validated`). Consumer
//!   back-references are only available once validated.
//! - [`GraphBuilder`] — programmatic construction, mostly for tests.
//! - [`GraphLoader`] / [`GraphManifest`] — the JSON graph format.
//! - [`op`] — target-name canonicalization and quantize/dequantize marker
//!   detection.
//!
//! Operator numerics are out of scope: a node is an opaque target string
//! plus arguments.
//!
//! # Example
//! ```
//! use graph_ir::{Arg, GraphBuilder, Shape, DType, TensorMeta};
//!
//! let mut b = GraphBuilder::new("tiny");
//! let x = b.input("x", TensorMeta::new(Shape::new(vec![1, 8]), DType::F32));
//! let r = b.call("relu", "aten.relu.default", vec![Arg::Node(x)]);
//! b.output(vec![r]);
//! let graph = b.build().validate().unwrap();
//! assert_eq!(graph.users(x), &[r]);
//! ```

mod builder;
mod dtype;
mod error;
pub mod graph;
mod loader;
pub(crate) mod manifest;
mod node;
pub mod op;
mod shape;

pub use builder::GraphBuilder;
pub use dtype::DType;
pub use error::GraphError;
pub use graph::Graph;
pub use loader::GraphLoader;
pub use manifest::{GraphManifest, ManifestArg, ManifestNode};
pub use node::{Arg, Node, NodeId, NodeKind};
pub use shape::{Dim, Shape, TensorMeta};
