// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # partitioner
//!
//! Decides which nodes of a validated [`graph_ir::Graph`] a backend
//! accelerator executes, and groups them into partitions.
//!
//! The pipeline per node:
//!
//! 1. [`RuleRegistry::match_node`] finds the [`OperatorRule`] for the
//!    node's canonical operator.
//! 2. [`classify`] inspects the surrounding quantize/dequantize markers
//!    and picks a [`PrecisionMode`].
//! 3. The rule's legality [`Constraint`] is checked.
//! 4. [`expand`] turns the pattern into a [`FusionGroup`] whose members
//!    are delegated together.
//! 5. The [`Partitioner`] commits the group and merges it with adjacent
//!    partitions, producing a [`PartitionMap`].
//!
//! A node that fails any step is *rejected* with a [`RejectReason`] and
//! runs on the host. Only invalid rule configuration is an error
//! ([`PartitionError`]), and it surfaces when the registry is built.
//!
//! # Example
//! ```
//! use graph_ir::{Arg, GraphBuilder};
//! use partitioner::{OperatorRule, PartitionOptions, Partitioner, PrecisionSet, RuleRegistry};
//!
//! let mut b = GraphBuilder::new("g");
//! let x = b.placeholder("x");
//! let r = b.call("relu", "aten.relu.default", vec![Arg::Node(x)]);
//! b.output(vec![r]);
//! let graph = b.build().validate().unwrap();
//!
//! let registry = RuleRegistry::builder()
//!     .register(OperatorRule::new("relu.default", PrecisionSet::FP32))
//!     .build()
//!     .unwrap();
//! let outcome = Partitioner::new(registry, PartitionOptions::new("demo")).partition(&graph);
//! println!("{}", outcome.summary());
//! ```

mod engine;
mod error;
mod fusion;
pub(crate) mod partition;
pub mod precision;
mod registry;
mod rule;

pub use engine::{NodeDecision, PartitionOptions, PartitionOutcome, Partitioner, RejectReason};
pub use error::PartitionError;
pub use fusion::{expand, FusionGroup};
pub use partition::{Partition, PartitionMap};
pub use precision::{classify, Ineligible, PrecisionMode, PrecisionSet, QuantPattern};
pub use registry::{RegistryBuilder, RuleRegistry};
pub use rule::{Constraint, OperatorRule};
