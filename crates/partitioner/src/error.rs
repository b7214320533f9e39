// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the partitioner.
//!
//! Only configuration problems are errors. A node that cannot be
//! delegated is an ordinary outcome, reported as a
//! [`crate::RejectReason`] in the partition result.

use crate::PrecisionMode;

/// Errors raised while building a rule registry or checking a partition map.
#[derive(Debug, thiserror::Error)]
pub enum PartitionError {
    /// Two rules were registered for the same canonical operator.
    #[error("duplicate rule for operator '{op}'")]
    DuplicateRule { op: String },

    /// A precision override names an operator that has no rule.
    #[error("no rule registered for operator '{op}'")]
    UnknownRule { op: String },

    /// A precision was enabled on a rule that cannot execute it.
    #[error("operator '{op}' does not support {precision} execution")]
    UnsupportedPrecision { op: String, precision: PrecisionMode },

    /// A precision override left a rule with nothing enabled.
    #[error("operator '{op}' has no enabled precision")]
    NoEnabledPrecision { op: String },

    /// A partition map violates one of its structural invariants.
    #[error("invalid partition map for '{backend}': {detail}")]
    InvalidPartition { backend: String, detail: String },
}
