// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Backend identifiers.

use std::fmt;

/// A delegation target.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Xnnpack,
    Vulkan,
    Mps,
    CoreMl,
    Qnn,
}

impl BackendKind {
    pub const ALL: [BackendKind; 5] = [
        Self::Xnnpack,
        Self::Vulkan,
        Self::Mps,
        Self::CoreMl,
        Self::Qnn,
    ];

    /// Parses a backend name, accepting a few common spellings.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "xnnpack" | "xnn" | "cpu" => Some(Self::Xnnpack),
            "vulkan" => Some(Self::Vulkan),
            "mps" | "metal" => Some(Self::Mps),
            "coreml" => Some(Self::CoreMl),
            "qnn" | "qualcomm" | "htp" => Some(Self::Qnn),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xnnpack => "xnnpack",
            Self::Vulkan => "vulkan",
            Self::Mps => "mps",
            Self::CoreMl => "coreml",
            Self::Qnn => "qnn",
        }
    }

    /// Whether the backend can execute nodes with symbolic dimensions.
    pub fn supports_dynamic_shapes(&self) -> bool {
        matches!(self, Self::Xnnpack | Self::Vulkan)
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
