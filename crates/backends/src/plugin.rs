// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Backend plugin availability.
//!
//! XNNPACK is always built in. The other backends are optional and only
//! present when the crate is compiled with their cargo feature. Callers
//! must check [`Availability`] before building a backend's registry.

use crate::BackendKind;
use std::collections::BTreeMap;

/// Whether a backend can be used in this build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available,
    /// The backend needs something that is not present.
    Unavailable { missing: String },
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

/// Availability of every [`BackendKind`].
#[derive(Debug, Clone)]
pub struct PluginRegistry {
    backends: BTreeMap<BackendKind, Availability>,
}

impl PluginRegistry {
    /// Availability as compiled into this build.
    pub fn builtin() -> Self {
        let compiled = |enabled: bool, feature: &str| {
            if enabled {
                Availability::Available
            } else {
                Availability::Unavailable {
                    missing: format!("cargo feature '{feature}'"),
                }
            }
        };
        let backends = BTreeMap::from([
            (BackendKind::Xnnpack, Availability::Available),
            (BackendKind::Vulkan, compiled(cfg!(feature = "vulkan"), "vulkan")),
            (BackendKind::Mps, compiled(cfg!(feature = "mps"), "mps")),
            (BackendKind::CoreMl, compiled(cfg!(feature = "coreml"), "coreml")),
            (BackendKind::Qnn, compiled(cfg!(feature = "qnn"), "qnn")),
        ]);
        Self { backends }
    }

    /// Overrides one backend's availability.
    pub fn with(mut self, kind: BackendKind, availability: Availability) -> Self {
        self.backends.insert(kind, availability);
        self
    }

    pub fn availability(&self, kind: BackendKind) -> &Availability {
        static AVAILABLE: Availability = Availability::Available;
        self.backends.get(&kind).unwrap_or(&AVAILABLE)
    }

    /// All backends with their availability, in [`BackendKind`] order.
    pub fn iter(&self) -> impl Iterator<Item = (BackendKind, &Availability)> {
        self.backends.iter().map(|(k, a)| (*k, a))
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
