// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and shared CLI plumbing.

pub mod backends;
pub mod inspect;
pub mod partition;

use anyhow::Context;
use ::backends::{BackendConfig, BackendKind};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level follows the `-v` count.
pub fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolves the backend configuration.
///
/// A config file is taken as-is. Without one, a default config is built for
/// `backend` and `tweak` applies the command-line flags to it.
pub fn load_config(
    path: Option<&Path>,
    backend: &str,
    tweak: impl FnOnce(&mut BackendConfig),
) -> anyhow::Result<BackendConfig> {
    if let Some(path) = path {
        let config = BackendConfig::from_file(path)
            .with_context(|| format!("failed to load config from '{}'", path.display()))?;
        tracing::info!(path = %path.display(), backend = %config.backend, "loaded backend config");
        return Ok(config);
    }

    let kind = BackendKind::from_str_loose(backend)
        .with_context(|| format!("unknown backend '{backend}'"))?;
    let mut config = BackendConfig::new(kind);
    tweak(&mut config);
    Ok(config)
}

/// Truncates a string to `max_len` characters with ellipsis if needed.
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
