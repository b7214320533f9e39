// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # delegate
//!
//! Command-line interface for the delegation partitioner.
//!
//! ## Usage
//! ```bash
//! # Partition an exported graph for XNNPACK
//! delegate partition --graph ./model.graph.json --backend xnnpack
//!
//! # Same, driven by a TOML backend config, JSON on stdout
//! delegate --config ./qnn.toml partition --graph ./model.graph.json --json
//!
//! # Show how each node classifies against a backend's rules
//! delegate inspect --graph ./model.graph.json --backend coreml
//!
//! # List backends compiled into this binary
//! delegate backends
//! ```

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "delegate",
    about = "Partition exported tensor graphs for hardware-accelerator backends",
    version,
    author
)]
struct Cli {
    /// Path to a TOML backend configuration file (overrides CLI arguments).
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Partition a graph and print the delegated subgraphs.
    Partition {
        /// Path to the JSON graph file.
        #[arg(short, long)]
        graph: std::path::PathBuf,

        /// Backend: xnnpack, vulkan, mps, coreml, qnn.
        #[arg(short, long, default_value = "xnnpack")]
        backend: String,

        /// The graph was exported with a KV cache (required by mps, coreml, qnn).
        #[arg(long)]
        kv_cache: bool,

        /// Quantization scheme the graph was exported with (e.g. "8da4w").
        #[arg(short, long)]
        quantization: Option<String>,

        /// Emit the partition map as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Inspect a graph: per-node rule matches and quantization patterns.
    Inspect {
        /// Path to the JSON graph file.
        #[arg(short, long)]
        graph: std::path::PathBuf,

        /// Backend whose rules are consulted.
        #[arg(short, long, default_value = "xnnpack")]
        backend: String,
    },

    /// List backends and whether their plugins are available.
    Backends,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Partition {
            graph,
            backend,
            kv_cache,
            quantization,
            json,
        } => {
            let config = commands::load_config(cli.config.as_deref(), &backend, |c| {
                c.use_kv_cache |= kv_cache;
                if quantization.is_some() {
                    c.quantization_mode = quantization.clone();
                }
            })?;
            commands::partition::execute(graph, config, json)
        }
        Commands::Inspect { graph, backend } => {
            let config = commands::load_config(cli.config.as_deref(), &backend, |_| {})?;
            commands::inspect::execute(graph, config)
        }
        Commands::Backends => commands::backends::execute(),
    }
}
