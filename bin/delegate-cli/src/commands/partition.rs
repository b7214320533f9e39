// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `delegate partition` command: split a graph into backend partitions.

use anyhow::Context;
use backends::{BackendConfig, BackendSelector};
use graph_ir::GraphLoader;
use std::path::PathBuf;

pub fn execute(graph_path: PathBuf, config: BackendConfig, json: bool) -> anyhow::Result<()> {
    let graph = GraphLoader::load(&graph_path)
        .with_context(|| format!("failed to load graph from '{}'", graph_path.display()))?;

    let backend = BackendSelector::default().select(&config)?;
    let outcome = backend.partition(&graph);
    outcome.map.validate(&graph)?;

    if json {
        let rejected: Vec<serde_json::Value> = outcome
            .rejected()
            .map(|(id, reason)| {
                serde_json::json!({
                    "node": graph.node(id).name,
                    "detail": reason,
                })
            })
            .collect();
        let doc = serde_json::json!({
            "backend": backend.kind.as_str(),
            "graph": graph.name,
            "partitions": outcome.map.partitions(),
            "rejected": rejected,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║             delegate · Graph Partitioner             ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    // ── Configuration ──────────────────────────────────────────
    println!("  Graph:    {}", graph.summary());
    println!("  Backend:  {}", backend.kind);
    println!("  Rules:    {}", backend.registry().len());
    let opts = &backend.options;
    println!(
        "  Options:  dynamic_shapes={} compute_precision={} target={}",
        opts.require_dynamic_shapes,
        opts.compute_precision.as_str(),
        opts.deployment_target.as_ref().map_or("-", |t| t.as_str()),
    );
    println!();

    // ── Partitions ─────────────────────────────────────────────
    println!("  {:<4} {:>6} {:>7} {:>8}  {}", "Id", "Nodes", "Inputs", "Outputs", "Members");
    println!("  {}", "-".repeat(72));
    for p in outcome.map.partitions() {
        let names: Vec<&str> = p.nodes.iter().map(|&id| graph.node(id).name.as_str()).collect();
        println!(
            "  {:<4} {:>6} {:>7} {:>8}  {}",
            p.id,
            p.len(),
            p.inputs.len(),
            p.outputs.len(),
            super::truncate(&names.join(", "), 48),
        );
    }
    println!();

    // ── Host Fallback ──────────────────────────────────────────
    let rejected: Vec<_> = outcome.rejected().collect();
    if !rejected.is_empty() {
        println!("  Left on host:");
        for (id, reason) in rejected {
            println!("   {:<32} {}", super::truncate(&graph.node(id).name, 32), reason);
        }
        println!();
    }

    println!("  {}", outcome.summary());
    Ok(())
}
