// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `delegate inspect` command: show how each node meets a backend's rules.
//!
//! Prints one row per node with its canonical operator, whether the backend
//! has a rule for it, and the quantization pattern the classifier detects.
//! No partitioning happens here; use `delegate partition` for that.

use anyhow::Context;
use backends::{BackendConfig, BackendSelector};
use graph_ir::{GraphLoader, NodeKind};
use partitioner::{classify, expand, Ineligible, QuantPattern};
use std::path::PathBuf;

pub fn execute(graph_path: PathBuf, config: BackendConfig) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║              delegate · Graph Inspector              ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let graph = GraphLoader::load(&graph_path)
        .with_context(|| format!("failed to load graph from '{}'", graph_path.display()))?;
    let backend = BackendSelector::default().select(&config)?;
    let registry = backend.registry();

    // ── Summary ────────────────────────────────────────────────
    println!("  {}", graph.summary());
    println!("  Backend: {} ({} rules)", backend.kind, registry.len());
    println!();

    // ── Per-Node Detail ────────────────────────────────────────
    println!(
        "  {:<5} {:<28} {:<14} {:<24} {:<6} {}",
        "Id", "Name", "Kind", "Operator", "Rule", "Pattern",
    );
    println!("  {}", "-".repeat(100));

    let mut matched = 0usize;
    for node in graph.iter_nodes() {
        let op = node.canonical_target().unwrap_or("-");
        let (rule_col, pattern) = match registry.match_node(node) {
            Some(rule) => {
                matched += 1;
                ("yes", describe(classify(&graph, node, rule)))
            }
            None if node.kind == NodeKind::CallFunction => ("no", String::new()),
            None => ("", String::new()),
        };
        println!(
            "  {:<5} {:<28} {:<14} {:<24} {:<6} {}",
            node.id.0,
            super::truncate(&node.name, 28),
            node.kind.as_str(),
            super::truncate(op, 24),
            rule_col,
            pattern,
        );
    }
    println!();

    println!(
        "  {matched} of {} call nodes have a {} rule",
        graph.num_call_nodes(),
        backend.kind,
    );
    println!();
    Ok(())
}

fn describe(result: Result<QuantPattern, Ineligible>) -> String {
    match result {
        Ok(pattern) => {
            let precision = pattern.precision;
            let group = expand(&pattern);
            if group.len() > 1 {
                format!("{precision}, fuses {} nodes", group.len() - 1)
            } else {
                precision.to_string()
            }
        }
        Err(Ineligible::PrecisionNotEnabled(mode)) => format!("{mode} not enabled"),
        Err(Ineligible::BrokenQuantChain(detail)) => format!("broken chain: {detail}"),
    }
}
