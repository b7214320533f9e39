// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `delegate backends` command: list backends and plugin availability.

use backends::{catalog, BackendKind, PluginRegistry};

pub fn execute() -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║               delegate · Backend Plugins             ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let plugins = PluginRegistry::builtin();

    println!(
        "  {:<10} {:>6} {:>9}  {}",
        "Backend", "Rules", "Dynamic", "Status",
    );
    println!("  {}", "-".repeat(60));

    for kind in BackendKind::ALL {
        let status = match plugins.availability(kind) {
            backends::Availability::Available => "available".to_string(),
            backends::Availability::Unavailable { missing } => format!("missing {missing}"),
        };
        println!(
            "  {:<10} {:>6} {:>9}  {}",
            kind.as_str(),
            catalog::rules(kind).len(),
            if kind.supports_dynamic_shapes() { "yes" } else { "no" },
            status,
        );
    }
    println!();
    Ok(())
}
