// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Example: Compare how each backend partitions the same graph.
//!
//! Builds a small transformer-block-like graph with a statically quantized
//! projection and an fp32 attention core, then partitions it for every
//! backend and prints what each one delegates.
//!
//! ```bash
//! cargo run -p backends --example backend_comparison
//! ```

use backends::{Availability, BackendConfig, BackendKind, BackendSelector, PluginRegistry};
use graph_ir::{graph::Validated, Arg, DType, Graph, GraphBuilder, GraphError, NodeId, Shape, TensorMeta};

const Q: &str = "quantized_decomposed.quantize_per_tensor.default";
const DQ: &str = "quantized_decomposed.dequantize_per_tensor.default";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("warn").init();

    let graph = build_graph()?;
    println!("{}\n", graph.summary());

    println!(
        "{:<10} {:>12} {:>10} {:>10}  {}",
        "Backend", "Partitions", "Delegated", "Rejected", "Sizes",
    );
    println!("{}", "-".repeat(64));

    // Pretend every plugin is compiled in so the capability tables can be compared.
    let plugins = BackendKind::ALL
        .into_iter()
        .fold(PluginRegistry::builtin(), |reg, kind| reg.with(kind, Availability::Available));
    let selector = BackendSelector::new(plugins);
    for kind in BackendKind::ALL {
        let mut config = BackendConfig::new(kind);
        config.use_kv_cache = true;
        match selector.select(&config) {
            Ok(backend) => {
                let outcome = backend.partition(&graph);
                outcome.map.validate(&graph)?;
                let sizes: Vec<usize> = outcome.map.partitions().iter().map(|p| p.len()).collect();
                println!(
                    "{:<10} {:>12} {:>10} {:>10}  {:?}",
                    kind.as_str(),
                    outcome.map.num_partitions(),
                    outcome.map.num_delegated(),
                    outcome.rejected().count(),
                    sizes,
                );
            }
            Err(e) => println!("{:<10} {e}", kind.as_str()),
        }
    }

    Ok(())
}

fn meta(dims: Vec<usize>) -> TensorMeta {
    TensorMeta::new(Shape::new(dims), DType::F32)
}

fn qargs(input: NodeId) -> Vec<Arg> {
    vec![input.into(), Arg::Float(0.02), Arg::Int(0), Arg::Int(-128), Arg::Int(127)]
}

/// x ─▶ layer_norm ─▶ q/dq ─▶ linear ─▶ relu ─▶ q/dq ─▶ bmm ─▶ softmax ─▶ gelu ─▶ add(x)
fn build_graph() -> Result<Graph<Validated>, GraphError> {
    let mut b = GraphBuilder::new("block");
    let x = b.input("x", meta(vec![1, 32, 64]));
    let w = b.constant("w", Some(TensorMeta::new(Shape::new(vec![64, 64]), DType::I8)));

    let ln = b.call_with_meta(
        "ln",
        "aten.native_layer_norm.default",
        vec![x.into(), Arg::List(vec![Arg::Int(64)]), Arg::None, Arg::None, Arg::Float(1e-5)],
        meta(vec![1, 32, 64]),
    );
    let q = b.call("q_ln", Q, qargs(ln));
    let dq = b.call("dq_ln", DQ, qargs(q));
    let dw = b.call("dq_w", DQ, qargs(w));
    let proj = b.call_with_meta("proj", "aten.linear.default", vec![dq.into(), dw.into()], meta(vec![1, 32, 64]));
    let relu = b.call("relu", "aten.relu.default", vec![proj.into()]);
    let q_out = b.call("q_proj", Q, qargs(relu));
    let dq_out = b.call_with_meta("dq_proj", DQ, qargs(q_out), meta(vec![1, 32, 64]));

    let scores = b.call_with_meta(
        "scores",
        "aten.bmm.default",
        vec![dq_out.into(), dq_out.into()],
        meta(vec![1, 32, 32]),
    );
    let probs = b.call_with_meta(
        "probs",
        "aten._softmax.default",
        vec![scores.into(), Arg::Int(-1), Arg::Bool(false)],
        meta(vec![1, 32, 32]),
    );
    let act = b.call_with_meta("act", "aten.gelu.default", vec![probs.into()], meta(vec![1, 32, 32]));
    let out = b.call("residual", "aten.add.Tensor", vec![act.into(), x.into()]);
    b.output(vec![out]);

    b.build().validate()
}
