// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Integration tests: graph → backend selection → partitioning.
//!
//! These exercise the complete flow from graph construction through
//! capability tables and the partitioner engine, and check the structural
//! properties every partition map must have.

use backends::{
    catalog, Availability, BackendConfig, BackendKind, BackendSelector, PluginRegistry,
};
use graph_ir::graph::Validated;
use graph_ir::{Arg, DType, Graph, GraphBuilder, GraphLoader, NodeId, Shape, TensorMeta};
use partitioner::{
    NodeDecision, OperatorRule, PartitionOptions, PartitionOutcome, Partitioner, PrecisionMode,
    PrecisionSet, RejectReason, RuleRegistry,
};

const Q: &str = "quantized_decomposed.quantize_per_tensor.default";
const DQ: &str = "quantized_decomposed.dequantize_per_tensor.default";

// ── Helpers ────────────────────────────────────────────────────

fn f32_meta(dims: Vec<usize>) -> TensorMeta {
    TensorMeta::new(Shape::new(dims), DType::F32)
}

fn qargs(input: NodeId) -> Vec<Arg> {
    vec![input.into(), Arg::Float(0.02), Arg::Int(0), Arg::Int(-128), Arg::Int(127)]
}

fn ints(v: &[i64]) -> Arg {
    Arg::List(v.iter().map(|&i| Arg::Int(i)).collect())
}

fn all_backends() -> BackendSelector {
    let plugins = BackendKind::ALL
        .into_iter()
        .fold(PluginRegistry::builtin(), |p, k| p.with(k, Availability::Available));
    BackendSelector::new(plugins)
}

fn xnnpack(graph: &Graph<Validated>) -> PartitionOutcome {
    let backend = BackendSelector::default()
        .select(&BackendConfig::new(BackendKind::Xnnpack))
        .unwrap();
    let outcome = backend.partition(graph);
    outcome.map.validate(graph).unwrap();
    outcome
}

fn rejected(outcome: &PartitionOutcome, id: NodeId) -> &RejectReason {
    match outcome.decision(id) {
        NodeDecision::Rejected(reason) => reason,
        other => panic!("{id} was not rejected: {other:?}"),
    }
}

/// Every delegated node shares a partition with its fusion anchor.
fn assert_groups_atomic(outcome: &PartitionOutcome) {
    for (i, decision) in outcome.decisions().iter().enumerate() {
        if let NodeDecision::Delegated { partition, anchor, .. } = decision {
            assert_eq!(outcome.map.partition_of(NodeId(i)), Some(*partition));
            assert_eq!(outcome.map.partition_of(*anchor), Some(*partition));
        }
    }
}

/// A small convnet-style graph mixing quantized and fp32 regions:
///
/// ```text
/// q/dq ─▶ add ─▶ relu ─▶ q ─▶ dq ─▶ max_pool2d ─▶ q ─▶ dq ─▶ sin ─▶ abs ─▶ softmax
/// ```
fn mixed_graph() -> Graph<Validated> {
    let mut b = GraphBuilder::new("mixed");
    let x = b.input("x", f32_meta(vec![1, 8, 16, 16]));
    let y = b.input("y", f32_meta(vec![1, 8, 16, 16]));
    let qx = b.call("qx", Q, qargs(x));
    let qy = b.call("qy", Q, qargs(y));
    let dx = b.call("dx", DQ, qargs(qx));
    let dy = b.call("dy", DQ, qargs(qy));
    let add = b.call_with_meta("add", "aten.add.Tensor", vec![dx.into(), dy.into()], f32_meta(vec![1, 8, 16, 16]));
    let relu = b.call("relu", "aten.relu.default", vec![add.into()]);
    let qo = b.call("qo", Q, qargs(relu));
    let d2 = b.call("d2", DQ, qargs(qo));
    let pool = b.call_with_meta(
        "pool",
        "aten.max_pool2d.default",
        vec![d2.into(), ints(&[2, 2]), ints(&[2, 2])],
        f32_meta(vec![1, 8, 8, 8]),
    );
    let q3 = b.call("q3", Q, qargs(pool));
    let d3 = b.call("d3", DQ, qargs(q3));
    let sin = b.call("sin", "aten.sin.default", vec![d3.into()]);
    let abs = b.call_with_meta("abs", "aten.abs.default", vec![sin.into()], f32_meta(vec![1, 8, 8, 8]));
    let sm = b.call_with_meta(
        "softmax",
        "aten._softmax.default",
        vec![abs.into(), Arg::Int(-1), Arg::Bool(false)],
        f32_meta(vec![1, 8, 8, 8]),
    );
    b.output(vec![sm]);
    b.build().validate().unwrap()
}

// ── Scenarios ──────────────────────────────────────────────────

#[test]
fn test_scenario_a_avg_pool_default_count_include_pad_rejected() {
    let mut b = GraphBuilder::new("a");
    let x = b.input("x", f32_meta(vec![1, 3, 8, 8]));
    let pool = b.call(
        "pool",
        "exir_ops.edge.aten.avg_pool2d.default",
        vec![x.into(), ints(&[2, 2])],
    );
    b.output(vec![pool]);
    let g = b.build().validate().unwrap();

    let outcome = xnnpack(&g);
    assert_eq!(
        rejected(&outcome, pool),
        &RejectReason::ConstraintFailed { op: "avg_pool2d".into() }
    );
    assert_eq!(outcome.map.num_partitions(), 0);
}

#[test]
fn test_scenario_b_cat_of_five_rejected() {
    let mut b = GraphBuilder::new("b");
    let inputs: Vec<NodeId> = (0..5)
        .map(|i| b.input(&format!("x{i}"), f32_meta(vec![1, 4])))
        .collect();
    let cat = b.call(
        "cat",
        "aten.cat.default",
        vec![Arg::List(inputs.iter().map(|&i| i.into()).collect()), Arg::Int(1)],
    );
    b.output(vec![cat]);
    let g = b.build().validate().unwrap();

    let outcome = xnnpack(&g);
    assert_eq!(
        rejected(&outcome, cat),
        &RejectReason::ConstraintFailed { op: "cat".into() }
    );
}

#[test]
fn test_scenario_c_softmax_last_dim_delegated_fp32() {
    let mut b = GraphBuilder::new("c");
    let x = b.input("x", f32_meta(vec![2, 4, 8, 16]));
    let sm = b.call("sm", "aten._softmax.default", vec![x.into(), Arg::Int(-1), Arg::Bool(false)]);
    b.output(vec![sm]);
    let g = b.build().validate().unwrap();

    let outcome = xnnpack(&g);
    assert_eq!(
        outcome.decision(sm),
        &NodeDecision::Delegated {
            partition: 0,
            precision: PrecisionMode::Fp32,
            anchor: sm,
        }
    );
}

#[test]
fn test_scenario_d_quantized_add_relu_fused() {
    let g = mixed_graph();
    let id = |name: &str| g.find(name).unwrap().id;
    let outcome = xnnpack(&g);

    let p = outcome.map.partition_of(id("add")).unwrap();
    for name in ["dx", "dy", "relu", "qo"] {
        assert_eq!(
            outcome.decision(id(name)),
            &NodeDecision::Delegated {
                partition: p,
                precision: PrecisionMode::StaticQuant,
                anchor: id("add"),
            },
            "{name}"
        );
    }
    assert_groups_atomic(&outcome);
}

#[test]
fn test_scenario_e_partially_dequantized_add_runs_fp32() {
    let mut b = GraphBuilder::new("e");
    let x = b.input("x", f32_meta(vec![1, 4]));
    let y = b.input("y", f32_meta(vec![1, 4]));
    let qx = b.call("qx", Q, qargs(x));
    let dx = b.call("dx", DQ, qargs(qx));
    let add = b.call("add", "aten.add.Tensor", vec![dx.into(), y.into()]);
    b.output(vec![add]);
    let g = b.build().validate().unwrap();

    let outcome = xnnpack(&g);
    assert_eq!(
        outcome.decision(add),
        &NodeDecision::Delegated {
            partition: outcome.map.partition_of(add).unwrap(),
            precision: PrecisionMode::Fp32,
            anchor: add,
        }
    );
    // The marker is not part of add's group; it is delegated on its own.
    match outcome.decision(dx) {
        NodeDecision::Delegated { anchor, precision, .. } => {
            assert_eq!(*anchor, dx);
            assert_eq!(*precision, PrecisionMode::StaticQuant);
        }
        other => panic!("dx: {other:?}"),
    }
}

// ── Properties ─────────────────────────────────────────────────

#[test]
fn test_partitions_are_disjoint_and_valid_on_every_backend() {
    let g = mixed_graph();
    for kind in BackendKind::ALL {
        let mut config = BackendConfig::new(kind);
        config.use_kv_cache = true;
        let backend = all_backends().select(&config).unwrap();
        let outcome = backend.partition(&g);
        outcome.map.validate(&g).unwrap();
        assert_groups_atomic(&outcome);

        let mut seen = vec![false; g.num_nodes()];
        for p in outcome.map.partitions() {
            for n in &p.nodes {
                assert!(!seen[n.index()], "{kind}: {n} in two partitions");
                seen[n.index()] = true;
            }
        }
    }
}

#[test]
fn test_unsupported_op_splits_partitions() {
    let g = mixed_graph();
    let id = |name: &str| g.find(name).unwrap().id;
    let outcome = xnnpack(&g);

    assert_eq!(
        rejected(&outcome, id("sin")),
        &RejectReason::NoRule { op: "sin".into() }
    );
    assert_ne!(
        outcome.map.partition_of(id("pool")),
        outcome.map.partition_of(id("abs"))
    );
    assert_eq!(
        outcome.map.partition_of(id("abs")),
        outcome.map.partition_of(id("softmax"))
    );
    assert_eq!(outcome.rejected().count(), 1);
}

#[test]
fn test_partitioning_is_deterministic() {
    let g = mixed_graph();
    let a = xnnpack(&g);
    let b = xnnpack(&g);
    assert_eq!(a.map.partitions(), b.map.partitions());
    assert_eq!(a.decisions(), b.decisions());
    assert_eq!(
        serde_json::to_string(&a.map).unwrap(),
        serde_json::to_string(&b.map).unwrap()
    );
}

#[test]
fn test_unused_rules_do_not_change_the_result() {
    let g = mixed_graph();
    let base = RuleRegistry::builder()
        .extend(catalog::rules(BackendKind::Xnnpack))
        .build()
        .unwrap();
    let extended = RuleRegistry::builder()
        .extend(catalog::rules(BackendKind::Xnnpack))
        .register(OperatorRule::new("aten.erf.default", PrecisionSet::FP32))
        .register(OperatorRule::new("aten.tanh.default", PrecisionSet::FP32))
        .build()
        .unwrap();

    let options = PartitionOptions::new("xnnpack");
    let a = Partitioner::new(base, options.clone()).partition(&g);
    let b = Partitioner::new(extended, options).partition(&g);
    assert_eq!(a.map.partitions(), b.map.partitions());
    assert_eq!(a.decisions(), b.decisions());
}

#[test]
fn test_dynamically_quantized_linear() {
    let mut b = GraphBuilder::new("dq_linear");
    let x = b.input("x", f32_meta(vec![1, 16]));
    let w = b.constant("w", Some(TensorMeta::new(Shape::new(vec![8, 16]), DType::I8)));
    let cqp = b.call(
        "choose_qparams",
        "quantized_decomposed.choose_qparams_per_token_asymmetric.default",
        vec![x.into(), Arg::Str("int8".into())],
    );
    let scale = b.call("scale", "operator.getitem", vec![cqp.into(), Arg::Int(0)]);
    let zp = b.call("zero_point", "operator.getitem", vec![cqp.into(), Arg::Int(1)]);
    let qx = b.call(
        "qx",
        "quantized_decomposed.quantize_per_token.default",
        vec![x.into(), scale.into(), zp.into(), Arg::Int(-128), Arg::Int(127)],
    );
    let dx = b.call(
        "dx",
        "quantized_decomposed.dequantize_per_token.default",
        vec![qx.into(), scale.into(), zp.into(), Arg::Int(-128), Arg::Int(127)],
    );
    let dw = b.call(
        "dw",
        "quantized_decomposed.dequantize_per_channel.default",
        vec![w.into(), Arg::Float(0.01), Arg::Int(0), Arg::Int(0), Arg::Int(-128), Arg::Int(127)],
    );
    let linear = b.call("linear", "aten.linear.default", vec![dx.into(), dw.into()]);
    b.output(vec![linear]);
    let g = b.build().validate().unwrap();

    let mut config = BackendConfig::new(BackendKind::Xnnpack);
    config.quantization_mode = Some("8da4w".into());
    let backend = BackendSelector::default().select(&config).unwrap();
    let outcome = backend.partition(&g);
    outcome.map.validate(&g).unwrap();

    assert_eq!(outcome.map.num_partitions(), 1);
    let p = &outcome.map.partitions()[0];
    assert_eq!(p.nodes, vec![cqp, scale, zp, qx, dx, dw, linear]);
    assert_eq!(p.inputs, vec![x, w]);
    assert_eq!(p.outputs, vec![linear]);
    assert!(matches!(
        outcome.decision(cqp),
        NodeDecision::Delegated { precision: PrecisionMode::DynamicQuant, anchor, .. } if *anchor == linear
    ));
}

#[test]
fn test_skip_sets_from_config() {
    let g = mixed_graph();
    let id = |name: &str| g.find(name).unwrap().id;
    let mut config = BackendConfig::new(BackendKind::Xnnpack);
    config.skip_node_id_set = vec!["softmax".into()];
    config.skip_node_op_set = vec!["aten.max_pool2d.default".into()];
    let outcome = BackendSelector::default().select(&config).unwrap().partition(&g);
    outcome.map.validate(&g).unwrap();

    assert_eq!(rejected(&outcome, id("softmax")), &RejectReason::SkippedById);
    assert_eq!(rejected(&outcome, id("pool")), &RejectReason::SkippedByOp);
}

#[test]
fn test_shared_dequant_input_keeps_partitions_convex() {
    // qx ─▶ d1 ─▶ add ─▶ qo, with d1 ─▶ sin ─▶ qs ─▶ d2 ─▶ add on the side.
    let mut b = GraphBuilder::new("residual");
    let x = b.input("x", f32_meta(vec![1, 16]));
    let qx = b.call("qx", Q, qargs(x));
    let d1 = b.call("d1", DQ, qargs(qx));
    let sin = b.call("sin", "aten.sin.default", vec![d1.into()]);
    let qs = b.call("qs", Q, qargs(sin));
    let d2 = b.call("d2", DQ, qargs(qs));
    let add = b.call("add", "aten.add.Tensor", vec![d1.into(), d2.into()]);
    let qo = b.call("qo", Q, qargs(add));
    b.output(vec![qo]);
    let g = b.build().validate().unwrap();

    // `xnnpack` validates the map, which fails on a non-convex partition.
    let outcome = xnnpack(&g);
    assert_eq!(rejected(&outcome, add), &RejectReason::NonConvexGroup);
    assert_eq!(rejected(&outcome, sin), &RejectReason::NoRule { op: "sin".into() });
    for p in outcome.map.partitions() {
        assert!(!(p.contains(d1) && p.contains(d2)), "partition {} spans sin", p.id);
    }
    assert_groups_atomic(&outcome);
}

#[test]
fn test_static_shape_backend_rejects_symbolic_dims() {
    let json = r#"{
        "name": "dyn",
        "nodes": [
            { "name": "x", "op": "placeholder", "meta": { "shape": ["batch", 8], "dtype": "f32" } },
            { "name": "r", "op": "call_function", "target": "aten.relu.default",
              "args": [{ "node": "x" }], "meta": { "shape": ["batch", 8], "dtype": "f32" } },
            { "name": "output", "op": "output", "args": [[{ "node": "r" }]] }
        ]
    }"#;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.json");
    std::fs::write(&path, json).unwrap();
    let g = GraphLoader::load(&path).unwrap();
    let r = g.find("r").unwrap().id;

    let mut config = BackendConfig::new(BackendKind::Qnn);
    config.use_kv_cache = true;
    let qnn = all_backends().select(&config).unwrap().partition(&g);
    assert_eq!(rejected(&qnn, r), &RejectReason::DynamicShape);

    let vulkan = all_backends()
        .select(&BackendConfig::new(BackendKind::Vulkan))
        .unwrap()
        .partition(&g);
    assert!(vulkan.decision(r).is_delegated());
}

#[test]
fn test_configuration_errors_surface_before_traversal() {
    let selector = all_backends();

    let mut vulkan = BackendConfig::new(BackendKind::Vulkan);
    vulkan.quantization_mode = Some("8da4w".into());
    assert!(selector.select(&vulkan).is_err());

    let mps = BackendConfig::new(BackendKind::Mps);
    assert!(selector.select(&mps).is_err());

    let mut qnn = BackendConfig::new(BackendKind::Qnn);
    qnn.use_kv_cache = true;
    qnn.quantization_mode = Some("qnn_16a4w".into());
    assert!(selector.select(&qnn).is_err());

    let toml = r#"
backend = "xnnpack"

[enabled_precision_types]
"aten.sigmoid.default" = ["static_quant"]
"#;
    let config = BackendConfig::from_toml(toml).unwrap();
    let err = selector.select(&config).unwrap_err();
    assert!(err.to_string().contains("sigmoid"), "{err}");
}
