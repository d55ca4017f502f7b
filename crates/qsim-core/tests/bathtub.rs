//! End-to-end tests for the bathtub scenario.

use qsim_core::domain::{QualValue, Variable};
use qsim_core::graph::traverse::{path_exists, reachable_from};
use qsim_core::phase::{filling_state, saturated_state, tap_on_state, Phase, Schedule};
use qsim_core::rules::RuleEngine;
use qsim_core::{simulate, BuildError, GraphBuilder, Simulation, StateDescription};

fn s(label: &str) -> StateDescription {
    label.parse().expect("valid state label")
}

fn full_build() -> Simulation {
    simulate(RuleEngine::bathtub(), &Schedule::bathtub()).expect("bathtub schedule builds")
}

const EXPECTED_ADJACENCY: &[(&str, &[&str])] = &[
    ("0/+ 0/0 0/0 0/0 0/0", &["+/+ 0/+ 0/+ 0/+ 0/+"]),
    ("+/+ 0/+ 0/+ 0/+ 0/+", &["+/+ +/+ +/+ +/+ +/+"]),
    (
        "+/+ +/+ +/+ +/+ +/+",
        &[
            "+/+ +/0 +/0 +/0 +/0",
            "+/0 +/0 +/0 +/0 +/0",
            "+/0 +/+ +/+ +/+ +/+",
            "+/0 MAX/0 MAX/0 MAX/0 MAX/0",
        ],
    ),
    ("+/+ +/0 +/0 +/0 +/0", &["+/0 +/0 +/0 +/0 +/0", "+/0 +/+ +/+ +/+ +/+"]),
    ("+/0 +/0 +/0 +/0 +/0", &["+/- +/0 +/0 +/0 +/0"]),
    (
        "+/0 +/+ +/+ +/+ +/+",
        &[
            "+/0 +/0 +/0 +/0 +/0",
            "+/0 MAX/0 MAX/0 MAX/0 MAX/0",
            "+/- +/0 +/0 +/0 +/0",
            "+/- +/+ +/+ +/+ +/+",
            "+/- MAX/0 MAX/0 MAX/0 MAX/0",
        ],
    ),
    ("+/0 MAX/0 MAX/0 MAX/0 MAX/0", &["+/- MAX/0 MAX/0 MAX/0 MAX/0"]),
    (
        "+/- MAX/0 MAX/0 MAX/0 MAX/0",
        &["+/- MAX/- MAX/- MAX/- MAX/-", "+/0 MAX/- MAX/- MAX/- MAX/-"],
    ),
    ("+/- MAX/- MAX/- MAX/- MAX/-", &["+/- +/- +/- +/- +/-", "+/0 +/- +/- +/- +/-"]),
    (
        "+/- +/- +/- +/- +/-",
        &[
            "0/- 0/0 0/0 0/0 0/0",
            "0/- +/- +/- +/- +/-",
            "+/- +/0 +/0 +/0 +/0",
            "0/0 0/0 0/0 0/0 0/0",
            "0/0 +/- +/- +/- +/-",
            "+/0 +/- +/- +/- +/-",
        ],
    ),
    ("0/- 0/0 0/0 0/0 0/0", &["0/0 0/0 0/0 0/0 0/0"]),
    (
        "0/- +/- +/- +/- +/-",
        &["0/- 0/0 0/0 0/0 0/0", "0/0 0/0 0/0 0/0 0/0", "0/0 +/- +/- +/- +/-"],
    ),
    (
        "+/- +/0 +/0 +/0 +/0",
        &["0/- +/- +/- +/- +/-", "0/0 +/- +/- +/- +/-", "+/0 +/- +/- +/- +/-"],
    ),
    ("+/- +/+ +/+ +/+ +/+", &["+/- +/0 +/0 +/0 +/0", "+/- MAX/0 MAX/0 MAX/0 MAX/0"]),
    ("0/0 +/- +/- +/- +/-", &["0/0 0/0 0/0 0/0 0/0"]),
    ("+/0 +/- +/- +/- +/-", &[]),
    ("0/0 0/0 0/0 0/0 0/0", &[]),
    ("+/0 MAX/- MAX/- MAX/- MAX/-", &["+/0 +/- +/- +/- +/-"]),
];

#[test]
fn full_graph_matches_expected_adjacency() {
    let sim = full_build();
    let actual: Vec<(String, Vec<String>)> = sim
        .graph
        .adjacency()
        .map(|(state, next)| (state.label(), next.iter().map(|n| n.label()).collect()))
        .collect();
    let expected: Vec<(String, Vec<String>)> = EXPECTED_ADJACENCY
        .iter()
        .map(|(state, next)| (state.to_string(), next.iter().map(|n| n.to_string()).collect()))
        .collect();
    assert_eq!(actual, expected);
}

#[test]
fn node_and_edge_counts_per_phase() {
    let expected = [
        (Phase::RampUp, 4, 3),
        (Phase::Steady1, 7, 10),
        (Phase::RampDown, 14, 24),
        (Phase::Steady2, 18, 36),
    ];
    for (phase, nodes, edges) in expected {
        let sim = simulate(RuleEngine::bathtub(), &Schedule::bathtub().through(phase))
            .expect("schedule prefix builds");
        assert_eq!(
            sim.graph.node_count(),
            nodes,
            "expected {nodes} nodes after {phase}, got {}",
            sim.graph.node_count()
        );
        assert_eq!(
            sim.graph.edge_count(),
            edges,
            "expected {edges} edges after {phase}, got {}",
            sim.graph.edge_count()
        );
    }
}

#[test]
fn tap_opening_reaches_filling_during_ramp_up() {
    let sim = simulate(RuleEngine::bathtub(), &Schedule::bathtub().through(Phase::RampUp))
        .expect("ramp-up builds");
    let discovered: Vec<String> = sim.graph.nodes().map(|n| n.label()).collect();
    assert_eq!(
        discovered,
        vec![
            "0/+ 0/0 0/0 0/0 0/0",
            "+/+ 0/+ 0/+ 0/+ 0/+",
            "+/+ +/+ +/+ +/+ +/+",
            "+/+ +/0 +/0 +/0 +/0",
        ]
    );
    assert!(path_exists(&sim.graph, &tap_on_state(), &filling_state()));
    assert!(!sim.graph.contains(&saturated_state()));
}

#[test]
fn saturated_state_is_reached_but_never_leads_back() {
    let sim = full_build();
    assert!(sim.graph.contains(&saturated_state()));
    assert!(path_exists(&sim.graph, &filling_state(), &saturated_state()));
    assert!(!reachable_from(&sim.graph, &saturated_state()).contains(&tap_on_state()));
}

#[test]
fn ramp_down_seeds_are_steady_successors_of_filling() {
    let mut builder = GraphBuilder::new(RuleEngine::bathtub());
    builder
        .run(&Schedule::bathtub().through(Phase::Steady1))
        .expect("steady-1 builds");
    let steady: Vec<String> = builder
        .graph()
        .successors(&filling_state())
        .expect("filling state is a node")
        .iter()
        .filter(|n| n.derivative(Variable::Inflow) == QualValue::Zero)
        .map(|n| n.label())
        .collect();
    assert_eq!(
        steady,
        vec![
            "+/0 +/0 +/0 +/0 +/0",
            "+/0 +/+ +/+ +/+ +/+",
            "+/0 MAX/0 MAX/0 MAX/0 MAX/0",
        ]
    );

    let schedule = Schedule::bathtub();
    let stats = builder
        .run_phase(&schedule.phases()[2])
        .expect("ramp-down builds");
    assert_eq!(stats.seeds, 3);
    let stats = builder
        .run_phase(&schedule.phases()[3])
        .expect("steady-2 builds");
    assert_eq!(stats.seeds, 7);
}

#[test]
fn drained_and_settled_states_are_terminal() {
    let sim = full_build();
    assert_eq!(
        sim.graph.terminal_nodes(),
        vec![s("+/0 +/- +/- +/- +/-"), s("0/0 0/0 0/0 0/0 0/0")]
    );
}

#[test]
fn graph_has_no_self_loops_or_two_cycles() {
    let sim = full_build();
    for (src, dst) in sim.graph.edges() {
        assert_ne!(src, dst, "self-loop on {src}");
        assert!(!sim.graph.has_edge(&dst, &src), "two-cycle between {src} and {dst}");
    }
}

#[test]
fn edges_never_jump_across_zero_or_the_quantity_space() {
    let sim = full_build();
    for (src, dst) in sim.graph.edges() {
        for variable in Variable::ALL {
            let (a, b) = (src.derivative(variable), dst.derivative(variable));
            assert!(
                !matches!((a, b), (QualValue::Neg, QualValue::Pos) | (QualValue::Pos, QualValue::Neg)),
                "derivative of {variable} jumps in {src} -> {dst}"
            );
            let (a, b) = (src.quantity(variable), dst.quantity(variable));
            assert!(
                !matches!((a, b), (QualValue::Zero, QualValue::Max) | (QualValue::Max, QualValue::Zero)),
                "quantity of {variable} jumps in {src} -> {dst}"
            );
        }
    }
}

#[test]
fn chained_variables_mirror_volume() {
    let sim = full_build();
    for state in sim.graph.nodes() {
        for variable in [Variable::Outflow, Variable::Height, Variable::Pressure] {
            assert_eq!(state.quantity(variable), state.quantity(Variable::Volume));
            assert_eq!(state.derivative(variable), state.derivative(Variable::Volume));
        }
    }
}

#[test]
fn implausible_states_never_appear() {
    let engine = RuleEngine::bathtub();
    let sim = full_build();
    for entry in engine.plausibility().iter() {
        assert!(!sim.graph.contains(entry), "implausible state {entry} in graph");
    }
}

#[test]
fn every_node_is_in_the_domain() {
    let engine = RuleEngine::bathtub();
    let sim = full_build();
    for state in sim.graph.nodes() {
        engine.domain().validate(state).expect("node within its quantity spaces");
    }
}

#[test]
fn rebuilding_is_deterministic() {
    let a = full_build();
    let b = full_build();
    assert_eq!(a.fingerprint(), b.fingerprint());
    let labels = |sim: &Simulation| sim.graph.nodes().map(|n| n.label()).collect::<Vec<_>>();
    assert_eq!(labels(&a), labels(&b));
}

#[test]
fn steady_phase_on_empty_graph_is_a_misconfiguration() {
    let schedule = Schedule::bathtub();
    let mut builder = GraphBuilder::new(RuleEngine::bathtub());
    let err = builder
        .run_phase(&schedule.phases()[1])
        .expect_err("steady-1 needs the filling state");
    assert_eq!(
        err,
        BuildError::SeedMissing {
            phase: Phase::Steady1,
            state: filling_state(),
        }
    );
    assert_eq!(
        err.to_string(),
        "phase steady-1: seed state +/+ +/+ +/+ +/+ +/+ is not in the graph"
    );
}
