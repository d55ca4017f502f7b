//! Phased construction of the state graph.
//!
//! The `GraphBuilder` runs a schedule of phases over one growing graph. Each
//! phase resolves its seeds and blacklist against the graph built so far,
//! then runs an exhaustive depth-first frontier search: pop a state, expand
//! it once per phase with the rule engine under the phase's exogenous
//! derivative, and record every admitted successor that is neither
//! blacklisted nor the reverse of an existing edge.
//!
//! # Example
//!
//! ```rust
//! use qsim_core::builder::GraphBuilder;
//! use qsim_core::phase::{saturated_state, Schedule};
//! use qsim_core::rules::RuleEngine;
//!
//! let mut builder = GraphBuilder::new(RuleEngine::bathtub());
//! builder.run(&Schedule::bathtub()).unwrap();
//! let simulation = builder.build();
//!
//! assert!(simulation.graph.contains(&saturated_state()));
//! assert_eq!(simulation.phases.len(), 4);
//! ```

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::domain::QualValue;
use crate::graph::{GraphError, StateGraph};
use crate::hash::{graph_fingerprint, ContentHash};
use crate::phase::{Phase, PhaseConfig, Schedule};
use crate::rules::{Rejection, RuleEngine};
use crate::state::{StateDescription, StateError};

/// Errors raised while running a schedule. All of them point at a
/// misconfigured schedule rather than a runtime condition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("phase {phase}: seed state {state} is not in the graph")]
    SeedMissing { phase: Phase, state: StateDescription },

    #[error("phase {phase}: seed rule resolved to no states")]
    EmptyFrontier { phase: Phase },

    #[error("phase {phase}: exogenous inflow derivative cannot be {value}")]
    InvalidExogenous { phase: Phase, value: QualValue },

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Discarded candidates by reason.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscardCounts {
    pub self_loop: usize,
    pub epsilon_ordering: usize,
    pub implausible: usize,
    pub blacklisted: usize,
    pub reverse_edge: usize,
}

impl DiscardCounts {
    fn record(&mut self, reason: Rejection) {
        match reason {
            Rejection::SelfLoop => self.self_loop += 1,
            Rejection::EpsilonOrdering => self.epsilon_ordering += 1,
            Rejection::Implausible => self.implausible += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.self_loop + self.epsilon_ordering + self.implausible + self.blacklisted + self.reverse_edge
    }
}

/// What one phase did to the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseStats {
    pub phase: Phase,
    pub exogenous: QualValue,
    pub seeds: usize,
    pub blacklisted: usize,
    pub expanded: usize,
    pub nodes_added: usize,
    pub edges_added: usize,
    pub discarded: DiscardCounts,
}

/// A finished build: the graph and per-phase statistics.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub graph: StateGraph,
    pub phases: Vec<PhaseStats>,
}

impl Simulation {
    pub fn fingerprint(&self) -> ContentHash {
        graph_fingerprint(&self.graph)
    }
}

/// Grows a state graph phase by phase.
pub struct GraphBuilder {
    engine: RuleEngine,
    graph: StateGraph,
    phases: Vec<PhaseStats>,
}

impl GraphBuilder {
    /// Create a builder with an empty graph.
    pub fn new(engine: RuleEngine) -> Self {
        Self {
            engine,
            graph: StateGraph::new(),
            phases: Vec::new(),
        }
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// The graph built so far.
    pub fn graph(&self) -> &StateGraph {
        &self.graph
    }

    /// Run every phase of `schedule` in order.
    pub fn run(&mut self, schedule: &Schedule) -> Result<(), BuildError> {
        for config in schedule.phases() {
            self.run_phase(config)?;
        }
        Ok(())
    }

    /// Run one phase to closure.
    pub fn run_phase(&mut self, config: &PhaseConfig) -> Result<PhaseStats, BuildError> {
        let phase = config.phase;
        if !self.engine.domain().derivative_space().contains(config.exogenous) {
            return Err(BuildError::InvalidExogenous {
                phase,
                value: config.exogenous,
            });
        }
        let seeds = config.seed.resolve(&self.graph).map_err(|e| match e {
            GraphError::NodeNotFound(state) => BuildError::SeedMissing { phase, state },
            other => BuildError::Graph(other),
        })?;
        if seeds.is_empty() {
            return Err(BuildError::EmptyFrontier { phase });
        }
        if !config.seed.introduces_state() {
            if let Some(state) = seeds.iter().find(|s| !self.graph.contains(s)) {
                return Err(BuildError::SeedMissing {
                    phase,
                    state: *state,
                });
            }
        }
        let blacklist = config.blacklist.resolve(&self.graph, &seeds);

        info!(
            %phase,
            exogenous = %config.exogenous,
            seeds = seeds.len(),
            blacklisted = blacklist.len(),
            "phase started"
        );

        let nodes_before = self.graph.node_count();
        let edges_before = self.graph.edge_count();
        let mut stats = PhaseStats {
            phase,
            exogenous: config.exogenous,
            seeds: seeds.len(),
            blacklisted: blacklist.len(),
            expanded: 0,
            nodes_added: 0,
            edges_added: 0,
            discarded: DiscardCounts::default(),
        };

        let mut frontier = seeds;
        let mut visited: HashSet<StateDescription> = HashSet::new();
        while let Some(state) = frontier.pop() {
            if !visited.insert(state) {
                continue;
            }
            let expansion = self.engine.expand(&state, config.exogenous)?;
            self.graph.ensure_node(state);
            stats.expanded += 1;

            debug!(
                state = %state,
                admitted = expansion.successors.len(),
                rejected = expansion.rejected.len(),
                "expanded state"
            );
            for (candidate, reason) in &expansion.rejected {
                trace!(from = %state, to = %candidate, reason = reason.name(), "candidate discarded");
                stats.discarded.record(*reason);
            }

            for candidate in expansion.successors {
                if blacklist.contains(&candidate) {
                    trace!(from = %state, to = %candidate, reason = "blacklisted", "candidate discarded");
                    stats.discarded.blacklisted += 1;
                    continue;
                }
                match self.graph.add_edge(state, candidate) {
                    Ok(_) => frontier.push(candidate),
                    Err(GraphError::ReverseEdgeExists { .. }) => {
                        trace!(from = %state, to = %candidate, reason = "reverse-edge", "candidate discarded");
                        stats.discarded.reverse_edge += 1;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }

        stats.nodes_added = self.graph.node_count() - nodes_before;
        stats.edges_added = self.graph.edge_count() - edges_before;
        info!(
            %phase,
            expanded = stats.expanded,
            nodes_added = stats.nodes_added,
            edges_added = stats.edges_added,
            discarded = stats.discarded.total(),
            "phase finished"
        );

        self.phases.push(stats.clone());
        Ok(stats)
    }

    /// Finish building and hand over the graph.
    pub fn build(self) -> Simulation {
        Simulation {
            graph: self.graph,
            phases: self.phases,
        }
    }
}

/// Build the graph for `schedule` from scratch.
pub fn simulate(engine: RuleEngine, schedule: &Schedule) -> Result<Simulation, BuildError> {
    let mut builder = GraphBuilder::new(engine);
    builder.run(schedule)?;
    Ok(builder.build())
}
