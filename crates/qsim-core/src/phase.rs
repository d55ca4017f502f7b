//! Phase configuration records.
//!
//! A scenario is a sequence of phases. During a phase the exogenous inflow
//! derivative is held fixed; the phase names where its frontier starts and
//! which already-known states it may not link to. The builder consumes these
//! records uniformly.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{QualValue, Variable};
use crate::graph::{GraphError, StateGraph};
use crate::state::StateDescription;

/// The phases of the scripted bathtub scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Tap opened, inflow rising.
    RampUp,
    /// Inflow held steady.
    Steady1,
    /// Inflow falling.
    RampDown,
    /// Inflow held again after the ramp down.
    Steady2,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::RampUp, Phase::Steady1, Phase::RampDown, Phase::Steady2];

    pub fn name(self) -> &'static str {
        match self {
            Phase::RampUp => "ramp-up",
            Phase::Steady1 => "steady-1",
            Phase::RampDown => "ramp-down",
            Phase::Steady2 => "steady-2",
        }
    }

    /// Parse a phase name (`ramp-up`, `steady_1`, `RAMP_DOWN`, ...).
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Phase::ALL.into_iter().find(|p| p.name() == normalized)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// The state right after the tap is opened: inflow `0/+`, everything else `0/0`.
pub fn tap_on_state() -> StateDescription {
    StateDescription::chained(QualValue::Zero, QualValue::Pos, QualValue::Zero, QualValue::Zero)
}

/// Every coordinate positive: the tub is filling.
pub fn filling_state() -> StateDescription {
    StateDescription::chained(QualValue::Pos, QualValue::Pos, QualValue::Pos, QualValue::Pos)
}

/// Inflow steady and positive, every level held at MAX.
pub fn saturated_state() -> StateDescription {
    StateDescription::chained(QualValue::Pos, QualValue::Zero, QualValue::Max, QualValue::Zero)
}

/// Where a phase's frontier starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedRule {
    /// A fixed state, added to the graph if it is not yet a node.
    State(StateDescription),
    /// An existing node followed by its current successors.
    NodeAndSuccessors(StateDescription),
    /// Current successors of an existing node whose `variable` derivative
    /// equals `derivative`.
    SuccessorsWhere {
        of: StateDescription,
        variable: Variable,
        derivative: QualValue,
    },
    /// Every node in the graph whose `variable` derivative equals
    /// `derivative`.
    NodesWhere {
        variable: Variable,
        derivative: QualValue,
    },
}

impl SeedRule {
    /// Resolve the seed states against the graph built so far, in frontier
    /// push order.
    pub fn resolve(&self, graph: &StateGraph) -> Result<Vec<StateDescription>, GraphError> {
        let successors_of = |state: &StateDescription| {
            graph
                .successors(state)
                .ok_or(GraphError::NodeNotFound(*state))
        };
        match self {
            SeedRule::State(state) => Ok(vec![*state]),
            SeedRule::NodeAndSuccessors(state) => {
                let mut seeds = vec![*state];
                seeds.extend_from_slice(successors_of(state)?);
                Ok(seeds)
            }
            SeedRule::SuccessorsWhere {
                of,
                variable,
                derivative,
            } => Ok(successors_of(of)?
                .iter()
                .filter(|s| s.derivative(*variable) == *derivative)
                .copied()
                .collect()),
            SeedRule::NodesWhere {
                variable,
                derivative,
            } => Ok(graph
                .nodes()
                .filter(|s| s.derivative(*variable) == *derivative)
                .copied()
                .collect()),
        }
    }

    /// True when the seed may be absent from the graph before the phase.
    pub fn introduces_state(&self) -> bool {
        matches!(self, SeedRule::State(_))
    }
}

/// Which known states a phase may not link to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlacklistRule {
    /// Nothing is blacklisted.
    Empty,
    /// Every node present when the phase starts, except its seeds.
    AllExceptSeeds,
}

impl BlacklistRule {
    pub fn resolve(
        &self,
        graph: &StateGraph,
        seeds: &[StateDescription],
    ) -> HashSet<StateDescription> {
        match self {
            BlacklistRule::Empty => HashSet::new(),
            BlacklistRule::AllExceptSeeds => graph
                .nodes()
                .filter(|s| !seeds.contains(s))
                .copied()
                .collect(),
        }
    }
}

/// One phase: its fixed exogenous derivative, frontier seed and blacklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseConfig {
    pub phase: Phase,
    pub exogenous: QualValue,
    pub seed: SeedRule,
    pub blacklist: BlacklistRule,
}

/// An ordered list of phases run one after another over the same graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    phases: Vec<PhaseConfig>,
}

impl Schedule {
    pub fn new(phases: Vec<PhaseConfig>) -> Self {
        Self { phases }
    }

    /// Tap opened, inflow ramps up, holds, ramps down, holds again.
    pub fn bathtub() -> Self {
        let filling = filling_state();
        Self::new(vec![
            PhaseConfig {
                phase: Phase::RampUp,
                exogenous: QualValue::Pos,
                seed: SeedRule::State(tap_on_state()),
                blacklist: BlacklistRule::Empty,
            },
            PhaseConfig {
                phase: Phase::Steady1,
                exogenous: QualValue::Zero,
                seed: SeedRule::NodeAndSuccessors(filling),
                blacklist: BlacklistRule::AllExceptSeeds,
            },
            PhaseConfig {
                phase: Phase::RampDown,
                exogenous: QualValue::Neg,
                seed: SeedRule::SuccessorsWhere {
                    of: filling,
                    variable: Variable::Inflow,
                    derivative: QualValue::Zero,
                },
                blacklist: BlacklistRule::AllExceptSeeds,
            },
            PhaseConfig {
                phase: Phase::Steady2,
                exogenous: QualValue::Zero,
                seed: SeedRule::NodesWhere {
                    variable: Variable::Inflow,
                    derivative: QualValue::Neg,
                },
                blacklist: BlacklistRule::AllExceptSeeds,
            },
        ])
    }

    /// The prefix of this schedule up to and including `last`.
    pub fn through(mut self, last: Phase) -> Self {
        if let Some(pos) = self.phases.iter().position(|p| p.phase == last) {
            self.phases.truncate(pos + 1);
        }
        self
    }

    pub fn phases(&self) -> &[PhaseConfig] {
        &self.phases
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::bathtub()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_names_parse() {
        for phase in Phase::ALL {
            assert_eq!(Phase::parse(phase.name()), Some(phase));
        }
        assert_eq!(Phase::parse("STEADY_2"), Some(Phase::Steady2));
        assert_eq!(Phase::parse("plateau"), None);
    }

    #[test]
    fn bathtub_schedule_shape() {
        let schedule = Schedule::bathtub();
        let exogenous: Vec<QualValue> = schedule.phases().iter().map(|p| p.exogenous).collect();
        assert_eq!(
            exogenous,
            vec![QualValue::Pos, QualValue::Zero, QualValue::Neg, QualValue::Zero]
        );
        assert_eq!(schedule.phases()[0].blacklist, BlacklistRule::Empty);
        assert!(schedule.phases()[0].seed.introduces_state());
        assert!(!schedule.phases()[1].seed.introduces_state());
    }

    #[test]
    fn truncated_schedule() {
        let schedule = Schedule::bathtub().through(Phase::Steady1);
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule.phases()[1].phase, Phase::Steady1);
    }

    #[test]
    fn seed_rules_resolve_against_graph() {
        let mut g = StateGraph::new();
        let filling = filling_state();
        let held = StateDescription::chained(QualValue::Pos, QualValue::Zero, QualValue::Pos, QualValue::Pos);
        let rising = StateDescription::chained(QualValue::Pos, QualValue::Pos, QualValue::Pos, QualValue::Zero);
        g.ensure_node(filling);
        g.add_edge(filling, rising).unwrap();
        g.add_edge(filling, held).unwrap();

        let seeds = SeedRule::NodeAndSuccessors(filling).resolve(&g).unwrap();
        assert_eq!(seeds, vec![filling, rising, held]);

        let seeds = SeedRule::SuccessorsWhere {
            of: filling,
            variable: Variable::Inflow,
            derivative: QualValue::Zero,
        }
        .resolve(&g)
        .unwrap();
        assert_eq!(seeds, vec![held]);

        let seeds = SeedRule::NodesWhere {
            variable: Variable::Inflow,
            derivative: QualValue::Pos,
        }
        .resolve(&g)
        .unwrap();
        assert_eq!(seeds, vec![filling, rising]);

        let missing = SeedRule::NodeAndSuccessors(tap_on_state()).resolve(&g);
        assert_eq!(missing, Err(GraphError::NodeNotFound(tap_on_state())));
    }

    #[test]
    fn blacklist_excludes_seeds() {
        let mut g = StateGraph::new();
        g.ensure_node(tap_on_state());
        g.ensure_node(filling_state());
        let black = BlacklistRule::AllExceptSeeds.resolve(&g, &[filling_state()]);
        assert_eq!(black.len(), 1);
        assert!(black.contains(&tap_on_state()));
        assert!(BlacklistRule::Empty.resolve(&g, &[]).is_empty());
    }
}
