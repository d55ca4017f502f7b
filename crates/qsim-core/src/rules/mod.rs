//! Transition rule engine.
//!
//! Given a state and the exogenous inflow derivative of the current phase,
//! the engine derives every admissible next state. Candidates are built
//! coordinate by coordinate, each step narrowing what the previous one
//! allowed:
//!
//! 1. inflow quantity from the previous inflow derivative,
//! 2. volume quantity from the previous volume derivative,
//! 3. volume quantity copied down the proportionality chain,
//! 4. volume derivative from the net influence of inflow and outflow,
//! 5. volume derivative copied down the chain,
//! 6. epsilon ordering of point exits,
//! 7. the plausibility table.
//!
//! A branch that runs out of candidates contributes no successor; that is a
//! normal outcome.

pub mod influence;
pub mod plausibility;

use crate::domain::{Aspect, Direction, DomainModel, QualValue, Variable};
use crate::state::{StateDescription, StateError};

use self::influence::{net_influence, trend, NetInfluence, Trend};
use self::plausibility::PlausibilityTable;

/// Why a fully assembled candidate was not admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The candidate equals the state it was derived from.
    SelfLoop,
    /// A point exit was deferred or coincided with an unrelated change.
    EpsilonOrdering,
    /// The candidate is listed in the plausibility table.
    Implausible,
}

impl Rejection {
    pub fn name(self) -> &'static str {
        match self {
            Rejection::SelfLoop => "self-loop",
            Rejection::EpsilonOrdering => "epsilon-ordering",
            Rejection::Implausible => "implausible",
        }
    }
}

/// Result of expanding one state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    /// Admitted successors in candidate enumeration order.
    pub successors: Vec<StateDescription>,
    /// Candidates assembled from the rules but then discarded.
    pub rejected: Vec<(StateDescription, Rejection)>,
}

/// Pure transition rules over a fixed domain model and plausibility table.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    domain: DomainModel,
    plausibility: PlausibilityTable,
}

impl RuleEngine {
    pub fn new(domain: DomainModel, plausibility: PlausibilityTable) -> Self {
        Self {
            domain,
            plausibility,
        }
    }

    /// The bathtub domain with the built-in plausibility table.
    pub fn bathtub() -> Self {
        Self::new(DomainModel::bathtub(), PlausibilityTable::builtin())
    }

    pub fn domain(&self) -> &DomainModel {
        &self.domain
    }

    pub fn plausibility(&self) -> &PlausibilityTable {
        &self.plausibility
    }

    /// Step 1: candidate inflow quantities.
    ///
    /// A steady inflow keeps its quantity. A rising inflow must be positive
    /// next (zero cannot be held while rising). A falling inflow may hold or
    /// drop one step.
    pub fn determine_iq(&self, state: &StateDescription) -> Vec<QualValue> {
        let space = self.domain.quantity_space(Variable::Inflow);
        let q = state.quantity(Variable::Inflow);
        match Direction::of(state.derivative(Variable::Inflow)) {
            None => vec![q],
            Some(Direction::Up) => vec![space.step(q, Direction::Up).unwrap_or(q)],
            Some(Direction::Down) => {
                space.ordered(std::iter::once(q).chain(space.step(q, Direction::Down)))
            }
        }
    }

    /// Step 2: candidate volume quantities.
    ///
    /// A point held with a nonzero derivative must be left; an interval may
    /// be held or left one step in the derivative's direction.
    pub fn determine_vq(&self, state: &StateDescription) -> Vec<QualValue> {
        let space = self.domain.quantity_space(Variable::Volume);
        let q = state.quantity(Variable::Volume);
        let Some(direction) = Direction::of(state.derivative(Variable::Volume)) else {
            return vec![q];
        };
        let next = space.step(q, direction);
        if space.is_point(q) {
            next.into_iter().collect()
        } else {
            space.ordered(std::iter::once(q).chain(next))
        }
    }

    /// Step 4: candidate volume derivatives for a chosen inflow quantity and
    /// volume quantity (which outflow shares through the chain).
    pub fn determine_vd(
        &self,
        state: &StateDescription,
        inflow_q: QualValue,
        volume_q: QualValue,
    ) -> Vec<QualValue> {
        let signs = self.domain.derivative_space();
        let prev = state.derivative(Variable::Volume);

        let candidates = match net_influence(inflow_q, volume_q) {
            NetInfluence::Determined(sign) => {
                if signs.distance(prev, sign).is_some_and(|d| d <= 1) {
                    vec![sign]
                } else {
                    Vec::new()
                }
            }
            NetInfluence::Ambiguous => {
                let up = signs.step(prev, Direction::Up);
                let down = signs.step(prev, Direction::Down);
                let at_point = signs.is_point(prev);
                let raw = match trend(
                    state.derivative(Variable::Inflow),
                    state.derivative(Variable::Outflow),
                ) {
                    Trend::Decreasing if at_point => vec![down],
                    Trend::Decreasing => vec![Some(prev), down],
                    Trend::Increasing if at_point => vec![up],
                    Trend::Increasing => vec![Some(prev), up],
                    Trend::Unchanged => vec![Some(prev)],
                    Trend::NoDecrease => vec![Some(prev), up],
                    Trend::NoIncrease => vec![down, Some(prev)],
                    Trend::Continuous => vec![down, Some(prev), up],
                };
                signs.ordered(raw.into_iter().flatten())
            }
        };

        // The volume cannot be pushed past the ends of its own space.
        let levels = self.domain.quantity_space(Variable::Volume);
        candidates
            .into_iter()
            .filter(|d| Direction::of(*d).map_or(true, |dir| levels.step(volume_q, dir).is_some()))
            .collect()
    }

    /// Step 6: epsilon ordering between `state` and `candidate`.
    ///
    /// A variable sitting on a point with a derivative driving it off must
    /// have completed the exit in the candidate. When only one of inflow and
    /// volume is exiting a point, the other's quantity must not change in the
    /// same step.
    pub fn epsilon_ordering_holds(
        &self,
        state: &StateDescription,
        candidate: &StateDescription,
    ) -> bool {
        let inflow_exit = self.domain.at_point(state, Variable::Inflow);
        let volume_exit = self.domain.at_point(state, Variable::Volume);

        // Inflow's derivative is exogenous, so only its quantity is checked.
        if inflow_exit && !self.exit_completed(state, candidate, Variable::Inflow, false) {
            return false;
        }
        if volume_exit && !self.exit_completed(state, candidate, Variable::Volume, true) {
            return false;
        }

        let unchanged = |v: Variable| candidate.quantity(v) == state.quantity(v);
        match (inflow_exit, volume_exit) {
            (true, false) => unchanged(Variable::Volume),
            (false, true) => unchanged(Variable::Inflow),
            _ => true,
        }
    }

    fn exit_completed(
        &self,
        state: &StateDescription,
        candidate: &StateDescription,
        variable: Variable,
        keeps_derivative: bool,
    ) -> bool {
        let space = self.domain.quantity_space(variable);
        let derivative = state.derivative(variable);
        let target = Direction::of(derivative).and_then(|d| space.step(state.quantity(variable), d));
        target == Some(candidate.quantity(variable))
            && (!keeps_derivative || candidate.derivative(variable) == derivative)
    }

    /// Run steps 1 through 7 for `state` under the exogenous inflow
    /// derivative `exogenous`, keeping track of discarded candidates.
    ///
    /// Fails when `state` or `exogenous` lies outside the domain model.
    pub fn expand(
        &self,
        state: &StateDescription,
        exogenous: QualValue,
    ) -> Result<Expansion, StateError> {
        self.domain.validate(state)?;
        if !self.domain.derivative_space().contains(exogenous) {
            return Err(StateError::OutOfDomain {
                variable: Variable::Inflow,
                aspect: Aspect::Derivative,
                value: exogenous,
            });
        }

        let mut expansion = Expansion::default();
        for inflow_q in self.determine_iq(state) {
            for volume_q in self.determine_vq(state) {
                let mut base = *state;
                base.set_quantity(Variable::Inflow, inflow_q);
                base.set_derivative(Variable::Inflow, exogenous);
                propagate_chain(&mut base, Aspect::Quantity, volume_q);

                for volume_d in self.determine_vd(state, inflow_q, volume_q) {
                    let mut candidate = base;
                    propagate_chain(&mut candidate, Aspect::Derivative, volume_d);

                    let rejection = if candidate == *state {
                        Some(Rejection::SelfLoop)
                    } else if !self.epsilon_ordering_holds(state, &candidate) {
                        Some(Rejection::EpsilonOrdering)
                    } else if self.plausibility.contains(&candidate) {
                        Some(Rejection::Implausible)
                    } else {
                        None
                    };

                    match rejection {
                        Some(reason) => expansion.rejected.push((candidate, reason)),
                        None => expansion.successors.push(candidate),
                    }
                }
            }
        }
        Ok(expansion)
    }

    /// Admissible successors of `state`, without the rejection detail.
    pub fn successors(
        &self,
        state: &StateDescription,
        exogenous: QualValue,
    ) -> Result<Vec<StateDescription>, StateError> {
        Ok(self.expand(state, exogenous)?.successors)
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::bathtub()
    }
}

/// Steps 3 and 5: volume's value for `aspect` is shared by outflow, height
/// and pressure.
fn propagate_chain(state: &mut StateDescription, aspect: Aspect, value: QualValue) {
    state.set(Variable::Volume, aspect, value);
    for variable in Variable::CHAINED {
        state.set(variable, aspect, value);
    }
}
