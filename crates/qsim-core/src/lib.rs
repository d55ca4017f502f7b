//! Qualitative simulation of a filling bathtub.
//!
//! The crate models the tub as five coupled variables, each described by a
//! qualitative quantity and derivative. A pure [`rules::RuleEngine`] derives
//! the admissible successors of a state, and a [`builder::GraphBuilder`]
//! runs a phased schedule of exogenous inflow changes to produce the
//! complete [`graph::StateGraph`].

pub mod builder;
pub mod domain;
pub mod graph;
pub mod hash;
pub mod phase;
pub mod rules;
pub mod state;

pub use builder::{simulate, BuildError, GraphBuilder, PhaseStats, Simulation};
pub use domain::{Aspect, DomainModel, QualValue, Variable};
pub use graph::{GraphError, StateGraph};
pub use phase::{Phase, PhaseConfig, Schedule};
pub use rules::RuleEngine;
pub use state::{StateDescription, StateError};
