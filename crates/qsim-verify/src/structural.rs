//! Structural analysis pass over a finished state graph.

use std::fmt;

use serde::Serialize;

use qsim_core::domain::{Aspect, Variable};
use qsim_core::graph::StateGraph;
use qsim_core::rules::RuleEngine;
use qsim_core::state::StateDescription;

use crate::report::Severity;

/// A graph property checked by the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Property {
    /// No node points to itself.
    NoSelfLoop,
    /// No pair of nodes has edges both ways.
    NoTwoCycle,
    /// Every coordinate lies in its quantity space.
    InDomain,
    /// Outflow, height and pressure mirror volume.
    ChainConsistency,
    /// No edge moves a quantity more than one step.
    QuantityContinuity,
    /// No edge moves a derivative more than one step.
    DerivativeContinuity,
    /// No node is listed in the plausibility table.
    Plausibility,
    /// At least one state has no successors.
    Termination,
    /// Rebuilding the schedule gives an identical graph.
    Reproducibility,
}

impl Property {
    pub const STRUCTURAL: [Property; 8] = [
        Property::NoSelfLoop,
        Property::NoTwoCycle,
        Property::InDomain,
        Property::ChainConsistency,
        Property::QuantityContinuity,
        Property::DerivativeContinuity,
        Property::Plausibility,
        Property::Termination,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Property::NoSelfLoop => "no-self-loop",
            Property::NoTwoCycle => "no-two-cycle",
            Property::InDomain => "in-domain",
            Property::ChainConsistency => "chain-consistency",
            Property::QuantityContinuity => "quantity-continuity",
            Property::DerivativeContinuity => "derivative-continuity",
            Property::Plausibility => "plausibility",
            Property::Termination => "termination",
            Property::Reproducibility => "reproducibility",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A diagnostic produced by structural analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralDiagnostic {
    pub property: Property,
    pub severity: Severity,
    pub message: String,
    pub state: Option<StateDescription>,
    pub suggestion: Option<String>,
}

impl StructuralDiagnostic {
    fn error(property: Property, state: StateDescription, message: String) -> Self {
        Self {
            property,
            severity: Severity::Error,
            message,
            state: Some(state),
            suggestion: None,
        }
    }

    fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestion = Some(suggestion.to_string());
        self
    }
}

/// Checks the graph properties that do not need a rebuild.
pub struct StructuralAnalyzer;

impl StructuralAnalyzer {
    /// Run every structural check against `graph`, judging domain membership
    /// and plausibility by `engine`.
    pub fn analyze(graph: &StateGraph, engine: &RuleEngine) -> Vec<StructuralDiagnostic> {
        let mut diagnostics = Vec::new();
        let domain = engine.domain();

        for state in graph.nodes() {
            if let Err(err) = domain.validate(state) {
                diagnostics.push(StructuralDiagnostic::error(
                    Property::InDomain,
                    *state,
                    err.to_string(),
                ));
            }

            let volume = (state.quantity(Variable::Volume), state.derivative(Variable::Volume));
            for variable in Variable::CHAINED {
                if (state.quantity(variable), state.derivative(variable)) != volume {
                    diagnostics.push(StructuralDiagnostic::error(
                        Property::ChainConsistency,
                        *state,
                        format!("{variable} does not mirror volume in {state}"),
                    ));
                }
            }

            if engine.plausibility().contains(state) {
                diagnostics.push(
                    StructuralDiagnostic::error(
                        Property::Plausibility,
                        *state,
                        format!("implausible state {state} is a node"),
                    )
                    .with_suggestion("Check the plausibility filter in the rule engine"),
                );
            }
        }

        for (src, dst) in graph.edges() {
            if src == dst {
                diagnostics.push(StructuralDiagnostic::error(
                    Property::NoSelfLoop,
                    src,
                    format!("self-loop on {src}"),
                ));
                continue;
            }
            // Report each two-cycle once, from the earlier node.
            if graph.has_edge(&dst, &src) && graph.position(&src) < graph.position(&dst) {
                diagnostics.push(StructuralDiagnostic::error(
                    Property::NoTwoCycle,
                    src,
                    format!("edges in both directions between {src} and {dst}"),
                ));
            }
            for variable in Variable::ALL {
                for aspect in [Aspect::Quantity, Aspect::Derivative] {
                    let space = domain.space(variable, aspect);
                    let (a, b) = (src.get(variable, aspect), dst.get(variable, aspect));
                    // Values outside the space are reported as domain errors.
                    if space.distance(a, b).is_some_and(|d| d > 1) {
                        let property = match aspect {
                            Aspect::Quantity => Property::QuantityContinuity,
                            Aspect::Derivative => Property::DerivativeContinuity,
                        };
                        diagnostics.push(
                            StructuralDiagnostic::error(
                                property,
                                src,
                                format!("{aspect} of {variable} jumps from {a} to {b} in {src} -> {dst}"),
                            )
                            .with_suggestion("Values may only move to an adjacent point or interval"),
                        );
                    }
                }
            }
        }

        if !graph.is_empty() && graph.terminal_nodes().is_empty() {
            diagnostics.push(StructuralDiagnostic {
                property: Property::Termination,
                severity: Severity::Warning,
                message: "every state has a successor".to_string(),
                state: None,
                suggestion: Some("Check that the last phase lets the tub settle".to_string()),
            });
        }

        diagnostics
    }
}
