//! Shared formatting helpers for observability views.

use std::cmp::Ordering;

use qsim_core::domain::{Aspect, QualValue, Variable};
use qsim_core::graph::StateGraph;
use qsim_core::state::StateDescription;

use crate::error::ObserveError;

/// Short discovery-order name of a node: `s0`, `s1`, ...
pub fn state_name(graph: &StateGraph, state: &StateDescription) -> Option<String> {
    graph.name_of(state)
}

/// Like [`state_name`] but falls back to the label for non-nodes.
pub fn display_name(graph: &StateGraph, state: &StateDescription) -> String {
    state_name(graph, state).unwrap_or_else(|| state.label())
}

/// Find a node by discovery name (`s3`) or by label.
pub fn resolve_state(graph: &StateGraph, query: &str) -> Result<StateDescription, ObserveError> {
    let query = query.trim();
    let by_name = query
        .strip_prefix('s')
        .and_then(|n| n.parse::<usize>().ok())
        .and_then(|i| graph.nodes().nth(i).copied());
    let state = match by_name {
        Some(state) => state,
        None => query.parse::<StateDescription>()?,
    };
    if graph.contains(&state) {
        Ok(state)
    } else {
        Err(ObserveError::UnknownState {
            query: query.to_string(),
        })
    }
}

/// How one coordinate moved along an edge.
pub fn describe_change(variable: Variable, aspect: Aspect, from: QualValue, to: QualValue) -> String {
    let verb = match from.cmp(&to) {
        Ordering::Equal => "did not change",
        Ordering::Less => "increased",
        Ordering::Greater => "decreased",
    };
    let short = match aspect {
        Aspect::Quantity => "q",
        Aspect::Derivative => "d",
    };
    format!("the {short} of the {variable} {verb}")
}

/// One sentence per variable describing the move `from -> to`.
pub fn narrative(from: &StateDescription, to: &StateDescription) -> Vec<String> {
    Variable::ALL
        .iter()
        .map(|&v| {
            format!(
                "{}, and {}",
                describe_change(v, Aspect::Quantity, from.quantity(v), to.quantity(v)),
                describe_change(v, Aspect::Derivative, from.derivative(v), to.derivative(v)),
            )
        })
        .collect()
}
