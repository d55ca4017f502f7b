//! Transitions view: what changes along each edge.

use serde_json::json;

use qsim_core::graph::StateGraph;
use qsim_core::state::StateDescription;

use crate::error::ObserveError;
use crate::format::{display_name, narrative};
use crate::view::{RenderContext, View, ViewKind, ViewOutput};

/// Edge narratives. With a focus state, only the edges into it.
pub struct TransitionsView;

impl View for TransitionsView {
    fn kind(&self) -> ViewKind {
        ViewKind::Transitions
    }

    fn render(&self, graph: &StateGraph, ctx: &RenderContext<'_>) -> Result<ViewOutput, ObserveError> {
        let edges: Vec<(StateDescription, StateDescription)> = match ctx.focus {
            Some(state) if graph.contains(&state) => graph
                .predecessors(&state)
                .into_iter()
                .map(|p| (p, state))
                .collect(),
            Some(state) => {
                return Err(ObserveError::UnknownState {
                    query: state.label(),
                })
            }
            None => graph.edges().collect(),
        };

        let mut text = String::new();
        if let Some(state) = ctx.focus {
            text.push_str(&format!(
                "=== Transitions into {} ===\n",
                display_name(graph, &state)
            ));
            if edges.is_empty() {
                text.push_str("No predecessors.\n");
            }
        }

        let mut transitions = Vec::new();
        for (from, to) in &edges {
            let (from_name, to_name) = (display_name(graph, from), display_name(graph, to));
            let lines = narrative(from, to);
            text.push_str(&format!("\n{from_name} -> {to_name}:\n"));
            for line in &lines {
                text.push_str(&format!("  {line}\n"));
            }
            transitions.push(json!({
                "from": from_name,
                "to": to_name,
                "changes": lines,
            }));
        }

        Ok(ViewOutput {
            text,
            data: json!({
                "view": "transitions",
                "transitions": transitions,
            }),
        })
    }
}
