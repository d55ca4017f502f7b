//! States view: the Q/d table of each node.

use serde_json::json;

use qsim_core::domain::Variable;
use qsim_core::graph::StateGraph;
use qsim_core::state::StateDescription;

use crate::error::ObserveError;
use crate::format::state_name;
use crate::view::{RenderContext, View, ViewKind, ViewOutput};

/// Per-state detail tables, or a single one when the context has a focus.
pub struct StatesView;

impl View for StatesView {
    fn kind(&self) -> ViewKind {
        ViewKind::States
    }

    fn render(&self, graph: &StateGraph, ctx: &RenderContext<'_>) -> Result<ViewOutput, ObserveError> {
        let selected: Vec<StateDescription> = match ctx.focus {
            Some(state) if graph.contains(&state) => vec![state],
            Some(state) => {
                return Err(ObserveError::UnknownState {
                    query: state.label(),
                })
            }
            None => graph.nodes().copied().collect(),
        };

        let mut text = String::new();
        let mut states = Vec::new();
        for state in &selected {
            let name = state_name(graph, state).unwrap_or_default();
            let terminal = graph.successors(state).is_some_and(|s| s.is_empty());
            let role = if terminal { "end state" } else { "parent state" };

            text.push_str(&format!("{name} ({role}): {state}\n"));
            text.push_str(&state.table());
            text.push_str("\n\n");

            let variables: serde_json::Map<String, serde_json::Value> = Variable::ALL
                .iter()
                .map(|v| {
                    (
                        v.name().to_string(),
                        json!({
                            "q": state.quantity(*v).symbol(),
                            "d": state.derivative(*v).symbol(),
                        }),
                    )
                })
                .collect();
            states.push(json!({
                "name": name,
                "label": state.label(),
                "terminal": terminal,
                "variables": variables,
            }));
        }

        Ok(ViewOutput {
            text,
            data: json!({
                "view": "states",
                "states": states,
            }),
        })
    }
}
