//! Adjacency view: every node with its ordered successors.

use serde_json::json;

use qsim_core::graph::{node_name, StateGraph};

use crate::error::ObserveError;
use crate::format::display_name;
use crate::view::{RenderContext, View, ViewKind, ViewOutput};

/// Adjacency listing in discovery order.
pub struct AdjacencyView;

impl View for AdjacencyView {
    fn kind(&self) -> ViewKind {
        ViewKind::Adjacency
    }

    fn render(&self, graph: &StateGraph, _ctx: &RenderContext<'_>) -> Result<ViewOutput, ObserveError> {
        let mut text = String::from("=== State Graph ===\n\n");
        let mut nodes = Vec::new();

        for (i, (state, successors)) in graph.adjacency().enumerate() {
            let names: Vec<String> = successors.iter().map(|s| display_name(graph, s)).collect();
            let targets = if names.is_empty() {
                "(end)".to_string()
            } else {
                names.join(", ")
            };
            let name = node_name(i);
            text.push_str(&format!("{name:<4} {state:<30} -> {targets}\n"));

            nodes.push(json!({
                "name": name,
                "label": state.label(),
                "coordinates": state.values().iter().map(|v| v.symbol()).collect::<Vec<_>>(),
                "successors": names,
                "terminal": successors.is_empty(),
            }));
        }

        text.push_str(&format!(
            "\n{} states, {} transitions\n",
            graph.node_count(),
            graph.edge_count()
        ));

        Ok(ViewOutput {
            text,
            data: json!({
                "view": "adjacency",
                "nodes": nodes,
                "node_count": graph.node_count(),
                "edge_count": graph.edge_count(),
            }),
        })
    }
}
