//! Graphviz view for external drawing tools.

use serde_json::json;

use qsim_core::graph::{node_name, StateGraph};

use crate::error::ObserveError;
use crate::view::{RenderContext, View, ViewKind, ViewOutput};

/// Renders the graph as a DOT digraph. End states are drawn filled.
pub struct DotView;

impl View for DotView {
    fn kind(&self) -> ViewKind {
        ViewKind::Dot
    }

    fn render(&self, graph: &StateGraph, _ctx: &RenderContext<'_>) -> Result<ViewOutput, ObserveError> {
        let mut text = String::from("digraph states {\n  node [shape=box, fontname=\"monospace\"];\n");
        for (i, (state, successors)) in graph.adjacency().enumerate() {
            let style = if successors.is_empty() {
                ", style=filled"
            } else {
                ""
            };
            let name = node_name(i);
            text.push_str(&format!("  {name} [label=\"{name}\\n{state}\"{style}];\n"));
        }
        let mut edges = Vec::new();
        for (src, dst) in graph.edges() {
            let (Some(a), Some(b)) = (graph.name_of(&src), graph.name_of(&dst)) else {
                continue;
            };
            text.push_str(&format!("  {a} -> {b};\n"));
            edges.push(json!([a, b]));
        }
        text.push_str("}\n");

        Ok(ViewOutput {
            data: json!({
                "view": "dot",
                "dot": text,
                "edges": edges,
            }),
            text,
        })
    }
}
