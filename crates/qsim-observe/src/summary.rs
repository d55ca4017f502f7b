//! Summary view: per-phase build statistics and graph totals.

use serde_json::json;

use qsim_core::graph::StateGraph;
use qsim_core::hash::{graph_fingerprint, hash_hex};

use crate::error::ObserveError;
use crate::format::display_name;
use crate::view::{RenderContext, View, ViewKind, ViewOutput};

/// Build summary. Needs the phase statistics in the render context.
pub struct SummaryView;

impl View for SummaryView {
    fn kind(&self) -> ViewKind {
        ViewKind::Summary
    }

    fn render(&self, graph: &StateGraph, ctx: &RenderContext<'_>) -> Result<ViewOutput, ObserveError> {
        let phases = ctx.phases.ok_or(ObserveError::NoPhaseStats)?;

        let mut text = String::from("=== Simulation Summary ===\n\n");
        text.push_str(&format!(
            "{:<10} {:>4} {:>6} {:>10} {:>9} {:>6} {:>6} {:>10}\n",
            "phase", "exo", "seeds", "blacklist", "expanded", "+nodes", "+edges", "discarded"
        ));
        for p in phases {
            text.push_str(&format!(
                "{:<10} {:>4} {:>6} {:>10} {:>9} {:>6} {:>6} {:>10}\n",
                p.phase,
                p.exogenous,
                p.seeds,
                p.blacklisted,
                p.expanded,
                p.nodes_added,
                p.edges_added,
                p.discarded.total(),
            ));
        }

        let terminal: Vec<String> = graph
            .terminal_nodes()
            .iter()
            .map(|s| display_name(graph, s))
            .collect();
        let fingerprint = hash_hex(&graph_fingerprint(graph));

        text.push_str("\n--- Totals ---\n");
        text.push_str(&format!("  States:        {}\n", graph.node_count()));
        text.push_str(&format!("  Transitions:   {}\n", graph.edge_count()));
        text.push_str(&format!("  End states:    {}\n", terminal.join(", ")));
        text.push_str(&format!("  Fingerprint:   {fingerprint}\n"));

        Ok(ViewOutput {
            text,
            data: json!({
                "view": "summary",
                "phases": serde_json::to_value(phases)?,
                "node_count": graph.node_count(),
                "edge_count": graph.edge_count(),
                "terminal": terminal,
                "fingerprint": fingerprint,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsim_core::phase::Schedule;
    use qsim_core::rules::RuleEngine;
    use qsim_core::simulate;

    #[test]
    fn summarizes_each_phase() {
        let sim = simulate(RuleEngine::bathtub(), &Schedule::bathtub()).unwrap();
        let ctx = RenderContext::empty().with_phases(&sim.phases);
        let out = SummaryView.render(&sim.graph, &ctx).unwrap();

        assert!(out.text.contains("ramp-up"));
        assert!(out.text.contains("steady-2"));
        assert!(out.text.contains("  End states:    s15, s16\n"));
        assert_eq!(out.data["phases"].as_array().unwrap().len(), 4);
        assert_eq!(out.data["phases"][2]["phase"], "ramp-down");
        assert_eq!(out.data["phases"][0]["nodes_added"], 4);
        assert_eq!(out.data["edge_count"], 36);
    }

    #[test]
    fn requires_phase_stats() {
        let g = StateGraph::new();
        assert!(matches!(
            SummaryView.render(&g, &RenderContext::empty()),
            Err(ObserveError::NoPhaseStats)
        ));
    }
}
