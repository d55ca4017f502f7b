//! `qsim build`: run the scenario and print the resulting graph.

use std::path::Path;

use anyhow::Result;
use serde_json::json;

use qsim_core::builder::Simulation;
use qsim_core::hash::hash_hex;
use qsim_observe::{AdjacencyView, RenderContext, SummaryView, View, ViewFormat};

use crate::commands::{build_simulation, emit};
use crate::manifest::QsimManifest;

pub fn run(
    manifest: &QsimManifest,
    through: Option<&str>,
    format: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let sim = build_simulation(manifest, through)?;
    let text = render(&sim, manifest.output_format(format)?)?;
    emit(&text, output)
}

/// Summary followed by the adjacency listing, or one JSON document.
pub fn render(sim: &Simulation, format: ViewFormat) -> Result<String> {
    let ctx = RenderContext::empty().with_phases(&sim.phases);
    let summary = SummaryView.render(&sim.graph, &ctx)?;
    let adjacency = AdjacencyView.render(&sim.graph, &ctx)?;
    match format {
        ViewFormat::Text => Ok(format!("{}\n{}", summary.text, adjacency.text)),
        ViewFormat::Json => {
            let doc = json!({
                "fingerprint": hash_hex(&sim.fingerprint()),
                "phases": summary.data["phases"],
                "nodes": adjacency.data["nodes"],
                "node_count": sim.graph.node_count(),
                "edge_count": sim.graph.edge_count(),
            });
            Ok(format!("{}\n", serde_json::to_string_pretty(&doc)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_output_has_summary_and_adjacency() {
        let sim = build_simulation(&QsimManifest::default(), Some("ramp-up")).unwrap();
        let text = render(&sim, ViewFormat::Text).unwrap();
        assert!(text.contains("=== Simulation Summary ==="));
        assert!(text.contains("=== State Graph ==="));
        assert!(text.contains("4 states, 3 transitions"));
    }

    #[test]
    fn json_output_is_one_document() {
        let sim = build_simulation(&QsimManifest::default(), None).unwrap();
        let text = render(&sim, ViewFormat::Json).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["node_count"], 18);
        assert_eq!(doc["nodes"].as_array().unwrap().len(), 18);
        assert_eq!(doc["phases"].as_array().unwrap().len(), 4);
        assert_eq!(doc["fingerprint"].as_str().unwrap().len(), 64);
    }

    #[test]
    fn writes_to_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        run(&QsimManifest::default(), None, Some("json"), Some(&path)).unwrap();
        let doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc["edge_count"], 36);
    }
}
