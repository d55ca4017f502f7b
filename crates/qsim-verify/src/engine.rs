//! Verification engine orchestrator.
//!
//! Runs structural analysis over a finished simulation, then rebuilds the
//! schedule from scratch and compares fingerprints.

use tracing::{debug, info, warn};

use qsim_core::builder::{simulate, Simulation};
use qsim_core::hash::hash_hex;
use qsim_core::phase::Schedule;
use qsim_core::rules::RuleEngine;

use crate::report::{Diagnostic, ReportSummary, Severity, VerificationReport};
use crate::structural::{Property, StructuralAnalyzer};

/// Verifies simulations produced by one engine and schedule.
pub struct VerificationEngine {
    engine: RuleEngine,
    schedule: Schedule,
}

impl VerificationEngine {
    pub fn new(engine: RuleEngine, schedule: Schedule) -> Self {
        Self { engine, schedule }
    }

    /// Run every check on `simulation`, which must have been built from
    /// this engine's rules and schedule.
    pub fn verify(&self, simulation: &Simulation) -> VerificationReport {
        let graph = &simulation.graph;
        let fingerprint = simulation.fingerprint();

        // 1. Structural properties
        let mut diagnostics: Vec<Diagnostic> = StructuralAnalyzer::analyze(graph, &self.engine)
            .iter()
            .map(Diagnostic::from)
            .collect();
        debug!(count = diagnostics.len(), "structural analysis finished");

        // 2. Reproducibility
        match simulate(self.engine.clone(), &self.schedule) {
            Ok(rebuilt) if rebuilt.fingerprint() == fingerprint => {}
            Ok(rebuilt) => diagnostics.push(Diagnostic {
                property: Property::Reproducibility,
                severity: Severity::Error,
                message: format!(
                    "rebuild produced a different graph ({} nodes, {} edges)",
                    rebuilt.graph.node_count(),
                    rebuilt.graph.edge_count()
                ),
                context: format!("fingerprint {}", hash_hex(&rebuilt.fingerprint())),
                suggestions: vec!["Check that the graph was built from the same schedule".into()],
            }),
            Err(e) => diagnostics.push(Diagnostic {
                property: Property::Reproducibility,
                severity: Severity::Error,
                message: format!("rebuild failed: {e}"),
                context: String::new(),
                suggestions: vec![],
            }),
        }

        // 3. Terminal states
        let terminal = graph.terminal_nodes();
        for state in &terminal {
            diagnostics.push(Diagnostic {
                property: Property::Termination,
                severity: Severity::Info,
                message: format!("terminal state {state}"),
                context: graph.name_of(state).unwrap_or_default(),
                suggestions: vec![],
            });
        }

        let mut checked = Property::STRUCTURAL.to_vec();
        checked.push(Property::Reproducibility);
        let summary = ReportSummary {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            terminal: terminal.len(),
            fingerprint: hash_hex(&fingerprint),
            ..ReportSummary::default()
        };
        let report = VerificationReport::build(summary, &checked, diagnostics);
        if report.is_clean() {
            info!(passed = report.summary.passed, "verification passed");
        } else {
            warn!(failed = report.summary.failed, "verification failed");
        }
        report
    }
}
