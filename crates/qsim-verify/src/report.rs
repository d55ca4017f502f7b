//! Verification report with summary statistics and diagnostics.

use std::fmt;

use serde::Serialize;

use crate::structural::{Property, StructuralDiagnostic};

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARN"),
            Severity::Info => write!(f, "INFO"),
        }
    }
}

/// A diagnostic message about one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub property: Property,
    pub severity: Severity,
    pub message: String,
    pub context: String,
    pub suggestions: Vec<String>,
}

impl From<&StructuralDiagnostic> for Diagnostic {
    fn from(sd: &StructuralDiagnostic) -> Self {
        Self {
            property: sd.property,
            severity: sd.severity,
            message: sd.message.clone(),
            context: sd.state.map(|s| format!("state {s}")).unwrap_or_default(),
            suggestions: sd.suggestion.iter().cloned().collect(),
        }
    }
}

/// Summary statistics for a verification run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub nodes: usize,
    pub edges: usize,
    pub terminal: usize,
    pub checked: usize,
    pub passed: usize,
    pub failed: usize,
    pub fingerprint: String,
}

/// The complete verification report.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub summary: ReportSummary,
    pub diagnostics: Vec<Diagnostic>,
}

impl VerificationReport {
    /// Build a report for the checked properties from their diagnostics.
    pub fn build(
        mut summary: ReportSummary,
        checked: &[Property],
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        let failed = checked
            .iter()
            .filter(|p| {
                diagnostics
                    .iter()
                    .any(|d| d.property == **p && d.severity == Severity::Error)
            })
            .count();
        summary.checked = checked.len();
        summary.failed = failed;
        summary.passed = checked.len() - failed;
        Self {
            summary,
            diagnostics,
        }
    }

    /// True when no diagnostic is an error.
    pub fn is_clean(&self) -> bool {
        !self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Verification Report ===")?;
        writeln!(
            f,
            "Nodes: {} | Edges: {} | Terminal: {}",
            self.summary.nodes, self.summary.edges, self.summary.terminal,
        )?;
        writeln!(
            f,
            "Properties: {} | Passed: {} | Failed: {}",
            self.summary.checked, self.summary.passed, self.summary.failed,
        )?;
        writeln!(f, "Fingerprint: {}", self.summary.fingerprint)?;

        if self.diagnostics.is_empty() {
            writeln!(f, "No diagnostics.")?;
        } else {
            writeln!(f, "--- Diagnostics ---")?;
            for diag in &self.diagnostics {
                write!(f, "[{}] {}: {}", diag.severity, diag.property, diag.message)?;
                if diag.context.is_empty() {
                    writeln!(f)?;
                } else {
                    writeln!(f, " ({})", diag.context)?;
                }
                for s in &diag.suggestions {
                    writeln!(f, "  Suggestion: {s}")?;
                }
            }
        }
        Ok(())
    }
}
