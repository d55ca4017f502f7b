//! Verification of built state graphs.
//!
//! Checks the structural properties every simulated graph must satisfy and
//! confirms that a schedule rebuilds to the same graph.

pub mod engine;
pub mod report;
pub mod structural;

pub use engine::VerificationEngine;
pub use report::{Diagnostic, ReportSummary, Severity, VerificationReport};
pub use structural::{Property, StructuralAnalyzer};
