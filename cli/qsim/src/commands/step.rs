//! `qsim step`: apply the transition rules to one state.

use anyhow::{Context, Result};

use qsim_core::domain::QualValue;
use qsim_core::rules::RuleEngine;
use qsim_core::state::StateDescription;

use crate::manifest::QsimManifest;

pub fn run(manifest: &QsimManifest, state: &str, exogenous: &str) -> Result<()> {
    let engine = manifest.rule_engine()?;
    print!("{}", step_report(&engine, state, exogenous)?);
    Ok(())
}

/// List admissible and rejected successors of `state` under a fixed
/// exogenous inflow derivative.
pub fn step_report(engine: &RuleEngine, state: &str, exogenous: &str) -> Result<String> {
    let state: StateDescription = state
        .parse()
        .with_context(|| format!("invalid state '{state}'"))?;
    let exogenous: QualValue = exogenous
        .parse()
        .with_context(|| format!("invalid exogenous derivative '{exogenous}'"))?;

    let expansion = engine
        .expand(&state, exogenous)
        .with_context(|| format!("cannot step '{state}' with inflow d := {exogenous}"))?;
    let mut text = format!("{state}  (inflow d := {exogenous})\n");
    text.push_str(&state.table());
    text.push_str("\n\nSuccessors:\n");
    if expansion.successors.is_empty() {
        text.push_str("  (none)\n");
    }
    for next in &expansion.successors {
        text.push_str(&format!("  {next}\n"));
    }
    if !expansion.rejected.is_empty() {
        text.push_str("Rejected:\n");
        for (candidate, reason) in &expansion.rejected {
            text.push_str(&format!("  {candidate}  [{}]\n", reason.name()));
        }
    }
    Ok(text)
}
