//! CLI command implementations.

pub mod build;
pub mod init;
pub mod inspect;
pub mod phases;
pub mod step;
pub mod verify;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use qsim_core::builder::{simulate, Simulation};
use tracing::info;

use crate::manifest::QsimManifest;

/// Build the configured scenario.
pub fn build_simulation(manifest: &QsimManifest, through: Option<&str>) -> Result<Simulation> {
    let engine = manifest.rule_engine()?;
    let schedule = manifest.schedule(through)?;
    info!(
        model = %manifest.model.name,
        phases = schedule.len(),
        extra_implausible = manifest.plausibility.extra.len(),
        "building scenario"
    );
    simulate(engine, &schedule).context("building the state graph")
}

/// Print `text`, or write it to `output` when given.
pub fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}
