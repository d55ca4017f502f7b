//! `qsim verify`: build the scenario and check its properties.

use anyhow::{bail, Result};

use qsim_observe::ViewFormat;
use qsim_verify::{VerificationEngine, VerificationReport};

use crate::commands::build_simulation;
use crate::manifest::QsimManifest;

pub fn run(manifest: &QsimManifest, format: Option<&str>) -> Result<()> {
    let report = check(manifest)?;

    match manifest.output_format(format)? {
        ViewFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ViewFormat::Text => print!("{report}"),
    }

    // Exit code 1 if any property failed
    if !report.is_clean() {
        bail!(
            "verification failed: {} propert{} not satisfied",
            report.summary.failed,
            if report.summary.failed == 1 { "y" } else { "ies" }
        );
    }
    Ok(())
}

pub fn check(manifest: &QsimManifest) -> Result<VerificationReport> {
    let sim = build_simulation(manifest, None)?;
    let verifier = VerificationEngine::new(manifest.rule_engine()?, manifest.schedule(None)?);
    Ok(verifier.verify(&sim))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_verifies() {
        let report = check(&QsimManifest::default()).unwrap();
        assert!(report.is_clean(), "{report}");
        assert_eq!(report.summary.nodes, 18);
    }

    #[test]
    fn extra_plausibility_entries_still_verify() {
        let manifest = QsimManifest::from_str(
            "[plausibility]\nextra = [\"+/0 MAX/- MAX/- MAX/- MAX/-\"]\n",
        )
        .unwrap();
        let report = check(&manifest).unwrap();
        assert!(report.is_clean(), "{report}");
        assert_eq!(report.summary.nodes, 17);
    }
}
