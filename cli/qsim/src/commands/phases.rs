//! `qsim phases`: describe the configured schedule.

use anyhow::Result;

use qsim_core::phase::{BlacklistRule, PhaseConfig, SeedRule};

use crate::manifest::QsimManifest;

pub fn run(manifest: &QsimManifest) -> Result<()> {
    let schedule = manifest.schedule(None)?;
    for (i, config) in schedule.phases().iter().enumerate() {
        println!("{}", describe(i + 1, config));
    }
    Ok(())
}

fn describe(index: usize, config: &PhaseConfig) -> String {
    let seed = match &config.seed {
        SeedRule::State(state) => format!("state {state}"),
        SeedRule::NodeAndSuccessors(state) => format!("{state} and its successors"),
        SeedRule::SuccessorsWhere {
            of,
            variable,
            derivative,
        } => format!("successors of {of} with {variable} d = {derivative}"),
        SeedRule::NodesWhere {
            variable,
            derivative,
        } => format!("all states with {variable} d = {derivative}"),
    };
    let blacklist = match config.blacklist {
        BlacklistRule::Empty => "none",
        BlacklistRule::AllExceptSeeds => "all earlier states except seeds",
    };
    format!(
        "{index}. {:<10} inflow d = {}\n   seed:      {seed}\n   blacklist: {blacklist}",
        config.phase, config.exogenous
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsim_core::phase::Schedule;

    #[test]
    fn describes_each_phase() {
        let schedule = Schedule::bathtub();
        let first = describe(1, &schedule.phases()[0]);
        assert!(first.starts_with("1. ramp-up    inflow d = +"));
        assert!(first.contains("seed:      state 0/+ 0/0 0/0 0/0 0/0"));
        assert!(first.contains("blacklist: none"));

        let third = describe(3, &schedule.phases()[2]);
        assert!(third.contains("successors of +/+ +/+ +/+ +/+ +/+ with inflow d = 0"));
        let fourth = describe(4, &schedule.phases()[3]);
        assert!(fourth.contains("all states with inflow d = -"));
    }
}
