//! qsim CLI: build, inspect and verify qualitative bathtub simulations.

mod commands;
mod logging;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand};

use manifest::QsimManifest;

#[derive(Parser)]
#[command(name = "qsim", version, about = "Qualitative simulation of a filling bathtub")]
struct Cli {
    /// Path to a qsim.toml (default: search upward from the current directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter qsim.toml
    Init {
        /// Directory to write into
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
    /// Run the scenario and print the state graph
    Build {
        /// Last phase to run (ramp-up, steady-1, ramp-down, steady-2)
        #[arg(long)]
        through: Option<String>,
        /// Output format: text or json
        #[arg(long)]
        format: Option<String>,
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Render a view of the built graph
    Inspect {
        /// View: adjacency, states, transitions, summary, dot
        #[arg(long)]
        view: Option<String>,
        /// Focus on one state, by label or discovery name (s0, s1, ...)
        #[arg(long)]
        state: Option<String>,
        /// Output format: text or json
        #[arg(long)]
        format: Option<String>,
    },
    /// Check graph properties and reproducibility
    Verify {
        /// Output format: text or json
        #[arg(long)]
        format: Option<String>,
    },
    /// Apply the transition rules to a single state
    Step {
        /// State label, e.g. "+/+ +/+ +/+ +/+ +/+"
        #[arg(long)]
        state: String,
        /// Exogenous inflow derivative: +, 0 or -
        #[arg(long, allow_hyphen_values = true)]
        exogenous: String,
    },
    /// List the phases of the configured scenario
    Phases,
}

fn main() {
    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // init runs without reading any existing config.
    if let Commands::Init { dir } = &cli.command {
        logging::init(cli.verbose, None);
        return commands::init::run(dir);
    }

    let cwd = std::env::current_dir()?;
    let manifest = load_manifest(cli.config.as_deref(), &cwd)?;
    logging::init(cli.verbose, manifest.log_level());

    match cli.command {
        Commands::Build {
            through,
            format,
            output,
        } => commands::build::run(
            &manifest,
            through.as_deref(),
            format.as_deref(),
            output.as_deref(),
        ),
        Commands::Inspect {
            view,
            state,
            format,
        } => commands::inspect::run(&manifest, view.as_deref(), state.as_deref(), format.as_deref()),
        Commands::Verify { format } => commands::verify::run(&manifest, format.as_deref()),
        Commands::Step { state, exogenous } => commands::step::run(&manifest, &state, &exogenous),
        Commands::Phases => commands::phases::run(&manifest),
        Commands::Init { dir } => commands::init::run(&dir),
    }
}

/// An explicit `--config` must exist; otherwise search upward and fall back
/// to defaults.
fn load_manifest(explicit: Option<&Path>, cwd: &Path) -> anyhow::Result<QsimManifest> {
    if let Some(path) = explicit {
        return QsimManifest::load(path);
    }
    Ok(QsimManifest::find_and_load(cwd)?
        .map(|(manifest, _)| manifest)
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["qsim", "-vv", "build", "--through", "steady-1"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Build { through: Some(ref t), .. } if t == "steady-1"
        ));

        let cli = Cli::try_parse_from([
            "qsim",
            "step",
            "--state",
            "+/+ +/+ +/+ +/+ +/+",
            "--exogenous",
            "-",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Step { ref exogenous, .. } if exogenous == "-"));

        let cli = Cli::try_parse_from(["qsim", "init"]).unwrap();
        assert!(matches!(cli.command, Commands::Init { ref dir } if dir == Path::new(".")));
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_manifest(Some(&missing), dir.path()).is_err());

        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();
        let manifest = load_manifest(Some(&path), dir.path()).unwrap();
        assert_eq!(manifest.log_level(), Some("debug"));
    }

    #[test]
    fn workflow_build_verify_inspect() {
        let dir = tempfile::tempdir().unwrap();
        commands::init::write_config(dir.path()).unwrap();
        let manifest = load_manifest(None, dir.path()).unwrap();

        let out = dir.path().join("graph.txt");
        commands::build::run(&manifest, None, None, Some(&out)).unwrap();
        assert!(std::fs::read_to_string(&out).unwrap().contains("18 states, 36 transitions"));

        commands::verify::run(&manifest, Some("json")).unwrap();
        commands::inspect::run(&manifest, Some("summary"), None, None).unwrap();
        assert!(commands::inspect::run(&manifest, Some("bogus"), None, None).is_err());
    }
}
