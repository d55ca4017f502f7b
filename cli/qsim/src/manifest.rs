//! `qsim.toml` configuration parsing.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use qsim_core::domain::DomainModel;
use qsim_core::phase::{Phase, Schedule};
use qsim_core::rules::plausibility::PlausibilityTable;
use qsim_core::rules::RuleEngine;
use qsim_core::state::StateDescription;
use qsim_observe::ViewFormat;

pub const MANIFEST_FILE: &str = "qsim.toml";

/// The top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QsimManifest {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub scenario: ScenarioConfig,
    #[serde(default)]
    pub plausibility: PlausibilityConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which domain model to simulate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model")]
    pub name: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model(),
        }
    }
}

fn default_model() -> String {
    "bathtub".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Last phase to run.
    #[serde(default)]
    pub through: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlausibilityConfig {
    /// Additional implausible state labels.
    #[serde(default)]
    pub extra: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// `text` or `json`.
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: Option<String>,
}

impl QsimManifest {
    /// Search upward from `start_dir` for a `qsim.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                let manifest = Self::load(&candidate)?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Read and parse the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing qsim.toml")
    }

    /// The rule engine for the configured model, with any extra
    /// plausibility entries.
    pub fn rule_engine(&self) -> Result<RuleEngine> {
        let domain = match self.model.name.as_str() {
            "bathtub" => DomainModel::bathtub(),
            other => bail!("unknown model: '{other}'. Available models: bathtub"),
        };
        let mut table = PlausibilityTable::builtin();
        for label in &self.plausibility.extra {
            let state: StateDescription = label
                .parse()
                .with_context(|| format!("invalid [plausibility] entry '{label}'"))?;
            domain
                .validate(&state)
                .with_context(|| format!("invalid [plausibility] entry '{label}'"))?;
            table.insert(state);
        }
        Ok(RuleEngine::new(domain, table))
    }

    /// The scenario schedule. A `through` flag overrides `[scenario] through`.
    pub fn schedule(&self, through: Option<&str>) -> Result<Schedule> {
        let schedule = Schedule::bathtub();
        match through.or(self.scenario.through.as_deref()) {
            None => Ok(schedule),
            Some(name) => {
                let Some(phase) = Phase::parse(name) else {
                    bail!(
                        "unknown phase: '{name}'. Choose: ramp-up, steady-1, ramp-down, steady-2"
                    );
                };
                Ok(schedule.through(phase))
            }
        }
    }

    /// Output format: CLI flag > `[output] format` > text.
    pub fn output_format(&self, flag: Option<&str>) -> Result<ViewFormat> {
        match flag.or(self.output.format.as_deref()) {
            Some(name) => Ok(ViewFormat::parse(name)?),
            None => Ok(ViewFormat::Text),
        }
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.level.as_deref()
    }

    /// Generate a starter configuration.
    pub fn template() -> String {
        r#"[model]
name = "bathtub"

[scenario]
through = "steady-2"

[plausibility]
extra = []

[output]
format = "text"

[logging]
level = "warn"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_manifest() {
        let toml_str = r#"
[model]
name = "bathtub"

[scenario]
through = "ramp-down"

[plausibility]
extra = ["+/0 MAX/- MAX/- MAX/- MAX/-"]

[output]
format = "json"

[logging]
level = "info"
"#;
        let manifest = QsimManifest::from_str(toml_str).unwrap();
        assert_eq!(manifest.model.name, "bathtub");
        assert_eq!(manifest.scenario.through.as_deref(), Some("ramp-down"));
        assert_eq!(manifest.plausibility.extra.len(), 1);
        assert_eq!(manifest.output_format(None).unwrap(), ViewFormat::Json);
        assert_eq!(manifest.output_format(Some("text")).unwrap(), ViewFormat::Text);
        assert_eq!(manifest.log_level(), Some("info"));

        let engine = manifest.rule_engine().unwrap();
        assert_eq!(engine.plausibility().len(), 4);
        assert_eq!(manifest.schedule(None).unwrap().len(), 3);
        assert_eq!(manifest.schedule(Some("ramp-up")).unwrap().len(), 1);
    }

    #[test]
    fn unknown_output_format_is_rejected() {
        let manifest = QsimManifest::default();
        let err = manifest.output_format(Some("jsn")).unwrap_err();
        assert!(format!("{err:#}").contains("unknown format: 'jsn'"), "{err:#}");

        let manifest = QsimManifest::from_str("[output]\nformat = \"yaml\"\n").unwrap();
        assert!(manifest.output_format(None).is_err());
        assert_eq!(manifest.output_format(Some("json")).unwrap(), ViewFormat::Json);
    }

    #[test]
    fn parse_empty_manifest() {
        let manifest = QsimManifest::from_str("").unwrap();
        assert_eq!(manifest.model.name, "bathtub");
        assert!(manifest.plausibility.extra.is_empty());
        assert_eq!(manifest.output_format(None).unwrap(), ViewFormat::Text);
        assert!(manifest.log_level().is_none());
        assert_eq!(manifest.schedule(None).unwrap(), Schedule::bathtub());
    }

    #[test]
    fn reject_invalid_toml() {
        let bad = "this is not valid toml [[[";
        assert!(QsimManifest::from_str(bad).is_err());
    }

    #[test]
    fn reject_bad_settings() {
        let manifest = QsimManifest::from_str("[model]\nname = \"reservoir\"\n").unwrap();
        assert!(manifest.rule_engine().is_err());

        let manifest = QsimManifest::from_str("[plausibility]\nextra = [\"0/+\"]\n").unwrap();
        assert!(manifest.rule_engine().is_err());

        let manifest =
            QsimManifest::from_str("[plausibility]\nextra = [\"MAX/+ 0/0 0/0 0/0 0/0\"]\n").unwrap();
        let err = manifest.rule_engine().unwrap_err();
        assert!(format!("{err:#}").contains("cannot take value MAX"), "{err:#}");

        let manifest = QsimManifest::from_str("[scenario]\nthrough = \"plateau\"\n").unwrap();
        assert!(manifest.schedule(None).is_err());
    }

    #[test]
    fn template_is_valid_toml() {
        let manifest = QsimManifest::from_str(&QsimManifest::template()).unwrap();
        assert_eq!(manifest.model.name, "bathtub");
        assert_eq!(manifest.schedule(None).unwrap().len(), 4);
        assert_eq!(manifest.log_level(), Some("warn"));
    }

    #[test]
    fn find_and_load_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE),
            "[scenario]\nthrough = \"steady-1\"\n",
        )
        .unwrap();

        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let (manifest, found_dir) = QsimManifest::find_and_load(&nested).unwrap().unwrap();
        assert_eq!(manifest.scenario.through.as_deref(), Some("steady-1"));
        assert_eq!(found_dir, dir.path());
    }

    #[test]
    fn load_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        std::fs::write(&path, "[output\nformat = 1").unwrap();
        let err = QsimManifest::load(&path).unwrap_err();
        assert!(format!("{err}").contains("qsim.toml"));
    }
}
