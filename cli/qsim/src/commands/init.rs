//! `qsim init`: write a starter configuration.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::manifest::{QsimManifest, MANIFEST_FILE};

/// Write `qsim.toml` into `dir`, creating the directory if needed.
pub fn run(dir: &Path) -> Result<()> {
    write_config(dir)?;
    println!("Created {}", dir.join(MANIFEST_FILE).display());
    Ok(())
}

pub(crate) fn write_config(dir: &Path) -> Result<()> {
    let path = dir.join(MANIFEST_FILE);
    if path.exists() {
        bail!("'{}' already exists", path.display());
    }
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    fs::write(&path, QsimManifest::template())
        .with_context(|| format!("writing {}", path.display()))
}
