//! `regpack init`: project scaffolding.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::manifest::{RegpackManifest, MANIFEST_FILE};

/// Create a new register-map project named `name` relative to cwd.
pub fn run(name: &str) -> Result<()> {
    create_project(Path::new(name), name)
}

pub(crate) fn create_project(project_dir: &Path, name: &str) -> Result<()> {
    if project_dir.exists() {
        bail!("directory '{}' already exists", project_dir.display());
    }

    fs::create_dir_all(project_dir)
        .with_context(|| format!("creating {}", project_dir.display()))?;
    fs::write(project_dir.join(MANIFEST_FILE), RegpackManifest::template(name))
        .with_context(|| format!("writing {MANIFEST_FILE}"))?;

    println!("Created register map '{name}'");
    println!("  {name}/{MANIFEST_FILE}");
    Ok(())
}
