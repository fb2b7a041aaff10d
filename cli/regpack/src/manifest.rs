//! `regpack.toml` manifest parsing and project configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regpack_alloc::{Field, Strategy};
use regpack_core::{Platform, Value, ValueType};
use serde::{Deserialize, Serialize};

pub const MANIFEST_FILE: &str = "regpack.toml";

/// The top-level manifest structure for a register map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegpackManifest {
    /// Package metadata (required).
    pub package: PackageConfig,
    /// Allocation settings.
    #[serde(default)]
    pub allocation: AllocationConfig,
    /// Fields to pack, in caller order.
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageConfig {
    pub name: String,
    /// Semantic version of the register map.
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllocationConfig {
    #[serde(default)]
    pub strategy: Strategy,
    /// Clock preset used for duration reports (e.g., "moku_go").
    #[serde(default)]
    pub platform: Option<String>,
}

/// One `[[fields]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    /// Catalog identifier, e.g. "voltage_output_05v_s16".
    #[serde(rename = "type")]
    pub value_type: String,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
}

impl FieldSpec {
    fn to_field(&self) -> Result<Field> {
        let value_type: ValueType = self
            .value_type
            .parse()
            .with_context(|| format!("field '{}'", self.name))?;
        let mut field = Field::new(&self.name, value_type)?;
        if let Some(default) = self.default {
            field = field
                .with_default(default)
                .with_context(|| format!("default for field '{}'", self.name))?;
        }
        if let Some(description) = &self.description {
            field = field.with_description(description);
        }
        Ok(field)
    }
}

impl RegpackManifest {
    /// Search upward from `start_dir` for a `regpack.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                return Ok(Some((Self::load(&candidate)?, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Load and validate a manifest from an explicit path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse and validate a manifest from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        let manifest: RegpackManifest = toml::from_str(s)?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        semver::Version::parse(&self.package.version)
            .with_context(|| format!("package version '{}'", self.package.version))?;
        self.platform()?;
        Ok(())
    }

    /// Convert the `[[fields]]` entries to validated fields.
    pub fn fields(&self) -> Result<Vec<Field>> {
        self.fields.iter().map(FieldSpec::to_field).collect()
    }

    pub fn strategy(&self) -> Strategy {
        self.allocation.strategy
    }

    /// Resolve the configured clock preset, if any.
    pub fn platform(&self) -> Result<Option<&'static Platform>> {
        match &self.allocation.platform {
            None => Ok(None),
            Some(id) => Platform::resolve(id)
                .map(Some)
                .with_context(|| format!("unknown platform '{id}' (see `regpack platforms`)")),
        }
    }

    /// Generate the default template for `regpack init`.
    pub fn template(name: &str) -> String {
        format!(
            r#"[package]
name = "{name}"
version = "0.1.0"

[allocation]
strategy = "best_fit"
platform = "moku_go"

[[fields]]
name = "intensity"
type = "voltage_output_05v_s16"
default = 2400
description = "Output intensity in mV"

[[fields]]
name = "pulse_width"
type = "pulse_duration_ns_u16"
default = 100

[[fields]]
name = "enable"
type = "boolean"
default = false
"#
        )
    }
}
