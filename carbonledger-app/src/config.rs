use anyhow::{bail, Context, Result};
use carbonledger_schemas::input::{EmissionInput, ScopeInputs};
use carbonledger_schemas::report::ProductData;
use serde::Deserialize;
use std::fs;
use std::path::Path;

const SUPPORTED_SCHEMA_VERSION: &str = "1";

/// YAML wrapper for the activity entries of one calculation run.
#[derive(Debug, Deserialize)]
pub struct ActivityFile {
    pub schema_version: String,
    #[serde(default)]
    pub scope1: Vec<EmissionInput>,
    #[serde(default)]
    pub scope2: Vec<EmissionInput>,
    #[serde(default)]
    pub scope3: Vec<EmissionInput>,
}

impl ActivityFile {
    pub fn into_inputs(self) -> ScopeInputs {
        ScopeInputs {
            scope1: self.scope1,
            scope2: self.scope2,
            scope3: self.scope3,
        }
    }
}

/// YAML wrapper for production volumes used by the intensity report.
#[derive(Debug, Deserialize)]
pub struct ProductionFile {
    pub schema_version: String,
    pub products: Vec<ProductData>,
}

pub fn load_activity_file(path: &Path) -> Result<ActivityFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read activity file {:?}", path))?;
    let file: ActivityFile = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse YAML from {:?}", path))?;
    check_schema_version(&file.schema_version, path)?;
    Ok(file)
}

pub fn load_production_file(path: &Path) -> Result<ProductionFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read production file {:?}", path))?;
    let file: ProductionFile = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse YAML from {:?}", path))?;
    check_schema_version(&file.schema_version, path)?;
    Ok(file)
}

fn check_schema_version(version: &str, path: &Path) -> Result<()> {
    if version != SUPPORTED_SCHEMA_VERSION {
        bail!(
            "Unsupported schema_version '{}' in {:?} (expected '{}')",
            version,
            path,
            SUPPORTED_SCHEMA_VERSION
        );
    }
    Ok(())
}
