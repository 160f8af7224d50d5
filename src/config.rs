use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReportError, Result};
use crate::inventory::backend::DEFAULT_POWERSHELL;

const CONFIG_DIR: &str = "hyperv-report";
const CONFIG_FILE: &str = "config.yaml";

/// Settings for a report run. Built from defaults, then an optional YAML
/// file, then command-line flags.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    pub format: String,
    pub strict: bool,
    pub powershell: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            format: "json".to_string(),
            strict: false,
            powershell: DEFAULT_POWERSHELL.to_string(),
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub output_dir: Option<PathBuf>,
    pub format: Option<String>,
    pub strict: bool,
}

impl ReportConfig {
    /// An explicit path must exist; the per-user default is optional.
    pub fn load(explicit: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        if let Some(dir) = overrides.output_dir {
            config.output_dir = dir;
        }
        if let Some(format) = overrides.format {
            config.format = format;
        }
        config.strict |= overrides.strict;

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            ReportError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        log::debug!("loaded config from {}", path.display());
        parse_yaml(&raw).map_err(|e| ReportError::Config(format!("{}: {}", path.display(), e)))
    }

    #[cfg(test)]
    pub fn from_yaml(raw: &str) -> Result<Self> {
        parse_yaml(raw).map_err(|e| ReportError::Config(e.to_string()))
    }
}

fn parse_yaml(raw: &str) -> std::result::Result<ReportConfig, serde_yaml::Error> {
    if raw.trim().is_empty() {
        return Ok(ReportConfig::default());
    }
    serde_yaml::from_str(raw)
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}
