//! Harness configuration.
//!
//! Loaded from YAML:
//!
//! ```yaml
//! report:
//!   width: 79
//!   padding: 34
//!   stats_padding: 25
//! full_output: target/probe-results.txt
//! suites:
//!   - StructureChecks
//!   - NullParameterChecks
//! ```
//!
//! Every key is optional.

use crate::error::ConfigError;
use crate::report::ReportLayout;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for one harness run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub report: ReportLayout,

    /// Path of the full-detail report. `None` disables it.
    pub full_output: Option<PathBuf>,

    /// Suites to run, by name. `None` runs all of them.
    pub suites: Option<Vec<String>>,
}

impl HarnessConfig {
    /// Loads the configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parses the configuration from YAML text. Empty text yields the defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.report.width == 0 {
            return Err(ConfigError::Empty("report.width"));
        }
        if let Some(suites) = &self.suites {
            if suites.iter().any(String::is_empty) {
                return Err(ConfigError::Empty("suite name"));
            }
        }
        Ok(())
    }

    /// Returns true if the named suite is selected.
    pub fn selects(&self, suite: &str) -> bool {
        self.suites
            .as_ref()
            .is_none_or(|names| names.iter().any(|n| n == suite))
    }
}
