//! Configuration handling for RepeatX CLI
//!
//! Supports loading configuration from repeatx.toml files with CLI argument overrides.

use anyhow::{Context, Result};
use repeatx_core::io::ReportFormat;
use repeatx_core::{FinderParams, SyntheticParams};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::CliError;

pub const DEFAULT_CONFIG_FILE: &str = "repeatx.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub finder: FinderParams,
    pub output: OutputConfig,
    pub generate: SyntheticParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Worker threads; 0 leaves the pool at its default size
    #[serde(default = "default_threads")]
    pub threads: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Report format: csv, tsv, json, details, or auto (from the output extension)
    #[serde(default = "default_format")]
    pub format: String,

    /// Number of top repeats echoed to the log
    #[serde(default = "default_top")]
    pub top: usize,

    /// FASTA line width for generated sequences
    #[serde(default = "default_line_width")]
    pub line_width: usize,
}

fn default_threads() -> usize {
    num_cpus::get()
}

fn default_format() -> String {
    "auto".to_string()
}

fn default_top() -> usize {
    10
}

fn default_line_width() -> usize {
    80
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            top: default_top(),
            line_width: default_line_width(),
        }
    }
}

impl OutputConfig {
    /// The configured report format, or `None` for `auto`.
    pub fn report_format(&self) -> Result<Option<ReportFormat>, CliError> {
        if self.format.eq_ignore_ascii_case("auto") {
            return Ok(None);
        }
        self.format
            .parse()
            .map(Some)
            .map_err(|e: repeatx_core::io::ReportError| CliError::config(e.to_string()))
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    log::info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::file_not_found(path.to_path_buf()).into());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content).map_err(CliError::from)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> Result<String> {
        toml::to_string_pretty(&Self::default()).context("Failed to serialize default configuration")
    }
}
