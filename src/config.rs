//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.stakemap.toml` files.

use crate::report::ExportFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".stakemap.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Export settings.
    #[serde(default)]
    pub export: ExportConfig,

    /// Analysis thresholds.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory export artifacts are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            verbose: false,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Report export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Export mode used when `report` is given no explicit format.
    #[serde(default)]
    pub format: ExportFormat,

    /// Minimum number of stakeholders before an export is offered.
    #[serde(default = "default_min_stakeholders")]
    pub min_stakeholders: usize,

    /// Embed the print-on-open script in printable reports.
    #[serde(default = "default_true")]
    pub auto_print: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            min_stakeholders: default_min_stakeholders(),
            auto_print: true,
        }
    }
}

fn default_min_stakeholders() -> usize {
    3
}

fn default_true() -> bool {
    true
}

/// Score thresholds for the summary and recommendation rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_high_influence")]
    pub high_influence: i64,

    #[serde(default = "default_supporter_support")]
    pub supporter_support: i64,

    #[serde(default = "default_risk_support")]
    pub risk_support: i64,

    #[serde(default = "default_low_engagement")]
    pub low_engagement: i64,

    #[serde(default = "default_engagement_influence")]
    pub engagement_influence: i64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            high_influence: default_high_influence(),
            supporter_support: default_supporter_support(),
            risk_support: default_risk_support(),
            low_engagement: default_low_engagement(),
            engagement_influence: default_engagement_influence(),
        }
    }
}

fn default_high_influence() -> i64 {
    7
}

fn default_supporter_support() -> i64 {
    6
}

fn default_risk_support() -> i64 {
    4
}

fn default_low_engagement() -> i64 {
    2
}

fn default_engagement_influence() -> i64 {
    5
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load configuration from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref dir) = args.output_dir {
            self.general.output_dir = dir.clone();
        }

        if let Some(format) = args.format {
            self.export.format = format;
        }

        if let Some(min) = args.min_stakeholders {
            self.export.min_stakeholders = min;
        }

        if args.no_auto_print {
            self.export.auto_print = false;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.output_dir, PathBuf::from("."));
        assert_eq!(config.export.format, ExportFormat::Json);
        assert_eq!(config.export.min_stakeholders, 3);
        assert!(config.export.auto_print);
        assert_eq!(config.analysis.high_influence, 7);
        assert_eq!(config.analysis.risk_support, 4);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
[general]
output_dir = "reports"

[export]
format = "html"

[analysis]
high_influence = 8
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output_dir, PathBuf::from("reports"));
        assert_eq!(config.export.format, ExportFormat::Html);
        assert_eq!(config.export.min_stakeholders, 3);
        assert_eq!(config.analysis.high_influence, 8);
        assert_eq!(config.analysis.supporter_support, 6);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[export]"));
        assert!(toml_str.contains("[analysis]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.export.min_stakeholders, 3);
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        let mut file = std::fs::File::create(dir.path().join(CONFIG_FILE)).unwrap();
        writeln!(file, "[export]\nmin_stakeholders = 5").unwrap();

        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.export.min_stakeholders, 5);
    }

    #[test]
    fn test_cli_overrides_only_explicit_values() {
        let mut config: Config = toml::from_str("[export]\nformat = \"html\"\nmin_stakeholders = 4").unwrap();

        let args = Args::parse_from(["stakemap", "--output-dir", "out"]);
        config.merge_with_args(&args);
        assert_eq!(config.export.format, ExportFormat::Html);
        assert_eq!(config.export.min_stakeholders, 4);
        assert_eq!(config.general.output_dir, PathBuf::from("out"));

        let args = Args::parse_from(["stakemap", "--format", "json", "--min-stakeholders", "2"]);
        config.merge_with_args(&args);
        assert_eq!(config.export.format, ExportFormat::Json);
        assert_eq!(config.export.min_stakeholders, 2);
    }

    #[test]
    fn test_verbose_from_file_sets_debug_level() {
        let mut config: Config = toml::from_str("[general]\nverbose = true").unwrap();
        let args = Args::parse_from(["stakemap"]);
        config.merge_with_args(&args);
        assert!(config.general.verbose);
        assert_eq!(args.log_level(config.general.verbose), tracing::Level::DEBUG);

        let quiet = Args::parse_from(["stakemap", "--quiet"]);
        assert_eq!(quiet.log_level(config.general.verbose), tracing::Level::ERROR);

        let mut config = Config::default();
        config.merge_with_args(&Args::parse_from(["stakemap", "-v"]));
        assert!(config.general.verbose);
    }
}
