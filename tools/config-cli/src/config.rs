//! Tool configuration (legacy-config.toml)
//!
//! Settings are read from the platform config directory unless a path is
//! given with `--config`. A missing default file means default settings.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File name looked up in the config directory
pub const CONFIG_FILE: &str = "legacy-config.toml";

/// Tool configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ToolConfig {
    /// Dump output settings
    #[serde(default)]
    pub output: OutputConfig,
    /// Entry decoding settings
    #[serde(default)]
    pub decode: DecodeConfig,
}

/// How `dump` prints definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One block per definition, present fields only
    #[default]
    Text,
    /// A JSON array of definitions
    Json,
}

/// Dump output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format (default: text)
    #[serde(default)]
    pub format: OutputFormat,
    /// Pretty-print JSON output (default: true)
    #[serde(default = "default_true")]
    pub pretty: bool,
}

/// Decoding configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodeConfig {
    /// Decode records in parallel when an index is given (default: true)
    #[serde(default = "default_true")]
    pub parallel: bool,
    /// Decode `reencode` output again and compare (default: true)
    #[serde(default = "default_true")]
    pub verify_reencode: bool,
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            pretty: default_true(),
        }
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            parallel: default_true(),
            verify_reencode: default_true(),
        }
    }
}

/// Returns the platform-specific configuration directory.
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "legacy-config")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Loads the configuration from the config directory.
///
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> ToolConfig {
    config_dir()
        .and_then(|dir| std::fs::read_to_string(dir.join(CONFIG_FILE)).ok())
        .and_then(|content| match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!("Ignoring invalid {}: {}", CONFIG_FILE, e);
                None
            }
        })
        .unwrap_or_default()
}

/// Loads the configuration from an explicit path.
///
/// Unlike [`load`], a missing or malformed file is an error.
pub fn load_from(path: &Path) -> Result<ToolConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {:?}", path))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ToolConfig::default();
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.output.pretty);
        assert!(config.decode.parallel);
        assert!(config.decode.verify_reencode);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: ToolConfig = toml::from_str("").unwrap();
        assert_eq!(config, ToolConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config: ToolConfig = toml::from_str(
            r#"
            [output]
            format = "json"

            [decode]
            parallel = false
            "#,
        )
        .unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.pretty);
        assert!(!config.decode.parallel);
        assert!(config.decode.verify_reencode);
    }

    #[test]
    fn test_invalid_format_rejected() {
        let result: Result<ToolConfig, _> = toml::from_str("[output]\nformat = \"yaml\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = ToolConfig::default();
        config.output.pretty = false;
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: ToolConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
