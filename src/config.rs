//! Configuration file support for depsentry.
//!
//! Provides YAML-based configuration through `depsentry.config.yml` files,
//! including data structures, file loading, and validation. Command-line
//! arguments always win over config values.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use crate::ports::outbound::ProviderKind;
use crate::shared::Result;

const CONFIG_FILENAME: &str = "depsentry.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// AI provider tag: openai, gemini, or ollama
    pub provider: Option<String>,
    /// Model override for the chosen provider
    pub model: Option<String>,
    /// Whether AI assessments are requested at all
    pub ai: Option<bool>,
    /// Default output format: table or json
    pub format: Option<String>,
    /// Bound on concurrently analyzed dependencies
    pub max_concurrent: Option<usize>,
    /// Cache entry lifetime in hours
    pub cache_ttl_hours: Option<i64>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

impl ConfigFile {
    /// The configured provider, parsed; None when not set
    pub fn provider_kind(&self) -> Option<ProviderKind> {
        self.provider
            .as_deref()
            .and_then(|tag| ProviderKind::from_str(tag).ok())
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(ref tag) = config.provider {
        if let Err(message) = ProviderKind::from_str(tag) {
            bail!(
                "Invalid config: {}\n\n💡 Hint: Set 'provider' to one of: openai, gemini, ollama.",
                message
            );
        }
    }

    if let Some(max_concurrent) = config.max_concurrent {
        if max_concurrent == 0 {
            bail!(
                "Invalid config: max_concurrent must be at least 1.\n\n💡 Hint: Remove the field to use the default of 4."
            );
        }
    }

    if let Some(ttl) = config.cache_ttl_hours {
        if ttl < 0 {
            bail!(
                "Invalid config: cache_ttl_hours must not be negative.\n\n💡 Hint: Use 0 to expire entries immediately."
            );
        }
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_valid_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(
            &config_path,
            r#"
provider: openai
model: gpt-4o
ai: true
format: json
max_concurrent: 8
cache_ttl_hours: 48
"#,
        )
        .unwrap();

        let config = load_config_from_path(&config_path).unwrap();
        assert_eq!(config.provider_kind(), Some(ProviderKind::OpenAi));
        assert_eq!(config.model.as_deref(), Some("gpt-4o"));
        assert_eq!(config.ai, Some(true));
        assert_eq!(config.format.as_deref(), Some("json"));
        assert_eq!(config.max_concurrent, Some(8));
        assert_eq!(config.cache_ttl_hours, Some(48));
    }

    #[test]
    fn test_discover_config_found() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "provider: ollama\n").unwrap();

        let config = discover_config(dir.path()).unwrap();
        assert!(config.is_some());
        assert_eq!(config.unwrap().provider_kind(), Some(ProviderKind::Ollama));
    }

    #[test]
    fn test_discover_config_not_found() {
        let dir = TempDir::new().unwrap();
        let config = discover_config(dir.path()).unwrap();
        assert!(config.is_none());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config_from_path(Path::new("/nonexistent/config.yml"));
        assert!(result.is_err());
        assert!(format!("{}", result.unwrap_err()).contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_parse_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("bad.yml");
        fs::write(&config_path, "invalid: yaml: [[[broken").unwrap();

        let result = load_config_from_path(&config_path);
        assert!(result.is_err());
        assert!(format!("{}", result.unwrap_err()).contains("Failed to parse config file"));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(&config_path, "provider: grok\n").unwrap();

        let result = load_config_from_path(&config_path);
        assert!(result.is_err());
        assert!(format!("{}", result.unwrap_err()).contains("Unknown AI provider"));
    }

    #[test]
    fn test_zero_max_concurrent_rejected() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(&config_path, "max_concurrent: 0\n").unwrap();

        let result = load_config_from_path(&config_path);
        assert!(result.is_err());
        assert!(format!("{}", result.unwrap_err()).contains("at least 1"));
    }

    #[test]
    fn test_negative_ttl_rejected() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(&config_path, "cache_ttl_hours: -1\n").unwrap();

        let result = load_config_from_path(&config_path);
        assert!(result.is_err());
        assert!(format!("{}", result.unwrap_err()).contains("must not be negative"));
    }

    #[test]
    fn test_unknown_fields_warning() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(&config_path, "provider: openai\nunknown_field: true\n").unwrap();

        let config = load_config_from_path(&config_path).unwrap();
        assert_eq!(config.unknown_fields.len(), 1);
        assert!(config.unknown_fields.contains_key("unknown_field"));
    }

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();
        assert!(config.provider.is_none());
        assert!(config.provider_kind().is_none());
        assert!(config.ai.is_none());
        assert!(config.unknown_fields.is_empty());
    }
}
