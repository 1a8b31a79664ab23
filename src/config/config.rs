//! TOML configuration parsing and management.

use crate::function::{DispatchOptions, RegistryBuilder, ReturnKind};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Path read when no configuration file is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/schemachat.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// `[functions]` table
    pub functions: FunctionsConfig,
    /// `[dispatch]` table
    pub dispatch: DispatchConfig,
    /// `[logging]` table
    pub logging: LoggingConfig,
}

/// Which functions the registry offers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionsConfig {
    /// Names left out of the registry.
    pub disabled: Vec<String>,
    /// Offer only functions of this return kind.
    pub return_kind: Option<ReturnKind>,
}

impl FunctionsConfig {
    /// Apply the filters to a registry builder.
    pub fn apply(&self, builder: &mut RegistryBuilder) {
        for name in &self.disabled {
            builder.disable(name.as_str());
        }
        if let Some(kind) = self.return_kind {
            builder.only_return_kind(kind);
        }
    }
}

/// Dispatch behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Run with default parameters when arguments fail to decode.
    pub fallback_to_defaults: bool,
    /// Cut result text past this many bytes.
    pub max_result_bytes: Option<usize>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            fallback_to_defaults: true,
            max_result_bytes: None,
        }
    }
}

impl From<&DispatchConfig> for DispatchOptions {
    fn from(config: &DispatchConfig) -> Self {
        Self {
            fallback_to_defaults: config.fallback_to_defaults,
            max_result_bytes: config.max_result_bytes,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Markdown audit log of tool calls; none when unset.
    pub audit_log_file: Option<String>,
    /// `DEBUG` keeps full results in the audit log.
    pub log_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            audit_log_file: None,
            log_level: "INFO".to_string(),
        }
    }
}

#[cfg(feature = "observability")]
impl LoggingConfig {
    /// Open the configured audit log, if any.
    pub fn audit_log(&self) -> Result<Option<crate::observability::AuditLog>> {
        self.audit_log_file
            .as_deref()
            .map(|path| {
                crate::observability::AuditLog::new(Some(Path::new(path)), Some(&self.log_level))
            })
            .transpose()
    }
}

/// Loads and manages TOML configuration.
#[derive(Debug)]
pub struct ConfigurationLoader {
    /// File the configuration was read from, or would have been.
    pub config_path: PathBuf,
    /// The loaded configuration.
    pub config: Configuration,
}

impl ConfigurationLoader {
    /// Initialize configuration loader.
    ///
    /// # Arguments
    /// * `config_path` - Path to TOML config file. If None, uses `config/schemachat.toml`.
    ///   A missing file yields the default configuration.
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config_path = config_path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let config = if config_path.exists() {
            Self::load_config(&config_path)?
        } else {
            tracing::debug!(path = %config_path.display(), "No configuration file, using defaults");
            Self::get_default_config()
        };

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load the file named by the environment, then apply environment overrides.
    pub fn from_environment(env: &super::EnvironmentLoader) -> Result<Self> {
        let config_path = env.config_path();
        let mut loader = Self::new(config_path.as_deref())?;
        if let Some(level) = env.log_level() {
            loader.config.logging.log_level = level;
        }
        Ok(loader)
    }

    /// Create a configuration loader from a pre-parsed Configuration.
    pub fn from_config(config: Configuration) -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            config,
        }
    }

    /// Load configuration from TOML file.
    fn load_config(path: &Path) -> Result<Configuration> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }

    /// Get default configuration.
    fn get_default_config() -> Configuration {
        Configuration::default()
    }

    /// Dispatch options from the `[dispatch]` table.
    pub fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions::from(&self.config.dispatch)
    }

    /// A registry builder filtered by the `[functions]` table.
    pub fn registry_builder(&self) -> RegistryBuilder {
        let mut builder = RegistryBuilder::new();
        self.config.functions.apply(&mut builder);
        builder
    }

    /// Get configuration value by dot-notation key.
    pub fn get_string(&self, key: &str) -> Option<String> {
        match key {
            "functions.disabled" => Some(self.config.functions.disabled.join(",")),
            "functions.return_kind" => self.config.functions.return_kind.map(|k| k.to_string()),
            "dispatch.fallback_to_defaults" => {
                Some(self.config.dispatch.fallback_to_defaults.to_string())
            }
            "dispatch.max_result_bytes" => {
                self.config.dispatch.max_result_bytes.map(|n| n.to_string())
            }
            "logging.audit_log_file" => self.config.logging.audit_log_file.clone(),
            "logging.log_level" => Some(self.config.logging.log_level.clone()),
            _ => None,
        }
    }

    /// Get numeric configuration value.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        match key {
            "dispatch.max_result_bytes" => self.config.dispatch.max_result_bytes.map(|n| n as u64),
            _ => None,
        }
    }

    /// Get boolean configuration value.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match key {
            "dispatch.fallback_to_defaults" => Some(self.config.dispatch.fallback_to_defaults),
            _ => None,
        }
    }
}
