//! Environment variable loading and management.

use std::env;
use std::path::{Path, PathBuf};

/// Names the configuration file to load.
pub const CONFIG_ENV: &str = "SCHEMACHAT_CONFIG";

/// Overrides `logging.log_level`.
pub const LOG_LEVEL_ENV: &str = "SCHEMACHAT_LOG_LEVEL";

/// Loads environment variables from .env file and system environment.
#[derive(Debug, Clone)]
pub struct EnvironmentLoader {
    env_file: Option<PathBuf>,
}

impl EnvironmentLoader {
    /// Initialize the environment loader.
    ///
    /// # Arguments
    /// * `env_file` - Path to a .env file. Nothing is loaded when None.
    pub fn new(env_file: Option<&Path>) -> Self {
        // Only an explicit path is loaded, so tests never pick up a stray .env.
        if let Some(path) = env_file {
            if path.exists() {
                if let Err(e) = dotenv::from_path(path) {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to load .env file");
                }
            }
        }

        Self {
            env_file: env_file.map(Path::to_path_buf),
        }
    }

    /// The .env file this loader was given.
    pub fn env_file(&self) -> Option<&Path> {
        self.env_file.as_deref()
    }

    /// Configuration file named by `SCHEMACHAT_CONFIG`.
    pub fn config_path(&self) -> Option<PathBuf> {
        non_empty(CONFIG_ENV).map(PathBuf::from)
    }

    /// Log level named by `SCHEMACHAT_LOG_LEVEL`, uppercased.
    pub fn log_level(&self) -> Option<String> {
        non_empty(LOG_LEVEL_ENV).map(|level| level.to_uppercase())
    }
}

impl Default for EnvironmentLoader {
    fn default() -> Self {
        Self::new(None)
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
