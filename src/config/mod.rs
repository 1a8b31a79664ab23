//! Configuration management.
//!
//! Settings come from a TOML file (`config/schemachat.toml` unless told
//! otherwise) and a few environment variables, optionally loaded from an
//! explicit `.env` file.
//!
//! # Example
//!
//! ```no_run
//! use schemachat::config::{ConfigurationLoader, EnvironmentLoader};
//! use schemachat::function::FunctionToolExecutor;
//! use schemachat::tools::BuiltinProvider;
//!
//! let env = EnvironmentLoader::new(None);
//! let loader = ConfigurationLoader::from_environment(&env).unwrap();
//!
//! let mut builder = loader.registry_builder();
//! builder.provider(&BuiltinProvider).unwrap();
//! let registry = builder.build().unwrap();
//!
//! let executor = FunctionToolExecutor::with_options(&registry, loader.dispatch_options());
//! println!("{} functions available", executor.registry().len());
//! ```

pub mod config;
pub mod environment;

// Re-export main types for convenience
pub use self::config::{
    Configuration, ConfigurationLoader, DispatchConfig, FunctionsConfig, LoggingConfig,
    DEFAULT_CONFIG_PATH,
};
pub use self::environment::{EnvironmentLoader, CONFIG_ENV, LOG_LEVEL_ENV};
