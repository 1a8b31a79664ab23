//! Schemachat - function registry and dispatch for schema-aware chat agents
//!
//! Schemachat lets an LLM chat agent inspect a database schema and its lint
//! results through named, typed functions:
//!
//! - **`catalog`** - Read-only schema model and the live connection capability
//! - **`function`** - Function definitions, the registry, and the dispatch façade
//! - **`tools`** - The built-in functions (`list`, `describe-tables`, `lint`, ...)
//! - **`lint`** - Schema design checks behind the `lint` function
//! - **`config`** - TOML configuration and environment loading
//! - **`observability`** - Markdown audit log of tool calls
//!
//! # Features
//!
//! Enable the features you need in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! schemachat = { version = "0.3", default-features = false }
//! # Or pick optional modules:
//! schemachat = { version = "0.3", features = ["config"] }
//! # Or enable everything:
//! schemachat = { version = "0.3", features = ["all"] }
//! ```
//!
//! # Example: Dispatching a tool call
//!
//! ```
//! use schemachat::catalog::{Catalog, Column, Schema, Table};
//! use schemachat::function::{get_registry, generate_openai_tools, FunctionToolExecutor};
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(Catalog::new().with_schema(
//!     Schema::new("PUBLIC").with_table(
//!         Table::new("PUBLIC", "ORDERS").with_column(Column::new("ID", "INTEGER")),
//!     ),
//! ));
//!
//! let registry = get_registry().unwrap();
//! let tools = generate_openai_tools(registry);
//! assert_eq!(tools.len(), registry.len());
//!
//! let executor = FunctionToolExecutor::new(registry);
//! let text = executor.dispatch("lint", r#"{"table-name": "ORDERS"}"#, &catalog, None);
//! assert!(text.contains("no-primary-key"));
//! ```
//!
//! # Example: Using the config feature
//!
//! ```ignore
//! use schemachat::config::ConfigurationLoader;
//! use std::path::Path;
//!
//! let loader = ConfigurationLoader::new(Some(Path::new("config/schemachat.toml"))).unwrap();
//! println!("Fallback to defaults: {}", loader.config.dispatch.fallback_to_defaults);
//! ```

#![warn(missing_docs)]

pub mod catalog;
pub mod function;
pub mod lint;
pub mod tools;

/// Configuration management (enabled with the `config` feature)
#[cfg(feature = "config")]
pub mod config;

/// Audit logging (enabled with the `observability` feature)
#[cfg(feature = "observability")]
pub mod observability;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::catalog::{Catalog, Connection};
    pub use crate::function::{
        get_registry, DispatchOptions, FunctionDefinition, FunctionDefinitionRegistry,
        FunctionReturn, FunctionToolExecutor, ReturnKind, ToolCall, ToolFunction,
    };

    #[cfg(feature = "config")]
    pub use crate::config::{Configuration, ConfigurationLoader, EnvironmentLoader};

    #[cfg(feature = "observability")]
    pub use crate::observability::AuditLog;
}
