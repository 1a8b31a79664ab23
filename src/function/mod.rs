//! Function registry and dispatch engine.
//!
//! A function is a named operation a model may ask to run. Each one is a
//! [`ToolFunction`] implementation with a typed parameter shape; the
//! registry indexes their [`FunctionDefinition`]s, derives a
//! [`ToolSpecification`] for each, and the [`FunctionToolExecutor`] routes
//! textual tool calls to fresh executors.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────┐
//! │ BuiltinProvider  │   │ StaticProvider   │
//! └────────┬─────────┘   └────────┬─────────┘
//!          │                      │
//!          ▼                      ▼
//! ┌─────────────────────────────────────────┐
//! │        DefinitionProvider trait         │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │   RegistryBuilder → FunctionDefinition- │
//! │   Registry (name index, return kinds,   │
//! │   cached ToolSpecifications)            │
//! └────────────────────┬────────────────────┘
//!                      │  lookup(name)
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │   FunctionToolExecutor                  │
//! │   (name, raw JSON) → FunctionExecutor   │
//! │   → result text                         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use schemachat::catalog::{Catalog, ForeignKey, Schema, Table};
//! use schemachat::function::{
//!     generate_openai_tools_by_return_kind, get_registry, FunctionToolExecutor, ReturnKind,
//! };
//! use std::sync::Arc;
//!
//! let registry = get_registry().unwrap();
//! let tools = generate_openai_tools_by_return_kind(registry, ReturnKind::Json);
//! assert!(tools.iter().any(|tool| tool["function"]["name"] == "describe-tables"));
//!
//! let catalog = Arc::new(Catalog::new().with_schema(
//!     Schema::new("PUBLIC")
//!         .with_table(Table::new("PUBLIC", "AUTHORS").with_primary_key(&["ID"]))
//!         .with_table(
//!             Table::new("PUBLIC", "BOOKS")
//!                 .with_primary_key(&["ID"])
//!                 .with_foreign_key(ForeignKey::new(
//!                     "FK_BOOKS_AUTHOR", &["AUTHOR_ID"], "PUBLIC.AUTHORS", &["ID"],
//!                 )),
//!         ),
//! ));
//!
//! let executor = FunctionToolExecutor::new(registry);
//! let report = executor.dispatch("lint", r#"{"table-name":"BOOKS"}"#, &catalog, None);
//! assert!(report.contains("foreign-key-with-no-index"));
//! ```

mod definition;
mod dispatch;
mod error;
mod executor;
mod parameters;
mod provider;
mod registry;
mod return_kind;
mod returns;
mod specification;

pub use definition::{is_kebab_case, ExecutorFactory, FunctionDefinition, SchemaSource};
pub use dispatch::{
	truncate, DispatchOptions, DispatchOutcome, DispatchStatus, FunctionToolExecutor, ToolCall,
	TRUNCATION_MARKER,
};
pub use error::{ExecutorError, FunctionError, RegistryError, RegistryResult};
pub use executor::{ExecutionContext, ExecutorState, FunctionExecutor, ToolFunction, TypedExecutor};
pub use parameters::{decode_parameters, parse_arguments, FunctionParameters, NoParameters};
pub use provider::{DefinitionProvider, StaticProvider};
pub use registry::{
	get_registry, initialize_registry, initialize_registry_with, FunctionDefinitionRegistry,
	RegisteredFunction, RegistryBuilder,
};
pub use return_kind::ReturnKind;
pub use returns::{FunctionReturn, NO_RESULTS};
pub use specification::{
	derive_parameters_schema, normalize_parameters_schema, to_specifications, ToolSpecification,
};

/// Derive the specification of one definition.
pub fn to_specification(definition: &FunctionDefinition) -> RegistryResult<ToolSpecification> {
	ToolSpecification::from_definition(definition)
}

/// Generate OpenAI-compatible tool schemas for every registered function.
pub fn generate_openai_tools(registry: &FunctionDefinitionRegistry) -> Vec<serde_json::Value> {
	registry
		.specifications()
		.into_iter()
		.map(ToolSpecification::to_openai_function)
		.collect()
}

/// Generate OpenAI-compatible tool schemas for one return kind.
///
/// Some providers accept only one result shape per session.
pub fn generate_openai_tools_by_return_kind(
	registry: &FunctionDefinitionRegistry,
	kind: ReturnKind,
) -> Vec<serde_json::Value> {
	registry
		.specifications_by_return_kind(kind)
		.into_iter()
		.map(ToolSpecification::to_openai_function)
		.collect()
}
