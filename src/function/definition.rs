//! Static metadata and executor factory for one function.

use crate::function::specification::derive_parameters_schema;
use crate::function::{FunctionExecutor, RegistryError, ReturnKind, ToolFunction, TypedExecutor};
use serde_json::Value;
use std::any::type_name;
use std::fmt;
use std::sync::Arc;

/// Produces a fresh executor for every call.
pub type ExecutorFactory = Arc<dyn Fn() -> Box<dyn FunctionExecutor> + Send + Sync>;

/// Derives the JSON Schema of a parameter shape.
pub type SchemaSource = fn() -> Result<Value, String>;

/// A canonical description of one callable function.
///
/// Definitions hold no per-call state. They are created at discovery time
/// and owned by the registry afterwards.
///
/// # Example
///
/// ```
/// use schemachat::function::{FunctionDefinition, ReturnKind};
/// use schemachat::tools::Lint;
///
/// let def = FunctionDefinition::of::<Lint>();
/// assert_eq!(def.name(), "lint");
/// assert_eq!(def.return_kind(), ReturnKind::Text);
/// assert!(!def.requires_connection());
/// ```
#[derive(Clone)]
pub struct FunctionDefinition {
	name: String,
	description: String,
	return_kind: ReturnKind,
	parameters_type: &'static str,
	requires_connection: bool,
	factory: ExecutorFactory,
	schema: SchemaSource,
}

impl FunctionDefinition {
	/// Build the definition of a [`ToolFunction`] implementation.
	pub fn of<T: ToolFunction>() -> Self {
		Self::of_with::<T>(T::default)
	}

	/// Build a definition whose function values come from `make`.
	///
	/// Use this when a function carries construction-time configuration.
	pub fn of_with<T: ToolFunction>(make: impl Fn() -> T + Send + Sync + 'static) -> Self {
		Self {
			name: T::NAME.to_string(),
			description: T::DESCRIPTION.to_string(),
			return_kind: T::RETURN_KIND,
			parameters_type: type_name::<T::Parameters>(),
			requires_connection: T::REQUIRES_CONNECTION,
			factory: Arc::new(move || -> Box<dyn FunctionExecutor> {
				Box::new(TypedExecutor::new(make()))
			}),
			schema: derive_parameters_schema::<T::Parameters>,
		}
	}

	/// Unique kebab-case name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Description shown to the model.
	pub fn description(&self) -> &str {
		&self.description
	}

	/// How the output is read.
	pub fn return_kind(&self) -> ReturnKind {
		self.return_kind
	}

	/// Rust type name of the parameter shape.
	pub fn parameters_type(&self) -> &'static str {
		self.parameters_type
	}

	/// Whether executors need a live connection.
	pub fn requires_connection(&self) -> bool {
		self.requires_connection
	}

	/// Create a fresh executor in the `Created` state.
	pub fn create_executor(&self) -> Box<dyn FunctionExecutor> {
		(self.factory)()
	}

	/// Derive the raw parameter schema.
	pub fn parameters_schema(&self) -> Result<Value, String> {
		(self.schema)()
	}

	/// Check the name and description.
	pub fn validate(&self) -> Result<(), RegistryError> {
		if !is_kebab_case(&self.name) {
			return Err(RegistryError::invalid_definition(
				&self.name,
				"name must be non-empty kebab-case",
			));
		}
		if self.description.trim().is_empty() {
			return Err(RegistryError::invalid_definition(
				&self.name,
				"description must not be empty",
			));
		}
		Ok(())
	}
}

impl fmt::Debug for FunctionDefinition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FunctionDefinition")
			.field("name", &self.name)
			.field("return_kind", &self.return_kind)
			.field("parameters_type", &self.parameters_type)
			.field("requires_connection", &self.requires_connection)
			.finish()
	}
}

/// Whether `name` is lowercase words of letters and digits joined by single hyphens.
pub fn is_kebab_case(name: &str) -> bool {
	!name.is_empty()
		&& name.split('-').all(|part| {
			!part.is_empty() && part.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
		})
}
