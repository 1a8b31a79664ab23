//! Single-use executors and the per-function trait they wrap.

use crate::catalog::{Catalog, Connection};
use crate::function::parameters::decode_parameters;
use crate::function::{ExecutorError, FunctionParameters, FunctionReturn, ReturnKind};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// What a function body sees while it runs.
pub struct ExecutionContext<'a> {
	catalog: &'a Catalog,
	connection: Option<&'a dyn Connection>,
}

impl<'a> ExecutionContext<'a> {
	/// Create a context over a catalog and an optional connection.
	pub fn new(catalog: &'a Catalog, connection: Option<&'a dyn Connection>) -> Self {
		Self { catalog, connection }
	}

	/// The schema catalog. Never mutated by functions.
	pub fn catalog(&self) -> &'a Catalog {
		self.catalog
	}

	/// The live connection, for functions that declared a dependency on one.
	pub fn connection(&self) -> anyhow::Result<&'a dyn Connection> {
		self.connection
			.ok_or_else(|| anyhow::anyhow!("No database connection is available"))
	}
}

/// A statically typed function the model can call.
///
/// Implementations hold no per-call state; the registry creates a fresh
/// [`TypedExecutor`] around a new value for every call.
///
/// # Example
///
/// ```
/// use schemachat::function::{
///     ExecutionContext, FunctionReturn, NoParameters, ReturnKind, ToolFunction,
/// };
///
/// #[derive(Default)]
/// struct CountTables;
///
/// impl ToolFunction for CountTables {
///     type Parameters = NoParameters;
///     const NAME: &'static str = "count-tables";
///     const DESCRIPTION: &'static str = "Count the tables in the database.";
///     const RETURN_KIND: ReturnKind = ReturnKind::Text;
///
///     fn call(
///         &self,
///         _parameters: &NoParameters,
///         context: &ExecutionContext<'_>,
///     ) -> anyhow::Result<FunctionReturn> {
///         Ok(FunctionReturn::text(context.catalog().tables().count().to_string()))
///     }
/// }
/// ```
pub trait ToolFunction: Default + Send + Sync + 'static {
	/// Shape of the decoded call arguments.
	type Parameters: FunctionParameters;

	/// Unique kebab-case name.
	const NAME: &'static str;

	/// Description shown to the model.
	const DESCRIPTION: &'static str;

	/// How the output is interpreted downstream.
	const RETURN_KIND: ReturnKind;

	/// Whether a live connection must be attached before the call.
	const REQUIRES_CONNECTION: bool = false;

	/// Run the function once.
	fn call(
		&self,
		parameters: &Self::Parameters,
		context: &ExecutionContext<'_>,
	) -> anyhow::Result<FunctionReturn>;
}

/// Lifecycle of a single executor. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutorState {
	/// Fresh from the factory.
	Created,
	/// Parameters are set.
	Configured,
	/// The catalog is attached.
	CatalogAttached,
	/// A connection is attached.
	ConnectionAttached,
	/// The function body is running.
	Invoked,
	/// The call returned a result.
	Completed,
	/// The call failed.
	Failed,
}

impl fmt::Display for ExecutorState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Created => "created",
			Self::Configured => "configured",
			Self::CatalogAttached => "catalog-attached",
			Self::ConnectionAttached => "connection-attached",
			Self::Invoked => "invoked",
			Self::Completed => "completed",
			Self::Failed => "failed",
		};
		f.write_str(name)
	}
}

/// The one capability every function executor offers, whatever its
/// parameter type.
///
/// Drive it in order: configure, attach the catalog, attach a connection
/// if one is required, execute once.
pub trait FunctionExecutor: Send {
	/// Name of the function this executor runs.
	fn name(&self) -> &'static str;

	/// Current lifecycle state.
	fn state(&self) -> ExecutorState;

	/// Whether a connection must be attached before executing.
	fn requires_connection(&self) -> bool;

	/// Decode and set the call arguments.
	///
	/// A decode failure leaves the executor in [`ExecutorState::Created`].
	fn configure(&mut self, arguments: Value) -> Result<(), ExecutorError>;

	/// Set all parameters to their defaults.
	fn configure_defaults(&mut self) -> Result<(), ExecutorError>;

	/// Attach the shared, read-only catalog.
	fn attach_catalog(&mut self, catalog: Arc<Catalog>) -> Result<(), ExecutorError>;

	/// Attach a live connection. A no-op for executors that need none.
	fn attach_connection(&mut self, connection: Arc<dyn Connection>) -> Result<(), ExecutorError>;

	/// Run the function exactly once.
	fn execute(&mut self) -> Result<FunctionReturn, ExecutorError>;
}

/// Executor for a [`ToolFunction`] implementation.
pub struct TypedExecutor<T: ToolFunction> {
	function: T,
	state: ExecutorState,
	parameters: Option<T::Parameters>,
	catalog: Option<Arc<Catalog>>,
	connection: Option<Arc<dyn Connection>>,
}

impl<T: ToolFunction> TypedExecutor<T> {
	/// Wrap a function value in a fresh executor.
	pub fn new(function: T) -> Self {
		Self {
			function,
			state: ExecutorState::Created,
			parameters: None,
			catalog: None,
			connection: None,
		}
	}

	/// The configured parameters, if any.
	pub fn parameters(&self) -> Option<&T::Parameters> {
		self.parameters.as_ref()
	}

	fn expect_state(&self, operation: &'static str, expected: ExecutorState) -> Result<(), ExecutorError> {
		if self.state == expected {
			Ok(())
		} else {
			Err(ExecutorError::invalid_state(operation, self.state))
		}
	}

	fn set_parameters(&mut self, parameters: T::Parameters) {
		self.parameters = Some(parameters);
		self.state = ExecutorState::Configured;
	}
}

impl<T: ToolFunction> FunctionExecutor for TypedExecutor<T> {
	fn name(&self) -> &'static str {
		T::NAME
	}

	fn state(&self) -> ExecutorState {
		self.state
	}

	fn requires_connection(&self) -> bool {
		T::REQUIRES_CONNECTION
	}

	fn configure(&mut self, arguments: Value) -> Result<(), ExecutorError> {
		self.expect_state("configure", ExecutorState::Created)?;
		let parameters = decode_parameters::<T::Parameters>(arguments)
			.map_err(|e| ExecutorError::ArgumentsInvalid(e.to_string()))?;
		self.set_parameters(parameters);
		Ok(())
	}

	fn configure_defaults(&mut self) -> Result<(), ExecutorError> {
		self.expect_state("configure", ExecutorState::Created)?;
		self.set_parameters(T::Parameters::default());
		Ok(())
	}

	fn attach_catalog(&mut self, catalog: Arc<Catalog>) -> Result<(), ExecutorError> {
		self.expect_state("attach a catalog", ExecutorState::Configured)?;
		self.catalog = Some(catalog);
		self.state = ExecutorState::CatalogAttached;
		Ok(())
	}

	fn attach_connection(&mut self, connection: Arc<dyn Connection>) -> Result<(), ExecutorError> {
		if !T::REQUIRES_CONNECTION {
			return Ok(());
		}
		self.expect_state("attach a connection", ExecutorState::CatalogAttached)?;
		self.connection = Some(connection);
		self.state = ExecutorState::ConnectionAttached;
		Ok(())
	}

	fn execute(&mut self) -> Result<FunctionReturn, ExecutorError> {
		let ready = if T::REQUIRES_CONNECTION {
			ExecutorState::ConnectionAttached
		} else {
			ExecutorState::CatalogAttached
		};
		if T::REQUIRES_CONNECTION && self.state == ExecutorState::CatalogAttached {
			return Err(ExecutorError::ConnectionRequired {
				name: T::NAME.to_string(),
			});
		}
		self.expect_state("execute", ready)?;

		let (Some(parameters), Some(catalog)) = (self.parameters.as_ref(), self.catalog.as_deref())
		else {
			return Err(ExecutorError::invalid_state("execute", self.state));
		};

		self.state = ExecutorState::Invoked;
		let context = ExecutionContext::new(catalog, self.connection.as_deref());
		let result = self.function.call(parameters, &context);
		self.state = if result.is_ok() {
			ExecutorState::Completed
		} else {
			ExecutorState::Failed
		};
		Ok(result?)
	}
}
