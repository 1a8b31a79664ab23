//! Error types for the function module.

use crate::function::ExecutorState;
use thiserror::Error;

/// Failures surfaced by a single dispatch.
///
/// None of these escape the dispatch façade as errors; each is rendered to
/// result text for the model to read.
///
/// # Example
///
/// ```
/// use schemachat::function::FunctionError;
///
/// let error = FunctionError::not_found("describe-views");
/// assert_eq!(error.to_string(), "Cannot find function \"describe-views\"");
/// ```
#[derive(Debug, Error)]
pub enum FunctionError {
	/// No definition is registered under the requested name.
	#[error("Cannot find function \"{name}\"")]
	ToolNotFound {
		/// Name requested by the caller.
		name: String,
	},

	/// The call arguments could not be decoded into the parameter shape.
	#[error("Invalid arguments for \"{name}\": {message}")]
	ArgumentsInvalid {
		/// Name of the function.
		name: String,
		/// Decoder message.
		message: String,
	},

	/// The executor ran and failed.
	#[error("{message}")]
	ExecutionFailed {
		/// Name of the function.
		name: String,
		/// Failure message, verbatim.
		message: String,
	},
}

impl FunctionError {
	/// Create a ToolNotFound error.
	pub fn not_found(name: impl Into<String>) -> Self {
		Self::ToolNotFound { name: name.into() }
	}

	/// Create an ArgumentsInvalid error.
	pub fn arguments_invalid(name: impl Into<String>, message: impl Into<String>) -> Self {
		Self::ArgumentsInvalid {
			name: name.into(),
			message: message.into(),
		}
	}

	/// Create an ExecutionFailed error.
	pub fn execution_failed(name: impl Into<String>, message: impl Into<String>) -> Self {
		Self::ExecutionFailed {
			name: name.into(),
			message: message.into(),
		}
	}
}

/// Errors raised while building the registry. These are fatal at startup.
#[derive(Debug, Error)]
pub enum RegistryError {
	/// Two discovered definitions share a name.
	#[error("function already registered: {name}")]
	DuplicateName {
		/// The colliding name.
		name: String,
	},

	/// A definition fails basic validation.
	#[error("invalid function definition {name}: {message}")]
	InvalidDefinition {
		/// Name of the definition.
		name: String,
		/// What is wrong with it.
		message: String,
	},

	/// The parameter schema of a definition could not be derived.
	#[error("cannot derive specification for {name}: {message}")]
	Specification {
		/// Name of the definition.
		name: String,
		/// What is wrong with the schema.
		message: String,
	},

	/// A discovery provider failed.
	#[error("discovery failed: {message}")]
	Discovery {
		/// Provider message.
		message: String,
	},
}

impl RegistryError {
	/// Create a DuplicateName error.
	pub fn duplicate_name(name: impl Into<String>) -> Self {
		Self::DuplicateName { name: name.into() }
	}

	/// Create an InvalidDefinition error.
	pub fn invalid_definition(name: impl Into<String>, message: impl Into<String>) -> Self {
		Self::InvalidDefinition {
			name: name.into(),
			message: message.into(),
		}
	}

	/// Create a Specification error.
	pub fn specification(name: impl Into<String>, message: impl Into<String>) -> Self {
		Self::Specification {
			name: name.into(),
			message: message.into(),
		}
	}

	/// Create a Discovery error.
	pub fn discovery(message: impl Into<String>) -> Self {
		Self::Discovery {
			message: message.into(),
		}
	}
}

/// Errors raised by a [`FunctionExecutor`](crate::function::FunctionExecutor).
#[derive(Debug, Error)]
pub enum ExecutorError {
	/// The executor was driven out of order.
	#[error("cannot {operation} in state {state}")]
	InvalidState {
		/// The attempted operation.
		operation: &'static str,
		/// The state the executor was in.
		state: ExecutorState,
	},

	/// The arguments do not decode into the parameter shape.
	#[error("{0}")]
	ArgumentsInvalid(String),

	/// The executor declares a connection dependency and none was attached.
	#[error("{name} requires a database connection, but none is available")]
	ConnectionRequired {
		/// Name of the function.
		name: String,
	},

	/// The function body failed.
	#[error(transparent)]
	Failed(#[from] anyhow::Error),
}

impl ExecutorError {
	/// Create an InvalidState error.
	pub fn invalid_state(operation: &'static str, state: ExecutorState) -> Self {
		Self::InvalidState { operation, state }
	}
}

/// Result type for registry construction.
pub type RegistryResult<T> = Result<T, RegistryError>;
