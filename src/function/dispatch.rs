//! The dispatch façade: routes textual tool calls to typed executors.

use crate::catalog::{Catalog, Connection};
use crate::function::parameters::parse_arguments;
use crate::function::{
	ExecutorError, FunctionDefinition, FunctionDefinitionRegistry, FunctionError, FunctionExecutor,
	FunctionReturn,
};
#[cfg(feature = "observability")]
use crate::observability::AuditLog;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Appended to results cut at `max_result_bytes`.
pub const TRUNCATION_MARKER: &str = "\n[... truncated]";

/// Dispatch behavior knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOptions {
	/// Run with default parameters when arguments fail to decode.
	pub fallback_to_defaults: bool,

	/// Upper bound on result text, in bytes.
	pub max_result_bytes: Option<usize>,
}

impl Default for DispatchOptions {
	fn default() -> Self {
		Self {
			fallback_to_defaults: true,
			max_result_bytes: None,
		}
	}
}

/// A tool call requested by a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
	/// Provider-assigned call identifier, if any.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,

	/// Name of the requested function.
	pub name: String,

	/// Raw JSON arguments, possibly blank or malformed.
	#[serde(default)]
	pub arguments: String,
}

impl ToolCall {
	/// Create a call without an identifier.
	pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
		Self {
			id: None,
			name: name.into(),
			arguments: arguments.into(),
		}
	}

	/// Attach a provider call identifier.
	pub fn with_id(mut self, id: impl Into<String>) -> Self {
		self.id = Some(id.into());
		self
	}
}

/// How a dispatch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchStatus {
	/// The function ran and returned a result.
	Completed,
	/// No function is registered under the name.
	NotFound,
	/// Arguments were rejected, or the function failed.
	Failed,
}

/// The structured result of one dispatch.
///
/// `text` is always set: it is what the conversation receives whatever the
/// status.
#[derive(Debug)]
pub struct DispatchOutcome {
	/// Provider call identifier, copied from the call.
	pub id: Option<String>,
	/// Requested function name.
	pub name: String,
	/// How the dispatch ended.
	pub status: DispatchStatus,
	/// Whether arguments failed to decode and defaults were used.
	pub arguments_recovered: bool,
	/// Result text handed back to the conversation.
	pub text: String,
	/// The failure, for `NotFound` and `Failed`.
	pub error: Option<FunctionError>,
}

impl DispatchOutcome {
	/// Whether the function ran to completion.
	pub fn is_success(&self) -> bool {
		self.status == DispatchStatus::Completed
	}

	fn completed(name: &str, text: String, arguments_recovered: bool) -> Self {
		Self {
			id: None,
			name: name.to_string(),
			status: DispatchStatus::Completed,
			arguments_recovered,
			text,
			error: None,
		}
	}

	fn failed(error: FunctionError, arguments_recovered: bool) -> Self {
		let (name, status) = match &error {
			FunctionError::ToolNotFound { name } => (name.clone(), DispatchStatus::NotFound),
			FunctionError::ArgumentsInvalid { name, .. }
			| FunctionError::ExecutionFailed { name, .. } => (name.clone(), DispatchStatus::Failed),
		};
		Self {
			id: None,
			name,
			status,
			arguments_recovered,
			text: error.to_string(),
			error: Some(error),
		}
	}
}

/// Resolves tool calls against a registry and runs them in isolation.
///
/// Nothing below this type reaches the caller as an error or a panic:
/// unknown names, bad arguments, failing and panicking functions all end
/// as result text.
///
/// # Example
///
/// ```
/// use schemachat::catalog::{Catalog, Schema, Table};
/// use schemachat::function::{FunctionDefinitionRegistry, FunctionToolExecutor, NO_RESULTS};
/// use schemachat::tools::builtin_definitions;
/// use std::sync::Arc;
///
/// let registry = FunctionDefinitionRegistry::build(builtin_definitions()).unwrap();
/// let executor = FunctionToolExecutor::new(&registry);
///
/// let empty = Arc::new(Catalog::new());
/// assert_eq!(executor.dispatch("describe-tables", "{}", &empty, None), NO_RESULTS);
/// assert_eq!(
///     executor.dispatch("describe-views", "{}", &empty, None),
///     "Cannot find function \"describe-views\"",
/// );
///
/// let catalog = Arc::new(
///     Catalog::new().with_schema(Schema::new("PUBLIC").with_table(Table::new("PUBLIC", "BOOKS"))),
/// );
/// let listing = executor.dispatch("list", "", &catalog, None);
/// assert!(listing.contains("PUBLIC.BOOKS"));
/// ```
pub struct FunctionToolExecutor<'r> {
	registry: &'r FunctionDefinitionRegistry,
	options: DispatchOptions,
	#[cfg(feature = "observability")]
	audit: Option<AuditLog>,
}

impl<'r> FunctionToolExecutor<'r> {
	/// Create a dispatcher with default options.
	pub fn new(registry: &'r FunctionDefinitionRegistry) -> Self {
		Self::with_options(registry, DispatchOptions::default())
	}

	/// Create a dispatcher with explicit options.
	pub fn with_options(registry: &'r FunctionDefinitionRegistry, options: DispatchOptions) -> Self {
		Self {
			registry,
			options,
			#[cfg(feature = "observability")]
			audit: None,
		}
	}

	/// Record every request and result in an audit log.
	///
	/// The functions on offer are logged first.
	#[cfg(feature = "observability")]
	pub fn with_audit_log(mut self, audit: AuditLog) -> Self {
		if let Err(e) = audit.log_registry(&self.registry.names()) {
			tracing::warn!(error = %e, "Could not write audit log");
		}
		self.audit = Some(audit);
		self
	}

	/// The registry calls are resolved against.
	pub fn registry(&self) -> &'r FunctionDefinitionRegistry {
		self.registry
	}

	/// The options in effect.
	pub fn options(&self) -> DispatchOptions {
		self.options
	}

	/// Run one tool call and return the text for the conversation.
	pub fn dispatch(
		&self,
		name: &str,
		arguments: &str,
		catalog: &Arc<Catalog>,
		connection: Option<&Arc<dyn Connection>>,
	) -> String {
		self.execute(name, arguments, catalog, connection).text
	}

	/// Run one model tool call, keeping its identifier.
	pub fn dispatch_call(
		&self,
		call: &ToolCall,
		catalog: &Arc<Catalog>,
		connection: Option<&Arc<dyn Connection>>,
	) -> DispatchOutcome {
		let mut outcome = self.execute(&call.name, &call.arguments, catalog, connection);
		outcome.id = call.id.clone();
		outcome
	}

	/// Run tool calls sequentially, in the order given.
	pub fn execute_all(
		&self,
		calls: &[ToolCall],
		catalog: &Arc<Catalog>,
		connection: Option<&Arc<dyn Connection>>,
	) -> Vec<DispatchOutcome> {
		calls
			.iter()
			.map(|call| self.dispatch_call(call, catalog, connection))
			.collect()
	}

	/// Run one tool call and describe how it ended.
	pub fn execute(
		&self,
		name: &str,
		arguments: &str,
		catalog: &Arc<Catalog>,
		connection: Option<&Arc<dyn Connection>>,
	) -> DispatchOutcome {
		tracing::info!(function = name, arguments, "Dispatching tool call");
		self.audit_request(name, arguments);

		let mut outcome = match self.registry.lookup(name) {
			Some(definition) => self.run(definition, arguments, catalog, connection),
			None => {
				tracing::warn!(function = name, "Cannot find function");
				DispatchOutcome::failed(FunctionError::not_found(name), false)
			}
		};
		outcome.text = truncate(outcome.text, self.options.max_result_bytes);

		self.audit_result(&outcome, arguments);
		outcome
	}

	fn run(
		&self,
		definition: &FunctionDefinition,
		arguments: &str,
		catalog: &Arc<Catalog>,
		connection: Option<&Arc<dyn Connection>>,
	) -> DispatchOutcome {
		let name = definition.name();
		let mut recovered = false;

		let result = panic::catch_unwind(AssertUnwindSafe(|| {
			let mut executor = definition.create_executor();
			if let Err(message) = configure(executor.as_mut(), arguments) {
				if !self.options.fallback_to_defaults {
					tracing::warn!(function = name, error = %message, "Rejected tool call arguments");
					return Err(FunctionError::arguments_invalid(name, message));
				}
				tracing::warn!(
					function = name,
					error = %message,
					"Could not decode arguments, running with defaults"
				);
				executor
					.configure_defaults()
					.map_err(|error| FunctionError::execution_failed(name, error.to_string()))?;
				recovered = true;
			}

			executor
				.attach_catalog(Arc::clone(catalog))
				.and_then(|()| match connection {
					Some(connection) => executor.attach_connection(Arc::clone(connection)),
					None => Ok(()),
				})
				.and_then(|()| executor.execute())
				.map_err(|error| {
					let message = failure_message(&error);
					tracing::error!(function = name, error = %message, "Function failed");
					FunctionError::execution_failed(name, message)
				})
		}));

		match result {
			Ok(Ok(FunctionReturn::Error(message))) => {
				tracing::error!(function = name, error = %message, "Function reported an error");
				DispatchOutcome::failed(FunctionError::execution_failed(name, message), recovered)
			}
			Ok(Ok(value)) => DispatchOutcome::completed(name, value.into_text(), recovered),
			Ok(Err(error)) => DispatchOutcome::failed(error, recovered),
			Err(payload) => {
				let message = panic_message(payload.as_ref());
				tracing::error!(function = name, error = %message, "Function panicked");
				DispatchOutcome::failed(FunctionError::execution_failed(name, message), recovered)
			}
		}
	}

	#[cfg(feature = "observability")]
	fn audit_request(&self, name: &str, arguments: &str) {
		if let Some(audit) = &self.audit {
			if let Err(e) = audit.log_tool_request(name, arguments) {
				tracing::warn!(error = %e, "Could not write audit log");
			}
		}
	}

	#[cfg(not(feature = "observability"))]
	fn audit_request(&self, _name: &str, _arguments: &str) {}

	#[cfg(feature = "observability")]
	fn audit_result(&self, outcome: &DispatchOutcome, arguments: &str) {
		if let Some(audit) = &self.audit {
			if let Err(e) =
				audit.log_tool_result(&outcome.name, arguments, &outcome.text, outcome.is_success())
			{
				tracing::warn!(error = %e, "Could not write audit log");
			}
		}
	}

	#[cfg(not(feature = "observability"))]
	fn audit_result(&self, _outcome: &DispatchOutcome, _arguments: &str) {}
}

fn configure(executor: &mut dyn FunctionExecutor, arguments: &str) -> Result<(), String> {
	let value = parse_arguments(arguments).map_err(|e| e.to_string())?;
	executor.configure(value).map_err(|e| e.to_string())
}

fn failure_message(error: &ExecutorError) -> String {
	match error {
		ExecutorError::Failed(inner) => format!("{:#}", inner),
		other => other.to_string(),
	}
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(message) = payload.downcast_ref::<&str>() {
		message.to_string()
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.clone()
	} else {
		"function panicked".to_string()
	}
}

/// Cut `text` to at most `max` bytes on a char boundary, marking the cut.
pub fn truncate(text: String, max: Option<usize>) -> String {
	let Some(max) = max else {
		return text;
	};
	if text.len() <= max {
		return text;
	}
	let mut end = max;
	while !text.is_char_boundary(end) {
		end -= 1;
	}
	format!("{}{}", &text[..end], TRUNCATION_MARKER)
}

#[cfg(test)]
mod tests;
