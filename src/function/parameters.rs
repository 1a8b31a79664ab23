//! Parameter shapes and argument decoding.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A typed parameter shape a function decodes its call arguments into.
///
/// Parameter structs derive `Deserialize`, `JsonSchema` and `Default`, use
/// kebab-case field names, and give every field a default so that an
/// all-defaults call is always possible:
///
/// ```
/// use schemars::JsonSchema;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
/// #[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
/// struct LintParameters {
///     /// Table to lint; lints every table when empty.
///     table_name: String,
/// }
/// ```
///
/// Every type meeting the bounds is a `FunctionParameters`.
pub trait FunctionParameters: DeserializeOwned + JsonSchema + Default + fmt::Debug + Send + 'static {}

impl<T> FunctionParameters for T where T: DeserializeOwned + JsonSchema + Default + fmt::Debug + Send + 'static {}

/// The parameter shape of functions that take no arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NoParameters {}

/// Parse raw call arguments, treating blank input as `{}`.
pub fn parse_arguments(raw: &str) -> serde_json::Result<Value> {
	let raw = raw.trim();
	if raw.is_empty() {
		return Ok(Value::Object(Default::default()));
	}
	serde_json::from_str(raw)
}

/// Decode parsed arguments into a parameter shape.
pub fn decode_parameters<P: FunctionParameters>(arguments: Value) -> serde_json::Result<P> {
	serde_json::from_value(arguments)
}
