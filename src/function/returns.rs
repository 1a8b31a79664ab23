//! Values produced by one function execution.

use serde::Serialize;
use serde_json::Value;

/// Text returned when a function found nothing to report.
pub const NO_RESULTS: &str = "There were no matching results for your query.";

/// The result of running a function once.
///
/// "Nothing found" is an ordinary value, not an error.
///
/// # Example
///
/// ```
/// use schemachat::function::{FunctionReturn, NO_RESULTS};
///
/// let empty: Vec<String> = Vec::new();
/// let result = FunctionReturn::json(&empty).unwrap();
/// assert_eq!(result.into_text(), NO_RESULTS);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionReturn {
	/// Human-readable text, passed through as is.
	Text(String),

	/// A structured document.
	Json(Value),

	/// The query matched nothing.
	NoResults,

	/// The function gave up; the message is shown as is.
	Error(String),
}

impl FunctionReturn {
	/// Wrap plain text. Blank text counts as no results.
	pub fn text(text: impl Into<String>) -> Self {
		let text = text.into();
		if text.trim().is_empty() {
			Self::NoResults
		} else {
			Self::Text(text)
		}
	}

	/// Serialize a value into a JSON result.
	///
	/// Null, empty arrays and empty objects become [`FunctionReturn::NoResults`].
	pub fn json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Self> {
		let value = serde_json::to_value(value)?;
		let empty = match &value {
			Value::Null => true,
			Value::Array(items) => items.is_empty(),
			Value::Object(map) => map.is_empty(),
			_ => false,
		};
		Ok(if empty { Self::NoResults } else { Self::Json(value) })
	}

	/// Report a failure the function detected itself.
	pub fn error(message: impl Into<String>) -> Self {
		Self::Error(message.into())
	}

	/// Whether this is the no-results sentinel.
	pub fn is_empty(&self) -> bool {
		matches!(self, Self::NoResults)
	}

	/// Render the result as the string handed back to the conversation.
	pub fn into_text(self) -> String {
		match self {
			Self::Text(text) => text,
			Self::Json(value) => {
				serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
			}
			Self::NoResults => NO_RESULTS.to_string(),
			Self::Error(message) => message,
		}
	}
}

impl From<String> for FunctionReturn {
	fn from(text: String) -> Self {
		Self::text(text)
	}
}

impl From<&str> for FunctionReturn {
	fn from(text: &str) -> Self {
		Self::text(text)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_text_passthrough() {
		assert_eq!(FunctionReturn::text("hello").into_text(), "hello");
	}

	#[test]
	fn test_blank_text_is_no_results() {
		assert!(FunctionReturn::text("  \n").is_empty());
	}

	#[test]
	fn test_json_empty_values_are_no_results() {
		assert!(FunctionReturn::json(&json!([])).unwrap().is_empty());
		assert!(FunctionReturn::json(&json!({})).unwrap().is_empty());
		assert!(FunctionReturn::json(&Value::Null).unwrap().is_empty());
		assert!(!FunctionReturn::json(&json!([1])).unwrap().is_empty());
	}

	#[test]
	fn test_json_renders_pretty() {
		let result = FunctionReturn::json(&json!({"name": "BOOKS"})).unwrap();
		assert_eq!(result.into_text(), "{\n  \"name\": \"BOOKS\"\n}");
	}

	#[test]
	fn test_error_renders_message() {
		let result = FunctionReturn::error("Table \"ORDERS\" is locked");
		assert!(!result.is_empty());
		assert_eq!(result.into_text(), "Table \"ORDERS\" is locked");
	}

	#[test]
	fn test_no_results_sentinel() {
		assert_eq!(FunctionReturn::NoResults.into_text(), NO_RESULTS);
	}
}
