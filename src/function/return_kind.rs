//! Return kinds for telling text-producing functions from JSON-producing ones.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a function's output is meant to be read downstream.
///
/// Some AI providers can only advertise one shape of tool at a time, so the
/// registry indexes definitions by this value.
///
/// # Example
///
/// ```
/// use schemachat::function::ReturnKind;
///
/// assert_eq!(ReturnKind::Text.to_string(), "text");
/// assert_eq!(ReturnKind::Json.to_string(), "json");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnKind {
	/// Plain, human-readable text.
	#[default]
	Text,

	/// A serialized JSON document.
	Json,
}

impl ReturnKind {
	/// All return kinds, in index order.
	pub const ALL: [ReturnKind; 2] = [ReturnKind::Text, ReturnKind::Json];

	/// Get the string representation of the return kind.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Text => "text",
			Self::Json => "json",
		}
	}
}

impl fmt::Display for ReturnKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
