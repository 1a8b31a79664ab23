//! Provider-agnostic tool specifications derived from function definitions.

use crate::function::definition::is_kebab_case;
use crate::function::{FunctionDefinition, RegistryError, RegistryResult};
use schemars::generate::SchemaSettings;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{json, Map, Value};

const SUPPORTED_TYPES: [&str; 7] = [
	"string", "integer", "number", "boolean", "array", "object", "null",
];

/// Name, description and parameter schema of one function, ready to be
/// advertised to a model.
///
/// Derivation is deterministic: the same definition always yields a
/// byte-identical document, with object keys in alphabetical order.
///
/// # Example
///
/// ```
/// use schemachat::function::{FunctionDefinition, ToolSpecification};
/// use schemachat::tools::Lint;
///
/// let spec = ToolSpecification::from_definition(&FunctionDefinition::of::<Lint>()).unwrap();
/// assert_eq!(spec.name, "lint");
/// assert_eq!(spec.parameters["type"], "object");
/// assert!(spec.parameter_names().contains(&"table-name"));
///
/// let openai = spec.to_openai_function();
/// assert_eq!(openai["function"]["name"], "lint");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ToolSpecification {
	/// Function name.
	pub name: String,

	/// Description shown to the model.
	pub description: String,

	/// JSON Schema of the call arguments.
	pub parameters: Value,
}

impl ToolSpecification {
	/// Derive the specification of a definition.
	///
	/// Fails for parameter shapes that cannot be advertised: non-struct
	/// shapes, non-kebab-case field names, references, or unsupported types.
	pub fn from_definition(definition: &FunctionDefinition) -> RegistryResult<Self> {
		let parameters = definition
			.parameters_schema()
			.map_err(|message| RegistryError::specification(definition.name(), message))?;
		Ok(Self {
			name: definition.name().to_string(),
			description: definition.description().to_string(),
			parameters,
		})
	}

	/// Generate an OpenAI-compatible function calling schema.
	pub fn to_openai_function(&self) -> Value {
		json!({
			"type": "function",
			"function": {
				"name": self.name,
				"description": self.description,
				"parameters": self.parameters,
			}
		})
	}

	/// Serialize as compact JSON.
	pub fn to_json_string(&self) -> String {
		json!({
			"description": self.description,
			"name": self.name,
			"parameters": self.parameters,
		})
		.to_string()
	}

	/// External names of all parameters, alphabetically.
	pub fn parameter_names(&self) -> Vec<&str> {
		self.parameters
			.get("properties")
			.and_then(Value::as_object)
			.map(|props| props.keys().map(String::as_str).collect())
			.unwrap_or_default()
	}

	/// External names of the parameters without a default.
	pub fn required_parameters(&self) -> Vec<&str> {
		self.parameters
			.get("required")
			.and_then(Value::as_array)
			.map(|items| items.iter().filter_map(Value::as_str).collect())
			.unwrap_or_default()
	}

	/// Check if this function takes any parameters.
	pub fn has_parameters(&self) -> bool {
		!self.parameter_names().is_empty()
	}
}

/// Derive the normalized JSON Schema of a parameter shape.
pub fn derive_parameters_schema<P: JsonSchema>() -> Result<Value, String> {
	let generator = SchemaSettings::draft2020_12()
		.with(|settings| settings.inline_subschemas = true)
		.into_generator();
	let schema = generator.into_root_schema_for::<P>();
	let value = serde_json::to_value(&schema).map_err(|e| e.to_string())?;
	normalize_parameters_schema(value)
}

/// Normalize a raw parameter schema into the advertised form.
///
/// Drops generator metadata, requires an object with kebab-case
/// properties of supported types, sorts `required`, and orders every
/// object's keys alphabetically.
pub fn normalize_parameters_schema(value: Value) -> Result<Value, String> {
	let Value::Object(mut root) = value else {
		return Err("parameter schema must be a JSON object".to_string());
	};
	for key in ["$schema", "title", "description", "$defs", "definitions"] {
		root.remove(key);
	}
	if root.get("type").and_then(Value::as_str) != Some("object") {
		return Err("parameters must be a struct with named fields".to_string());
	}

	let properties = match root.remove("properties") {
		None => Map::new(),
		Some(Value::Object(properties)) => properties
			.into_iter()
			.map(|(name, schema)| (name, collapse_string_enums(schema)))
			.collect(),
		Some(_) => return Err("properties must be an object".to_string()),
	};
	for (name, schema) in &properties {
		if !is_kebab_case(name) {
			return Err(format!("field \"{}\" is not kebab-case", name));
		}
		check_property(name, schema)?;
	}

	let mut required = match root.remove("required") {
		None => Vec::new(),
		Some(Value::Array(items)) => items
			.iter()
			.map(|item| {
				item.as_str()
					.map(String::from)
					.ok_or_else(|| "required entries must be strings".to_string())
			})
			.collect::<Result<Vec<_>, _>>()?,
		Some(_) => return Err("required must be an array".to_string()),
	};
	required.sort();
	required.dedup();
	if let Some(missing) = required.iter().find(|name| !properties.contains_key(*name)) {
		return Err(format!("required field \"{}\" is not declared", missing));
	}

	root.insert("properties".to_string(), Value::Object(properties));
	root.insert("required".to_string(), json!(required));
	Ok(canonicalize(Value::Object(root)))
}

/// Documented unit variants come out as a `oneOf` of string constants;
/// advertise them as a plain string `enum` instead.
fn collapse_string_enums(value: Value) -> Value {
	match value {
		Value::Object(mut object) => {
			if let Some(values) = object.get("oneOf").and_then(string_constants) {
				object.remove("oneOf");
				object.insert("type".to_string(), json!("string"));
				object.insert("enum".to_string(), json!(values));
			}
			Value::Object(
				object
					.into_iter()
					.map(|(key, value)| (key, collapse_string_enums(value)))
					.collect(),
			)
		}
		Value::Array(items) => Value::Array(items.into_iter().map(collapse_string_enums).collect()),
		other => other,
	}
}

fn string_constants(branches: &Value) -> Option<Vec<String>> {
	let branches = branches.as_array().filter(|branches| !branches.is_empty())?;
	branches
		.iter()
		.map(|branch| {
			let branch = branch.as_object()?;
			if branch.get("type").is_some_and(|kind| kind.as_str() != Some("string")) {
				return None;
			}
			match (branch.get("const"), branch.get("enum")) {
				(Some(Value::String(value)), _) => Some(value.clone()),
				(None, Some(Value::Array(values))) if values.len() == 1 => {
					values[0].as_str().map(String::from)
				}
				_ => None,
			}
		})
		.collect()
}

fn check_property(path: &str, schema: &Value) -> Result<(), String> {
	let Some(object) = schema.as_object() else {
		return Err(format!("{}: schema must be an object", path));
	};
	if object.contains_key("$ref") {
		return Err(format!("{}: referenced schemas are not supported", path));
	}
	for key in ["anyOf", "oneOf"] {
		if let Some(branches) = object.get(key) {
			let branches = branches
				.as_array()
				.ok_or_else(|| format!("{}: {} must be an array", path, key))?;
			for branch in branches {
				check_property(path, branch)?;
			}
			return Ok(());
		}
	}

	match object.get("type") {
		Some(Value::String(kind)) if kind == "null" => {
			Err(format!("{}: a field cannot be only null", path))
		}
		Some(Value::String(kind)) => check_type(path, kind, object),
		Some(Value::Array(kinds)) => {
			let mut concrete = 0;
			for kind in kinds {
				let kind = kind
					.as_str()
					.ok_or_else(|| format!("{}: type entries must be strings", path))?;
				if kind != "null" {
					concrete += 1;
				}
				check_type(path, kind, object)?;
			}
			if concrete == 0 {
				return Err(format!("{}: a field cannot be only null", path));
			}
			Ok(())
		}
		Some(_) => Err(format!("{}: type must be a string or an array", path)),
		None if object.contains_key("const") || object.contains_key("enum") => Ok(()),
		None => Err(format!("{}: unsupported field shape", path)),
	}
}

fn check_type(path: &str, kind: &str, object: &Map<String, Value>) -> Result<(), String> {
	if !SUPPORTED_TYPES.contains(&kind) {
		return Err(format!("{}: unsupported type \"{}\"", path, kind));
	}
	if kind == "array" {
		if let Some(items) = object.get("items") {
			check_property(&format!("{}[]", path), items)?;
		}
	}
	if kind == "object" {
		if let Some(Value::Object(properties)) = object.get("properties") {
			for (name, schema) in properties {
				check_property(&format!("{}.{}", path, name), schema)?;
			}
		}
	}
	Ok(())
}

fn canonicalize(value: Value) -> Value {
	match value {
		Value::Object(map) => {
			let mut entries: Vec<(String, Value)> = map.into_iter().collect();
			entries.sort_by(|a, b| a.0.cmp(&b.0));
			Value::Object(entries.into_iter().map(|(k, v)| (k, canonicalize(v))).collect())
		}
		Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
		other => other,
	}
}

/// Derive specifications for every definition, in the order given.
pub fn to_specifications<'a>(
	definitions: impl IntoIterator<Item = &'a FunctionDefinition>,
) -> RegistryResult<Vec<ToolSpecification>> {
	definitions
		.into_iter()
		.map(ToolSpecification::from_definition)
		.collect()
}
