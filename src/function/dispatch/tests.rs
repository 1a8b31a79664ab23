use super::*;
use crate::catalog::{self, Catalog, Schema, Table};
use crate::function::{ExecutionContext, FunctionReturn, ReturnKind, ToolFunction};
use crate::tools::{builtin_definitions, tests::library};
use anyhow::Context;
use schemars::JsonSchema;

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
struct RepeatParameters {
	word: String,
	times: usize,
}

/// Repeats a word; fails or panics on request.
#[derive(Default)]
struct Repeat;

impl ToolFunction for Repeat {
	type Parameters = RepeatParameters;
	const NAME: &'static str = "repeat";
	const DESCRIPTION: &'static str = "Repeat a word.";
	const RETURN_KIND: ReturnKind = ReturnKind::Text;

	fn call(
		&self,
		parameters: &RepeatParameters,
		_context: &ExecutionContext<'_>,
	) -> anyhow::Result<FunctionReturn> {
		match parameters.word.as_str() {
			"panic" => panic!("repeat blew up"),
			"fail" => Err(anyhow::anyhow!("disk full")).context("Could not repeat"),
			"refuse" => Ok(FunctionReturn::error("Refusing to repeat")),
			_ => Ok(FunctionReturn::text(parameters.word.repeat(parameters.times))),
		}
	}
}

/// Parameters whose decoder panics.
#[derive(Debug, Default, JsonSchema)]
struct Fragile {}

impl<'de> Deserialize<'de> for Fragile {
	fn deserialize<D: serde::Deserializer<'de>>(_deserializer: D) -> Result<Self, D::Error> {
		panic!("decoder exploded")
	}
}

#[derive(Default)]
struct Decode;

impl ToolFunction for Decode {
	type Parameters = Fragile;
	const NAME: &'static str = "decode";
	const DESCRIPTION: &'static str = "Decode nothing.";
	const RETURN_KIND: ReturnKind = ReturnKind::Text;

	fn call(&self, _: &Fragile, _: &ExecutionContext<'_>) -> anyhow::Result<FunctionReturn> {
		Ok(FunctionReturn::text("decoded"))
	}
}

struct Fixed;

impl catalog::Connection for Fixed {
	fn server_information(&self) -> anyhow::Result<catalog::ServerInformation> {
		Ok(catalog::ServerInformation {
			product_name: "HSQL Database Engine".to_string(),
			product_version: "2.7.2".to_string(),
			driver_name: "HSQL Database Engine Driver".to_string(),
			driver_version: "2.7.2".to_string(),
			..Default::default()
		})
	}
}

fn registry() -> FunctionDefinitionRegistry {
	let mut definitions = builtin_definitions();
	definitions.push(FunctionDefinition::of::<Repeat>());
	FunctionDefinitionRegistry::build(definitions).unwrap()
}

#[test]
fn test_unknown_function() {
	let registry = registry();
	let executor = FunctionToolExecutor::new(&registry);
	let catalog = Arc::new(library());

	let outcome = executor.execute("describe-views", "{}", &catalog, None);
	assert_eq!(outcome.status, DispatchStatus::NotFound);
	assert_eq!(outcome.name, "describe-views");
	assert_eq!(outcome.text, "Cannot find function \"describe-views\"");
	assert!(matches!(outcome.error, Some(FunctionError::ToolNotFound { .. })));
	assert!(!outcome.is_success());
}

#[test]
fn test_blank_arguments_match_empty_object() {
	let registry = registry();
	let executor = FunctionToolExecutor::new(&registry);
	let catalog = Arc::new(library());

	let blank = executor.dispatch("list", "", &catalog, None);
	let spaces = executor.dispatch("list", "   ", &catalog, None);
	let empty = executor.dispatch("list", "{}", &catalog, None);
	assert_eq!(blank, empty);
	assert_eq!(spaces, empty);
	assert!(empty.contains("PUBLIC.BOOKS"));
}

#[test]
fn test_malformed_arguments_fall_back_to_defaults() {
	let registry = registry();
	let executor = FunctionToolExecutor::new(&registry);
	let catalog = Arc::new(library());

	let outcome = executor.execute("list", "{\"name-pattern\": ", &catalog, None);
	assert!(outcome.is_success());
	assert!(outcome.arguments_recovered);
	assert_eq!(outcome.text, executor.dispatch("list", "{}", &catalog, None));

	let outcome = executor.execute("list", r#"{"unknown": 1}"#, &catalog, None);
	assert!(outcome.is_success());
	assert!(outcome.arguments_recovered);
}

#[test]
fn test_malformed_arguments_rejected_without_fallback() {
	let registry = registry();
	let options = DispatchOptions {
		fallback_to_defaults: false,
		..DispatchOptions::default()
	};
	let executor = FunctionToolExecutor::with_options(&registry, options);
	let catalog = Arc::new(library());

	let outcome = executor.execute("repeat", r#"{"times": "twice"}"#, &catalog, None);
	assert_eq!(outcome.status, DispatchStatus::Failed);
	assert!(!outcome.arguments_recovered);
	assert!(outcome.text.starts_with("Invalid arguments for \"repeat\": "));
	assert!(matches!(outcome.error, Some(FunctionError::ArgumentsInvalid { .. })));
}

#[test]
fn test_well_formed_arguments() {
	let registry = registry();
	let executor = FunctionToolExecutor::new(&registry);
	let catalog = Arc::new(Catalog::new());

	let outcome = executor.execute("repeat", r#"{"word": "ab", "times": 3}"#, &catalog, None);
	assert!(outcome.is_success());
	assert!(!outcome.arguments_recovered);
	assert_eq!(outcome.text, "ababab");
	assert!(outcome.error.is_none());
}

#[test]
fn test_failure_text_keeps_context_chain() {
	let registry = registry();
	let executor = FunctionToolExecutor::new(&registry);
	let catalog = Arc::new(Catalog::new());

	let outcome = executor.execute("repeat", r#"{"word": "fail"}"#, &catalog, None);
	assert_eq!(outcome.status, DispatchStatus::Failed);
	assert_eq!(outcome.text, "Could not repeat: disk full");
	assert!(matches!(outcome.error, Some(FunctionError::ExecutionFailed { .. })));
}

#[test]
fn test_reported_error_is_a_failure() {
	let registry = registry();
	let executor = FunctionToolExecutor::new(&registry);
	let catalog = Arc::new(Catalog::new());

	let outcome = executor.execute("repeat", r#"{"word": "refuse"}"#, &catalog, None);
	assert_eq!(outcome.status, DispatchStatus::Failed);
	assert_eq!(outcome.text, "Refusing to repeat");
}

#[test]
fn test_invalid_pattern_is_result_text() {
	let registry = registry();
	let executor = FunctionToolExecutor::new(&registry);
	let catalog = Arc::new(library());

	let text = executor.dispatch("list", r#"{"name-pattern": "BOOKS("}"#, &catalog, None);
	assert!(text.starts_with("Invalid name pattern \"BOOKS(\": "));

	let outcome = executor.execute("list", r#"{"name-pattern": "X)|(.*"}"#, &catalog, None);
	assert_eq!(outcome.status, DispatchStatus::Failed);
	assert!(outcome.text.starts_with("Invalid name pattern \"X)|(.*\": "));
}

#[test]
fn test_panic_is_caught() {
	let registry = registry();
	let executor = FunctionToolExecutor::new(&registry);
	let catalog = Arc::new(Catalog::new());

	let outcome = executor.execute("repeat", r#"{"word": "panic"}"#, &catalog, None);
	assert_eq!(outcome.status, DispatchStatus::Failed);
	assert_eq!(outcome.text, "repeat blew up");

	// The executor stays usable afterwards.
	assert_eq!(executor.dispatch("repeat", r#"{"word": "x", "times": 2}"#, &catalog, None), "xx");
}

#[test]
fn test_factory_panic_is_caught() {
	use std::sync::atomic::{AtomicBool, Ordering};

	// The first call is the registry's build check; later ones panic.
	let built = Arc::new(AtomicBool::new(false));
	let definition = FunctionDefinition::of_with::<Repeat>(move || {
		if built.swap(true, Ordering::SeqCst) {
			panic!("factory exploded");
		}
		Repeat
	});
	let registry = FunctionDefinitionRegistry::build(vec![definition]).unwrap();
	let executor = FunctionToolExecutor::new(&registry);
	let catalog = Arc::new(Catalog::new());

	let outcome = executor.execute("repeat", "{}", &catalog, None);
	assert_eq!(outcome.status, DispatchStatus::Failed);
	assert_eq!(outcome.text, "factory exploded");
	assert!(matches!(outcome.error, Some(FunctionError::ExecutionFailed { .. })));
}

#[test]
fn test_decoder_panic_is_caught() {
	let registry = FunctionDefinitionRegistry::build(vec![FunctionDefinition::of::<Decode>()]).unwrap();
	let executor = FunctionToolExecutor::new(&registry);
	let catalog = Arc::new(Catalog::new());

	let outcome = executor.execute("decode", r#"{"anything": 1}"#, &catalog, None);
	assert_eq!(outcome.status, DispatchStatus::Failed);
	assert_eq!(outcome.text, "decoder exploded");
}

#[test]
fn test_missing_connection() {
	let registry = registry();
	let executor = FunctionToolExecutor::new(&registry);
	let catalog = Arc::new(Catalog::new());

	let text = executor.dispatch("server-information", "", &catalog, None);
	assert_eq!(
		text,
		"server-information requires a database connection, but none is available"
	);
}

#[test]
fn test_with_connection() {
	let registry = registry();
	let executor = FunctionToolExecutor::new(&registry);
	let catalog = Arc::new(Catalog::new());
	let connection: Arc<dyn catalog::Connection> = Arc::new(Fixed);

	let text = executor.dispatch("server-information", "{}", &catalog, Some(&connection));
	assert_eq!(
		text,
		"Database product: HSQL Database Engine 2.7.2\nDriver: HSQL Database Engine Driver 2.7.2"
	);

	// Functions without a connection dependency ignore it.
	let listing = executor.dispatch("list", "{}", &Arc::new(library()), Some(&connection));
	assert!(listing.contains("PUBLIC.AUTHORS"));
}

#[test]
fn test_empty_result_text() {
	let registry = registry();
	let executor = FunctionToolExecutor::new(&registry);
	let empty = Arc::new(Catalog::new());

	assert_eq!(executor.dispatch("describe-tables", "{}", &empty, None), crate::function::NO_RESULTS);
	assert_eq!(executor.dispatch("repeat", r#"{"word": "x"}"#, &empty, None), crate::function::NO_RESULTS);
}

#[test]
fn test_truncation() {
	let registry = registry();
	let options = DispatchOptions {
		max_result_bytes: Some(5),
		..DispatchOptions::default()
	};
	let executor = FunctionToolExecutor::with_options(&registry, options);
	let catalog = Arc::new(Catalog::new());

	let text = executor.dispatch("repeat", r#"{"word": "abc", "times": 4}"#, &catalog, None);
	assert_eq!(text, format!("abcab{}", TRUNCATION_MARKER));

	let short = executor.dispatch("repeat", r#"{"word": "abc", "times": 1}"#, &catalog, None);
	assert_eq!(short, "abc");
}

#[test]
fn test_truncate_on_char_boundary() {
	assert_eq!(truncate("héllo".to_string(), Some(2)), format!("h{}", TRUNCATION_MARKER));
	assert_eq!(truncate("héllo".to_string(), Some(3)), format!("hé{}", TRUNCATION_MARKER));
	assert_eq!(truncate("héllo".to_string(), None), "héllo");
	assert_eq!(truncate("abc".to_string(), Some(3)), "abc");
}

#[test]
fn test_dispatch_call_keeps_id() {
	let registry = registry();
	let executor = FunctionToolExecutor::new(&registry);
	let catalog = Arc::new(library());

	let call = ToolCall::new("lint", r#"{"table-name": "BOOKS"}"#).with_id("call_42");
	let outcome = executor.dispatch_call(&call, &catalog, None);
	assert_eq!(outcome.id.as_deref(), Some("call_42"));
	assert_eq!(outcome.name, "lint");
	assert!(outcome.text.contains("foreign-key-with-no-index"));
}

#[test]
fn test_execute_all_in_order() {
	let registry = registry();
	let executor = FunctionToolExecutor::new(&registry);
	let catalog = Arc::new(library());

	let calls = vec![
		ToolCall::new("repeat", r#"{"word": "a", "times": 2}"#).with_id("1"),
		ToolCall::new("missing", "").with_id("2"),
		ToolCall::new("repeat", r#"{"word": "panic"}"#).with_id("3"),
		ToolCall::new("lint", r#"{"table-name": "AUTHORS"}"#).with_id("4"),
	];
	let outcomes = executor.execute_all(&calls, &catalog, None);

	let ids: Vec<_> = outcomes.iter().filter_map(|o| o.id.as_deref()).collect();
	assert_eq!(ids, vec!["1", "2", "3", "4"]);
	let statuses: Vec<_> = outcomes.iter().map(|o| o.status).collect();
	assert_eq!(
		statuses,
		vec![
			DispatchStatus::Completed,
			DispatchStatus::NotFound,
			DispatchStatus::Failed,
			DispatchStatus::Completed,
		]
	);
	assert_eq!(outcomes[0].text, "aa");
	assert_eq!(outcomes[3].text, crate::lint::NO_LINTS);
}

#[test]
fn test_catalog_unchanged_by_dispatch() {
	let registry = registry();
	let executor = FunctionToolExecutor::new(&registry);
	let catalog = Arc::new(
		Catalog::new().with_schema(Schema::new("S").with_table(Table::new("S", "T"))),
	);
	let before = format!("{:?}", catalog);

	for name in ["list", "describe-tables", "describe-routines", "table-references", "lint"] {
		executor.dispatch(name, "{}", &catalog, None);
	}
	assert_eq!(format!("{:?}", catalog), before);
	assert_eq!(Arc::strong_count(&catalog), 1);
}

#[test]
fn test_tool_call_serde() {
	let call: ToolCall = serde_json::from_str(r#"{"name": "list"}"#).unwrap();
	assert_eq!(call, ToolCall::new("list", ""));

	let json = serde_json::to_value(ToolCall::new("lint", "{}").with_id("c1")).unwrap();
	assert_eq!(json, serde_json::json!({"id": "c1", "name": "lint", "arguments": "{}"}));
}

#[cfg(feature = "observability")]
#[test]
fn test_audit_log_records_calls() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("audit.md");
	let audit = AuditLog::new(Some(&path), Some("INFO")).unwrap();

	let registry = registry();
	let executor = FunctionToolExecutor::new(&registry).with_audit_log(audit);
	let catalog = Arc::new(library());

	executor.dispatch("lint", r#"{"table-name": "BOOKS"}"#, &catalog, None);
	executor.dispatch("describe-views", "", &catalog, None);

	let content = std::fs::read_to_string(&path).unwrap();
	assert!(content.starts_with("# Tool Call Audit Log"));
	let registry_at = content.find("## Function Registry").unwrap();
	assert!(registry_at < content.find("**Function:** lint").unwrap());
	assert!(content.contains("**Functions (7):**"));
	assert!(content.contains("- repeat\n"));
	assert!(content.contains("**Function:** lint"));
	assert!(content.contains("foreign-key-with-no-index"));
	assert!(content.contains("**Error:**"));
	assert!(content.contains("Cannot find function \"describe-views\""));
}
