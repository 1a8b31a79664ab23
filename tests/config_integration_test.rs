//! Configuration integration tests
//!
//! These tests load TOML files from disk and wire the result into a
//! registry and a dispatcher.

use schemachat::catalog::Catalog;
use schemachat::config::ConfigurationLoader;
use schemachat::function::{DispatchStatus, FunctionToolExecutor, ReturnKind, TRUNCATION_MARKER};
use schemachat::tools::BuiltinProvider;
use std::sync::Arc;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("schemachat.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_configured_registry_and_dispatch() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        r#"
[functions]
disabled = ["server-information", "describe-routines"]

[dispatch]
fallback_to_defaults = false
max_result_bytes = 12
"#,
    );

    let loader = ConfigurationLoader::new(Some(&path)).unwrap();
    let mut builder = loader.registry_builder();
    builder.provider(&BuiltinProvider).unwrap();
    let registry = builder.build().unwrap();

    assert_eq!(
        registry.names(),
        vec!["describe-tables", "lint", "list", "table-references"]
    );

    let executor = FunctionToolExecutor::with_options(&registry, loader.dispatch_options());
    let catalog = Arc::new(Catalog::new());

    let disabled = executor.execute("server-information", "", &catalog, None);
    assert_eq!(disabled.status, DispatchStatus::NotFound);
    assert_eq!(disabled.text, format!("Cannot find {}", TRUNCATION_MARKER));

    let rejected = executor.execute("lint", "{", &catalog, None);
    assert!(!rejected.is_success());
    assert!(rejected.text.ends_with(TRUNCATION_MARKER));
    assert!(rejected.text.starts_with("Invalid argu"));
}

#[test]
fn test_return_kind_filter() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, "[functions]\nreturn_kind = \"text\"\n");

    let loader = ConfigurationLoader::new(Some(&path)).unwrap();
    assert_eq!(loader.config.functions.return_kind, Some(ReturnKind::Text));
    assert_eq!(loader.get_string("functions.return_kind"), Some("text".to_string()));

    let mut builder = loader.registry_builder();
    builder.provider(&BuiltinProvider).unwrap();
    let registry = builder.build().unwrap();
    assert_eq!(registry.names(), vec!["lint", "list", "server-information"]);
}

#[test]
fn test_missing_file_gives_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let loader = ConfigurationLoader::new(Some(&temp_dir.path().join("none.toml"))).unwrap();

    let options = loader.dispatch_options();
    assert!(options.fallback_to_defaults);
    assert_eq!(options.max_result_bytes, None);
    assert_eq!(loader.get_string("logging.log_level"), Some("INFO".to_string()));
}

#[cfg(feature = "observability")]
#[test]
fn test_audit_log_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let audit_path = temp_dir.path().join("logs").join("audit.md");
    let path = write_config(
        &temp_dir,
        &format!(
            "[logging]\naudit_log_file = {:?}\nlog_level = \"debug\"\n",
            audit_path.to_string_lossy()
        ),
    );

    let loader = ConfigurationLoader::new(Some(&path)).unwrap();
    let audit = loader.config.logging.audit_log().unwrap().unwrap();

    let mut builder = loader.registry_builder();
    builder.provider(&BuiltinProvider).unwrap();
    let registry = builder.build().unwrap();
    let executor = FunctionToolExecutor::new(&registry).with_audit_log(audit);
    executor.dispatch("list", "", &Arc::new(Catalog::new()), None);

    let content = std::fs::read_to_string(&audit_path).unwrap();
    assert!(content.contains("- table-references"));
    assert!(content.contains("**Function:** list"));
}
