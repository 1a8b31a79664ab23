//! Audit logging for tool calls.
//!
//! Events also go to `tracing`; the [`AuditLog`] keeps a persistent
//! markdown record of what the model asked for and what it got back.
//!
//! # Example
//!
//! ```no_run
//! use schemachat::observability::AuditLog;
//!
//! let log = AuditLog::new(None, Some("DEBUG")).unwrap();
//! log.log_tool_request("lint", r#"{"table-name":"BOOKS"}"#).unwrap();
//! log.log_tool_result("lint", r#"{"table-name":"BOOKS"}"#, "No lints found", true).unwrap();
//! ```

pub mod audit;

pub use audit::AuditLog;
