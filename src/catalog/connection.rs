//! Live database connection capability.

use serde::Serialize;
use std::collections::BTreeMap;

/// A live database handle owned by the surrounding session.
///
/// Only functions that declare a connection dependency ever see one.
/// Implementations are not required to support concurrent use; callers
/// serialize tool calls that share a connection.
pub trait Connection: Send + Sync {
    /// Describe the database server and driver behind this connection.
    fn server_information(&self) -> anyhow::Result<ServerInformation>;
}

/// Product and driver details reported by a connection.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServerInformation {
    /// Database product, such as `PostgreSQL`.
    pub product_name: String,
    /// Database product version.
    pub product_version: String,
    /// Driver used by the connection.
    pub driver_name: String,
    /// Driver version.
    pub driver_version: String,
    /// Additional server properties, sorted by key.
    pub properties: BTreeMap<String, String>,
}
