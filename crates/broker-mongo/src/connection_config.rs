use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use broker_core::error::{BrokerError, BrokerResult};
use broker_core::request::Response;
use broker_core::session::SessionManager;
use broker_core::storage::{Storage, StorageEntry};

use crate::dial::DialDescriptor;
use crate::verifier::ConnectionVerifier;

/// Storage key the connection record lives under.
pub const CONNECTION_CONFIG_KEY: &str = "config/connection";

pub const READ_ACCESS_WARNING: &str = "Read access to this endpoint should be controlled via ACLs as it will return the connection URI as it is, including passwords, if any.";

pub const CONNECTION_HELP_SYNOPSIS: &str = "
Configure the connection string to talk to MongoDB.
";

pub const CONNECTION_HELP_DESCRIPTION: &str = r#"
This path configures the standard connection string (URI) used to connect to MongoDB.

A MongoDB URI looks like:
"mongodb://[username:password@]host1[:port1][,host2[:port2],...[,hostN[:portN]]][/[database][?options]]"

See https://docs.mongodb.org/manual/reference/connection-string/ for detailed documentation of the URI format.

When configuring the connection string, the backend will verify its validity
unless verify_connection is set to false.
"#;

/// The persisted connection record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub uri: String,
    #[serde(default = "default_true")]
    pub verify_connection: bool,
}

fn default_true() -> bool {
    true
}

impl ConnectionConfig {
    /// Fetch the stored record. `Ok(None)` when nothing has been written yet.
    pub async fn load(storage: &dyn Storage) -> BrokerResult<Option<Self>> {
        let entry = storage
            .get(CONNECTION_CONFIG_KEY)
            .await
            .map_err(|e| BrokerError::storage("failed to read connection configuration", e))?;
        entry.map(|e| e.decode_json()).transpose()
    }

    pub fn to_response_data(&self) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("uri".into(), Value::String(self.uri.clone()));
        data.insert(
            "verify_connection".into(),
            Value::Bool(self.verify_connection),
        );
        data
    }
}

/// Fields accepted by a write to `config/connection`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionWriteRequest {
    #[serde(default)]
    pub uri: String,
    #[serde(default = "default_true", deserialize_with = "loose_bool")]
    pub verify_connection: bool,
}

impl ConnectionWriteRequest {
    pub fn new(uri: impl Into<String>, verify_connection: bool) -> Self {
        Self {
            uri: uri.into(),
            verify_connection,
        }
    }

    /// Decode from a request's data object. The error is a user-facing detail.
    pub fn from_data(data: &Map<String, Value>) -> Result<Self, String> {
        serde_json::from_value(Value::Object(data.clone())).map_err(|e| e.to_string())
    }
}

/// Accept `true`/`false` as well as `0`/`1` and the string forms
/// form-encoded clients send.
fn loose_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LooseBoolVisitor)
}

struct LooseBoolVisitor;

impl LooseBoolVisitor {
    fn reject<E: de::Error>(value: impl fmt::Display) -> E {
        E::custom(format!("verify_connection: cannot parse '{value}' as a boolean"))
    }
}

impl<'de> Visitor<'de> for LooseBoolVisitor {
    type Value = bool;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("verify_connection as a boolean, 0/1, or \"true\"/\"false\"")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<bool, E> {
        Ok(value)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<bool, E> {
        match value {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Self::reject(other)),
        }
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<bool, E> {
        match value {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Self::reject(other)),
        }
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<bool, E> {
        match value.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "1" => Ok(true),
            "false" | "f" | "0" => Ok(false),
            _ => Err(Self::reject(value)),
        }
    }
}

pub async fn read_connection(storage: &dyn Storage) -> BrokerResult<Option<Response>> {
    let config = ConnectionConfig::load(storage).await?;
    Ok(config.map(|c| Response::with_data(c.to_response_data())))
}

/// Validate, optionally verify, persist, then drop the cached session.
///
/// Rejections come back as an error [`Response`] and leave storage untouched.
pub async fn write_connection(
    storage: &dyn Storage,
    verifier: &dyn ConnectionVerifier,
    sessions: &dyn SessionManager,
    req: ConnectionWriteRequest,
) -> BrokerResult<Response> {
    if req.uri.is_empty() {
        return Ok(Response::error("uri parameter must be supplied"));
    }

    let dial = match DialDescriptor::parse(&req.uri).await {
        Ok(dial) => dial,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected connection uri");
            return Ok(Response::error(format!("invalid uri: {e}")));
        }
    };

    if req.verify_connection {
        if let Err(e) = verifier.verify(&dial).await {
            tracing::debug!(hosts = ?dial.hosts, error = %e, "Connection verification failed");
            return Ok(Response::error(format!(
                "Error validating connection info: {e:#}"
            )));
        }
    }

    let config = ConnectionConfig {
        uri: req.uri,
        verify_connection: req.verify_connection,
    };
    storage
        .put(StorageEntry::json(CONNECTION_CONFIG_KEY, &config)?)
        .await?;

    sessions.invalidate().await;

    tracing::info!(
        hosts = ?dial.hosts,
        database = ?dial.database,
        verified = config.verify_connection,
        "Connection configuration updated"
    );

    let mut resp = Response::default();
    resp.add_warning(READ_ACCESS_WARNING);
    Ok(resp)
}
