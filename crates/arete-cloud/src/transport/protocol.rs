//! Versioned wire payload for the identity endpoint.

use arete_core::errors::{AreteResult, CloudError};
use arete_core::Store;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current protocol version.
pub const PROTOCOL_VERSION: &str = "1";

/// Path of the identity resource, relative to the endpoint URL.
pub const IDENTITY_PATH: &str = "/api/v1/identity";

/// Body of `GET` and `PUT` on [`IDENTITY_PATH`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityPayload {
    #[serde(default = "default_version")]
    pub version: String,
    pub identity: Store,
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
}

fn default_version() -> String {
    PROTOCOL_VERSION.to_string()
}

impl IdentityPayload {
    pub fn new(identity: Store, pushed_at: DateTime<Utc>) -> Self {
        Self {
            version: PROTOCOL_VERSION.to_string(),
            identity,
            pushed_at: Some(pushed_at),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.version == PROTOCOL_VERSION
    }
}

/// What `GET` returns, before the identity is checked fact by fact.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomingPayload {
    #[serde(default = "default_version")]
    version: String,
    identity: serde_json::Value,
}

/// Decode a `GET` body into a store plus the ids of facts that were dropped.
///
/// A bad fact costs only itself. An unknown version or a broken envelope
/// fails the whole payload.
pub fn decode_identity(body: serde_json::Value) -> AreteResult<(Store, Vec<String>)> {
    let malformed = |reason: String| CloudError::MalformedPayload { reason };
    let payload: IncomingPayload =
        serde_json::from_value(body).map_err(|e| malformed(e.to_string()))?;
    if payload.version != PROTOCOL_VERSION {
        return Err(malformed(format!("unsupported protocol version {}", payload.version)).into());
    }
    let decoded = Store::from_json_value(payload.identity).map_err(|e| malformed(e.to_string()))?;
    Ok(decoded)
}
