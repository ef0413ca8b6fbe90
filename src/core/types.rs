//! Shared types used across harness modules
//!
//! Typed views of `sf ... --json` output. Every field is optional or
//! defaulted because the CLI's payload varies between versions.

use serde::{Deserialize, Serialize};

/// Envelope wrapping every `sf --json` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliEnvelope<T> {
    /// Process exit status reported by the CLI
    #[serde(default)]
    pub status: i32,
    /// Command payload
    pub result: Option<T>,
    /// Warnings the CLI attached to the response
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<serde_json::Value>,
}

/// `result` of `sf org display --json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgInfo {
    /// Org id
    #[serde(default)]
    pub id: Option<String>,
    /// Instance base URL
    #[serde(default)]
    pub instance_url: Option<String>,
    /// Alias the org is registered under
    #[serde(default)]
    pub alias: Option<String>,
    /// Username of the authenticated user
    #[serde(default)]
    pub username: Option<String>,
    /// e.g. "Connected"
    #[serde(default)]
    pub connected_status: Option<String>,
    /// Session token; only present when the CLI is asked to reveal it
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,
}

impl OrgInfo {
    /// Whether the CLI reports a live connection
    pub fn is_connected(&self) -> bool {
        self.connected_status.as_deref() == Some("Connected")
    }
}

/// Where a session URL came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSource {
    /// The CLI printed a usable URL
    Direct(String),
    /// The CLI printed an opaque token that needs a frontdoor URL
    Token(String),
}
