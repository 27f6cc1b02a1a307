//! Pi-hole API Type Definitions
//!
//! Request and response shapes for the two endpoints the agent talks to:
//!
//! - `POST /api/auth` → [`AuthRequest`] / [`AuthResponse`]
//! - `GET /api/stats/summary` → [`MetricsSnapshot`]
//!
//! The summary is kept as an untyped JSON object because the agent forwards
//! whatever counters the appliance reports.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Nested summary document: string keys mapping to numbers or further objects
pub type MetricsSnapshot = Map<String, Value>;

/// Body of `POST /api/auth`
#[derive(Debug, Serialize)]
pub struct AuthRequest<'a> {
    pub password: &'a str,
}

/// Response of `POST /api/auth`
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub session: SessionToken,
}

/// Opaque session credential map returned by the auth endpoint
///
/// Typical keys are `valid`, `sid`, `csrf`, `validity` and `message`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(Map<String, Value>);

impl SessionToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value for `key`, if present and a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merges `other` into this token, overwriting existing keys
    pub fn update(&mut self, other: SessionToken) {
        self.0.extend(other.0);
    }

    /// Session id to send as `X-FTL-SID`, if non-empty
    pub fn sid(&self) -> Option<&str> {
        self.get_str("sid").filter(|sid| !sid.is_empty())
    }

    pub fn has_session(&self) -> bool {
        self.sid().is_some()
    }

    /// `false` only when the appliance explicitly marks the session invalid
    pub fn is_valid(&self) -> bool {
        self.0.get("valid").and_then(Value::as_bool).unwrap_or(true)
    }

    /// Lifetime of the session in seconds, as reported by the appliance
    pub fn validity(&self) -> Option<u64> {
        self.0.get("validity").and_then(Value::as_u64)
    }

    pub fn message(&self) -> Option<&str> {
        self.get_str("message")
    }
}

impl From<Map<String, Value>> for SessionToken {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
