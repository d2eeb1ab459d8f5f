//! Verified token payload.
//!
//! Claim values come from the token issuer, so nothing about their shape is
//! trusted. They are decoded into a closed set of variants so callers can
//! match on them instead of poking at `serde_json::Value`.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

/// A single claim value as it appeared in the token payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimValue {
    String(String),
    Number(serde_json::Number),
    Boolean(bool),
    // null, arrays, objects
    Other(serde_json::Value),
}

impl ClaimValue {
    /// Short name of the JSON kind, used in diagnostics (never the value itself).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::Other(serde_json::Value::Null) => "null",
            Self::Other(serde_json::Value::Array(_)) => "array",
            Self::Other(serde_json::Value::Object(_)) => "object",
            // From<Value> never puts a scalar here, but the match must be total.
            Self::Other(_) => "other",
        }
    }
}

impl From<serde_json::Value> for ClaimValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::Bool(b) => Self::Boolean(b),
            other => Self::Other(other),
        }
    }
}

impl<'de> Deserialize<'de> for ClaimValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

/// Claims of a token whose signature has already been verified.
///
/// Ordered so that anything derived from it (the decision context) serializes
/// the same way every time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(BTreeMap<String, ClaimValue>);

impl ClaimSet {
    pub fn get(&self, name: &str) -> Option<&ClaimValue> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ClaimValue)> {
        self.0.iter()
    }
}
