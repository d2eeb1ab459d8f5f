//! Decision document returned to the enforcement point.
//!
//! Field names follow the API Gateway Lambda authorizer output format, so the
//! serialized form can be handed back to the gateway as-is.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::services::authorizer::claims::ClaimValue;

pub const POLICY_VERSION: &str = "2012-10-17";
pub const INVOKE_ACTION: &str = "execute-api:Invoke";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effect {
    Allow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub effect: Effect,
    pub action: &'static str,
    pub resource: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: &'static str,
    pub statement: Vec<Statement>,
}

impl PolicyDocument {
    /// Single `Allow` statement for `execute-api:Invoke` on `resource`.
    pub fn allow_invoke(resource: String) -> Self {
        Self {
            version: POLICY_VERSION,
            statement: vec![Statement {
                effect: Effect::Allow,
                action: INVOKE_ACTION,
                resource,
            }],
        }
    }
}

/// Values the gateway accepts in the authorizer context.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContextValue {
    String(String),
    Number(serde_json::Number),
    Boolean(bool),
}

impl ContextValue {
    /// `None` for anything that is not a string, number or boolean.
    pub fn from_claim(value: &ClaimValue) -> Option<Self> {
        match value {
            ClaimValue::String(s) => Some(Self::String(s.clone())),
            ClaimValue::Number(n) => Some(Self::Number(n.clone())),
            ClaimValue::Boolean(b) => Some(Self::Boolean(*b)),
            ClaimValue::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationDecision {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
    pub context: BTreeMap<String, ContextValue>,
}
