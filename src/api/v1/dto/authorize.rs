/*
 * Responsibility
 * - POST /authorize の request DTO (gateway の TOKEN authorizer event)
 * - response は AuthorizationDecision をそのまま返す
 */
use serde::Deserialize;

use crate::services::authorizer::IncomingRequest;

/// Body sent by the gateway.
///
/// Unknown fields (`type`, request context, ...) are ignored so the gateway
/// event can be forwarded unchanged.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeRequest {
    /// `"Bearer <jwt>"`. May be missing; that is a deny, not a 4xx.
    #[serde(default)]
    pub authorization_token: Option<String>,

    #[serde(default)]
    pub method_arn: String,
}

impl From<AuthorizeRequest> for IncomingRequest {
    fn from(req: AuthorizeRequest) -> Self {
        Self {
            authorization_token: req.authorization_token,
            method_arn: req.method_arn,
        }
    }
}
