use std::collections::BTreeMap;

use tracing::debug;

use crate::services::authorizer::bearer::BearerPrefix;
use crate::services::authorizer::claims::{ClaimSet, ClaimValue};
use crate::services::authorizer::decision::{AuthorizationDecision, ContextValue, PolicyDocument};
use crate::services::authorizer::error::AuthorizeError;
use crate::services::authorizer::resource::ResourcePolicy;
use crate::services::authorizer::verifier::TokenVerifier;

pub const DEFAULT_PRINCIPAL_CLAIM: &str = "user_id";

/// One request as handed over by the gateway.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    /// `"Bearer <jwt>"`. Absent is treated like an empty string.
    pub authorization_token: Option<String>,
    /// ARN of the method being invoked. Only read by the narrowed resource scopes.
    pub method_arn: String,
}

/// Turns a bearer token into an allow decision, or an error meaning deny.
///
/// Holds nothing but read-only configuration, so a single instance can be
/// shared by every request.
#[derive(Debug, Clone)]
pub struct TokenAuthorizer {
    verifier: TokenVerifier,
    resources: ResourcePolicy,
    principal_claim: String,
    bearer_prefix: BearerPrefix,
}

impl TokenAuthorizer {
    pub fn new(
        verifier: TokenVerifier,
        resources: ResourcePolicy,
        principal_claim: impl Into<String>,
        bearer_prefix: BearerPrefix,
    ) -> Self {
        Self {
            verifier,
            resources,
            principal_claim: principal_claim.into(),
            bearer_prefix,
        }
    }

    pub fn authorize(
        &self,
        request: &IncomingRequest,
    ) -> Result<AuthorizationDecision, AuthorizeError> {
        let raw = request.authorization_token.as_deref().unwrap_or_default();
        if raw.is_empty() {
            return Err(AuthorizeError::MalformedToken(
                "authorization token is empty".into(),
            ));
        }

        let token = self.bearer_prefix.strip(raw)?;
        let claims = self.verifier.verify(token)?;
        let principal_id = self.principal_id(&claims)?;
        let resource = self.resources.resource_for(&request.method_arn)?;

        debug!(principal_id = %principal_id, resource = %resource, "request authorized");

        Ok(AuthorizationDecision {
            principal_id,
            policy_document: PolicyDocument::allow_invoke(resource),
            context: build_context(&claims),
        })
    }

    fn principal_id(&self, claims: &ClaimSet) -> Result<String, AuthorizeError> {
        let name = self.principal_claim.as_str();
        match claims.get(name) {
            Some(ClaimValue::String(s)) => Ok(s.clone()),
            Some(ClaimValue::Number(n)) => Ok(n.to_string()),
            Some(ClaimValue::Boolean(b)) => Ok(b.to_string()),
            Some(other) => Err(AuthorizeError::MissingPrincipalClaim(format!(
                "claims must include '{}' as a scalar, got {}",
                name,
                other.kind()
            ))),
            None => Err(AuthorizeError::MissingPrincipalClaim(format!(
                "claims must include '{}'",
                name
            ))),
        }
    }
}

/// Scalar claims only. The rest is logged and left out.
fn build_context(claims: &ClaimSet) -> BTreeMap<String, ContextValue> {
    claims
        .iter()
        .filter_map(|(name, value)| match ContextValue::from_claim(value) {
            Some(v) => Some((name.clone(), v)),
            None => {
                debug!(
                    claim = %name,
                    kind = value.kind(),
                    "claim omitted from context: not a scalar"
                );
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::authorizer::resource::ResourceScope;
    use crate::services::authorizer::testing::{self, RS256_PUBLIC};
    use jsonwebtoken::Algorithm;
    use serde_json::json;
    use std::fmt;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    type Fields = BTreeMap<String, String>;

    /// Layer that keeps the fields of every event it sees.
    #[derive(Clone, Default)]
    struct CapturedEvents(Arc<Mutex<Vec<Fields>>>);

    struct FieldRecorder<'a>(&'a mut Fields);

    impl Visit for FieldRecorder<'_> {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.0.insert(field.name().to_string(), value.to_string());
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.0.insert(field.name().to_string(), format!("{value:?}"));
        }
    }

    impl<S: tracing::Subscriber> Layer<S> for CapturedEvents {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = Fields::new();
            event.record(&mut FieldRecorder(&mut fields));
            self.0.lock().unwrap().push(fields);
        }
    }

    const METHOD_ARN: &str = "arn:aws:execute-api:us-east-1:123456789012:a1b2c3/prod/GET/orders";

    fn authorizer(scope: ResourceScope, prefix: BearerPrefix) -> TokenAuthorizer {
        let verifier = TokenVerifier::new(RS256_PUBLIC, Algorithm::RS256, None, None, 0).unwrap();
        TokenAuthorizer::new(
            verifier,
            ResourcePolicy::new("us-east-1", scope),
            DEFAULT_PRINCIPAL_CLAIM,
            prefix,
        )
    }

    fn default_authorizer() -> TokenAuthorizer {
        authorizer(ResourceScope::Region, BearerPrefix::Lenient)
    }

    fn request(token: impl Into<String>) -> IncomingRequest {
        IncomingRequest {
            authorization_token: Some(token.into()),
            method_arn: METHOD_ARN.to_string(),
        }
    }

    fn bearer(claims: serde_json::Value) -> IncomingRequest {
        request(format!("Bearer {}", testing::rs256_token(&claims)))
    }

    #[test]
    fn admin_scenario_keeps_scalars_and_drops_tags() {
        let req = bearer(json!({"user_id": "u123", "role": "admin", "tags": ["a", "b"]}));

        let decision = default_authorizer().authorize(&req).unwrap();

        assert_eq!(
            serde_json::to_value(&decision).unwrap(),
            json!({
                "principalId": "u123",
                "policyDocument": {
                    "Version": "2012-10-17",
                    "Statement": [{
                        "Effect": "Allow",
                        "Action": "execute-api:Invoke",
                        "Resource": "arn:aws:execute-api:us-east-1:**",
                    }],
                },
                "context": {"user_id": "u123", "role": "admin"},
            })
        );
    }

    #[test]
    fn context_holds_exactly_the_scalar_claims() {
        let req = bearer(json!({
            "user_id": "u1",
            "count": 3,
            "score": 1.5,
            "verified": false,
            "profile": {"name": "x"},
            "groups": [],
            "nickname": null,
        }));

        let decision = default_authorizer().authorize(&req).unwrap();

        let keys: Vec<&str> = decision.context.keys().map(String::as_str).collect();
        assert_eq!(keys, ["count", "score", "user_id", "verified"]);
        assert_eq!(decision.context["verified"], ContextValue::Boolean(false));
    }

    #[test]
    fn omitted_claims_are_logged_by_name_and_kind_only() {
        let captured = CapturedEvents::default();
        let subscriber = tracing_subscriber::registry().with(captured.clone());
        let req = bearer(json!({"user_id": "u1", "tags": ["secret-tag"]}));

        let decision = tracing::subscriber::with_default(subscriber, || {
            default_authorizer().authorize(&req).unwrap()
        });

        assert!(!decision.context.contains_key("tags"));
        let events = captured.0.lock().unwrap();
        let omitted: Vec<&Fields> = events.iter().filter(|e| e.contains_key("claim")).collect();
        assert_eq!(omitted.len(), 1);
        assert_eq!(omitted[0]["claim"], "tags");
        assert_eq!(omitted[0]["kind"], "array");
        assert!(omitted[0].values().all(|v| !v.contains("secret-tag")));
    }

    #[test]
    fn token_from_another_key_is_signature_invalid() {
        let token = testing::other_rs256_token(&json!({"user_id": "u1"}));

        let err = default_authorizer()
            .authorize(&request(format!("Bearer {token}")))
            .unwrap_err();

        assert!(matches!(err, AuthorizeError::SignatureInvalid(_)));
    }

    #[test]
    fn missing_principal_claim_is_reported() {
        let err = default_authorizer()
            .authorize(&bearer(json!({"sub": "u1", "role": "admin"})))
            .unwrap_err();

        match err {
            AuthorizeError::MissingPrincipalClaim(msg) => assert!(msg.contains("user_id")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn structured_principal_claim_is_refused() {
        let err = default_authorizer()
            .authorize(&bearer(json!({"user_id": {"id": 1}})))
            .unwrap_err();

        assert!(matches!(err, AuthorizeError::MissingPrincipalClaim(_)));
    }

    #[test]
    fn numeric_principal_is_rendered_as_string() {
        let decision = default_authorizer()
            .authorize(&bearer(json!({"user_id": 42})))
            .unwrap();

        assert_eq!(decision.principal_id, "42");
        assert_eq!(decision.context["user_id"], ContextValue::Number(42.into()));
    }

    #[test]
    fn principal_claim_name_is_configurable() {
        let verifier = TokenVerifier::new(RS256_PUBLIC, Algorithm::RS256, None, None, 0).unwrap();
        let authorizer = TokenAuthorizer::new(
            verifier,
            ResourcePolicy::new("us-east-1", ResourceScope::Region),
            "sub",
            BearerPrefix::Lenient,
        );

        let decision = authorizer.authorize(&bearer(json!({"sub": "abc"}))).unwrap();

        assert_eq!(decision.principal_id, "abc");
    }

    #[test]
    fn empty_or_absent_token_is_malformed() {
        let absent = IncomingRequest {
            authorization_token: None,
            method_arn: METHOD_ARN.into(),
        };
        for req in [absent, request("")] {
            let err = default_authorizer().authorize(&req).unwrap_err();
            assert!(matches!(err, AuthorizeError::MalformedToken(_)));
        }
    }

    #[test]
    fn token_shorter_than_prefix_never_succeeds() {
        for raw in ["B", "Bearer", "Bearer ", "abcdef"] {
            let err = default_authorizer().authorize(&request(raw)).unwrap_err();
            assert!(
                matches!(
                    err,
                    AuthorizeError::MalformedToken(_) | AuthorizeError::SignatureInvalid(_)
                ),
                "{raw:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn lenient_prefix_accepts_any_seven_character_scheme() {
        let token = testing::rs256_token(&json!({"user_id": "u1"}));

        let decision = default_authorizer()
            .authorize(&request(format!("Token: {token}")))
            .unwrap();

        assert_eq!(decision.principal_id, "u1");
    }

    #[test]
    fn strict_prefix_rejects_other_schemes() {
        let token = testing::rs256_token(&json!({"user_id": "u1"}));
        let strict = authorizer(ResourceScope::Region, BearerPrefix::Strict);

        let err = strict
            .authorize(&request(format!("Token: {token}")))
            .unwrap_err();
        assert!(matches!(err, AuthorizeError::MalformedToken(_)));

        assert!(strict.authorize(&request(format!("Bearer {token}"))).is_ok());
    }

    #[test]
    fn repeated_calls_produce_identical_output() {
        let authorizer = default_authorizer();
        let req = bearer(json!({"user_id": "u1", "b": 1, "a": "x", "c": true}));

        let first = serde_json::to_vec(&authorizer.authorize(&req).unwrap()).unwrap();
        let second = serde_json::to_vec(&authorizer.authorize(&req).unwrap()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn method_scope_grants_only_the_invoked_method() {
        let decision = authorizer(ResourceScope::Method, BearerPrefix::Lenient)
            .authorize(&bearer(json!({"user_id": "u1"})))
            .unwrap();

        assert_eq!(decision.policy_document.statement[0].resource, METHOD_ARN);
    }

    #[test]
    fn method_scope_with_unusable_arn_is_refused() {
        let mut req = bearer(json!({"user_id": "u1"}));
        req.method_arn = String::new();

        let err = authorizer(ResourceScope::Api, BearerPrefix::Lenient)
            .authorize(&req)
            .unwrap_err();

        assert!(matches!(err, AuthorizeError::InvalidResource(_)));
    }
}
