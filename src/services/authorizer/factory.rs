//! Factory: build the shared `TokenAuthorizer` from application `Config`.
use std::sync::Arc;

use tracing::{error, info};

use crate::config::Config;
use crate::services::authorizer::resource::ResourcePolicy;
use crate::services::authorizer::verifier::{KeyError, TokenVerifier};
use crate::services::authorizer::TokenAuthorizer;

pub fn build_token_authorizer(config: &Config) -> Result<Arc<TokenAuthorizer>, KeyError> {
    let verifier = TokenVerifier::new(
        &config.public_key_pem,
        config.jwt_algorithm,
        config.issuer.as_deref(),
        config.audience.as_deref(),
        config.leeway_seconds,
    )
    .inspect_err(|e| error!(error = %e, "failed to load verification key"))?;
    info!(algorithm = ?verifier.algorithm(), "verification key loaded");

    let authorizer = TokenAuthorizer::new(
        verifier,
        ResourcePolicy::new(config.region.clone(), config.resource_scope),
        config.principal_claim.clone(),
        config.bearer_prefix,
    );

    Ok(Arc::new(authorizer))
}
