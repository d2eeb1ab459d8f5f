use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use crate::services::authorizer::claims::ClaimSet;
use crate::services::authorizer::error::AuthorizeError;

/// Problems with the trust anchor itself. These only happen at startup.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("algorithm {0:?} is not an asymmetric signature algorithm")]
    UnsupportedAlgorithm(Algorithm),
    #[error("public key pem does not match algorithm {algorithm:?}: {source}")]
    InvalidPem {
        algorithm: Algorithm,
        source: jsonwebtoken::errors::Error,
    },
}

/// Signature verifier pinned to a single asymmetric algorithm.
///
/// - The key family (RSA / EC / Ed25519) is derived from the algorithm, so a
///   token header naming anything else fails before the signature is checked.
/// - `exp` and `nbf` are enforced when present but not required.
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenVerifier {
    algorithm: Algorithm,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("algorithm", &self.algorithm)
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(
        public_key_pem: &str,
        algorithm: Algorithm,
        issuer: Option<&str>,
        audience: Option<&str>,
        leeway_seconds: u64,
    ) -> Result<Self, KeyError> {
        let pem = public_key_pem.as_bytes();
        let decoding_key = match algorithm {
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => DecodingKey::from_rsa_pem(pem),
            Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(pem),
            Algorithm::EdDSA => DecodingKey::from_ed_pem(pem),
            other => return Err(KeyError::UnsupportedAlgorithm(other)),
        }
        .map_err(|source| KeyError::InvalidPem { algorithm, source })?;

        let mut validation = Validation::new(algorithm);
        // Tokens without exp are accepted; exp/nbf are still checked when present.
        validation.required_spec_claims.clear();
        validation.validate_nbf = true;
        validation.leeway = leeway_seconds;

        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
            validation.required_spec_claims.insert("iss".to_string());
        }
        match audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                validation.required_spec_claims.insert("aud".to_string());
            }
            // Otherwise a token that happens to carry `aud` would be refused.
            None => validation.validate_aud = false,
        }

        Ok(Self {
            algorithm,
            decoding_key,
            validation,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Verify the signature (and time/issuer/audience claims) and decode the payload.
    pub fn verify(&self, token: &str) -> Result<ClaimSet, AuthorizeError> {
        let data = jsonwebtoken::decode::<ClaimSet>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims)
    }
}
