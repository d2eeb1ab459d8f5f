use jsonwebtoken::errors::ErrorKind;

/// Reasons a request is refused. Every variant means "deny"; none is retried.
#[derive(Debug, thiserror::Error)]
pub enum AuthorizeError {
    #[error("malformed token: {0}")]
    MalformedToken(String),
    #[error("token signature rejected: {0}")]
    SignatureInvalid(String),
    #[error("missing principal claim: {0}")]
    MissingPrincipalClaim(String),
    #[error("invalid resource: {0}")]
    InvalidResource(String),
}

impl From<jsonwebtoken::errors::Error> for AuthorizeError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            // The token never got as far as a signature check.
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => Self::MalformedToken(e.to_string()),
            // Wrong key, alg other than the pinned one, tampered payload, exp/nbf/iss/aud.
            _ => Self::SignatureInvalid(e.to_string()),
        }
    }
}
