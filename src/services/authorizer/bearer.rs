use std::str::FromStr;

use crate::services::authorizer::error::AuthorizeError;

const SCHEME: &str = "Bearer ";

/// How the `Bearer ` scheme marker is removed from `authorizationToken`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BearerPrefix {
    /// Drop the first 7 characters whatever they are. Anything shorter ends up
    /// empty and fails verification as a malformed token.
    #[default]
    Lenient,
    /// Require `Bearer ` (scheme case-insensitive) before the token.
    Strict,
}

impl FromStr for BearerPrefix {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            _ => Err(()),
        }
    }
}

impl BearerPrefix {
    pub fn strip<'a>(&self, raw: &'a str) -> Result<&'a str, AuthorizeError> {
        let prefix_len = SCHEME.chars().count();
        // Byte offset just past the 7th character; never splits a UTF-8 sequence.
        let cut = raw
            .char_indices()
            .nth(prefix_len)
            .map(|(i, _)| i)
            .unwrap_or(raw.len());
        let (prefix, token) = raw.split_at(cut);

        match self {
            Self::Lenient => Ok(token),
            Self::Strict if prefix.eq_ignore_ascii_case(SCHEME) => Ok(token),
            Self::Strict => Err(AuthorizeError::MalformedToken(
                "authorization token does not use the Bearer scheme".into(),
            )),
        }
    }
}
