pub mod bearer;
pub mod claims;
pub mod decision;
pub mod error;
pub mod factory;
pub mod resource;
pub mod token_authorizer;
pub mod verifier;

#[cfg(test)]
pub(crate) mod testing;

pub use bearer::BearerPrefix;
pub use decision::AuthorizationDecision;
pub use error::AuthorizeError;
pub use factory::build_token_authorizer;
pub use resource::ResourceScope;
pub use token_authorizer::{DEFAULT_PRINCIPAL_CLAIM, IncomingRequest, TokenAuthorizer};
