//! Key fixtures and token minting for unit tests.

use jsonwebtoken::{Algorithm, EncodingKey, Header};

pub const RS256_PRIVATE: &str = include_str!("testdata/rs256_private.pem");
pub const RS256_PUBLIC: &str = include_str!("testdata/rs256_public.pem");
pub const OTHER_RS256_PRIVATE: &str = include_str!("testdata/rs256_other_private.pem");
pub const ED25519_PRIVATE: &str = include_str!("testdata/ed25519_private.pem");
pub const ED25519_PUBLIC: &str = include_str!("testdata/ed25519_public.pem");
pub const ES256_PRIVATE: &str = include_str!("testdata/es256_private.pem");
pub const ES256_PUBLIC: &str = include_str!("testdata/es256_public.pem");

pub fn sign(claims: &serde_json::Value, algorithm: Algorithm, private_key_pem: &str) -> String {
    let key = match algorithm {
        Algorithm::EdDSA => EncodingKey::from_ed_pem(private_key_pem.as_bytes()),
        Algorithm::ES256 | Algorithm::ES384 => EncodingKey::from_ec_pem(private_key_pem.as_bytes()),
        _ => EncodingKey::from_rsa_pem(private_key_pem.as_bytes()),
    }
    .unwrap();

    let mut header = Header::new(algorithm);
    header.typ = Some("JWT".to_string());
    jsonwebtoken::encode(&header, claims, &key).unwrap()
}

pub fn rs256_token(claims: &serde_json::Value) -> String {
    sign(claims, Algorithm::RS256, RS256_PRIVATE)
}

pub fn other_rs256_token(claims: &serde_json::Value) -> String {
    sign(claims, Algorithm::RS256, OTHER_RS256_PRIVATE)
}
