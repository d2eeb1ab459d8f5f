/*
 * Responsibility
 * - 環境変数からの設定読み込み (AWS_REGION, 検証用公開鍵, アルゴリズムなど)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 * - 読み込みは起動時に一度だけ。以降は不変
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use jsonwebtoken::Algorithm;

use crate::services::authorizer::{BearerPrefix, DEFAULT_PRINCIPAL_CLAIM, ResourceScope};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub region: String,

    pub public_key_pem: String,
    pub jwt_algorithm: Algorithm,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub leeway_seconds: u64,

    pub principal_claim: String,
    pub resource_scope: ResourceScope,
    pub bearer_prefix: BearerPrefix,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Public key is not secret, but it is long and useless in logs.
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("region", &self.region)
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("leeway_seconds", &self.leeway_seconds)
            .field("principal_claim", &self.principal_claim)
            .field("resource_scope", &self.resource_scope)
            .field("bearer_prefix", &self.bearer_prefix)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Unset and blank are the same thing.
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = match get("PORT") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::parse(get("APP_ENV"));

        let region = get("AWS_REGION")
            .map(|v| v.trim().to_string())
            .ok_or(ConfigError::Missing("AWS_REGION"))?;

        let public_key_pem = get("AUTHORIZER_PUBLIC_KEY_PEM")
            .ok_or(ConfigError::Missing("AUTHORIZER_PUBLIC_KEY_PEM"))?
            .replace("\\n", "\n");

        let jwt_algorithm = match get("AUTHORIZER_JWT_ALGORITHM") {
            Some(v) => Algorithm::from_str(v.trim())
                .map_err(|_| ConfigError::Invalid("AUTHORIZER_JWT_ALGORITHM"))?,
            None => Algorithm::RS256,
        };

        let issuer = get("AUTHORIZER_ISSUER");
        let audience = get("AUTHORIZER_AUDIENCE");

        let leeway_seconds = match get("AUTHORIZER_LEEWAY_SECONDS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("AUTHORIZER_LEEWAY_SECONDS"))?,
            None => 0,
        };

        let principal_claim = get("AUTHORIZER_PRINCIPAL_CLAIM")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| DEFAULT_PRINCIPAL_CLAIM.to_string());

        let resource_scope = match get("AUTHORIZER_RESOURCE_SCOPE") {
            Some(v) => v
                .parse()
                .map_err(|_| ConfigError::Invalid("AUTHORIZER_RESOURCE_SCOPE"))?,
            None => ResourceScope::default(),
        };

        let bearer_prefix = match get("AUTHORIZER_BEARER_PREFIX") {
            Some(v) => v
                .parse()
                .map_err(|_| ConfigError::Invalid("AUTHORIZER_BEARER_PREFIX"))?,
            None => BearerPrefix::default(),
        };

        Ok(Self {
            addr,
            app_env,
            region,
            public_key_pem,
            jwt_algorithm,
            issuer,
            audience,
            leeway_seconds,
            principal_claim,
            resource_scope,
            bearer_prefix,
        })
    }
}
