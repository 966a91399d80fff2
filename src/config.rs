/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, token header, JWT key material など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
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

#[derive(Debug)]
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

/// Header the login token is read from when `LOGIN_TOKEN_HEADER` is unset.
pub const DEFAULT_TOKEN_HEADER: &str = "Bearer";

/// Key material used to verify login tokens.
#[derive(Clone)]
pub enum LoginKey {
    /// HMAC shared secret (HS256).
    Secret(String),
    /// Ed25519 public key in PEM (EdDSA).
    Ed25519PublicPem(String),
}

impl fmt::Debug for LoginKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        match self {
            LoginKey::Secret(_) => f.write_str("Secret(..)"),
            LoginKey::Ed25519PublicPem(_) => f.write_str("Ed25519PublicPem(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub login_token_header: String,
    pub login_key: LoginKey,
    pub login_issuer: Option<String>,
    pub login_audience: Option<String>,
    pub login_token_leeway_seconds: u64,

    pub http_timeout_seconds: u64,
    pub http_body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (env, map in tests, ...).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = parse_or(&lookup, "PORT", 3000)?;

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let login_token_header = non_empty("LOGIN_TOKEN_HEADER")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| DEFAULT_TOKEN_HEADER.to_string());

        let login_key = match (
            non_empty("LOGIN_JWT_PUBLIC_KEY_PEM"),
            non_empty("LOGIN_JWT_SECRET"),
        ) {
            (Some(pem), _) => LoginKey::Ed25519PublicPem(pem.replace("\\n", "\n")),
            (None, Some(secret)) => LoginKey::Secret(secret),
            (None, None) => return Err(ConfigError::Missing("LOGIN_JWT_SECRET")),
        };

        let login_issuer = non_empty("LOGIN_JWT_ISSUER");
        let login_audience = non_empty("LOGIN_JWT_AUDIENCE");

        let login_token_leeway_seconds: u64 =
            parse_or(&lookup, "LOGIN_TOKEN_LEEWAY_SECONDS", 60)?;

        let http_timeout_seconds: u64 = parse_or(&lookup, "HTTP_TIMEOUT_SECONDS", 30)?;
        if http_timeout_seconds == 0 {
            return Err(ConfigError::Invalid("HTTP_TIMEOUT_SECONDS"));
        }

        let http_body_limit_bytes: usize =
            parse_or(&lookup, "HTTP_BODY_LIMIT_BYTES", 1024 * 1024)?;

        Ok(Self {
            addr,
            app_env,
            login_token_header,
            login_key,
            login_issuer,
            login_audience,
            login_token_leeway_seconds,
            http_timeout_seconds,
            http_body_limit_bytes,
        })
    }
}

/// Unset keeps `default`; a set but unparsable value fails startup.
fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}
