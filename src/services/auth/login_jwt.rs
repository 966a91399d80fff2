use std::fmt;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

use crate::config::LoginKey;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by a login token validator.
///
/// `Invalid` means the token itself is unacceptable (malformed, forged,
/// expired, ...). `Internal` is anything else: the validator could not reach a
/// verdict at all.
#[derive(Debug, Error)]
pub enum LoginTokenError {
    #[error("invalid login token: {0}")]
    Invalid(#[source] BoxError),

    #[error("login token validation failed: {0}")]
    Internal(#[source] BoxError),
}

impl LoginTokenError {
    pub fn invalid(e: impl Into<BoxError>) -> Self {
        Self::Invalid(e.into())
    }

    pub fn internal(e: impl Into<BoxError>) -> Self {
        Self::Internal(e.into())
    }
}

impl From<jsonwebtoken::errors::Error> for LoginTokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        let invalid = matches!(
            e.kind(),
            ErrorKind::InvalidToken
                | ErrorKind::InvalidSignature
                | ErrorKind::ExpiredSignature
                | ErrorKind::ImmatureSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidIssuer
                | ErrorKind::InvalidAudience
                | ErrorKind::InvalidSubject
                | ErrorKind::MissingRequiredClaim(_)
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_)
        );

        // key format / crypto backend problems and anything unknown stay internal
        if invalid {
            Self::invalid(e)
        } else {
            Self::internal(e)
        }
    }
}

/// Claims of a login session token.
///
/// Registered claims (`exp`, `iss`, `aud`) are checked by `jsonwebtoken`
/// during decoding; only the login fields are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginClaims {
    pub username: String,
}

/// Validates a login token and yields its claims.
///
/// Implementations are shared across requests and must be safe to call
/// concurrently.
pub trait LoginTokenValidator: Send + Sync {
    fn validate(&self, token: &str) -> Result<LoginClaims, LoginTokenError>;
}

/// JWT login token verifier (HS256 shared secret or EdDSA public key).
#[derive(Clone)]
pub struct JwtLoginValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for JwtLoginValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("JwtLoginValidator")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtLoginValidator {
    pub fn new(
        key: &LoginKey,
        issuer: Option<&str>,
        audience: Option<&str>,
        leeway_seconds: u64,
    ) -> Result<Self, jsonwebtoken::errors::Error> {
        let (decoding_key, algorithm) = match key {
            LoginKey::Secret(secret) => {
                (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
            LoginKey::Ed25519PublicPem(pem) => {
                (DecodingKey::from_ed_pem(pem.as_bytes())?, Algorithm::EdDSA)
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.leeway = leeway_seconds;
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            decoding_key,
            validation,
        })
    }
}

impl LoginTokenValidator for JwtLoginValidator {
    /// Verify signature + `exp` (+ `iss`/`aud` when configured), then require a
    /// non-blank `username`.
    fn validate(&self, token: &str) -> Result<LoginClaims, LoginTokenError> {
        let data =
            jsonwebtoken::decode::<LoginClaims>(token, &self.decoding_key, &self.validation)?;

        if data.claims.username.trim().is_empty() {
            return Err(LoginTokenError::invalid("empty 'username' claim"));
        }

        Ok(data.claims)
    }
}
