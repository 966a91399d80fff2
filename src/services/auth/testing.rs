//! Test doubles for the login token validator.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::login_jwt::{LoginClaims, LoginTokenError, LoginTokenValidator};

#[derive(Debug, Clone)]
pub enum Verdict {
    Accept(&'static str),
    Invalid,
    Internal(&'static str),
}

/// Answers each token with a fixed verdict; unknown tokens are invalid.
#[derive(Debug, Default)]
pub struct ScriptedValidator {
    verdicts: HashMap<String, Verdict>,
    calls: AtomicUsize,
}

impl ScriptedValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, token: &str, verdict: Verdict) -> Self {
        self.verdicts.insert(token.to_string(), verdict);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LoginTokenValidator for ScriptedValidator {
    fn validate(&self, token: &str) -> Result<LoginClaims, LoginTokenError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.verdicts.get(token) {
            Some(Verdict::Accept(username)) => Ok(LoginClaims {
                username: username.to_string(),
            }),
            Some(Verdict::Internal(reason)) => Err(LoginTokenError::internal(*reason)),
            Some(Verdict::Invalid) | None => Err(LoginTokenError::invalid("unknown token")),
        }
    }
}
