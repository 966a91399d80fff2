/// Factory: build the login token validator from application `Config`.
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::services::auth::{JwtLoginValidator, LoginTokenValidator};

pub fn build_login_validator(config: &Config) -> Result<Arc<dyn LoginTokenValidator>> {
    let validator = JwtLoginValidator::new(
        &config.login_key,
        config.login_issuer.as_deref(),
        config.login_audience.as_deref(),
        config.login_token_leeway_seconds,
    )
    .context("failed to load login token key material")?;

    Ok(Arc::new(validator))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_with(key: &str, value: &str) -> Config {
        let vars = HashMap::from([(key.to_string(), value.to_string())]);
        Config::from_lookup(|k| vars.get(k).cloned()).unwrap()
    }

    #[test]
    fn builds_from_shared_secret() {
        assert!(build_login_validator(&config_with("LOGIN_JWT_SECRET", "s3cret")).is_ok());
    }

    #[test]
    fn key_load_failure_keeps_the_cause() {
        let config = config_with("LOGIN_JWT_PUBLIC_KEY_PEM", "not a pem");

        let err = build_login_validator(&config).err().unwrap();

        assert_eq!(err.to_string(), "failed to load login token key material");
        // the jsonwebtoken error stays in the chain for the startup report
        assert!(err.chain().count() >= 2);
        assert!(format!("{err:#}").len() > err.to_string().len());
    }
}
