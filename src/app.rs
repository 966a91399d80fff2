/*
 * Responsibility
 * - Config読み込み → 依存生成 (validator / audit sink / LoginGate) → Router 組み立て
 * - Middleware の適用 (login gate / HTTP layers)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::middleware::auth::{LoginGate, TokenHeader};
use crate::middleware::http::{self, HttpLimits};
use crate::services::auth::{TracingAuditSink, build_login_validator};
use crate::{api, state::AppState};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,login_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // In development, fail fast. In production, let the server keep running.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting login gate in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_state(config: &Config) -> Result<AppState> {
    let token_header = TokenHeader::parse(&config.login_token_header)
        .context("invalid configuration: LOGIN_TOKEN_HEADER")?;
    let validator = build_login_validator(config)?;

    let gate = LoginGate::new(token_header, validator, Arc::new(TracingAuditSink));
    tracing::info!(token_header = ?gate.token_header(), "login gate ready");

    Ok(AppState::new(Arc::new(gate)))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    http::apply(
        router,
        HttpLimits {
            timeout: Duration::from_secs(config.http_timeout_seconds),
            body_limit_bytes: config.http_body_limit_bytes,
        },
    )
}
