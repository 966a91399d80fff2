/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は公開、/me は login gate の内側
 * - gate を掛ける範囲はここで決める (route_layer)
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{health::health, me::me};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/health", get(health));

    let protected = Router::new().route("/me", get(me));
    let protected = middleware::auth::login::apply(protected, state);

    public.merge(protected)
}
