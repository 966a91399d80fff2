/*
 * Responsibility
 * - GET /me (login gate の内側)
 * - gate が載せた LoginCtx をそのまま返す
 */
use axum::Json;
use serde::Serialize;

use crate::api::v1::extractors::LoginUser;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub username: String,
}

pub async fn me(LoginUser(ctx): LoginUser) -> Json<MeResponse> {
    Json(MeResponse {
        username: ctx.username,
    })
}
