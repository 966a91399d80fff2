/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - ex: login_gate: LoginGate (validator / audit sink を内包)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::middleware::auth::LoginGate;

#[derive(Clone, Debug)]
pub struct AppState {
    pub login_gate: Arc<LoginGate>,
}

impl AppState {
    pub fn new(login_gate: Arc<LoginGate>) -> Self {
        Self { login_gate }
    }
}
