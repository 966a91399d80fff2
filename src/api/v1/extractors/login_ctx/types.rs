/*
 * Responsibility
 * - login gate が request extensions に載せる「認証済みユーザー」の型
 * - 型そのものが key になるので、他の extension と衝突しない
 */

/// Identity attached to a request that passed the login gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCtx {
    pub username: String,
}

impl LoginCtx {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}
