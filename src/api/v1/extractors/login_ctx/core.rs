use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

use super::LoginCtx;

/// Handler で LoginCtx を受け取るための extractor
/// login gate が LoginCtx を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（gate が掛かっていない route）
#[derive(Debug, Clone)]
pub struct LoginUser(pub LoginCtx);

impl<S> FromRequestParts<S> for LoginUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<LoginCtx>()
            .cloned()
            .map(LoginUser)
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    #[tokio::test]
    async fn reads_login_ctx_from_extensions() {
        let mut req = Request::builder().uri("/me").body(()).unwrap();
        req.extensions_mut().insert(LoginCtx::new("alice"));
        let (mut parts, _) = req.into_parts();

        let LoginUser(ctx) = LoginUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(ctx.username, "alice");
    }

    #[tokio::test]
    async fn missing_login_ctx_is_unauthorized() {
        let (mut parts, _) = Request::builder().uri("/me").body(()).unwrap().into_parts();

        let err = LoginUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }
}
