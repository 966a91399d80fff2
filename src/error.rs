/*
 * Responsibility
 * - アプリ共通の AppError 定義 (JSON error body)
 * - 認証ゲートの拒否 (LoginRejection) -> 固定 status / 固定 plain-text body
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::login_jwt::BoxError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Why the login gate refused a request.
///
/// The `Display` text is the exact response body sent to the client.
#[derive(Debug, Error)]
pub enum LoginRejection {
    #[error("Error: No JWT session token found.")]
    MissingToken,

    #[error("Error: JWT session token invalid.")]
    InvalidToken,

    #[error("Error parsing JWT string.")]
    Internal(#[source] BoxError),
}

impl LoginRejection {
    pub fn status(&self) -> StatusCode {
        match self {
            LoginRejection::MissingToken | LoginRejection::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            LoginRejection::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for LoginRejection {
    fn into_response(self) -> Response {
        // plain text, no JSON envelope
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn rejections_map_to_fixed_status_and_body() {
        let cases = [
            (
                LoginRejection::MissingToken,
                StatusCode::UNAUTHORIZED,
                "Error: No JWT session token found.",
            ),
            (
                LoginRejection::InvalidToken,
                StatusCode::UNAUTHORIZED,
                "Error: JWT session token invalid.",
            ),
            (
                LoginRejection::Internal("key store offline".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error parsing JWT string.",
            ),
        ];

        for (rejection, status, body) in cases {
            let response = rejection.into_response();
            assert_eq!(response.status(), status);
            assert_eq!(body_of(response).await, body);
        }
    }

    #[tokio::test]
    async fn internal_rejection_does_not_leak_cause() {
        let response = LoginRejection::Internal("secret detail".into()).into_response();
        assert!(!body_of(response).await.contains("secret detail"));
    }

    #[tokio::test]
    async fn app_error_uses_json_envelope() {
        let response = AppError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = serde_json::from_str(&body_of(response).await).unwrap();
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }
}
