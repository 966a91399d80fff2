//! login session token 検証 → LoginCtx を extensions に入れる
//!
//! - token header (既定: `Bearer`) から token を取り出す
//! - LoginTokenValidator で検証し、結果を 3 種類の拒否か LoginCtx に振り分ける
//! - 拒否時は AuditSink に 1 件だけ記録し、downstream は呼ばない
//! - 成功時は何も記録せず、LoginCtx を載せて downstream に渡す (response は downstream の責務)

use std::fmt;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::{
        HeaderMap, Method, Request, Uri,
        header::{self, HeaderName, InvalidHeaderName},
    },
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::LoginCtx;
use crate::error::LoginRejection;
use crate::services::auth::{AuditSink, LoginTokenError, LoginTokenValidator};
use crate::state::AppState;

const REASON_UNAUTHENTICATED: &str = "Unauthenticated request.";
const REASON_INVALID_TOKEN: &str = "Invalid JWT Token Provided.";
const MESSAGE_VALIDATOR_FAILED: &str = "Error parsing JWT string.";

const BEARER_PREFIX: &str = "Bearer ";

/// Where the login token is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenHeader {
    /// The whole value of a dedicated header is the token.
    Named(HeaderName),
    /// `Authorization: Bearer <token>`.
    AuthorizationBearer,
}

enum Presented<'a> {
    Absent,
    Unreadable,
    Token(&'a str),
}

impl TokenHeader {
    /// `Authorization` (any case) selects the bearer scheme; any other name is
    /// read as a raw token header.
    pub fn parse(name: &str) -> Result<Self, InvalidHeaderName> {
        let name = HeaderName::try_from(name)?;
        if name == header::AUTHORIZATION {
            Ok(Self::AuthorizationBearer)
        } else {
            Ok(Self::Named(name))
        }
    }

    fn presented<'a>(&self, headers: &'a HeaderMap) -> Presented<'a> {
        let (value, scheme) = match self {
            TokenHeader::Named(name) => (headers.get(name), None),
            TokenHeader::AuthorizationBearer => {
                (headers.get(header::AUTHORIZATION), Some(BEARER_PREFIX))
            }
        };

        let Some(value) = value else {
            return Presented::Absent;
        };
        let Ok(value) = value.to_str() else {
            return Presented::Unreadable;
        };

        // scheme names are case-insensitive; another scheme is not a login token
        let value = match scheme {
            Some(prefix) => match value.get(..prefix.len()) {
                Some(head) if head.eq_ignore_ascii_case(prefix) => &value[prefix.len()..],
                _ => return Presented::Absent,
            },
            None => value,
        };

        match value.trim() {
            "" => Presented::Absent,
            token => Presented::Token(token),
        }
    }
}

/// Decides, per request, whether the downstream handler may run.
///
/// Holds only shared, immutable collaborators; one instance serves all
/// requests concurrently.
pub struct LoginGate {
    token_header: TokenHeader,
    validator: Arc<dyn LoginTokenValidator>,
    audit: Arc<dyn AuditSink>,
}

impl fmt::Debug for LoginGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginGate")
            .field("token_header", &self.token_header)
            .finish_non_exhaustive()
    }
}

impl LoginGate {
    pub fn new(
        token_header: TokenHeader,
        validator: Arc<dyn LoginTokenValidator>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            token_header,
            validator,
            audit,
        }
    }

    pub fn token_header(&self) -> &TokenHeader {
        &self.token_header
    }

    /// Run the gate's decision for one request.
    ///
    /// Every `Err` has already been written to the audit sink exactly once;
    /// `Ok` writes nothing.
    pub fn authenticate(
        &self,
        method: &Method,
        uri: &Uri,
        headers: &HeaderMap,
    ) -> Result<LoginCtx, LoginRejection> {
        let token = match self.token_header.presented(headers) {
            Presented::Token(token) => token,
            Presented::Absent => {
                self.audit.warn(method, uri, REASON_UNAUTHENTICATED);
                return Err(LoginRejection::MissingToken);
            }
            // non-visible-ASCII bytes can never form a valid token
            Presented::Unreadable => {
                self.audit.warn(method, uri, REASON_INVALID_TOKEN);
                return Err(LoginRejection::InvalidToken);
            }
        };

        match self.validator.validate(token) {
            Ok(claims) => Ok(LoginCtx::new(claims.username)),
            Err(LoginTokenError::Invalid(_)) => {
                self.audit.warn(method, uri, REASON_INVALID_TOKEN);
                Err(LoginRejection::InvalidToken)
            }
            Err(LoginTokenError::Internal(err)) => {
                self.audit.error(method, uri, &*err, MESSAGE_VALIDATOR_FAILED);
                Err(LoginRejection::Internal(err))
            }
        }
    }
}

/// Router に login gate を掛ける。
///
/// `route_layer` なので、gate はマッチした route にだけ掛かる (404 はそのまま)。
///
/// 例：
/// ```ignore
/// let protected = Router::new().route("/me", get(me));
/// let protected = middleware::auth::login::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, login_middleware))
}

async fn login_middleware(
    State(state): State<AppState>,
    OriginalUri(original_uri): OriginalUri,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, LoginRejection> {
    let login_ctx = state
        .login_gate
        .authenticate(req.method(), &original_uri, req.headers())?;

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(login_ctx);

    Ok(next.run(req).await)
}
