/*!
 * Login context extractor
 *
 * Responsibility:
 * - login gate が検証したユーザー (LoginCtx) を handler に提供する
 * - HTTP / axum 依存は core に閉じ込め、型定義は types に分離する
 *
 * Public API:
 * - LoginCtx
 * - LoginUser
 */

mod core;
mod types;

pub use self::core::LoginUser;
pub use types::LoginCtx;
