/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: login gate / http: request-id, tracing, body limit, timeout
 */
pub mod auth;
pub mod http;
