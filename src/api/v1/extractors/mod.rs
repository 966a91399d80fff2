/*
 * Responsibility
 * - handler が受け取る extractor 群の公開
 */
mod login_ctx;

pub use login_ctx::{LoginCtx, LoginUser};
