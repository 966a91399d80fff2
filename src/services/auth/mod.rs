pub mod audit;
pub mod factory;
pub mod login_jwt;
#[cfg(test)]
pub(crate) mod testing;

pub use audit::{AuditSink, TracingAuditSink};
pub use factory::build_login_validator;
pub use login_jwt::{JwtLoginValidator, LoginTokenError, LoginTokenValidator};
