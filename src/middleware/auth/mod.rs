pub mod login;

pub use login::{LoginGate, TokenHeader};
