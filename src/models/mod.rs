pub mod portal;
pub mod user;

pub use portal::{AppConfig, MAX_TIMEOUT_SECS, RoutePaths, SessionSettings};
pub use user::{Identity, Role, UnknownRole};
