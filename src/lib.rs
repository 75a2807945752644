// Library exports for testing
pub mod auth;
pub mod config;
pub mod gate;
pub mod models;
pub mod security;
pub mod session;
pub mod storage;
