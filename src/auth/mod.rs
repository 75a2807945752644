pub mod identity_backend;

pub use identity_backend::{AuthError, CredentialRequest, CredentialVerifier, DemoVerifier};
