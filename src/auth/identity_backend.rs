// Credential verification seam
// A real deployment delegates to an authentication service; the demo
// verifier trusts whatever role the caller picked.

use crate::models::{Identity, Role};
use async_trait::async_trait;
use tracing::debug;

/// What a login or registration form submits, after role parsing
#[derive(Debug, Clone)]
pub struct CredentialRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
    /// Present for registrations only
    pub display_name: Option<String>,
}

/// Recoverable authentication failures, returned to the immediate caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Role outside the closed `patient` / `doctor` set
    InvalidRole(String),
    /// Verifier refused the credentials
    Rejected(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::InvalidRole(role) => write!(f, "Invalid role: '{}'", role),
            AuthError::Rejected(msg) => write!(f, "Credentials rejected: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

/// Trait for credential verifier implementations
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Check the credentials and produce the identity to install
    async fn verify(&self, request: CredentialRequest) -> Result<Identity, AuthError>;
}

/// Sandbox verifier: any credentials succeed with the requested role
#[derive(Debug, Default, Clone)]
pub struct DemoVerifier;

#[async_trait]
impl CredentialVerifier for DemoVerifier {
    async fn verify(&self, request: CredentialRequest) -> Result<Identity, AuthError> {
        let display_name = request
            .display_name
            .unwrap_or_else(|| request.role.demo_display_name().to_string());

        debug!(
            "Demo verifier accepting {} as {}",
            request.email, request.role
        );

        Ok(Identity::new(
            uuid::Uuid::new_v4().to_string(),
            display_name,
            request.email,
            request.role,
        ))
    }
}
