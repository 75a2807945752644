// Session store: the single slot holding the signed-in identity

use super::types::{LogoutReason, SessionConfig};
use crate::auth::{AuthError, CredentialRequest, CredentialVerifier};
use crate::models::{Identity, Role};
use crate::storage::{BrowserStorage, clear_sensitive_storage};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

/// Owner of the current [`Identity`].
///
/// Cheap to clone; every clone refers to the same slot. Login, register and
/// logout are serialized so concurrent triggers never interleave.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    current: watch::Sender<Option<Identity>>,
    mutation: Mutex<()>,
    verifier: Arc<dyn CredentialVerifier>,
    storage: Arc<dyn BrowserStorage>,
    config: SessionConfig,
}

impl SessionStore {
    /// Create a new store with no one signed in
    pub fn new(
        verifier: Arc<dyn CredentialVerifier>,
        storage: Arc<dyn BrowserStorage>,
        config: SessionConfig,
    ) -> Self {
        let (current, _) = watch::channel(None);

        Self {
            inner: Arc::new(StoreInner {
                current,
                mutation: Mutex::new(()),
                verifier,
                storage,
                config,
            }),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Sign in with a role-derived display name
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<Identity, AuthError> {
        let role = parse_role(role)?;

        self.establish(CredentialRequest {
            email: email.to_string(),
            password: password.to_string(),
            role,
            display_name: None,
        })
        .await
    }

    /// Sign up; the display name is taken verbatim from `name`
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<Identity, AuthError> {
        let role = parse_role(role)?;

        self.establish(CredentialRequest {
            email: email.to_string(),
            password: password.to_string(),
            role,
            display_name: Some(name.to_string()),
        })
        .await
    }

    async fn establish(&self, request: CredentialRequest) -> Result<Identity, AuthError> {
        let _guard = self.inner.mutation.lock().await;
        let email = request.email.clone();

        let identity = match self.inner.verifier.verify(request).await {
            Ok(identity) => identity,
            Err(e) => {
                warn!("Sign-in for {} rejected: {}", email, e);
                return Err(e);
            }
        };

        let previous = self.inner.current.send_replace(Some(identity.clone()));

        if let Some(previous) = previous {
            info!(
                "Identity {} replaced by {} ({})",
                previous.id, identity.id, identity.role
            );
        } else {
            info!("Signed in {} as {} ({})", identity.email, identity.id, identity.role);
        }

        Ok(identity)
    }

    /// Explicit sign-out
    pub async fn logout(&self) -> bool {
        self.logout_with(LogoutReason::Explicit).await
    }

    /// Clear the slot and purge sensitive storage.
    ///
    /// Idempotent: returns `false` when nobody was signed in, but the purge
    /// still runs.
    pub async fn logout_with(&self, reason: LogoutReason) -> bool {
        let _guard = self.inner.mutation.lock().await;
        self.clear(reason).await
    }

    /// Sign out only if `id` is still the signed-in identity.
    ///
    /// A session that replaced `id` in the meantime is left alone, storage
    /// included. Returns whether `id` was signed out.
    pub async fn logout_if(&self, id: &str, reason: LogoutReason) -> bool {
        let _guard = self.inner.mutation.lock().await;

        let still_current = self
            .inner
            .current
            .borrow()
            .as_ref()
            .is_some_and(|identity| identity.id == id);

        if !still_current {
            debug!("Logout ({}) skipped, {} is no longer signed in", reason.as_str(), id);
            return false;
        }

        self.clear(reason).await
    }

    // Caller holds the mutation lock
    async fn clear(&self, reason: LogoutReason) -> bool {
        let mut previous = None;
        self.inner.current.send_if_modified(|current| {
            previous = current.take();
            previous.is_some()
        });

        let removed =
            clear_sensitive_storage(self.inner.storage.as_ref(), &self.inner.config.sensitive_keys)
                .await;
        debug!("Purged sensitive storage ({} removals)", removed);

        match previous {
            Some(identity) => {
                info!("Signed out {} ({})", identity.id, reason.as_str());
                true
            }
            None => {
                debug!("Logout ({}) with no active session", reason.as_str());
                false
            }
        }
    }

    /// Snapshot of the signed-in identity
    pub fn current(&self) -> Option<Identity> {
        self.inner.current.borrow().clone()
    }

    pub fn role(&self) -> Option<Role> {
        self.inner.current.borrow().as_ref().map(|identity| identity.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.current.borrow().is_some()
    }

    pub fn is_doctor(&self) -> bool {
        crate::security::is_doctor_role(self.role())
    }

    pub fn is_patient(&self) -> bool {
        crate::security::is_patient_role(self.role())
    }

    /// Observe session changes
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.inner.current.subscribe()
    }

    /// Run `fut` with this store installed as the task's session.
    /// See [`super::scope`].
    pub async fn scope<F: Future>(&self, fut: F) -> F::Output {
        super::scope::enter(self.clone(), fut).await
    }
}

fn parse_role(role: &str) -> Result<Role, AuthError> {
    role.parse::<Role>().map_err(|e| {
        warn!("{}", e);
        AuthError::InvalidRole(e.0)
    })
}
