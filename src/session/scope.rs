// Task-scoped access to the session store
//
// The application root installs its store with `SessionStore::scope`;
// views running inside that future reach it through `current()`.
// Tasks spawned from inside a scope do not inherit it and must be handed
// the store explicitly.

use super::store::SessionStore;
use std::future::Future;

tokio::task_local! {
    static SESSION: SessionStore;
}

/// Session queried outside of any store scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeError {
    Uninitialized,
}

impl std::fmt::Display for ScopeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopeError::Uninitialized => {
                write!(f, "session store used outside of a SessionStore::scope")
            }
        }
    }
}

impl std::error::Error for ScopeError {}

pub(crate) async fn enter<F: Future>(store: SessionStore, fut: F) -> F::Output {
    SESSION.scope(store, fut).await
}

pub fn try_current() -> Result<SessionStore, ScopeError> {
    SESSION
        .try_with(|store| store.clone())
        .map_err(|_| ScopeError::Uninitialized)
}

/// The store of the enclosing scope.
///
/// # Panics
///
/// Outside of a scope. Falling back to a signed-out store there would hide
/// the wiring bug, so this aborts instead.
pub fn current() -> SessionStore {
    match try_current() {
        Ok(store) => store,
        Err(e) => panic!("{}", e),
    }
}
