// Session lifecycle
// Single-slot session store, inactivity logout and task-scoped access

pub mod monitor;
pub mod scope;
pub mod store;
pub mod types;

pub use monitor::{ActivityTracker, InactivityMonitor, MonitorHandle};
pub use scope::ScopeError;
pub use store::SessionStore;
pub use types::{
    InteractionEvent, InteractionKind, LogoutReason, MAX_SESSION_TIMEOUT, MonitorState, SESSION_TIMEOUT,
    SessionConfig,
};
