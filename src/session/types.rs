// Session types and data structures

use crate::models::{MAX_TIMEOUT_SECS, SessionSettings};
use crate::security::SensitiveKeys;
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

/// Inactivity window after which a signed-in user is logged out
pub const SESSION_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Upper bound on the inactivity window; longer values are clamped
pub const MAX_SESSION_TIMEOUT: Duration = Duration::from_secs(MAX_TIMEOUT_SECS);

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Idle timeout, shared by every session of the process
    pub timeout: Duration,
    /// Storage keys purged on logout
    pub sensitive_keys: SensitiveKeys,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: SESSION_TIMEOUT,
            sensitive_keys: SensitiveKeys::default(),
        }
    }
}

impl From<&SessionSettings> for SessionConfig {
    fn from(settings: &SessionSettings) -> Self {
        Self {
            timeout: Duration::from_secs(settings.timeout_secs).min(MAX_SESSION_TIMEOUT),
            sensitive_keys: SensitiveKeys::with_prefix(&settings.storage_key_prefix),
        }
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// User clicked "sign out"
    Explicit,
    /// Inactivity window elapsed
    Inactivity,
}

impl LogoutReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogoutReason::Explicit => "explicit",
            LogoutReason::Inactivity => "inactivity",
        }
    }
}

/// User interaction signals that count as activity
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    PointerDown,
    KeyDown,
    Scroll,
    PointerMove,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::PointerDown => "pointer_down",
            InteractionKind::KeyDown => "key_down",
            InteractionKind::Scroll => "scroll",
            InteractionKind::PointerMove => "pointer_move",
        }
    }
}

/// A single interaction, stamped when it happened
#[derive(Debug, Clone, Copy)]
pub struct InteractionEvent {
    pub kind: InteractionKind,
    pub at: Instant,
}

/// Inactivity monitor state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// No session, no timer
    Disarmed,
    /// Logout fires at `deadline` unless activity happens first
    Armed {
        deadline: Instant,
        last_activity: Instant,
    },
}

impl MonitorState {
    pub fn is_armed(&self) -> bool {
        matches!(self, MonitorState::Armed { .. })
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self {
            MonitorState::Armed { deadline, .. } => Some(*deadline),
            MonitorState::Disarmed => None,
        }
    }
}
