use serde::{Deserialize, Serialize};

use super::user::Role;

/// Session settings shared by every session of the process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Inactivity window in seconds (default: 900 = 15 minutes)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Prefix of the browser storage keys purged on logout
    #[serde(default = "default_storage_key_prefix")]
    pub storage_key_prefix: String,
}

fn default_timeout_secs() -> u64 {
    900
}

/// Longest accepted inactivity window (one day)
pub const MAX_TIMEOUT_SECS: u64 = 24 * 60 * 60;

fn default_storage_key_prefix() -> String {
    "nexora".to_string()
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            storage_key_prefix: default_storage_key_prefix(),
        }
    }
}

/// Well-known destinations used by the route guards
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoutePaths {
    /// Unauthenticated landing page
    #[serde(default = "default_landing")]
    pub landing: String,
    #[serde(default = "default_login")]
    pub login: String,
    /// Generic (patient) dashboard
    #[serde(default = "default_dashboard")]
    pub dashboard: String,
    #[serde(default = "default_doctor_dashboard")]
    pub doctor_dashboard: String,
}

fn default_landing() -> String {
    "/".to_string()
}

fn default_login() -> String {
    "/login".to_string()
}

fn default_dashboard() -> String {
    "/dashboard".to_string()
}

fn default_doctor_dashboard() -> String {
    "/doctor".to_string()
}

impl Default for RoutePaths {
    fn default() -> Self {
        Self {
            landing: default_landing(),
            login: default_login(),
            dashboard: default_dashboard(),
            doctor_dashboard: default_doctor_dashboard(),
        }
    }
}

impl RoutePaths {
    /// Where a freshly signed-in user lands
    pub fn home_for(&self, role: Role) -> &str {
        match role {
            Role::Doctor => &self.doctor_dashboard,
            Role::Patient => &self.dashboard,
        }
    }

    fn all(&self) -> [(&'static str, &str); 4] {
        [
            ("landing", &self.landing),
            ("login", &self.login),
            ("dashboard", &self.dashboard),
            ("doctor_dashboard", &self.doctor_dashboard),
        ]
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub routes: RoutePaths,
}

impl AppConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.session.timeout_secs == 0 {
            return Err("session.timeout_secs must be greater than zero".to_string());
        }

        if self.session.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(format!(
                "session.timeout_secs must be at most {}, got {}",
                MAX_TIMEOUT_SECS, self.session.timeout_secs
            ));
        }

        if self.session.storage_key_prefix.trim().is_empty() {
            return Err("session.storage_key_prefix must not be empty".to_string());
        }

        for (name, path) in self.routes.all() {
            if !path.starts_with('/') {
                return Err(format!(
                    "routes.{} must be an absolute path, got '{}'",
                    name, path
                ));
            }
        }

        Ok(())
    }
}
