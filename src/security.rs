// Security utilities: markup escaping, role predicates, sensitive storage keys

use crate::models::Role;

/// Escape free text for safe display inside HTML.
///
/// Covers `& < > " ' /`. The output never contains those characters except
/// as part of an entity.
pub fn sanitize_for_display(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());

    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            other => escaped.push(other),
        }
    }

    escaped
}

/// Strictly doctor; an absent role is never a doctor
pub fn is_doctor_role(role: Option<Role>) -> bool {
    role == Some(Role::Doctor)
}

/// Strictly patient
pub fn is_patient_role(role: Option<Role>) -> bool {
    role == Some(Role::Patient)
}

/// Storage keys that may hold credentials or profile data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensitiveKeys {
    keys: Vec<String>,
}

impl SensitiveKeys {
    const SUFFIXES: [&'static str; 4] = ["token", "refresh", "user", "role"];

    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            keys: Self::SUFFIXES
                .iter()
                .map(|suffix| format!("{}_{}", prefix, suffix))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for SensitiveKeys {
    fn default() -> Self {
        Self::with_prefix("nexora")
    }
}
