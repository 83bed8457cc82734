use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Path relative to the upload directory, e.g. `services/<uuid>.png`.
    pub icon_image: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Sanitized name/description pair, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceInput {
    pub name: String,
    pub description: Option<String>,
}

impl ServiceInput {
    /// Sanitizes both fields and rejects an empty name.
    pub fn new(name: &str, description: &str) -> Option<Self> {
        let name = sanitize_input(name);
        if name.is_empty() {
            return None;
        }
        let description = sanitize_input(description);
        Some(Self {
            name,
            description: (!description.is_empty()).then_some(description),
        })
    }
}

/// Trims the value and strips control characters. Escaping is left to the templates.
pub fn sanitize_input(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}
