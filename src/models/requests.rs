//! Request DTOs for the recipe API
//!
//! Defines the structure of incoming query strings.

use serde::Deserialize;

/// Query string for GET /api/search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    /// Meal name to search for
    #[serde(default)]
    pub name: Option<String>,
}

impl SearchQuery {
    /// Returns the trimmed name, or None if missing or blank.
    pub fn name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
