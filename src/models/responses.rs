//! Response DTOs for the recipe API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;

/// Returns `payload[field]` when it is an array, otherwise an empty array.
///
/// The recipe API reports "no results" as `null`.
pub fn list_field(payload: &Value, field: &str) -> Vec<Value> {
    payload
        .get(field)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Returns the first element of `payload[field]`, or `null`.
pub fn first_of(payload: &Value, field: &str) -> Value {
    payload
        .get(field)
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .cloned()
        .unwrap_or(Value::Null)
}

/// Response body for GET /api/search
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub results: Vec<Value>,
}

impl SearchResponse {
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            results: list_field(payload, "meals"),
        }
    }
}

/// Response body for GET /api/categories
#[derive(Debug, Clone, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<Value>,
}

impl CategoriesResponse {
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            categories: list_field(payload, "categories"),
        }
    }
}

/// Response body for GET /api/category/:name
#[derive(Debug, Clone, Serialize)]
pub struct MealsResponse {
    pub meals: Vec<Value>,
}

impl MealsResponse {
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            meals: list_field(payload, "meals"),
        }
    }
}

/// Response body for GET /api/meal/:id and GET /api/random
#[derive(Debug, Clone, Serialize)]
pub struct MealResponse {
    /// The meal, or null when upstream has none
    pub meal: Value,
}

impl MealResponse {
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            meal: first_of(payload, "meals"),
        }
    }
}

/// Response body for GET /api/cache/stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    pub capacity: usize,
    pub in_flight: usize,
}

impl StatsResponse {
    pub fn new(stats: CacheStats, capacity: usize, in_flight: usize) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            stats,
            capacity,
            in_flight,
        }
    }
}

/// Response body for GET /api/cache/keys
#[derive(Debug, Clone, Serialize)]
pub struct KeysResponse {
    /// Least recently used first
    pub keys: Vec<String>,
}

/// Response body for DELETE /api/cache/:key and DELETE /api/cache
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub message: String,
    pub removed: bool,
}

impl InvalidateResponse {
    pub fn key(key: &str, removed: bool) -> Self {
        let message = if removed {
            format!("Key '{}' removed", key)
        } else {
            format!("Key '{}' was not cached", key)
        };
        Self { message, removed }
    }

    pub fn cleared(count: usize) -> Self {
        Self {
            message: format!("Cleared {} entries", count),
            removed: count > 0,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
