//! Recipe Cache - caching proxy for a recipe lookup API
//!
//! A bounded, TTL-expiring LRU cache shared across concurrent requests,
//! with fetch-through access to the upstream API.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheStore, SharedCache};
pub use config::{CacheConfig, Config};
pub use fetch::{FetchThrough, UpstreamClient};
pub use tasks::spawn_cleanup_task;
