//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::CacheError;

/// Default recipe API base (public test key).
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

// == Cache Config ==
/// Options recognized when constructing a cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of live entries
    pub max_entries: usize,
    /// TTL applied when `set` is called without an override
    pub default_ttl: Duration,
}

impl CacheConfig {
    pub fn new(max_entries: usize, default_ttl: Duration) -> Self {
        Self {
            max_entries,
            default_ttl,
        }
    }

    // == Validate ==
    /// Rejects degenerate settings at construction time.
    pub fn validate(&self) -> Result<(), CacheError> {
        if self.max_entries == 0 {
            return Err(CacheError::InvalidConfig(
                "max_entries must be greater than zero".to_string(),
            ));
        }
        if self.default_ttl.is_zero() {
            return Err(CacheError::InvalidConfig(
                "default ttl must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 500,
            default_ttl: Duration::from_millis(300_000),
        }
    }
}

// == Server Config ==
/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared response cache settings
    pub cache: CacheConfig,
    /// HTTP server port
    pub server_port: u16,
    /// Background purge interval in seconds
    pub cleanup_interval: u64,
    /// Base URL of the upstream recipe API
    pub upstream_base_url: String,
    /// Per-request timeout for upstream calls
    pub upstream_timeout: Duration,
    /// TTL override for the random meal route
    pub random_ttl: Duration,
    /// Collapse concurrent misses for the same key into one upstream call
    pub coalesce_fetches: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `CACHE_TTL_MS` - Default TTL in milliseconds (default: 600000)
    /// - `PORT` - HTTP server port (default: 5050)
    /// - `CLEANUP_INTERVAL` - Purge frequency in seconds (default: 60)
    /// - `UPSTREAM_BASE_URL` - Recipe API base URL
    /// - `UPSTREAM_TIMEOUT_MS` - Upstream request timeout (default: 10000)
    /// - `RANDOM_TTL_MS` - TTL for the random meal route (default: 60000)
    /// - `COALESCE_FETCHES` - Stampede protection on/off (default: true)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache: CacheConfig {
                max_entries: env_or("CACHE_MAX_ENTRIES", defaults.cache.max_entries),
                default_ttl: Duration::from_millis(env_or(
                    "CACHE_TTL_MS",
                    defaults.cache.default_ttl.as_millis() as u64,
                )),
            },
            server_port: env_or("PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            upstream_base_url: env::var("UPSTREAM_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.upstream_base_url),
            upstream_timeout: Duration::from_millis(env_or(
                "UPSTREAM_TIMEOUT_MS",
                defaults.upstream_timeout.as_millis() as u64,
            )),
            random_ttl: Duration::from_millis(env_or(
                "RANDOM_TTL_MS",
                defaults.random_ttl.as_millis() as u64,
            )),
            coalesce_fetches: env_or("COALESCE_FETCHES", defaults.coalesce_fetches),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheConfig::new(1000, Duration::from_secs(600)),
            server_port: 5050,
            cleanup_interval: 60,
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            upstream_timeout: Duration::from_secs(10),
            random_ttl: Duration::from_secs(60),
            coalesce_fetches: true,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.max_entries, 500);
        assert_eq!(config.default_ttl, Duration::from_millis(300_000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cache_config_rejects_zero_capacity() {
        let config = CacheConfig::new(0, Duration::from_secs(1));
        assert!(matches!(
            config.validate(),
            Err(CacheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_cache_config_rejects_zero_ttl() {
        let config = CacheConfig::new(10, Duration::ZERO);
        assert!(matches!(
            config.validate(),
            Err(CacheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache.max_entries, 1000);
        assert_eq!(config.cache.default_ttl, Duration::from_secs(600));
        assert_eq!(config.server_port, 5050);
        assert_eq!(config.cleanup_interval, 60);
        assert_eq!(config.upstream_base_url, DEFAULT_UPSTREAM_BASE_URL);
        assert_eq!(config.random_ttl, Duration::from_secs(60));
        assert!(config.coalesce_fetches);
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        env::set_var("RECIPE_CACHE_TEST_GARBAGE", "not-a-number");
        assert_eq!(env_or("RECIPE_CACHE_TEST_GARBAGE", 7u64), 7);
        env::remove_var("RECIPE_CACHE_TEST_GARBAGE");
    }

    #[test]
    fn test_env_or_parses_value() {
        env::set_var("RECIPE_CACHE_TEST_VALUE", " 42 ");
        assert_eq!(env_or("RECIPE_CACHE_TEST_VALUE", 7u64), 42);
        env::remove_var("RECIPE_CACHE_TEST_VALUE");
    }
}
