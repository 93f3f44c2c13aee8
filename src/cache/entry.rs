//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry stamped at `now_ms` that lives for `ttl`.
    pub fn new(value: V, now_ms: u64, ttl: Duration) -> Self {
        Self {
            value,
            created_at: now_ms,
            expires_at: now_ms.saturating_add(ttl.as_millis() as u64),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// Boundary condition: the entry is expired once the current time reaches
    /// the expiration time, so a fully elapsed TTL never yields a hit.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("test_value", 1_000, Duration::from_secs(60));

        assert_eq!(entry.value, "test_value");
        assert_eq!(entry.created_at, 1_000);
        assert_eq!(entry.expires_at, 61_000);
        assert!(!entry.is_expired_at(1_000));
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new(42, 0, Duration::from_millis(500));

        assert!(!entry.is_expired_at(499));
        assert!(entry.is_expired_at(501));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new((), 10, Duration::from_millis(90));

        // Entry should be expired when current time >= expires_at
        assert!(entry.is_expired_at(100), "Entry should be expired at boundary");
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let entry = CacheEntry::new("v", u64::MAX - 5, Duration::from_secs(60));
        assert_eq!(entry.expires_at, u64::MAX);
    }
}
