//! API Handlers
//!
//! HTTP request handlers for the recipe proxy and cache administration.

use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::cache::SharedCache;
use crate::config::Config;
use crate::error::{ApiError, FetchError, Result};
use crate::fetch::{FetchThrough, UpstreamClient};
use crate::models::{
    CategoriesResponse, HealthResponse, InvalidateResponse, KeysResponse, MealResponse,
    MealsResponse, SearchQuery, SearchResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// The cache is an explicitly constructed instance; tests build their own.
#[derive(Clone)]
pub struct AppState {
    /// Shared response cache
    pub cache: SharedCache<Value>,
    /// Cache-aside wrapper over `cache`
    pub fetcher: FetchThrough<Value>,
    /// Recipe API client
    pub upstream: UpstreamClient,
    /// TTL override for the random meal route
    pub random_ttl: Duration,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(
        cache: SharedCache<Value>,
        upstream: UpstreamClient,
        random_ttl: Duration,
        coalesce_fetches: bool,
    ) -> Self {
        let fetcher = if coalesce_fetches {
            FetchThrough::new(cache.clone())
        } else {
            FetchThrough::without_coalescing(cache.clone())
        };

        Self {
            cache,
            fetcher,
            upstream,
            random_ttl,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Fails fast on an invalid cache configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let cache = SharedCache::new(&config.cache)?;
        let upstream = UpstreamClient::new(&config.upstream_base_url, config.upstream_timeout)?;
        Ok(Self::new(
            cache,
            upstream,
            config.random_ttl,
            config.coalesce_fetches,
        ))
    }

    async fn fetch(
        &self,
        key: &str,
        ttl: Option<Duration>,
        path: &str,
        query: &[(&str, &str)],
    ) -> std::result::Result<Value, FetchError> {
        self.fetcher
            .get_or_fetch(key, ttl, || self.upstream.get_json(path, query))
            .await
    }
}

/// Handler for GET /api/search?name=
pub async fn search_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>> {
    let name = query
        .name()
        .ok_or_else(|| ApiError::BadRequest("Missing query parameter: name".to_string()))?;

    let key = format!("search:name:{}", name.to_lowercase());
    let payload = state
        .fetch(&key, None, "search.php", &[("s", name)])
        .await
        .map_err(ApiError::upstream("Failed to fetch from upstream"))?;

    Ok(Json(SearchResponse::from_payload(&payload)))
}

/// Handler for GET /api/categories
pub async fn categories_handler(
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>> {
    let payload = state
        .fetch("categories:list", None, "categories.php", &[])
        .await
        .map_err(ApiError::upstream("Failed to fetch categories"))?;

    Ok(Json(CategoriesResponse::from_payload(&payload)))
}

/// Handler for GET /api/category/:name
pub async fn category_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<MealsResponse>> {
    let key = format!("category:{}", name.to_lowercase());
    let payload = state
        .fetch(&key, None, "filter.php", &[("c", name.as_str())])
        .await
        .map_err(ApiError::upstream("Failed to fetch category"))?;

    Ok(Json(MealsResponse::from_payload(&payload)))
}

/// Handler for GET /api/meal/:id
pub async fn meal_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MealResponse>> {
    let key = format!("meal:{}", id);
    let payload = state
        .fetch(&key, None, "lookup.php", &[("i", id.as_str())])
        .await
        .map_err(ApiError::upstream("Failed to fetch meal"))?;

    Ok(Json(MealResponse::from_payload(&payload)))
}

/// Handler for GET /api/random
///
/// Cached under a single key with a short TTL so the meal rotates.
pub async fn random_handler(State(state): State<AppState>) -> Result<Json<MealResponse>> {
    let payload = state
        .fetch("random:meal", Some(state.random_ttl), "random.php", &[])
        .await
        .map_err(ApiError::upstream("Failed to fetch random meal"))?;

    Ok(Json(MealResponse::from_payload(&payload)))
}

/// Handler for GET /api/cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats().await;
    let capacity = state.cache.capacity().await;
    Json(StatsResponse::new(stats, capacity, state.fetcher.in_flight()))
}

/// Handler for GET /api/cache/keys
pub async fn keys_handler(State(state): State<AppState>) -> Json<KeysResponse> {
    Json(KeysResponse {
        keys: state.cache.keys().await,
    })
}

/// Handler for DELETE /api/cache/keys/:key
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<InvalidateResponse> {
    let removed = state.cache.delete(&key).await;
    Json(InvalidateResponse::key(&key, removed))
}

/// Handler for DELETE /api/cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<InvalidateResponse> {
    let count = state.cache.len().await;
    state.cache.clear().await;
    tracing::info!("Cache cleared ({} entries)", count);
    Json(InvalidateResponse::cleared(count))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;

    fn test_state() -> AppState {
        let cache = SharedCache::new(&CacheConfig::new(100, Duration::from_secs(300))).unwrap();
        // Nothing listens here; tests below only hit the cache
        let upstream = UpstreamClient::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        AppState::new(cache, upstream, Duration::from_secs(60), true)
    }

    #[tokio::test]
    async fn test_search_requires_name() {
        let state = test_state();

        let result = search_handler(State(state), Query(SearchQuery::default())).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_search_served_from_cache() {
        let state = test_state();
        state
            .cache
            .set(
                "search:name:arrabiata",
                serde_json::json!({"meals": [{"strMeal": "Spicy Arrabiata Penne"}]}),
                None,
            )
            .await;

        let query = SearchQuery {
            name: Some("Arrabiata".to_string()),
        };
        let response = search_handler(State(state), Query(query)).await.unwrap();
        assert_eq!(response.results.len(), 1);
    }

    #[tokio::test]
    async fn test_meal_upstream_failure_is_bad_gateway() {
        let state = test_state();

        let result = meal_handler(State(state.clone()), Path("52772".to_string())).await;
        assert!(matches!(result, Err(ApiError::Upstream { .. })));
        assert!(state.cache.keys().await.is_empty());
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let state = test_state();
        state.cache.set("meal:1", Value::Null, None).await;
        state.cache.set("meal:2", Value::Null, None).await;

        let response = invalidate_handler(State(state.clone()), Path("meal:1".to_string())).await;
        assert!(response.removed);

        let response = invalidate_handler(State(state.clone()), Path("meal:1".to_string())).await;
        assert!(!response.removed);

        let response = clear_handler(State(state.clone())).await;
        assert_eq!(response.message, "Cleared 1 entries");
        assert!(state.cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_stats_and_keys_handlers() {
        let state = test_state();
        state.cache.set("a", Value::Null, None).await;
        state.cache.set("b", Value::Null, None).await;

        let keys = keys_handler(State(state.clone())).await;
        assert_eq!(keys.keys, vec!["a".to_string(), "b".to_string()]);

        let stats = stats_handler(State(state)).await;
        assert_eq!(stats.stats.total_entries, 2);
        assert_eq!(stats.capacity, 100);
        assert_eq!(stats.in_flight, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
