//! API Routes
//!
//! Configures the Axum router with all recipe proxy endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    categories_handler, category_handler, clear_handler, health_handler, invalidate_handler,
    keys_handler, meal_handler, random_handler, search_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/search?name=` - Search meals by name
/// - `GET /api/categories` - List categories
/// - `GET /api/category/:name` - Meals in a category
/// - `GET /api/meal/:id` - Meal details
/// - `GET /api/random` - Random meal (short TTL)
/// - `GET /api/cache/stats` - Cache statistics
/// - `GET /api/cache/keys` - Cached keys, least recently used first
/// - `DELETE /api/cache/keys/:key` - Invalidate one key
/// - `DELETE /api/cache` - Clear the cache
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (the browser client is served separately)
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/search", get(search_handler))
        .route("/api/categories", get(categories_handler))
        .route("/api/category/:name", get(category_handler))
        .route("/api/meal/:id", get(meal_handler))
        .route("/api/random", get(random_handler))
        .route("/api/cache", delete(clear_handler))
        .route("/api/cache/stats", get(stats_handler))
        .route("/api/cache/keys", get(keys_handler))
        .route("/api/cache/keys/:key", delete(invalidate_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SharedCache;
    use crate::config::CacheConfig;
    use crate::fetch::UpstreamClient;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::time::Duration;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let cache = SharedCache::new(&CacheConfig::default()).unwrap();
        let upstream = UpstreamClient::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        create_router(AppState::new(cache, upstream, Duration::from_secs(60), true))
    }

    async fn status_of(app: Router, method: &str, uri: &str) -> StatusCode {
        app.oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        assert_eq!(status_of(create_test_app(), "GET", "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cache_admin_endpoints() {
        let app = create_test_app();
        assert_eq!(status_of(app.clone(), "GET", "/api/cache/stats").await, StatusCode::OK);
        assert_eq!(status_of(app.clone(), "GET", "/api/cache/keys").await, StatusCode::OK);
        assert_eq!(
            status_of(app.clone(), "DELETE", "/api/cache/keys/meal:1").await,
            StatusCode::OK
        );
        assert_eq!(status_of(app, "DELETE", "/api/cache").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_search_without_name_is_bad_request() {
        assert_eq!(
            status_of(create_test_app(), "GET", "/api/search").await,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_bad_gateway() {
        assert_eq!(
            status_of(create_test_app(), "GET", "/api/categories").await,
            StatusCode::BAD_GATEWAY
        );
    }
}
