//! API Module
//!
//! HTTP handlers and routing for the recipe caching proxy.
//!
//! # Endpoints
//! - `GET /api/search`, `/api/categories`, `/api/category/:name`,
//!   `/api/meal/:id`, `/api/random` - Cached recipe lookups
//! - `GET /api/cache/stats`, `GET /api/cache/keys` - Cache inspection
//! - `DELETE /api/cache/keys/:key`, `DELETE /api/cache` - Invalidation
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
