//! Request and Response models for the recipe API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::SearchQuery;
pub use responses::{
    CategoriesResponse, HealthResponse, InvalidateResponse, KeysResponse, MealResponse,
    MealsResponse, SearchResponse, StatsResponse,
};
