//! Fetch Module
//!
//! Cache-aside access to the upstream recipe API.
//!
//! # Components
//! - `FetchThrough`: cache lookup, upstream call on miss, store on success
//! - `UpstreamClient`: HTTP/JSON client for the recipe API

mod through;
mod upstream;

pub use through::FetchThrough;
pub use upstream::UpstreamClient;
