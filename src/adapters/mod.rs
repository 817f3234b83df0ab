//! Adapters layer: Concrete implementations of ports.
//!
//! - `http`: reqwest client for the scoring and statistics endpoints
//! - `proxy`: axum relay exposing `/api/predict`
//! - `sanitize`: clinical value filtering for logs

pub mod http;
pub mod proxy;
pub mod sanitize;

pub use http::HttpScoringClient;
