//! # CardioRisk
//!
//! Cardiovascular risk request pipeline and model metrics engine.
//!
//! This crate provides:
//! - Encoding of raw form input into the scoring service contract
//! - A prediction gateway and a form controller with stale-response protection
//! - Display statistics derived from the model insights endpoint
//! - A same-origin proxy for `/api/predict`
//! - Terminal UI for entering patient data and browsing model insights
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types and pure functions (form input, encoding, metrics)
//! - `ports`: Trait definitions for the remote scoring and statistics service
//! - `adapters`: Concrete implementations (reqwest client, axum proxy, log sanitizer)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod logging;
pub mod ports;
pub mod tui;

pub use config::AppConfig;
pub use domain::{EncodedFeatureVector, PredictionResult, RawFormInput, RiskLevel};

/// Result type for CardioRisk operations
pub type Result<T> = std::result::Result<T, CardioRiskError>;

/// Main error type for CardioRisk
#[derive(Debug, thiserror::Error)]
pub enum CardioRiskError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid form input: {0}")]
    Encoding(#[from] domain::EncodingError),

    #[error("Prediction failed: {0}")]
    Prediction(#[from] ports::PredictionError),

    #[error(transparent)]
    Stats(#[from] ports::StatsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
