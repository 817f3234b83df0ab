//! Same-origin relay for prediction requests.
//!
//! `POST /api/predict` forwards the JSON body unchanged to the configured
//! scoring service and relays the upstream status and JSON body back. If the
//! upstream cannot be reached, or answers with something that is not JSON, the
//! caller gets `500 {"error": "Backend connection failed"}`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};

use crate::config::AppConfig;

/// Body returned when the upstream call fails.
pub const BACKEND_FAILURE: &str = "Backend connection failed";

#[derive(Clone)]
struct ProxyState {
    client: reqwest::Client,
    predict_url: Arc<str>,
}

/// Build the proxy router for `config`.
pub fn router(config: &AppConfig) -> Router {
    let state = ProxyState {
        client: reqwest::Client::new(),
        predict_url: Arc::from(config.predict_url()),
    };

    Router::new()
        .route("/api/predict", post(relay_predict))
        .with_state(state)
}

/// Bind `addr` and serve the proxy until the task is cancelled.
///
/// # Errors
/// Returns an IO error if the address cannot be bound or the server fails.
pub async fn serve(addr: SocketAddr, config: &AppConfig) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        upstream = %config.api_base_url(),
        "risk proxy listening"
    );
    axum::serve(listener, router(config)).await
}

fn backend_failure() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": BACKEND_FAILURE })),
    )
}

async fn relay_predict(
    State(state): State<ProxyState>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let response = match state
        .client
        .post(state.predict_url.as_ref())
        .json(&payload)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "upstream predict request failed");
            return backend_failure();
        }
    };

    let status = StatusCode::from_u16(response.status().as_u16())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    match response.json::<Value>().await {
        Ok(body) => {
            tracing::debug!(status = status.as_u16(), "relayed predict response");
            (status, Json(body))
        }
        Err(e) => {
            tracing::error!(status = status.as_u16(), error = %e, "upstream returned non-JSON body");
            backend_failure()
        }
    }
}
