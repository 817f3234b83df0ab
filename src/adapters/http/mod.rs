//! HTTP adapter: Implementation of ScoringService and StatsSource.
//!
//! Talks JSON to the remote service:
//! - `POST <base>/predict` with an [`EncodedFeatureVector`]
//! - `GET <base>/insights` for the statistics snapshot
//!
//! One request per call. The client uses transport default timeouts; a cold
//! backend may take up to a minute to answer.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::AppConfig;
use crate::domain::{EncodedFeatureVector, ModelStatsSnapshot, PredictionResult};
use crate::ports::{
    PredictionError, ScoringService, StatsError, StatsSource, GENERIC_PREDICTION_FAILURE,
};

/// Error body of a non-success `/predict` response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Pull a human-readable `detail` string out of an error body.
///
/// Non-string details (e.g. validation error lists) and unreadable bodies fall
/// back to [`GENERIC_PREDICTION_FAILURE`].
fn failure_detail(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .and_then(|d| d.as_str().map(str::to_owned))
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| GENERIC_PREDICTION_FAILURE.to_string())
}

/// reqwest-backed client for the scoring and statistics endpoints.
#[derive(Debug, Clone)]
pub struct HttpScoringClient {
    client: reqwest::Client,
    predict_url: String,
    insights_url: String,
}

impl HttpScoringClient {
    /// Create a client for the service configured in `config`.
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, config: &AppConfig) -> Self {
        Self {
            client,
            predict_url: config.predict_url(),
            insights_url: config.insights_url(),
        }
    }

    #[must_use]
    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }
}

#[async_trait]
impl ScoringService for HttpScoringClient {
    async fn predict(
        &self,
        features: &EncodedFeatureVector,
    ) -> Result<PredictionResult, PredictionError> {
        let response = self
            .client
            .post(&self.predict_url)
            .json(features)
            .send()
            .await
            .map_err(|e| PredictionError::GatewayUnavailable(format!("POST failed: {e}")))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| PredictionError::GatewayUnavailable(format!("reading body failed: {e}")))?;

        if status != StatusCode::OK {
            tracing::debug!(status = status.as_u16(), "scoring service rejected request");
            return Err(PredictionError::PredictionFailed {
                detail: failure_detail(&body),
            });
        }

        serde_json::from_slice::<PredictionResult>(&body)
            .map_err(|e| PredictionError::GatewayUnavailable(format!("malformed response: {e}")))
    }
}

#[async_trait]
impl StatsSource for HttpScoringClient {
    async fn fetch_insights(&self) -> Result<ModelStatsSnapshot, StatsError> {
        let response = self
            .client
            .get(&self.insights_url)
            .send()
            .await
            .map_err(|e| StatsError::Unavailable(format!("GET failed: {e}")))?;

        response
            .error_for_status()
            .map_err(|e| StatsError::Unavailable(format!("bad status: {e}")))?
            .json::<ModelStatsSnapshot>()
            .await
            .map_err(|e| StatsError::Unavailable(format!("invalid json: {e}")))
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    //! In-process stand-in for the scoring service.

    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::{http::StatusCode, routing::get, routing::post, Router};

    use crate::config::AppConfig;

    /// A canned response: status code and raw body.
    #[derive(Clone)]
    pub struct Canned {
        pub status: u16,
        pub body: String,
    }

    impl Canned {
        pub fn json(status: u16, body: serde_json::Value) -> Self {
            Self {
                status,
                body: body.to_string(),
            }
        }

        pub fn raw(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
            }
        }
    }

    pub struct TestServer {
        pub addr: SocketAddr,
        pub hits: Arc<AtomicUsize>,
        pub last_body: Arc<std::sync::Mutex<Option<serde_json::Value>>>,
    }

    impl TestServer {
        pub fn config(&self) -> AppConfig {
            AppConfig::default()
                .with_api_base_url(&format!("http://{}", self.addr))
                .expect("Valid test URL")
        }

        pub fn hits(&self) -> usize {
            self.hits.load(Ordering::SeqCst)
        }
    }

    /// Serve `predict` on `POST /predict` and `insights` on `GET /insights`.
    pub async fn spawn(predict: Canned, insights: Canned) -> TestServer {
        let hits = Arc::new(AtomicUsize::new(0));
        let last_body = Arc::new(std::sync::Mutex::new(None));

        let predict_hits = hits.clone();
        let predict_body = last_body.clone();
        let app = Router::new()
            .route(
                "/predict",
                post(move |body: String| {
                    let canned = predict.clone();
                    let hits = predict_hits.clone();
                    let last = predict_body.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        if let Ok(mut slot) = last.lock() {
                            *slot = serde_json::from_str(&body).ok();
                        }
                        reply(&canned)
                    }
                }),
            )
            .route(
                "/insights",
                get(move || {
                    let canned = insights.clone();
                    async move { reply(&canned) }
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Should bind");
        let addr = listener.local_addr().expect("Should have address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        TestServer {
            addr,
            hits,
            last_body,
        }
    }

    fn reply(canned: &Canned) -> (StatusCode, [(&'static str, &'static str); 1], String) {
        (
            StatusCode::from_u16(canned.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            [("content-type", "application/json")],
            canned.body.clone(),
        )
    }

    /// An address nothing is listening on.
    pub async fn closed_addr() -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Should bind");
        let addr = listener.local_addr().expect("Should have address");
        drop(listener);
        addr
    }

    pub fn insights_body() -> serde_json::Value {
        serde_json::json!({
            "data_overview": {"total_rows": 70000, "cleaned_rows": 66795, "removed_rows": 3205},
            "best_models": [
                {"name": "Gradient Boosting", "f1_score": 0.733, "accuracy": 0.734}
            ],
            "active_model_details": {
                "name": "Gradient Boosting",
                "confusion_matrix": [[4928, 1592], [1965, 4874]],
                "roc_auc_score": 0.801,
                "metrics_analyzed": 11,
                "hyperparameters": {}
            }
        })
    }

    pub fn prediction_body() -> serde_json::Value {
        serde_json::json!({
            "risk": "High",
            "probability": 68.42,
            "general_info": "Cardiovascular disease (CVD) is a general term for conditions affecting the heart or blood vessels."
        })
    }
}

#[cfg(test)]
mod tests {
    use super::test_server::{self, Canned};
    use super::*;
    use crate::domain::{encode, RawFormInput, RiskLevel};

    fn sample_vector() -> EncodedFeatureVector {
        encode(&RawFormInput::sample())
    }

    #[tokio::test]
    async fn test_predict_success() {
        let server = test_server::spawn(
            Canned::json(200, test_server::prediction_body()),
            Canned::raw(404, ""),
        )
        .await;
        let client = HttpScoringClient::new(&server.config());

        let result = client.predict(&sample_vector()).await.expect("Should predict");
        assert_eq!(result.risk, RiskLevel::High);
        assert!((result.probability - 68.42).abs() < f64::EPSILON);
        assert_eq!(server.hits(), 1);

        let sent = server.last_body.lock().expect("lock").clone().expect("Should capture body");
        assert_eq!(sent["gender"], 2);
        assert_eq!(sent["ap_hi"], 130);
        assert_eq!(sent["cholesterol"], 2);
        assert_eq!(sent["active"], 1);
    }

    #[tokio::test]
    async fn test_predict_failure_surfaces_detail() {
        let server = test_server::spawn(
            Canned::json(422, serde_json::json!({"detail": "invalid age"})),
            Canned::raw(404, ""),
        )
        .await;
        let client = HttpScoringClient::new(&server.config());

        let err = client.predict(&sample_vector()).await.expect_err("Should fail");
        assert_eq!(
            err,
            PredictionError::PredictionFailed {
                detail: "invalid age".to_string()
            }
        );
        assert_eq!(err.user_message(), "invalid age");
    }

    #[tokio::test]
    async fn test_predict_failure_without_detail_is_generic() {
        let server = test_server::spawn(Canned::raw(500, "oops"), Canned::raw(404, "")).await;
        let client = HttpScoringClient::new(&server.config());

        let err = client.predict(&sample_vector()).await.expect_err("Should fail");
        assert_eq!(
            err,
            PredictionError::PredictionFailed {
                detail: GENERIC_PREDICTION_FAILURE.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_predict_malformed_success_is_unavailable() {
        let server = test_server::spawn(Canned::raw(200, "<html>"), Canned::raw(404, "")).await;
        let client = HttpScoringClient::new(&server.config());

        let err = client.predict(&sample_vector()).await.expect_err("Should fail");
        assert!(matches!(err, PredictionError::GatewayUnavailable(_)));
    }

    #[tokio::test]
    async fn test_predict_unreachable_is_unavailable() {
        let addr = test_server::closed_addr().await;
        let config = AppConfig::default()
            .with_api_base_url(&format!("http://{addr}"))
            .expect("Valid URL");
        let client = HttpScoringClient::new(&config);

        let err = client.predict(&sample_vector()).await.expect_err("Should fail");
        assert!(matches!(err, PredictionError::GatewayUnavailable(_)));
    }

    #[tokio::test]
    async fn test_fetch_insights() {
        let server = test_server::spawn(
            Canned::raw(404, ""),
            Canned::json(200, test_server::insights_body()),
        )
        .await;
        let client = HttpScoringClient::new(&server.config());

        let snapshot = client.fetch_insights().await.expect("Should fetch");
        assert_eq!(snapshot.active_model_details.confusion_matrix.total(), 13359);
        assert_eq!(snapshot.data_overview.total_rows, 70000);
    }

    #[tokio::test]
    async fn test_fetch_insights_failures_are_unavailable() {
        let server = test_server::spawn(Canned::raw(404, ""), Canned::raw(503, "")).await;
        let client = HttpScoringClient::new(&server.config());
        assert!(client.fetch_insights().await.is_err());

        let server = test_server::spawn(Canned::raw(404, ""), Canned::raw(200, "{\"x\":1}")).await;
        let client = HttpScoringClient::new(&server.config());
        assert!(matches!(
            client.fetch_insights().await,
            Err(StatsError::Unavailable(_))
        ));
    }

    #[test]
    fn test_failure_detail_parsing() {
        assert_eq!(failure_detail(br#"{"detail":"Model not loaded"}"#), "Model not loaded");
        assert_eq!(failure_detail(br#"{"detail":[{"loc":["body","age"]}]}"#), GENERIC_PREDICTION_FAILURE);
        assert_eq!(failure_detail(br#"{"error":"x"}"#), GENERIC_PREDICTION_FAILURE);
        assert_eq!(failure_detail(b""), GENERIC_PREDICTION_FAILURE);
    }
}
