//! # HTTP Submission Relay
//!
//! Builds the axum router that lets HTTP clients push signed transactions
//! to a relay node without speaking the legacy wire protocol themselves.
//! All endpoints share application state through axum's `State` extractor.
//!
//! ## Endpoints
//!
//! | Method | Path               | Description                              |
//! |--------|--------------------|------------------------------------------|
//! | GET    | `/health`          | Liveness probe                           |
//! | GET    | `/metrics`         | Prometheus text exposition               |
//! | POST   | `/api/txs/submit`  | Forward `{txHash, txBody}` to the node   |
//!
//! ## Submission responses
//!
//! A body that is not JSON at all gets HTTP 400. Everything else is
//! answered with HTTP 200 and an `Either`-style envelope:
//!
//! ```json
//! {"Right": {"txHash": "<txHash as received>"}}
//! {"Left": "<error message>"}
//! ```
//!
//! Every request is its own submission on its own TCP connection; nothing
//! is shared between concurrent requests except the metrics.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use byron_protocol::config::RELAY_SUBMIT_PATH;
use byron_protocol::submission::{self, SubmitConfig, SubmitError};
use byron_protocol::transaction::TxId;

use crate::metrics::{metrics_handler, SharedMetrics};

// ---------------------------------------------------------------------------
// Submitter
// ---------------------------------------------------------------------------

/// Something that can deliver a serialized transaction to the network.
#[async_trait]
pub trait TxSubmitter: Send + Sync {
    async fn submit(&self, tx_id: &TxId, signed_tx: &[u8]) -> Result<(), SubmitError>;
}

/// Forwards each submission to one relay node over a fresh connection.
#[derive(Debug, Clone)]
pub struct NodeSubmitter {
    node_addr: String,
    config: SubmitConfig,
}

impl NodeSubmitter {
    pub fn new(node_addr: impl Into<String>, config: SubmitConfig) -> Self {
        Self {
            node_addr: node_addr.into(),
            config,
        }
    }
}

#[async_trait]
impl TxSubmitter for NodeSubmitter {
    async fn submit(&self, tx_id: &TxId, signed_tx: &[u8]) -> Result<(), SubmitError> {
        submission::submit_raw(&self.node_addr, tx_id, signed_tx, &self.config).await
    }
}

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub submitter: Arc<dyn TxSubmitter>,
    pub metrics: SharedMetrics,
}

// ---------------------------------------------------------------------------
// Router Construction
// ---------------------------------------------------------------------------

/// Builds the relay [`Router`] with CORS and request tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route(RELAY_SUBMIT_PATH, post(submit_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / Response Types
// ---------------------------------------------------------------------------

/// Body of a submission request. Missing fields read as empty.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(rename = "txHash", default)]
    pub tx_hash: String,
    #[serde(rename = "txBody", default)]
    pub tx_body: String,
}

#[derive(Debug, Serialize)]
pub struct Accepted {
    #[serde(rename = "txHash")]
    pub tx_hash: String,
}

/// Serializes as `{"Left": ...}` or `{"Right": ...}`.
#[derive(Debug, Serialize)]
pub enum RelayResponse {
    Left(String),
    Right(Accepted),
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /health`
async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// `POST /api/txs/submit`
///
/// Takes the raw body rather than the `Json` extractor so that every
/// unparseable body is a plain 400, whatever its content type.
async fn submit_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let request_id = Uuid::new_v4();
    state.metrics.submissions_received_total.inc();

    let request: SubmitRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            state.metrics.submissions_failed_total.inc();
            warn!(%request_id, error = %e, "undecodable submission body");
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    let timer = state.metrics.submission_latency_seconds.start_timer();
    let outcome = relay(&state, &request).await;
    timer.observe_duration();

    match outcome {
        Ok(()) => {
            state.metrics.submissions_accepted_total.inc();
            info!(%request_id, tx_hash = %request.tx_hash, "transaction relayed");
            Json(RelayResponse::Right(Accepted {
                tx_hash: request.tx_hash,
            }))
            .into_response()
        }
        Err(e) => {
            state.metrics.submissions_failed_total.inc();
            warn!(%request_id, tx_hash = %request.tx_hash, error = %e, "submission failed");
            Json(RelayResponse::Left(e.to_string())).into_response()
        }
    }
}

async fn relay(state: &AppState, request: &SubmitRequest) -> Result<(), SubmitError> {
    if request.tx_hash.is_empty() || request.tx_body.is_empty() {
        return Err(SubmitError::InvalidRequest("Bad request body".to_string()));
    }
    let tx_id: TxId = request
        .tx_hash
        .parse()
        .map_err(|e| SubmitError::InvalidRequest(format!("txHash: {e}")))?;
    let signed_tx = hex::decode(&request.tx_body)
        .map_err(|e| SubmitError::InvalidRequest(format!("txBody is not valid hex: {e}")))?;

    state.submitter.submit(&tx_id, &signed_tx).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::RelayMetrics;
    use axum::body::Body;
    use axum::http::Request;
    use byron_protocol::submission::REJECTED_BY_NETWORK;
    use http_body_util::BodyExt;
    use std::sync::Mutex;
    use std::time::Duration;
    use tower::ServiceExt;

    const TX_HASH: &str = "0f3c1a6b2e4d5c7a8b9e0d1f2a3b4c5d6e7f8091a2b3c4d5e6f708192a3b4c5d";

    /// Records what it was asked to submit and answers with a fixed outcome.
    struct StubSubmitter {
        accept: bool,
        calls: Mutex<Vec<(TxId, Vec<u8>)>>,
    }

    impl StubSubmitter {
        fn new(accept: bool) -> Arc<Self> {
            Arc::new(Self {
                accept,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(TxId, Vec<u8>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TxSubmitter for StubSubmitter {
        async fn submit(&self, tx_id: &TxId, signed_tx: &[u8]) -> Result<(), SubmitError> {
            self.calls.lock().unwrap().push((*tx_id, signed_tx.to_vec()));
            if self.accept {
                Ok(())
            } else {
                Err(SubmitError::PeerRejected(REJECTED_BY_NETWORK.to_string()))
            }
        }
    }

    fn test_app_state(submitter: Arc<dyn TxSubmitter>) -> AppState {
        AppState {
            submitter,
            metrics: Arc::new(RelayMetrics::new()),
        }
    }

    /// Sends a GET request and returns the (status, body_bytes).
    async fn get(router: &Router, path: &str) -> (StatusCode, Vec<u8>) {
        let req = Request::builder().uri(path).body(Body::empty()).unwrap();
        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let body = resp
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec();
        (status, body)
    }

    /// Sends a POST request with a raw body and returns (status, body_bytes).
    async fn post_raw(router: &Router, path: &str, body: Vec<u8>) -> (StatusCode, Vec<u8>) {
        let req = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let body = resp
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec();
        (status, body)
    }

    async fn post_json(
        router: &Router,
        path: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let (status, bytes) = post_raw(router, path, serde_json::to_vec(&body).unwrap()).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let router = create_router(test_app_state(StubSubmitter::new(true)));
        let (status, body) = get(&router, "/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn accepted_submission_echoes_tx_hash() {
        let stub = StubSubmitter::new(true);
        let router = create_router(test_app_state(stub.clone()));

        let (status, json) = post_json(
            &router,
            RELAY_SUBMIT_PATH,
            json!({ "txHash": TX_HASH, "txBody": "82a0a1" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "Right": { "txHash": TX_HASH } }));

        let calls = stub.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.to_hex(), TX_HASH);
        assert_eq!(calls[0].1, vec![0x82, 0xa0, 0xa1]);
    }

    #[tokio::test]
    async fn network_rejection_is_left() {
        let router = create_router(test_app_state(StubSubmitter::new(false)));
        let (status, json) = post_json(
            &router,
            RELAY_SUBMIT_PATH,
            json!({ "txHash": TX_HASH, "txBody": "82" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "Left": "Transaction rejected by network" }));
    }

    #[tokio::test]
    async fn empty_fields_are_a_bad_request_body() {
        let stub = StubSubmitter::new(true);
        let router = create_router(test_app_state(stub.clone()));

        for body in [
            json!({ "txHash": "", "txBody": "82" }),
            json!({ "txHash": TX_HASH, "txBody": "" }),
            json!({}),
        ] {
            let (status, json) = post_json(&router, RELAY_SUBMIT_PATH, body).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json, json!({ "Left": "Bad request body" }));
        }
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn malformed_fields_are_left_with_reason() {
        let stub = StubSubmitter::new(true);
        let router = create_router(test_app_state(stub.clone()));

        let (_, json) = post_json(
            &router,
            RELAY_SUBMIT_PATH,
            json!({ "txHash": "abcd", "txBody": "82" }),
        )
        .await;
        assert!(json["Left"].as_str().unwrap().starts_with("txHash"));

        let (_, json) = post_json(
            &router,
            RELAY_SUBMIT_PATH,
            json!({ "txHash": TX_HASH, "txBody": "zz" }),
        )
        .await;
        assert!(json["Left"]
            .as_str()
            .unwrap()
            .starts_with("txBody is not valid hex"));

        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn undecodable_json_is_400() {
        let router = create_router(test_app_state(StubSubmitter::new(true)));
        let (status, _) = post_raw(&router, RELAY_SUBMIT_PATH, b"{not json".to_vec()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn metrics_count_outcomes() {
        let state = test_app_state(StubSubmitter::new(true));
        let metrics = state.metrics.clone();
        let router = create_router(state);

        post_json(
            &router,
            RELAY_SUBMIT_PATH,
            json!({ "txHash": TX_HASH, "txBody": "82" }),
        )
        .await;
        post_raw(&router, RELAY_SUBMIT_PATH, b"[".to_vec()).await;

        assert_eq!(metrics.submissions_received_total.get(), 2);
        assert_eq!(metrics.submissions_accepted_total.get(), 1);
        assert_eq!(metrics.submissions_failed_total.get(), 1);

        let (status, body) = get(&router, "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains("byron_submissions_accepted_total 1"));
    }

    #[tokio::test]
    async fn unreachable_node_is_left_with_dial_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let submitter = NodeSubmitter::new(
            addr.clone(),
            SubmitConfig {
                dial_timeout: Duration::from_secs(2),
                phase_timeout: Duration::from_secs(2),
            },
        );
        let router = create_router(test_app_state(Arc::new(submitter)));
        let (status, json) = post_json(
            &router,
            RELAY_SUBMIT_PATH,
            json!({ "txHash": TX_HASH, "txBody": "82" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let message = json["Left"].as_str().unwrap();
        assert!(message.starts_with(&format!("failed to connect to {addr}")));
    }
}
