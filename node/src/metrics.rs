//! # Prometheus Metrics
//!
//! Operational metrics for the HTTP relay, scraped at `/metrics`.
//!
//! All metrics are registered in a dedicated [`prometheus::Registry`] so they
//! do not collide with any default global registry consumers.

use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};
use std::sync::Arc;

use crate::api::AppState;

/// Holds all Prometheus metric handles for the relay.
#[derive(Clone)]
pub struct RelayMetrics {
    registry: Registry,
    /// Submission requests received, well-formed or not.
    pub submissions_received_total: IntCounter,
    /// Submissions the relay node accepted.
    pub submissions_accepted_total: IntCounter,
    /// Requests answered with `Left` or HTTP 400.
    pub submissions_failed_total: IntCounter,
    /// Wall time of the forwarding handshake, in seconds.
    pub submission_latency_seconds: Histogram,
}

impl RelayMetrics {
    /// Creates and registers all metrics. Call once at startup.
    pub fn new() -> Self {
        let registry = Registry::new_custom(Some("byron".into()), None)
            .expect("failed to create prometheus registry");

        let submissions_received_total = IntCounter::new(
            "submissions_received_total",
            "Total number of submission requests received by the relay",
        )
        .expect("metric creation");
        registry
            .register(Box::new(submissions_received_total.clone()))
            .expect("metric registration");

        let submissions_accepted_total = IntCounter::new(
            "submissions_accepted_total",
            "Total number of transactions accepted by the relay node",
        )
        .expect("metric creation");
        registry
            .register(Box::new(submissions_accepted_total.clone()))
            .expect("metric registration");

        let submissions_failed_total = IntCounter::new(
            "submissions_failed_total",
            "Total number of submission requests that did not succeed",
        )
        .expect("metric creation");
        registry
            .register(Box::new(submissions_failed_total.clone()))
            .expect("metric registration");

        let submission_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "submission_latency_seconds",
                "Time spent forwarding one transaction to the relay node, in seconds",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        )
        .expect("metric creation");
        registry
            .register(Box::new(submission_latency_seconds.clone()))
            .expect("metric registration");

        Self {
            registry,
            submissions_received_total,
            submissions_accepted_total,
            submissions_failed_total,
            submission_latency_seconds,
        }
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl Default for RelayMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared metrics handle passed to axum handlers.
pub type SharedMetrics = Arc<RelayMetrics>;

impl FromRef<AppState> for SharedMetrics {
    fn from_ref(state: &AppState) -> Self {
        state.metrics.clone()
    }
}

/// Axum handler that renders `/metrics` in Prometheus text format.
pub async fn metrics_handler(State(metrics): State<SharedMetrics>) -> impl IntoResponse {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_includes_prefixed_names() {
        let metrics = RelayMetrics::new();
        metrics.submissions_received_total.inc();
        metrics.submission_latency_seconds.observe(0.3);

        let text = metrics.encode().unwrap();
        assert!(text.contains("byron_submissions_received_total 1"));
        assert!(text.contains("byron_submissions_accepted_total 0"));
        assert!(text.contains("byron_submission_latency_seconds_count 1"));
    }

    #[test]
    fn registries_are_independent() {
        let a = RelayMetrics::new();
        let b = RelayMetrics::new();
        a.submissions_failed_total.inc();
        assert_eq!(a.submissions_failed_total.get(), 1);
        assert_eq!(b.submissions_failed_total.get(), 0);
    }
}
