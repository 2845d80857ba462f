//! Request Monitoring
//!
//! Middleware that times every request and hands a [`RequestMetrics`] sample
//! to a [`MetricsCollector`] once the response is known.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::client::route_pattern;

/// Latency buckets in seconds
const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

#[derive(Debug, Error)]
pub enum MonitoringError {
    #[error("Metrics registry error: {0}")]
    Registry(#[from] prometheus::Error),

    #[error("Metrics output is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// One completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMetrics {
    pub method: String,
    /// Route pattern, or raw path when nothing matched
    pub route: String,
    pub status: u16,
    pub latency: Duration,
}

/// Destination for request samples. Must not fail the request.
pub trait MetricsCollector: Send + Sync {
    fn record(&self, metrics: &RequestMetrics);
}

/// Prometheus counters and histograms on an owned registry
pub struct PrometheusCollector {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration: HistogramVec,
}

impl PrometheusCollector {
    pub fn new() -> Result<Self, MonitoringError> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("blottr_http_requests_total", "Total number of HTTP requests"),
            &["method", "route", "status"],
        )?;
        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                "blottr_http_request_duration_seconds",
                "HTTP request latency in seconds",
            )
            .buckets(LATENCY_BUCKETS.to_vec()),
            &["method", "route"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            request_duration,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Text exposition format for `GET /metrics`
    pub fn render(&self) -> Result<String, MonitoringError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

impl MetricsCollector for PrometheusCollector {
    fn record(&self, metrics: &RequestMetrics) {
        let status = metrics.status.to_string();
        self.requests_total
            .with_label_values(&[metrics.method.as_str(), metrics.route.as_str(), status.as_str()])
            .inc();
        self.request_duration
            .with_label_values(&[metrics.method.as_str(), metrics.route.as_str()])
            .observe(metrics.latency.as_secs_f64());
    }
}

/// Logs one event per request
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingCollector;

impl MetricsCollector for TracingCollector {
    fn record(&self, metrics: &RequestMetrics) {
        let latency_ms = metrics.latency.as_secs_f64() * 1000.0;
        if metrics.status >= 500 {
            tracing::warn!(
                method = %metrics.method,
                route = %metrics.route,
                status = metrics.status,
                latency_ms,
                "Request failed"
            );
        } else {
            tracing::info!(
                method = %metrics.method,
                route = %metrics.route,
                status = metrics.status,
                latency_ms,
                "Request completed"
            );
        }
    }
}

/// Forwards every sample to several collectors
#[derive(Clone, Default)]
pub struct FanoutCollector {
    collectors: Vec<Arc<dyn MetricsCollector>>,
}

impl FanoutCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, collector: Arc<dyn MetricsCollector>) -> Self {
        self.collectors.push(collector);
        self
    }
}

impl MetricsCollector for FanoutCollector {
    fn record(&self, metrics: &RequestMetrics) {
        for collector in &self.collectors {
            collector.record(metrics);
        }
    }
}

/// Middleware state
#[derive(Clone)]
pub struct MonitoringState {
    pub collector: Arc<dyn MetricsCollector>,
}

impl MonitoringState {
    pub fn new(collector: Arc<dyn MetricsCollector>) -> Self {
        Self { collector }
    }
}

/// Times the wrapped service and records the outcome
pub async fn track_metrics(
    State(state): State<MonitoringState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let method = req.method().to_string();
    let route = route_pattern(&req);
    let started = Instant::now();

    let response = next.run(req).await;

    state.collector.record(&RequestMetrics {
        method,
        route,
        status: response.status().as_u16(),
        latency: started.elapsed(),
    });

    response
}
