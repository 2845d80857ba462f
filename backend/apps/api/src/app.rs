//! Router Composition
//!
//! Mounts the auth and contact routers, puts each route group behind its own
//! rate limit, and wraps everything in request monitoring.

use auth::{AuthConfig, UserRepository, auth_router};
use axum::extract::State;
use axum::http::{Method, header};
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use contact::{ContactAppState, ContactRequestRepository, inbox_router, submission_router};
use kernel::AppError;
use platform::monitoring::{
    FanoutCollector, MonitoringState, PrometheusCollector, TracingCollector, track_metrics,
};
use platform::rate_limit::middleware::{X_RATELIMIT_LIMIT, X_RATELIMIT_REMAINING, X_RATELIMIT_RESET};
use platform::rate_limit::{MemoryRateLimitStore, RateLimitConfig, RateLimitState, rate_limit};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer, ExposeHeaders};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;

/// Process-wide services shared by every route group
pub struct Services<U, C> {
    pub users: Arc<U>,
    pub contacts: Arc<C>,
    /// One limiter store; keys already include the route
    pub limiter: Arc<MemoryRateLimitStore>,
    pub metrics: Arc<PrometheusCollector>,
}

pub fn build_router<U, C>(services: Services<U, C>, config: &AppConfig) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    C: ContactRequestRepository + Send + Sync + 'static,
{
    let trusted_proxies = &config.trusted_proxies;
    let limit = |config: &RateLimitConfig| {
        from_fn_with_state(
            RateLimitState::new(services.limiter.clone(), config.clone())
                .with_trusted_proxies(trusted_proxies.clone()),
            rate_limit::<MemoryRateLimitStore>,
        )
    };

    let auth_config = config
        .password_pepper
        .as_deref()
        .map(AuthConfig::with_pepper)
        .unwrap_or_default();

    let auth_routes = auth_router(services.users.clone(), auth_config)
        .route_layer(limit(&config.auth_rate_limit));

    let contact_state = ContactAppState::new(services.contacts, services.users);
    let contact_routes = submission_router(contact_state.clone())
        .route_layer(limit(&config.contact_rate_limit))
        .merge(inbox_router(contact_state).route_layer(limit(&config.api_rate_limit)));

    let ops_routes = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(render_metrics))
        .with_state(services.metrics.clone());

    let collector = FanoutCollector::new()
        .with(services.metrics)
        .with(Arc::new(TracingCollector));

    let cors = CorsLayer::new()
        .allow_origin(config.frontend_origins.clone())
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT]))
        .expose_headers(ExposeHeaders::list([
            header::RETRY_AFTER,
            header::HeaderName::from_static(X_RATELIMIT_LIMIT),
            header::HeaderName::from_static(X_RATELIMIT_REMAINING),
            header::HeaderName::from_static(X_RATELIMIT_RESET),
        ]));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api", contact_routes)
        .merge(ops_routes)
        .layer(from_fn_with_state(
            MonitoringState::new(Arc::new(collector)),
            track_metrics,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "success": true, "status": "ok" }))
}

/// GET /metrics
async fn render_metrics(State(metrics): State<Arc<PrometheusCollector>>) -> Response {
    match metrics.render() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render metrics");
            AppError::internal("Failed to render metrics")
                .with_source(e)
                .into_response()
        }
    }
}
