//! Rate Limit Middleware
//!
//! Wire with `axum::middleware::from_fn_with_state(state, rate_limit::<S>)`,
//! preferably as a `route_layer` so the matched route pattern is part of the key.

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::sync::Arc;

use super::config::RateLimitConfig;
use super::store::{RateLimitResult, RateLimitStore};
use crate::client::{TrustedProxies, client_identifier, route_pattern};

pub const X_RATELIMIT_LIMIT: &str = "x-ratelimit-limit";
pub const X_RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";
pub const X_RATELIMIT_RESET: &str = "x-ratelimit-reset";

/// Middleware state: one shared store, one config per protected route group
pub struct RateLimitState<S>
where
    S: RateLimitStore + Send + Sync + 'static,
{
    pub store: Arc<S>,
    pub config: Arc<RateLimitConfig>,
    /// Peers allowed to name the client via `X-Forwarded-For`
    pub trusted_proxies: Arc<TrustedProxies>,
}

impl<S> RateLimitState<S>
where
    S: RateLimitStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, config: RateLimitConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
            trusted_proxies: Arc::new(TrustedProxies::default()),
        }
    }

    pub fn with_trusted_proxies(mut self, trusted_proxies: TrustedProxies) -> Self {
        self.trusted_proxies = Arc::new(trusted_proxies);
        self
    }
}

impl<S> Clone for RateLimitState<S>
where
    S: RateLimitStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config.clone(),
            trusted_proxies: self.trusted_proxies.clone(),
        }
    }
}

/// 429 body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitRejection {
    pub success: bool,
    pub message: String,
    pub retry_after: u64,
}

/// Fixed-window admission for the wrapped routes.
///
/// Quota is reserved before the handler runs. Admitted responses carry the
/// `X-RateLimit-*` headers; the handler's response is otherwise untouched.
pub async fn rate_limit<S>(
    State(state): State<RateLimitState<S>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    S: RateLimitStore + Send + Sync + 'static,
{
    let key = format!(
        "{}:{}",
        client_identifier(&req, &state.trusted_proxies),
        route_pattern(&req)
    );

    let result = match state.store.check_and_increment(&key, &state.config).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, key = %key, "Rate limit store failed, admitting request");
            return next.run(req).await;
        }
    };

    if !result.allowed {
        tracing::warn!(
            key = %key,
            limit = result.limit,
            retry_after = result.retry_after_secs,
            "Rate limit exceeded"
        );
        return rejection(&state.config, &result);
    }

    let mut response = next.run(req).await;
    apply_headers(response.headers_mut(), &result);

    let status = response.status().as_u16();
    if state.config.refunds(status) {
        match state.store.refund(&key, result.reset_at_ms).await {
            Ok(()) => tracing::debug!(key = %key, status, "Refunded rate limit quota"),
            Err(e) => tracing::error!(error = %e, key = %key, "Rate limit refund failed"),
        }
    }

    response
}

fn rejection(config: &RateLimitConfig, result: &RateLimitResult) -> Response {
    let body = RateLimitRejection {
        success: false,
        message: config.message.clone(),
        retry_after: result.retry_after_secs,
    };

    (
        StatusCode::TOO_MANY_REQUESTS,
        [(header::RETRY_AFTER, HeaderValue::from(result.retry_after_secs))],
        Json(body),
    )
        .into_response()
}

fn apply_headers(headers: &mut HeaderMap, result: &RateLimitResult) {
    headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(result.limit));
    headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(result.remaining));
    headers.insert(X_RATELIMIT_RESET, HeaderValue::from(result.reset_at_secs()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limit::clock::ManualClock;
    use crate::rate_limit::store::{MemoryRateLimitStore, RateLimitError};
    use axum::Router;
    use axum::extract::ConnectInfo;
    use axum::middleware::from_fn_with_state;
    use axum::routing::{get, post};
    use std::net::{IpAddr, SocketAddr};
    use std::time::Duration;
    use tower::ServiceExt;

    fn routes<S>(state: RateLimitState<S>) -> Router
    where
        S: RateLimitStore + Send + Sync + 'static,
    {
        Router::new()
            .route("/login", post(|| async { "welcome" }))
            .route("/broken", post(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .route("/artists/{id}", get(|| async { "artist" }))
            .route_layer(from_fn_with_state(state, rate_limit::<S>))
    }

    fn app(store: Arc<MemoryRateLimitStore>, config: RateLimitConfig) -> Router {
        routes(RateLimitState::new(store, config))
    }

    /// Request arriving directly from `ip`
    fn request(method: &str, uri: &str, ip: &str) -> Request<Body> {
        let peer: IpAddr = ip.parse().unwrap();
        let mut req = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::new(peer, 40000)));
        req
    }

    fn forwarded(method: &str, uri: &str, peer: &str, xff: &str) -> Request<Body> {
        let mut req = request(method, uri, peer);
        req.headers_mut()
            .insert("x-forwarded-for", HeaderValue::from_str(xff).unwrap());
        req
    }

    /// Backend that is down for admission, or that admits but cannot refund
    struct BrokenStore {
        admission_fails: bool,
    }

    impl RateLimitStore for BrokenStore {
        async fn check_and_increment(
            &self,
            _key: &str,
            config: &RateLimitConfig,
        ) -> Result<RateLimitResult, RateLimitError> {
            if self.admission_fails {
                return Err(RateLimitError::Backend("connection refused".to_string()));
            }
            Ok(RateLimitResult {
                allowed: true,
                limit: config.max_requests,
                remaining: config.max_requests - 1,
                reset_at_ms: 60_000,
                retry_after_secs: 0,
            })
        }

        async fn refund(&self, _key: &str, _reset_at_ms: i64) -> Result<(), RateLimitError> {
            Err(RateLimitError::Backend("connection reset".to_string()))
        }
    }

    async fn text_body(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn header_u64(response: &Response, name: &str) -> u64 {
        response.headers()[name].to_str().unwrap().parse().unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_login_scenario_over_http() {
        let clock = ManualClock::new(0);
        let store = Arc::new(MemoryRateLimitStore::with_clock(clock.clone()));
        let app = app(store, RateLimitConfig::new(2, Duration::from_millis(1_000)));

        let r1 = app.clone().oneshot(request("POST", "/login", "1.2.3.4")).await.unwrap();
        assert_eq!(r1.status(), StatusCode::OK);
        assert_eq!(header_u64(&r1, X_RATELIMIT_LIMIT), 2);
        assert_eq!(header_u64(&r1, X_RATELIMIT_REMAINING), 1);
        assert_eq!(header_u64(&r1, X_RATELIMIT_RESET), 1);

        clock.set(100);
        let r2 = app.clone().oneshot(request("POST", "/login", "1.2.3.4")).await.unwrap();
        assert_eq!(r2.status(), StatusCode::OK);
        assert_eq!(header_u64(&r2, X_RATELIMIT_REMAINING), 0);

        clock.set(200);
        let r3 = app.clone().oneshot(request("POST", "/login", "1.2.3.4")).await.unwrap();
        assert_eq!(r3.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(header_u64(&r3, "retry-after"), 1);
        assert!(r3.headers().get(X_RATELIMIT_REMAINING).is_none());
        let body = json_body(r3).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["retryAfter"], 1);
        assert_eq!(body["message"], crate::rate_limit::config::DEFAULT_MESSAGE);

        clock.set(1_100);
        let r4 = app.clone().oneshot(request("POST", "/login", "1.2.3.4")).await.unwrap();
        assert_eq!(r4.status(), StatusCode::OK);
        assert_eq!(header_u64(&r4, X_RATELIMIT_REMAINING), 1);
    }

    #[tokio::test]
    async fn test_clients_and_routes_have_separate_quota() {
        let store = Arc::new(MemoryRateLimitStore::with_clock(ManualClock::new(0)));
        let app = app(store.clone(), RateLimitConfig::new(1, Duration::from_secs(60)));

        let first = app.clone().oneshot(request("POST", "/login", "1.1.1.1")).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let other_ip = app.clone().oneshot(request("POST", "/login", "2.2.2.2")).await.unwrap();
        assert_eq!(other_ip.status(), StatusCode::OK);

        let other_route = app.clone().oneshot(request("POST", "/broken", "1.1.1.1")).await.unwrap();
        assert_eq!(other_route.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let again = app.clone().oneshot(request("POST", "/login", "1.1.1.1")).await.unwrap();
        assert_eq!(again.status(), StatusCode::TOO_MANY_REQUESTS);

        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_key_uses_route_pattern_not_path() {
        let store = Arc::new(MemoryRateLimitStore::with_clock(ManualClock::new(0)));
        let app = app(store.clone(), RateLimitConfig::new(1, Duration::from_secs(60)));

        let a = app.clone().oneshot(request("GET", "/artists/1", "5.5.5.5")).await.unwrap();
        assert_eq!(a.status(), StatusCode::OK);

        let b = app.clone().oneshot(request("GET", "/artists/2", "5.5.5.5")).await.unwrap();
        assert_eq!(b.status(), StatusCode::TOO_MANY_REQUESTS);

        assert!(store.get("5.5.5.5:/artists/{id}").is_some());
    }

    #[tokio::test]
    async fn test_skip_failed_requests_refunds_quota() {
        let store = Arc::new(MemoryRateLimitStore::with_clock(ManualClock::new(0)));
        let config = RateLimitConfig::new(2, Duration::from_secs(60)).with_skip_failed_requests(true);
        let app = app(store.clone(), config);

        let failed = app.clone().oneshot(request("POST", "/broken", "7.7.7.7")).await.unwrap();
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(header_u64(&failed, X_RATELIMIT_REMAINING), 1);

        let next = app.clone().oneshot(request("POST", "/broken", "7.7.7.7")).await.unwrap();
        assert_eq!(header_u64(&next, X_RATELIMIT_REMAINING), 1);
        assert_eq!(store.get("7.7.7.7:/broken").unwrap().count, 0);

        // Successful requests still count
        app.clone().oneshot(request("POST", "/login", "7.7.7.7")).await.unwrap();
        app.clone().oneshot(request("POST", "/login", "7.7.7.7")).await.unwrap();
        let third = app.clone().oneshot(request("POST", "/login", "7.7.7.7")).await.unwrap();
        assert_eq!(third.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_skip_successful_requests_refunds_quota() {
        let store = Arc::new(MemoryRateLimitStore::with_clock(ManualClock::new(0)));
        let config =
            RateLimitConfig::new(1, Duration::from_secs(60)).with_skip_successful_requests(true);
        let app = app(store.clone(), config);

        for _ in 0..5 {
            let ok = app.clone().oneshot(request("POST", "/login", "8.8.8.8")).await.unwrap();
            assert_eq!(ok.status(), StatusCode::OK);
        }

        let failed = app.clone().oneshot(request("POST", "/broken", "8.8.8.8")).await.unwrap();
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let blocked = app.clone().oneshot(request("POST", "/broken", "8.8.8.8")).await.unwrap();
        assert_eq!(blocked.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_custom_message() {
        let store = Arc::new(MemoryRateLimitStore::with_clock(ManualClock::new(0)));
        let config = RateLimitConfig::new(1, Duration::from_secs(60))
            .with_message("Trop de tentatives, réessayez plus tard.");
        let app = app(store, config);

        app.clone().oneshot(request("POST", "/login", "4.4.4.4")).await.unwrap();
        let blocked = app.clone().oneshot(request("POST", "/login", "4.4.4.4")).await.unwrap();
        let body = json_body(blocked).await;
        assert_eq!(body["message"], "Trop de tentatives, réessayez plus tard.");
        assert_eq!(body["retryAfter"], 60);
    }

    #[tokio::test]
    async fn test_spoofed_forwarded_for_is_ignored() {
        let store = Arc::new(MemoryRateLimitStore::with_clock(ManualClock::new(0)));
        let app = app(store.clone(), RateLimitConfig::new(1, Duration::from_secs(60)));

        let mut admitted = 0;
        for i in 0..5 {
            let spoofed = format!("10.0.0.{i}");
            let response = app
                .clone()
                .oneshot(forwarded("POST", "/login", "203.0.113.7", &spoofed))
                .await
                .unwrap();
            if response.status() == StatusCode::OK {
                admitted += 1;
            }
        }

        assert_eq!(admitted, 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("203.0.113.7:/login").is_some());
    }

    #[tokio::test]
    async fn test_forwarded_for_from_trusted_proxy() {
        let store = Arc::new(MemoryRateLimitStore::with_clock(ManualClock::new(0)));
        let proxy: IpAddr = "10.0.0.1".parse().unwrap();
        let config = RateLimitConfig::new(1, Duration::from_secs(60));
        let state = RateLimitState::new(store.clone(), config)
            .with_trusted_proxies(TrustedProxies::new([proxy]));
        let app = routes(state);

        let alice = app
            .clone()
            .oneshot(forwarded("POST", "/login", "10.0.0.1", "198.51.100.1"))
            .await
            .unwrap();
        assert_eq!(alice.status(), StatusCode::OK);

        let bob = app
            .clone()
            .oneshot(forwarded("POST", "/login", "10.0.0.1", "198.51.100.2"))
            .await
            .unwrap();
        assert_eq!(bob.status(), StatusCode::OK);

        let alice_again = app
            .clone()
            .oneshot(forwarded("POST", "/login", "10.0.0.1", "198.51.100.1"))
            .await
            .unwrap();
        assert_eq!(alice_again.status(), StatusCode::TOO_MANY_REQUESTS);

        assert!(store.get("198.51.100.1:/login").is_some());
        assert!(store.get("10.0.0.1:/login").is_none());
    }

    #[tokio::test]
    async fn test_store_failure_admits_without_headers() {
        let state = RateLimitState::new(
            Arc::new(BrokenStore { admission_fails: true }),
            RateLimitConfig::new(1, Duration::from_secs(60)),
        );
        let app = routes(state);

        for _ in 0..3 {
            let response = app.clone().oneshot(request("POST", "/login", "1.2.3.4")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert!(response.headers().get(X_RATELIMIT_LIMIT).is_none());
            assert!(response.headers().get(X_RATELIMIT_REMAINING).is_none());
            assert!(response.headers().get(X_RATELIMIT_RESET).is_none());
            assert_eq!(text_body(response).await, "welcome");
        }
    }

    #[tokio::test]
    async fn test_refund_failure_keeps_response() {
        let state = RateLimitState::new(
            Arc::new(BrokenStore { admission_fails: false }),
            RateLimitConfig::new(3, Duration::from_secs(60)).with_skip_successful_requests(true),
        );
        let app = routes(state);

        let response = app.oneshot(request("POST", "/login", "1.2.3.4")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header_u64(&response, X_RATELIMIT_LIMIT), 3);
        assert_eq!(header_u64(&response, X_RATELIMIT_REMAINING), 2);
        assert_eq!(text_body(response).await, "welcome");
    }
}
