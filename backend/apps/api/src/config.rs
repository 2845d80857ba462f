//! Application Configuration
//!
//! Read once at startup from the environment (after `.env` is loaded).

use anyhow::Context;
use axum::http::HeaderValue;
use platform::client::TrustedProxies;
use platform::rate_limit::RateLimitConfig;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

/// Server configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// In-memory repositories when unset
    pub database_url: Option<String>,
    pub frontend_origins: Vec<HeaderValue>,
    pub password_pepper: Option<String>,
    /// Reverse proxies allowed to set `X-Forwarded-For`; none by default
    pub trusted_proxies: TrustedProxies,
    /// `/api/auth/*`
    pub auth_rate_limit: RateLimitConfig,
    /// `POST /api/contact-requests`
    pub contact_rate_limit: RateLimitConfig,
    /// Remaining `/api` routes
    pub api_rate_limit: RateLimitConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be a socket address such as 0.0.0.0:31113")?;

        let frontend_origins = get("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .filter_map(|origin| origin.trim().parse().ok())
            .collect();

        let trusted_proxies = match get("TRUSTED_PROXIES") {
            Some(list) => parse_trusted_proxies(&list)?,
            None => TrustedProxies::default(),
        };

        Ok(Self {
            bind_addr,
            database_url: get("DATABASE_URL"),
            frontend_origins,
            password_pepper: get("PASSWORD_PEPPER"),
            trusted_proxies,
            auth_rate_limit: rate_limit_override(
                get("AUTH_RATE_LIMIT"),
                "AUTH_RATE_LIMIT",
                default_auth_limit(),
            )?,
            contact_rate_limit: rate_limit_override(
                get("CONTACT_RATE_LIMIT"),
                "CONTACT_RATE_LIMIT",
                default_contact_limit(),
            )?,
            api_rate_limit: rate_limit_override(
                get("API_RATE_LIMIT"),
                "API_RATE_LIMIT",
                RateLimitConfig::default(),
            )?,
        })
    }
}

/// Login and registration: only failed attempts count
fn default_auth_limit() -> RateLimitConfig {
    RateLimitConfig::new(10, Duration::from_secs(15 * 60))
        .with_skip_successful_requests(true)
        .with_message("Too many authentication attempts, please try again later.")
}

/// Contact form: a handful of requests per hour
fn default_contact_limit() -> RateLimitConfig {
    RateLimitConfig::new(5, Duration::from_secs(60 * 60))
        .with_message("Too many contact requests, please try again later.")
}

/// Comma separated IP addresses
fn parse_trusted_proxies(list: &str) -> anyhow::Result<TrustedProxies> {
    let addrs = list
        .split(',')
        .map(str::trim)
        .filter(|addr| !addr.is_empty())
        .map(|addr| {
            addr.parse::<IpAddr>()
                .with_context(|| format!("TRUSTED_PROXIES entry {addr:?} is not an IP address"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(TrustedProxies::new(addrs))
}

/// `max[,windowMs]` replaces the limit and window; flags and message stay
fn rate_limit_override(
    spec: Option<String>,
    name: &str,
    default: RateLimitConfig,
) -> anyhow::Result<RateLimitConfig> {
    let Some(spec) = spec else {
        return Ok(default);
    };

    let parsed = RateLimitConfig::from_spec(&spec)
        .with_context(|| format!("{name} must be `max[,windowMs]`, got {spec:?}"))?;

    Ok(RateLimitConfig {
        max_requests: parsed.max_requests,
        window: parsed.window,
        ..default
    })
}
