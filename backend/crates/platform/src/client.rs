//! Client identification utilities
//!
//! Resolves the address a request should be attributed to, for rate limiting
//! and request logs.

use axum::extract::{ConnectInfo, MatchedPath};
use axum::http::{HeaderMap, Request};
use std::net::{IpAddr, SocketAddr};

/// Identifier used when the peer address is unknown
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Reverse proxies whose `X-Forwarded-For` is believed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustedProxies {
    addrs: Vec<IpAddr>,
}

impl TrustedProxies {
    pub fn new(addrs: impl IntoIterator<Item = IpAddr>) -> Self {
        Self {
            addrs: addrs.into_iter().collect(),
        }
    }

    pub fn trusts(&self, ip: IpAddr) -> bool {
        self.addrs.contains(&ip)
    }

    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }
}

/// Extract client IP address
///
/// `X-Forwarded-For` is only read when the direct peer is a trusted proxy.
/// Entries are walked right to left, skipping trusted hops; the first
/// untrusted hop is the client. Any unparsable entry falls back to the peer.
pub fn extract_client_ip(
    headers: &HeaderMap,
    direct_ip: Option<IpAddr>,
    trusted: &TrustedProxies,
) -> Option<IpAddr> {
    let peer = direct_ip?;
    if !trusted.trusts(peer) {
        return Some(peer);
    }

    let Some(xff) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    else {
        return Some(peer);
    };

    let hops: Option<Vec<IpAddr>> = xff
        .split(',')
        .map(|hop| hop.trim().parse::<IpAddr>().ok())
        .collect();

    match hops {
        Some(hops) => hops
            .iter()
            .rev()
            .find(|hop| !trusted.trusts(**hop))
            .or_else(|| hops.first())
            .copied()
            .or(Some(peer)),
        None => Some(peer),
    }
}

/// Client address for a request, as a string
pub fn client_identifier<B>(req: &Request<B>, trusted: &TrustedProxies) -> String {
    let direct_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());

    extract_client_ip(req.headers(), direct_ip, trusted)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Registered route pattern (`/api/contact-requests/{id}`), or the raw path
/// when no route matched
pub fn route_pattern<B>(req: &Request<B>) -> String {
    req.extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string())
}
