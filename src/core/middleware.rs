use std::net::{IpAddr, SocketAddr};

use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, HeaderValue};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

use crate::core::profile::ServerSettings;

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Custom MakeSpan that includes request_id and the resolved client address
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId {
    settings: ServerSettings,
}

impl MakeSpanWithRequestId {
    pub fn new(settings: ServerSettings) -> Self {
        Self { settings }
    }
}

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        let trusted = self.settings.proxy_headers;

        let client = client_ip(request.headers(), peer, trusted)
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "-".to_string());
        let scheme = forwarded_proto(request.headers(), trusted).unwrap_or("http");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
            client_ip = %client,
            scheme = %scheme,
        )
    }
}

/// Resolve the originating client address.
///
/// With trusted proxy headers: the first `X-Forwarded-For` hop, then
/// `X-Real-IP`, then the TCP peer. Unparseable header values are skipped.
pub fn client_ip(headers: &HeaderMap, peer: Option<IpAddr>, trusted: bool) -> Option<IpAddr> {
    if trusted {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|first| first.trim().parse::<IpAddr>().ok());
        if forwarded.is_some() {
            return forwarded;
        }

        let real_ip = headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<IpAddr>().ok());
        if real_ip.is_some() {
            return real_ip;
        }
    }

    peer
}

/// Scheme reported by the proxy in `X-Forwarded-Proto`
pub fn forwarded_proto(headers: &HeaderMap, trusted: bool) -> Option<&str> {
    if !trusted {
        return None;
    }
    headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').next().unwrap_or(v).trim())
        .filter(|v| !v.is_empty())
}

pub fn cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    // If origins list contains "*", allow any origin
    if allowed_origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    fn peer() -> Option<IpAddr> {
        Some("10.0.0.5".parse().unwrap())
    }

    #[test]
    fn test_client_ip_prefers_first_forwarded_hop() {
        let map = headers(&[
            ("x-forwarded-for", "203.0.113.7, 70.41.3.18, 150.172.238.178"),
            ("x-real-ip", "198.51.100.1"),
        ]);
        assert_eq!(
            client_ip(&map, peer(), true),
            Some("203.0.113.7".parse().unwrap())
        );
    }

    #[test]
    fn test_client_ip_falls_back_to_real_ip_then_peer() {
        let map = headers(&[("x-forwarded-for", "unknown"), ("x-real-ip", "198.51.100.1")]);
        assert_eq!(
            client_ip(&map, peer(), true),
            Some("198.51.100.1".parse().unwrap())
        );

        assert_eq!(client_ip(&HeaderMap::new(), peer(), true), peer());
    }

    #[test]
    fn test_client_ip_ignores_headers_when_untrusted() {
        let map = headers(&[("x-forwarded-for", "203.0.113.7")]);
        assert_eq!(client_ip(&map, peer(), false), peer());
    }

    #[test]
    fn test_client_ip_supports_ipv6() {
        let map = headers(&[("x-forwarded-for", "2001:db8::1")]);
        assert_eq!(
            client_ip(&map, None, true),
            Some("2001:db8::1".parse().unwrap())
        );
    }

    #[test]
    fn test_forwarded_proto() {
        let map = headers(&[("x-forwarded-proto", "https, http")]);
        assert_eq!(forwarded_proto(&map, true), Some("https"));
        assert_eq!(forwarded_proto(&map, false), None);
        assert_eq!(forwarded_proto(&HeaderMap::new(), true), None);
    }
}
