// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Security response headers.

use axum::{
    extract::{Request, State},
    http::{header::HeaderValue, HeaderName},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

const HSTS_VALUE: &str = "max-age=31536000; includeSubDomains; preload";

/// Axum middleware that stamps security headers onto every response.
///
/// HSTS is emitted only when the deployment enables it and the request
/// arrived over HTTPS (directly or via an `X-Forwarded-Proto: https`
/// proxy hop). The CSP `connect-src` list is extended with configured
/// extra origins, typically the Horizon endpoint.
pub async fn security_headers(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let forwarded_https = request
        .headers()
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|proto| proto == "https");

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        HeaderName::from_static("x-frame-options"),
        HeaderValue::from_static("DENY"),
    );
    headers.insert(
        HeaderName::from_static("x-xss-protection"),
        HeaderValue::from_static("1; mode=block"),
    );
    headers.insert(
        HeaderName::from_static("x-permitted-cross-domain-policies"),
        HeaderValue::from_static("none"),
    );
    headers.insert(
        HeaderName::from_static("referrer-policy"),
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    if state.config.hsts_enabled() && forwarded_https {
        headers.insert(
            HeaderName::from_static("strict-transport-security"),
            HeaderValue::from_static(HSTS_VALUE),
        );
    }

    let mut connect_sources = "'self'".to_string();
    for source in &state.config.csp_connect_sources {
        connect_sources.push(' ');
        connect_sources.push_str(source);
    }
    let csp = format!(
        "default-src 'self'; script-src 'self' 'unsafe-inline'; \
         style-src 'self' 'unsafe-inline'; img-src 'self' data: https:; \
         font-src 'self'; connect-src {connect_sources}; \
         frame-ancestors 'none'; base-uri 'self'; form-action 'self'"
    );
    if let Ok(value) = HeaderValue::from_str(&csp) {
        headers.insert(HeaderName::from_static("content-security-policy"), value);
    }

    response
}
