// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request middleware: rate limiting and security headers.
//!
//! CORS, tracing, request IDs, and panic recovery come from `tower-http`
//! layers wired up in the router.

pub mod rate_limit;
pub mod security_headers;

pub use rate_limit::{rate_limit, RateLimiter};
pub use security_headers::security_headers;
