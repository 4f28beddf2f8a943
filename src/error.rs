// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Central API error type.
//!
//! Every error response carries a coarse category, an HTTP status, a
//! display-safe message, and optional developer-facing detail. The detail
//! field is never populated for authentication failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::response::{ApiResponse, ErrorInfo};

/// Coarse error categories exposed in the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    /// Malformed input (400).
    Validation,
    /// Resource not found (404).
    NotFound,
    /// Authentication or authorization failure (401/403).
    Unauthorized,
    /// Upstream ledger (Horizon) failure (502).
    Blockchain,
    /// Key-size or encrypt/decrypt failure (500).
    Crypto,
    /// Request rate exceeded (429).
    RateLimited,
    /// Unexpected internal error (500).
    Internal,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Validation => "VALIDATION_ERROR",
            ErrorType::NotFound => "NOT_FOUND",
            ErrorType::Unauthorized => "UNAUTHORIZED",
            ErrorType::Blockchain => "BLOCKCHAIN_ERROR",
            ErrorType::Crypto => "CRYPTO_ERROR",
            ErrorType::RateLimited => "RATE_LIMITED",
            ErrorType::Internal => "INTERNAL_ERROR",
        }
    }
}

/// Structured API error mapped to an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    pub error_type: ErrorType,
    pub status: StatusCode,
    pub message: String,
    pub detail: Option<String>,
}

impl ApiError {
    pub fn new(error_type: ErrorType, status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            error_type,
            status,
            message: message.into(),
            detail: None,
        }
    }

    /// Attach developer-facing detail. Skipped for auth errors by callers.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorType::Validation, StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorType::NotFound, StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorType::Unauthorized, StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorType::Unauthorized, StatusCode::FORBIDDEN, message)
    }

    pub fn blockchain(message: impl Into<String>) -> Self {
        Self::new(ErrorType::Blockchain, StatusCode::BAD_GATEWAY, message)
    }

    pub fn crypto(message: impl Into<String>) -> Self {
        Self::new(ErrorType::Crypto, StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            ErrorType::Internal,
            StatusCode::INTERNAL_SERVER_ERROR,
            message,
        )
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::new(
            ErrorType::RateLimited,
            StatusCode::TOO_MANY_REQUESTS,
            message,
        )
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.detail {
            Some(detail) => write!(
                f,
                "{}: {} ({})",
                self.error_type.as_str(),
                self.message,
                detail
            ),
            None => write!(f, "{}: {}", self.error_type.as_str(), self.message),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::failure(ErrorInfo {
            error_type: self.error_type.as_str().to_string(),
            message: self.message,
            detail: self.detail,
        });
        (self.status, Json(body)).into_response()
    }
}
