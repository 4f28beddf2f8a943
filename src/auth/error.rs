// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::response::{ApiResponse, ErrorInfo};

/// Authentication failure.
///
/// Rendered through the standard response envelope with type
/// `UNAUTHORIZED`. The specific failure reason stays in the message; no
/// developer detail is attached for auth failures.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("Authorization header is required")]
    MissingAuthHeader,
    /// Authorization header is not `Bearer <token>`
    #[error("Invalid authorization header format (expected 'Bearer <token>')")]
    InvalidAuthHeader,
    #[error("Token is malformed")]
    MalformedToken,
    /// Token is signed with an unexpected algorithm
    #[error("Token uses an unsupported algorithm")]
    WrongAlgorithm,
    #[error("Token signature is invalid")]
    InvalidSignature,
    #[error("Token has expired")]
    TokenExpired,
    #[error("Token issuer is invalid")]
    InvalidIssuer,
    #[error("Token is not yet valid")]
    TokenNotYetValid,
    /// Authenticated but lacking the required role
    #[error("Insufficient permissions for this operation")]
    InsufficientPermissions,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ApiResponse::<()>::failure(ErrorInfo {
            error_type: "UNAUTHORIZED".to_string(),
            message: self.to_string(),
            detail: None,
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn missing_auth_returns_401_envelope() {
        let response = AuthError::MissingAuthHeader.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["type"], "UNAUTHORIZED");
        assert!(body["error"].get("detail").is_none());
    }

    #[test]
    fn messages_are_stable() {
        assert_eq!(
            AuthError::MissingAuthHeader.to_string(),
            "Authorization header is required"
        );
        assert_eq!(
            AuthError::InvalidAuthHeader.to_string(),
            "Invalid authorization header format (expected 'Bearer <token>')"
        );
        assert_eq!(AuthError::TokenExpired.to_string(), "Token has expired");
    }

    #[tokio::test]
    async fn insufficient_permissions_returns_403() {
        let response = AuthError::InsufficientPermissions.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
