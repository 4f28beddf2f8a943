// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login, logout, and identity endpoints.

use axum::{extract::State, response::Response};
use tracing::{info, warn};

use super::extract::Json;
use crate::auth::{Auth, Role};
use crate::error::ApiError;
use crate::models::{LoginRequest, LoginResponse, MeResponse};
use crate::response;
use crate::state::AppState;

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::validation("Username and password are required"));
    }

    let role = match authenticate(&request.username, &request.password) {
        Some(role) => role,
        None => {
            warn!(username = request.username, "authentication failed");
            return Err(ApiError::unauthorized("Invalid credentials"));
        }
    };

    let token = state
        .tokens
        .issue(&request.username, role)
        .map_err(|_| ApiError::internal("Failed to generate token"))?;

    info!(username = request.username, %role, "user logged in");

    Ok(response::ok(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration().as_secs(),
        user_id: request.username.clone(),
        role,
    }))
}

/// Invalidate the session client-side.
///
/// Tokens are stateless, so logout is a client-side operation; the
/// endpoint exists so clients have a uniform flow.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    responses((status = 200, description = "Logged out"))
)]
pub async fn logout(Auth(identity): Auth) -> Response {
    info!(username = identity.subject, "user logged out");
    response::ok(serde_json::json!({"message": "Logged out successfully"}))
}

/// The authenticated caller's identity.
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current identity", body = MeResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(Auth(identity): Auth) -> Response {
    response::ok(MeResponse {
        username: identity.subject,
        role: identity.role,
    })
}

// TODO: replace the demo credential table with database-backed users and
// hashed passwords.
fn authenticate(username: &str, password: &str) -> Option<Role> {
    match (username, password) {
        ("admin", "admin123") => Some(Role::Admin),
        ("user", "user123") => Some(Role::User),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Identity;
    use crate::state::test_state;
    use axum::body::to_bytes;
    use axum::http::StatusCode;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn login_issues_validating_token() {
        let (state, _guard) = test_state();
        let response = login(
            State(state.clone()),
            Json(LoginRequest {
                username: "user".to_string(),
                password: "user123".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["data"]["token_type"], "Bearer");
        assert_eq!(body["data"]["user_id"], "user");
        assert_eq!(body["data"]["role"], "user");
        let token = body["data"]["token"].as_str().unwrap();
        let claims = state.tokens.validate(token).unwrap();
        assert_eq!(claims.sub, "user");
        assert_eq!(claims.role, Role::User);
    }

    #[tokio::test]
    async fn admin_credentials_grant_admin_role() {
        let (state, _guard) = test_state();
        let response = login(
            State(state.clone()),
            Json(LoginRequest {
                username: "admin".to_string(),
                password: "admin123".to_string(),
            }),
        )
        .await
        .unwrap();

        let body = body_json(response).await;
        let claims = state
            .tokens
            .validate(body["data"]["token"].as_str().unwrap())
            .unwrap();
        assert_eq!(claims.role, Role::Admin);
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let (state, _guard) = test_state();
        let err = login(
            State(state),
            Json(LoginRequest {
                username: "user".to_string(),
                password: "wrong".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn empty_credentials_are_a_validation_error() {
        let (state, _guard) = test_state();
        let err = login(
            State(state),
            Json(LoginRequest {
                username: String::new(),
                password: String::new(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn me_reflects_identity() {
        let response = me(Auth(Identity {
            subject: "alice".to_string(),
            role: Role::Admin,
        }))
        .await;

        let body = body_json(response).await;
        assert_eq!(body["data"]["username"], "alice");
        assert_eq!(body["data"]["role"], "admin");
    }
}
