// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for authenticated callers.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(identity): Auth) -> impl IntoResponse {
//!     // identity.subject, identity.role
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{AuthError, Role};
use crate::state::AppState;

/// The authenticated caller, as established from a validated token.
#[derive(Debug, Clone)]
pub struct Identity {
    pub subject: String,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Extractor that requires a valid bearer token.
pub struct Auth(pub Identity);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // A test or outer layer may have established the identity already
        if let Some(identity) = parts.extensions.get::<Identity>().cloned() {
            return Ok(Auth(identity));
        }

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidAuthHeader)?;

        let claims = state.tokens.validate(token)?;

        Ok(Auth(Identity {
            subject: claims.sub,
            role: claims.role,
        }))
    }
}

/// Extractor that requires the admin role.
pub struct AdminOnly(pub Identity);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Auth(identity) = Auth::from_request_parts(parts, state).await?;

        if !identity.is_admin() {
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(AdminOnly(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;
    use axum::http::Request;

    fn request_parts(auth_header: Option<String>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = auth_header {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let (state, _guard) = test_state();
        let mut parts = request_parts(None);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn non_bearer_header_is_rejected() {
        let (state, _guard) = test_state();
        let mut parts = request_parts(Some("Basic dXNlcjpwYXNz".to_string()));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
    }

    #[tokio::test]
    async fn valid_token_yields_identity() {
        let (state, _guard) = test_state();
        let token = state.tokens.issue("alice", Role::User).unwrap();
        let mut parts = request_parts(Some(format!("Bearer {token}")));

        let Auth(identity) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(identity.subject, "alice");
        assert_eq!(identity.role, Role::User);
    }

    #[tokio::test]
    async fn extension_identity_takes_precedence() {
        let (state, _guard) = test_state();
        let mut parts = request_parts(None);
        parts.extensions.insert(Identity {
            subject: "preset".to_string(),
            role: Role::Admin,
        });

        let Auth(identity) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(identity.subject, "preset");
    }

    #[tokio::test]
    async fn admin_only_rejects_plain_user() {
        let (state, _guard) = test_state();
        let token = state.tokens.issue("bob", Role::User).unwrap();
        let mut parts = request_parts(Some(format!("Bearer {token}")));

        let result = AdminOnly::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InsufficientPermissions)));
    }

    #[tokio::test]
    async fn admin_only_accepts_admin() {
        let (state, _guard) = test_state();
        let token = state.tokens.issue("root", Role::Admin).unwrap();
        let mut parts = request_parts(Some(format!("Bearer {token}")));

        let result = AdminOnly::from_request_parts(&mut parts, &state).await;
        assert!(result.is_ok());
    }
}
