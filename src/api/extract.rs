// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request extractors that reject through the response envelope.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};

use crate::error::ApiError;

/// `axum::Json` with rejections mapped into the standard error envelope.
///
/// Malformed or mistyped bodies become a `VALIDATION_ERROR` with status
/// 400 instead of axum's plain-text 400/415/422 responses.
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Json(value)),
            Err(rejection) => Err(
                ApiError::validation("Invalid request body").with_detail(rejection.to_string())
            ),
        }
    }
}
