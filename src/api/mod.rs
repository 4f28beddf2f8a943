// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP surface: routes, middleware stack, and OpenAPI document.
//!
//! Layer order (outermost first): tracing, panic recovery, security
//! headers, CORS, request-id, rate limiting. Authentication is not a
//! blanket layer; protected handlers opt in through the `Auth` and
//! `AdminOnly` extractors, which keeps the public ownership endpoints
//! free of special-case bypass lists.

use std::any::Any;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::error;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::Config, error::ApiError, middleware, state::AppState};

pub mod accounts;
pub mod auth;
pub mod extract;
pub mod health;
pub mod wallets;

pub fn router(state: AppState) -> Router {
    let v1 = Router::new()
        .route("/accounts/{public_key}/challenge", get(accounts::challenge))
        .route(
            "/accounts/{public_key}/verify-ownership",
            post(accounts::verify_ownership),
        )
        .route(
            "/accounts/{public_key}/verify-transaction",
            post(accounts::verify_transaction),
        )
        .route(
            "/accounts/{public_key}/verify-account",
            get(accounts::verify_account),
        )
        .route("/accounts/{public_key}/balance", get(accounts::balance))
        .route(
            "/accounts/{public_key}/transactions",
            get(accounts::transactions),
        )
        .route(
            "/wallets",
            post(wallets::create_wallet).get(wallets::list_wallets),
        )
        .route("/wallets/{id}", get(wallets::get_wallet))
        .route("/wallets/{id}/balance", get(wallets::wallet_balance))
        .route("/wallets/{id}/fund", post(wallets::fund_wallet))
        .route(
            "/wallets/{id}/transactions",
            get(wallets::wallet_transactions),
        );

    Router::new()
        .nest("/api/v1", v1)
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(from_fn_with_state(
                    state.clone(),
                    middleware::security_headers,
                ))
                .layer(cors_layer(&state.config))
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(from_fn_with_state(state.clone(), middleware::rate_limit)),
        )
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([HeaderName::from_static("x-request-id")])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Error boundary for panicking handlers: log the panic, answer with the
/// standard 500 envelope instead of a dropped connection.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> axum::response::Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(panic = detail, "request handler panicked");

    ApiError::internal("Internal server error").into_response()
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        auth::logout,
        auth::me,
        accounts::challenge,
        accounts::verify_ownership,
        accounts::verify_transaction,
        accounts::verify_account,
        accounts::balance,
        accounts::transactions,
        wallets::create_wallet,
        wallets::list_wallets,
        wallets::get_wallet,
        wallets::wallet_balance,
        wallets::fund_wallet,
        wallets::wallet_transactions,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            crate::models::WalletResponse,
            crate::models::CreateWalletRequest,
            crate::models::WalletListResponse,
            crate::models::BalanceResponse,
            crate::models::FundResponse,
            crate::models::TransactionHistoryResponse,
            crate::models::LoginRequest,
            crate::models::LoginResponse,
            crate::models::MeResponse,
            crate::models::VerifyOwnershipRequest,
            crate::models::VerifyTransactionRequest,
            crate::ownership::ChallengeOutput,
            crate::ownership::VerifyOwnershipOutput,
            crate::horizon::Balance,
            crate::horizon::TransactionInfo,
            crate::auth::Role,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login and session identity"),
        (name = "Accounts", description = "Ownership verification and account lookups"),
        (name = "Wallets", description = "Custodied wallet management"),
        (name = "Health", description = "Service health probes")
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
