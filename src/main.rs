// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use quasarflow_api::api::router;
use quasarflow_api::config::Config;
use quasarflow_api::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "invalid configuration");
            std::process::exit(1);
        }
    };

    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(err) => {
            error!(%err, "invalid bind address");
            std::process::exit(1);
        }
    };

    let state = match AppState::initialize(config) {
        Ok(state) => state,
        Err(err) => {
            error!(%err, "failed to initialize application state");
            std::process::exit(1);
        }
    };

    let shutdown = CancellationToken::new();
    let sweeper = tokio::spawn(
        state
            .rate_limiter
            .clone()
            .run_sweeper(shutdown.child_token()),
    );

    let app = router(state);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(%err, %addr, "failed to bind listener");
            std::process::exit(1);
        }
    };

    info!(%addr, "server listening (docs at /docs)");

    let serve_result = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
    .await;

    shutdown.cancel();
    let _ = sweeper.await;

    if let Err(err) = serve_result {
        error!(%err, "server error");
        std::process::exit(1);
    }

    info!("server stopped");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    if format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Resolves on SIGINT or SIGTERM and cancels the shutdown token so
/// background tasks stop alongside the listener.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
    shutdown.cancel();
}
