// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Property-Session API Server
//!
//! Serves profile data to users who present a Firebase ID token.

use property_session::{
    config::Config,
    services::{FirebaseServices, FirebaseTokenVerifier, LoopbackConsent},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        host = config.app_hostname.as_deref().unwrap_or_default(),
        project = %config.firebase.project_id,
        "Starting Property-Session API"
    );

    // Same client handles as the login CLI; the server only reads profiles.
    let services = FirebaseServices::initialize(&config, LoopbackConsent::default()).await?;

    let token_verifier = Arc::new(FirebaseTokenVerifier::new(&config)?);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        profiles: services.db().clone(),
        token_verifier,
    });

    // Build router
    let app = property_session::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("property_session=debug,info")),
        )
        .with(format)
        .init();
}
