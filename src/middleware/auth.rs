// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase ID token authentication middleware.

use crate::db::ProfileStore;
use crate::error::AppError;
use crate::services::TokenError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Cookie Firebase Hosting forwards to backends.
pub const SESSION_COOKIE: &str = "__session";

/// Authenticated user extracted from a verified ID token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
}

/// Middleware that requires a valid Firebase ID token.
pub async fn require_auth<S: ProfileStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Header first, then the hosting session cookie
    let token = match bearer_token(&request) {
        Some(token) => token,
        None => jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or(AppError::Unauthorized)?,
    };

    let user = state
        .token_verifier
        .verify(&token)
        .await
        .map_err(|e| match e {
            TokenError::Invalid(reason) => {
                tracing::debug!(reason = %reason, "Rejected ID token");
                AppError::InvalidToken
            }
            TokenError::Transient(reason) => AppError::VerifierUnavailable(reason),
        })?;

    request.extensions_mut().insert(AuthUser {
        uid: user.uid,
        email: user.email,
    });

    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<String> {
    let value = request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?;

    // Anything other than "Bearer <token>" is treated as an invalid token.
    Some(value.strip_prefix("Bearer ").unwrap_or_default().to_string())
}
