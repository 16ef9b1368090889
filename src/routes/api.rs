// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::db::ProfileStore;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require a verified ID token).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes<S: ProfileStore + 'static>() -> Router<Arc<AppState<S>>> {
    Router::new().route("/api/me", get(get_me::<S>))
}

/// Current user profile response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileResponse {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub created_at: String,
    pub role: String,
}

/// Get current user profile.
async fn get_me<S: ProfileStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    let profile = state
        .profiles
        .get_profile(&user.uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", user.uid)))?;

    Ok(Json(ProfileResponse {
        uid: profile.uid,
        email: profile.email,
        display_name: profile.display_name,
        created_at: format_utc_rfc3339(profile.created_at),
        role: profile.role,
    }))
}
