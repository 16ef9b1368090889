// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Property-Session: Google sign-in with lazy Firestore profile provisioning
//!
//! This crate signs users in through Firebase Authentication, makes sure
//! each user has a profile document in Firestore, and serves a small API
//! that authenticates requests with Firebase ID tokens.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::FirebaseTokenVerifier;
use std::sync::Arc;

/// Shared application state.
pub struct AppState<S = FirestoreDb> {
    pub config: Config,
    pub profiles: S,
    pub token_verifier: Arc<FirebaseTokenVerifier>,
}
