// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types for sign-in, profile storage, and the HTTP API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Failures of the identity provider or the interactive sign-in flow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Sign-in was cancelled by the user")]
    Cancelled,

    #[error("Sign-in was rejected: {0}")]
    Rejected(String),

    #[error("Identity provider error: {0}")]
    Provider(String),

    #[error("No active session")]
    NoSession,

    #[error("Identity provider unreachable: {0}")]
    Transport(String),
}

/// Failures of the profile document store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("Document store error: {0}")]
    Unavailable(String),

    #[error("Database not connected (offline mode)")]
    Offline,
}

/// Error returned by the session operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Authentication(#[from] AuthError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failures while turning an uploaded object into consumption rows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("Skipping {path}: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("Missing required columns; found {0:?}")]
    MissingColumns(Vec<String>),

    #[error("Unreadable CSV: {0}")]
    Csv(String),
}

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No Authorization header provided")]
    Unauthorized,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Token verification unavailable: {0}")]
    VerifierUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] StorageError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string(), None),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, self.to_string(), None),
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, "not_found".to_string(), Some(msg.clone()))
            }
            AppError::VerifierUnavailable(msg) => {
                tracing::warn!(error = %msg, "Token verifier unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "verifier_unavailable".to_string(),
                    None,
                )
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error".to_string(),
                    None,
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse { error, details };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
