// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile model for storage.

use crate::models::Identity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role assigned to every newly provisioned profile.
pub const DEFAULT_ROLE: &str = "user";

/// User profile stored in Firestore under `users/{uid}`.
///
/// Written once on first login and never updated by the session code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Firebase uid (also used as document ID)
    pub uid: String,
    /// Email address (None if the provider did not share one)
    pub email: Option<String>,
    /// Display name from the identity provider
    pub display_name: Option<String>,
    /// When the profile was provisioned
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub created_at: DateTime<Utc>,
    pub role: String,
}

impl UserProfile {
    /// Build the initial profile for an identity signing in for the first time.
    pub fn for_new_identity(identity: &Identity, now: DateTime<Utc>) -> Self {
        Self {
            uid: identity.uid.clone(),
            email: identity.email.clone(),
            display_name: identity.display_name.clone(),
            created_at: now,
            role: DEFAULT_ROLE.to_string(),
        }
    }
}
