// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed profile operations.

use crate::config::ServiceEndpoints;
use crate::db::{collections, ProfileStore};
use crate::error::StorageError;
use crate::models::UserProfile;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
    emulator: bool,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// Connects to the emulator when `endpoints` names one, or when
    /// FIRESTORE_EMULATOR_HOST is set in the environment.
    pub async fn new(project_id: &str, endpoints: &ServiceEndpoints) -> Result<Self, StorageError> {
        let emulator_host = std::env::var("FIRESTORE_EMULATOR_HOST")
            .ok()
            .or_else(|| endpoints.firestore_emulator_host.clone());

        if let Some(host) = emulator_host {
            return Self::create_emulator_client(project_id, &host).await;
        }

        let client = firestore::FirestoreDb::new(project_id).await.map_err(|e| {
            StorageError::Unavailable(format!("Failed to connect to Firestore: {}", e))
        })?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
            emulator: false,
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str, host: &str) -> Result<Self, StorageError> {
        tracing::info!(host, "Using Firestore Emulator");

        // The emulator accepts any bearer token; hand it an unsigned one so no
        // local credentials are looked up.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let mut options = firestore::FirestoreDbOptions::new(project_id.to_string());
        options.firebase_api_url = Some(emulator_url(host));

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            StorageError::Unavailable(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
            emulator: true,
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            client: None,
            emulator: false,
        }
    }

    /// Whether this client talks to the local emulator.
    pub fn is_emulator(&self) -> bool {
        self.emulator
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, StorageError> {
        self.client.as_ref().ok_or(StorageError::Offline)
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user profile by uid.
    pub async fn get_user(&self, uid: &str) -> Result<Option<UserProfile>, StorageError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }

    /// Create a user profile; returns `Ok(false)` if one already exists.
    ///
    /// Uses a Firestore create (not an upsert), so a concurrent first login
    /// for the same uid can never overwrite the stored role or timestamp.
    pub async fn insert_user(&self, profile: &UserProfile) -> Result<bool, StorageError> {
        let result: Result<UserProfile, _> = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(&profile.uid)
            .object(profile)
            .execute()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(firestore::errors::FirestoreError::DataConflictError(e)) => {
                tracing::debug!(uid = %profile.uid, error = %e, "User profile already exists");
                Ok(false)
            }
            Err(e) => Err(StorageError::Unavailable(e.to_string())),
        }
    }

    /// Delete a user profile.
    pub async fn delete_user(&self, uid: &str) -> Result<(), StorageError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(uid)
            .execute()
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(())
    }
}

impl ProfileStore for FirestoreDb {
    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, StorageError> {
        self.get_user(uid).await
    }

    async fn create_profile(&self, profile: &UserProfile) -> Result<bool, StorageError> {
        self.insert_user(profile).await
    }
}

fn emulator_url(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}
