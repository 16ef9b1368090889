// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase client handles, built once at startup and passed to consumers.

use crate::config::{Config, ServiceEndpoints};
use crate::db::FirestoreDb;
use crate::error::{AuthError, SessionError};
use crate::services::consent::ConsentSurface;
use crate::services::identity_toolkit::IdentityToolkitClient;
use crate::services::session::SessionBootstrapper;
use crate::services::sign_in::GoogleSignIn;
use std::sync::Arc;

/// Identity and document client handles for one Firebase project.
pub struct FirebaseServices<C> {
    endpoints: ServiceEndpoints,
    auth: Arc<GoogleSignIn<C>>,
    db: FirestoreDb,
}

impl<C: ConsentSurface> FirebaseServices<C> {
    /// Build the client handles from configuration.
    ///
    /// When the app host is `localhost` both handles point at the local
    /// emulator suite instead of the public service.
    pub async fn initialize(config: &Config, consent: C) -> Result<Self, SessionError> {
        let endpoints = config.endpoints();
        if endpoints.is_emulator() {
            tracing::info!(
                auth = %endpoints.identity_toolkit_url,
                firestore = endpoints.firestore_emulator_host.as_deref().unwrap_or_default(),
                "Using Firebase Emulators"
            );
        }

        let db = FirestoreDb::new(&config.firebase.project_id, &endpoints).await?;
        Self::with_db(config, consent, db)
    }

    /// Build the client handles around an already connected document store.
    pub fn with_db(config: &Config, consent: C, db: FirestoreDb) -> Result<Self, SessionError> {
        let endpoints = config.endpoints();

        let toolkit = IdentityToolkitClient::new(&config.firebase, &endpoints).map_err(|e| {
            AuthError::Transport(format!("failed building Identity Toolkit client: {e}"))
        })?;

        Ok(Self {
            endpoints,
            auth: Arc::new(GoogleSignIn::new(toolkit, consent)),
            db,
        })
    }

    pub fn endpoints(&self) -> &ServiceEndpoints {
        &self.endpoints
    }

    /// Identity handle.
    pub fn auth(&self) -> &Arc<GoogleSignIn<C>> {
        &self.auth
    }

    /// Document handle.
    pub fn db(&self) -> &FirestoreDb {
        &self.db
    }

    /// Session operations over these handles.
    pub fn session(&self) -> SessionBootstrapper<Arc<GoogleSignIn<C>>, FirestoreDb> {
        SessionBootstrapper::new(self.auth.clone(), self.db.clone())
    }
}
