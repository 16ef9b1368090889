// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in with lazy profile provisioning, and sign-out.

use crate::db::ProfileStore;
use crate::error::SessionError;
use crate::models::{Identity, UserProfile};
use crate::services::sign_in::IdentityProvider;

/// Bridges interactive sign-in to a persisted user profile.
pub struct SessionBootstrapper<P, S> {
    provider: P,
    store: S,
}

impl<P: IdentityProvider, S: ProfileStore> SessionBootstrapper<P, S> {
    pub fn new(provider: P, store: S) -> Self {
        Self { provider, store }
    }

    /// Sign in with Google and make sure the user has a profile document.
    ///
    /// The profile is read first and only created when absent, so an
    /// existing role or creation time is never overwritten. If the write
    /// fails the error is returned even though sign-in already succeeded.
    pub async fn login_with_google(&self) -> Result<Identity, SessionError> {
        match self.login_and_provision().await {
            Ok(identity) => Ok(identity),
            Err(e) => {
                tracing::error!(error = %e, "Login failed");
                Err(e)
            }
        }
    }

    async fn login_and_provision(&self) -> Result<Identity, SessionError> {
        let identity = self.provider.sign_in_interactive().await?;

        if self.store.get_profile(&identity.uid).await?.is_none() {
            let profile = UserProfile::for_new_identity(&identity, chrono::Utc::now());
            let created = self.store.create_profile(&profile).await?;

            if created {
                tracing::info!(uid = %identity.uid, role = %profile.role, "Provisioned user profile");
            } else {
                tracing::debug!(uid = %identity.uid, "Profile created concurrently, keeping existing");
            }
        }

        Ok(identity)
    }

    /// End the current session.
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.provider.sign_out().await?;
        Ok(())
    }
}
