// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider abstraction and the Google sign-in implementation.

use crate::error::AuthError;
use crate::models::Identity;
use crate::services::consent::ConsentSurface;
use crate::services::identity_toolkit::{IdentityToolkitClient, GOOGLE_PROVIDER_ID};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;

/// An identity provider with an interactive sign-in flow.
pub trait IdentityProvider: Send + Sync {
    /// Run the interactive sign-in and make the result the current session.
    fn sign_in_interactive(&self) -> impl Future<Output = Result<Identity, AuthError>> + Send;

    /// End the current session.
    fn sign_out(&self) -> impl Future<Output = Result<(), AuthError>> + Send;
}

impl<P: IdentityProvider> IdentityProvider for Arc<P> {
    async fn sign_in_interactive(&self) -> Result<Identity, AuthError> {
        self.as_ref().sign_in_interactive().await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.as_ref().sign_out().await
    }
}

/// "Sign in with Google" through Firebase Authentication.
pub struct GoogleSignIn<C> {
    toolkit: IdentityToolkitClient,
    consent: C,
    current: RwLock<Option<Identity>>,
}

impl<C: ConsentSurface> GoogleSignIn<C> {
    pub fn new(toolkit: IdentityToolkitClient, consent: C) -> Self {
        Self {
            toolkit,
            consent,
            current: RwLock::new(None),
        }
    }

    pub fn toolkit(&self) -> &IdentityToolkitClient {
        &self.toolkit
    }

    pub fn consent(&self) -> &C {
        &self.consent
    }

    /// The signed-in identity, if any.
    pub async fn current_user(&self) -> Option<Identity> {
        self.current.read().await.clone()
    }
}

impl<C: ConsentSurface> IdentityProvider for GoogleSignIn<C> {
    async fn sign_in_interactive(&self) -> Result<Identity, AuthError> {
        let request = self.consent.prepare().await?;

        let auth_uri = self
            .toolkit
            .create_auth_uri(GOOGLE_PROVIDER_ID, request.callback_url())
            .await?;

        self.consent.present(&auth_uri.auth_uri)?;
        let redirect = request.wait().await?;

        let identity = self
            .toolkit
            .sign_in_with_idp(&redirect, &auth_uri.session_id)
            .await?;

        tracing::info!(
            uid = %identity.uid,
            provider = %identity.provider_id,
            new_user = identity.is_new_user,
            "Signed in"
        );

        *self.current.write().await = Some(identity.clone());
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let previous = self.current.write().await.take();

        match previous {
            Some(identity) => {
                tracing::info!(uid = %identity.uid, "Signed out");
                Ok(())
            }
            None => Err(AuthError::NoSession),
        }
    }
}
