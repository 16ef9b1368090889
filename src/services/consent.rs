// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Interactive consent surfaces for federated sign-in.
//!
//! A consent surface shows the provider's authorization page to the user
//! and waits for the provider to redirect back. The loopback surface does
//! this for native apps: it listens on `127.0.0.1` and resolves on the
//! first request to its one-time callback path.

use crate::error::AuthError;
use axum::{extract::OriginalUri, extract::State, response::Html, routing::get, Router};
use ring::rand::{SecureRandom, SystemRandom};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;

/// Shows an authorization URL to the user.
pub type Presenter = Arc<dyn Fn(&str) + Send + Sync>;

/// A consent surface the sign-in flow can drive.
pub trait ConsentSurface: Send + Sync {
    /// Prepare the redirect target before the authorization URL exists.
    fn prepare(&self) -> impl Future<Output = Result<ConsentRequest, AuthError>> + Send;

    /// Put the authorization URL in front of the user.
    fn present(&self, authorization_url: &str) -> Result<(), AuthError>;
}

/// A pending consent: where the provider should redirect, and the
/// channel that yields the redirect once it arrives.
pub struct ConsentRequest {
    callback_url: String,
    redirect: oneshot::Receiver<String>,
    server: Option<JoinHandle<()>>,
}

impl ConsentRequest {
    pub fn new(callback_url: impl Into<String>, redirect: oneshot::Receiver<String>) -> Self {
        Self {
            callback_url: callback_url.into(),
            redirect,
            server: None,
        }
    }

    pub fn callback_url(&self) -> &str {
        &self.callback_url
    }

    /// Suspend until the user finishes (or abandons) the consent page.
    ///
    /// Resolves to the full URL the provider redirected to. A redirect
    /// carrying an OAuth `error` parameter is reported as cancellation
    /// (`access_denied`) or rejection (anything else).
    pub async fn wait(mut self) -> Result<String, AuthError> {
        let redirect = (&mut self.redirect)
            .await
            .map_err(|_| AuthError::Cancelled)?;

        check_redirect(&redirect)?;
        Ok(redirect)
    }
}

impl Drop for ConsentRequest {
    fn drop(&mut self) {
        if let Some(server) = self.server.take() {
            server.abort();
        }
    }
}

/// Consent surface that receives the redirect on a loopback port.
pub struct LoopbackConsent {
    presenter: Presenter,
    rng: SystemRandom,
}

impl Default for LoopbackConsent {
    fn default() -> Self {
        Self::new(Arc::new(|url: &str| {
            tracing::info!(url, "Open this URL to sign in");
        }))
    }
}

impl LoopbackConsent {
    pub fn new(presenter: Presenter) -> Self {
        Self {
            presenter,
            rng: SystemRandom::new(),
        }
    }

    fn callback_nonce(&self) -> Result<String, AuthError> {
        let mut bytes = [0u8; 16];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| AuthError::Provider("failed to generate callback nonce".to_string()))?;
        Ok(hex::encode(bytes))
    }
}

#[derive(Clone)]
struct CallbackState {
    origin: String,
    sender: Arc<Mutex<Option<oneshot::Sender<String>>>>,
}

async fn handle_callback(
    State(state): State<CallbackState>,
    OriginalUri(uri): OriginalUri,
) -> Html<&'static str> {
    if let Some(sender) = state.sender.lock().await.take() {
        let _ = sender.send(format!("{}{}", state.origin, uri));
    }

    Html("<html><body>Sign-in complete. You can close this window.</body></html>")
}

impl ConsentSurface for LoopbackConsent {
    async fn prepare(&self) -> Result<ConsentRequest, AuthError> {
        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .map_err(|e| AuthError::Provider(format!("failed to bind callback listener: {e}")))?;
        let addr = listener
            .local_addr()
            .map_err(|e| AuthError::Provider(format!("failed to read callback address: {e}")))?;

        let path = format!("/__/auth/handler/{}", self.callback_nonce()?);
        let origin = format!("http://{addr}");
        let callback_url = format!("{origin}{path}");

        let (tx, rx) = oneshot::channel();
        let state = CallbackState {
            origin,
            sender: Arc::new(Mutex::new(Some(tx))),
        };
        let app = Router::new()
            .route(&path, get(handle_callback))
            .with_state(state);

        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::warn!(error = %e, "Consent callback server stopped");
            }
        });

        tracing::debug!(callback = %callback_url, "Consent callback listening");

        let mut request = ConsentRequest::new(callback_url, rx);
        request.server = Some(server);
        Ok(request)
    }

    fn present(&self, authorization_url: &str) -> Result<(), AuthError> {
        (self.presenter)(authorization_url);
        Ok(())
    }
}

/// OAuth error parameters a provider may put on its redirect.
#[derive(Debug, Default)]
struct RedirectParams {
    error: Option<String>,
    error_description: Option<String>,
}

impl RedirectParams {
    fn from_url(redirect: &str) -> Result<Self, AuthError> {
        let url = reqwest::Url::parse(redirect)
            .map_err(|e| AuthError::Provider(format!("invalid redirect URL: {e}")))?;

        let mut params = Self::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "error" => params.error = Some(value.into_owned()),
                "error_description" => params.error_description = Some(value.into_owned()),
                _ => {}
            }
        }
        Ok(params)
    }
}

/// Map OAuth error parameters on a redirect URL to an [`AuthError`].
fn check_redirect(redirect: &str) -> Result<(), AuthError> {
    let params = RedirectParams::from_url(redirect)?;

    match params.error {
        None => Ok(()),
        Some(error) if error == "access_denied" => Err(AuthError::Cancelled),
        Some(error) => Err(AuthError::Rejected(params.error_description.unwrap_or(error))),
    }
}
