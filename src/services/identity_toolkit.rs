// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase Identity Toolkit REST client (federated sign-in).

use crate::config::{FirebaseConfig, ServiceEndpoints};
use crate::error::AuthError;
use crate::models::Identity;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Provider id for Google sign-in.
pub const GOOGLE_PROVIDER_ID: &str = "google.com";

/// Identity Toolkit error codes that mean the provider refused this user,
/// as opposed to a fault in the service or the request.
const REJECTION_CODES: &[&str] = &[
    "USER_DISABLED",
    "OPERATION_NOT_ALLOWED",
    "INVALID_IDP_RESPONSE",
    "FEDERATED_USER_ID_ALREADY_LINKED",
    "EMAIL_EXISTS",
];

/// Result of `accounts:createAuthUri`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUri {
    /// URL the user must visit to grant consent
    pub auth_uri: String,
    /// Opaque session id to echo back in `signInWithIdp`
    pub session_id: String,
}

/// Thin client over the Identity Toolkit v1 REST API.
#[derive(Clone)]
pub struct IdentityToolkitClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl IdentityToolkitClient {
    /// Create a client for the given project settings and endpoints.
    pub fn new(firebase: &FirebaseConfig, endpoints: &ServiceEndpoints) -> anyhow::Result<Self> {
        Self::with_base_url(&endpoints.identity_toolkit_url, &firebase.api_key)
    }

    /// Create a client against an explicit REST base URL.
    pub fn with_base_url(base_url: &str, api_key: &str) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a federated sign-in: ask for the provider's consent URL.
    pub async fn create_auth_uri(
        &self,
        provider_id: &str,
        continue_uri: &str,
    ) -> Result<AuthUri, AuthError> {
        let request = CreateAuthUriRequest {
            provider_id,
            continue_uri,
        };

        let response: CreateAuthUriResponse = self.post("accounts:createAuthUri", &request).await?;

        let auth_uri = response
            .auth_uri
            .ok_or_else(|| AuthError::Provider("createAuthUri returned no authUri".to_string()))?;
        let session_id = response
            .session_id
            .ok_or_else(|| AuthError::Provider("createAuthUri returned no sessionId".to_string()))?;

        Ok(AuthUri {
            auth_uri,
            session_id,
        })
    }

    /// Finish a federated sign-in with the URL the provider redirected to.
    pub async fn sign_in_with_idp(
        &self,
        request_uri: &str,
        session_id: &str,
    ) -> Result<Identity, AuthError> {
        let request = SignInWithIdpRequest {
            request_uri,
            session_id,
            return_secure_token: true,
            return_idp_credential: true,
        };

        let response: SignInWithIdpResponse = self.post("accounts:signInWithIdp", &request).await?;

        if response.need_confirmation.unwrap_or(false) {
            return Err(AuthError::Rejected(
                "account exists with a different credential".to_string(),
            ));
        }

        let uid = response
            .local_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AuthError::Provider("signInWithIdp returned no localId".to_string()))?;
        let id_token = response
            .id_token
            .ok_or_else(|| AuthError::Provider("signInWithIdp returned no idToken".to_string()))?;

        Ok(Identity {
            uid,
            email: response.email,
            display_name: response.display_name.or(response.full_name),
            provider_id: response
                .provider_id
                .unwrap_or_else(|| GOOGLE_PROVIDER_ID.to_string()),
            id_token,
            refresh_token: response.refresh_token.unwrap_or_default(),
            expires_in: response
                .expires_in
                .as_deref()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            is_new_user: response.is_new_user.unwrap_or(false),
        })
    }

    async fn post<Req, Resp>(&self, method: &str, body: &Req) -> Result<Resp, AuthError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, method);

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::Transport(format!("{method} request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_error(status, &text));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::Provider(format!("invalid {method} response: {e}")))
    }
}

/// Map an Identity Toolkit error response onto an [`AuthError`].
fn classify_error(status: reqwest::StatusCode, body: &str) -> AuthError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|| format!("HTTP {status}"));

    // Messages look like "USER_DISABLED" or "INVALID_IDP_RESPONSE : details".
    let code = message.split(':').next().unwrap_or_default().trim();

    if REJECTION_CODES.contains(&code) {
        AuthError::Rejected(message)
    } else {
        AuthError::Provider(message)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateAuthUriRequest<'a> {
    provider_id: &'a str,
    continue_uri: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAuthUriResponse {
    auth_uri: Option<String>,
    session_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInWithIdpRequest<'a> {
    request_uri: &'a str,
    session_id: &'a str,
    return_secure_token: bool,
    return_idp_credential: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInWithIdpResponse {
    local_id: Option<String>,
    email: Option<String>,
    display_name: Option<String>,
    full_name: Option<String>,
    provider_id: Option<String>,
    id_token: Option<String>,
    refresh_token: Option<String>,
    /// Seconds, encoded as a string
    expires_in: Option<String>,
    is_new_user: Option<bool>,
    need_confirmation: Option<bool>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}
