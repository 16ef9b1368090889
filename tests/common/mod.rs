// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use property_session::config::{Config, ServiceEndpoints};
use property_session::db::{FirestoreDb, InMemoryProfileStore, ProfileStore};
use property_session::error::{AuthError, StorageError};
use property_session::models::{Identity, UserProfile};
use property_session::routes::create_router;
use property_session::services::{
    ConsentRequest, ConsentSurface, FirebaseTokenVerifier, IdentityProvider,
};
use property_session::AppState;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project", &ServiceEndpoints::emulator())
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Generate a unique uid for test isolation.
#[allow(dead_code)]
pub fn unique_uid() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("test-uid-{nanos}")
}

#[allow(dead_code)]
pub fn test_identity(uid: &str) -> Identity {
    Identity {
        uid: uid.to_string(),
        email: Some(format!("{uid}@example.com")),
        display_name: Some("Test User".to_string()),
        provider_id: "google.com".to_string(),
        id_token: "id-token".to_string(),
        refresh_token: "refresh-token".to_string(),
        expires_in: 3600,
        is_new_user: true,
    }
}

// ─── Fake identity provider ──────────────────────────────────────

/// Identity provider whose sign-in outcome is fixed up front.
#[allow(dead_code)]
pub struct FakeProvider {
    outcome: Result<Identity, AuthError>,
    signed_in: Mutex<bool>,
    pub sign_ins: AtomicUsize,
}

#[allow(dead_code)]
impl FakeProvider {
    pub fn succeeding(identity: Identity) -> Self {
        Self {
            outcome: Ok(identity),
            signed_in: Mutex::new(false),
            sign_ins: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: AuthError) -> Self {
        Self {
            outcome: Err(error),
            signed_in: Mutex::new(false),
            sign_ins: AtomicUsize::new(0),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        *self.signed_in.lock().unwrap()
    }
}

impl IdentityProvider for FakeProvider {
    async fn sign_in_interactive(&self) -> Result<Identity, AuthError> {
        self.sign_ins.fetch_add(1, Ordering::SeqCst);
        let identity = self.outcome.clone()?;
        *self.signed_in.lock().unwrap() = true;
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let mut signed_in = self.signed_in.lock().unwrap();
        if !*signed_in {
            return Err(AuthError::NoSession);
        }
        *signed_in = false;
        Ok(())
    }
}

// ─── Failing profile store ───────────────────────────────────────

/// Profile store wrapper that can fail reads or writes.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct FlakyStore {
    pub inner: InMemoryProfileStore,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl ProfileStore for FlakyStore {
    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::Unavailable("permission denied".to_string()));
        }
        self.inner.get_profile(uid).await
    }

    async fn create_profile(&self, profile: &UserProfile) -> Result<bool, StorageError> {
        if self.fail_writes {
            return Err(StorageError::Unavailable("permission denied".to_string()));
        }
        self.inner.create_profile(profile).await
    }
}

// ─── Scripted consent surface ────────────────────────────────────

#[allow(dead_code)]
pub const FAKE_CALLBACK_URL: &str = "http://127.0.0.1:1/__/auth/handler/test";

/// Consent surface that "redirects" immediately with a fixed query string,
/// or abandons the flow when `query` is `None`.
#[allow(dead_code)]
pub struct ScriptedConsent {
    query: Option<String>,
    pub presented: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl ScriptedConsent {
    pub fn redirecting(query: &str) -> Self {
        Self {
            query: Some(query.to_string()),
            presented: Mutex::new(Vec::new()),
        }
    }

    pub fn abandoned() -> Self {
        Self {
            query: None,
            presented: Mutex::new(Vec::new()),
        }
    }
}

impl ConsentSurface for ScriptedConsent {
    async fn prepare(&self) -> Result<ConsentRequest, AuthError> {
        let (tx, rx) = oneshot::channel();
        if let Some(query) = &self.query {
            let _ = tx.send(format!("{FAKE_CALLBACK_URL}{query}"));
        }
        Ok(ConsentRequest::new(FAKE_CALLBACK_URL, rx))
    }

    fn present(&self, authorization_url: &str) -> Result<(), AuthError> {
        self.presented
            .lock()
            .unwrap()
            .push(authorization_url.to_string());
        Ok(())
    }
}

// ─── Fake Identity Toolkit server ────────────────────────────────

/// Canned behaviour and call log for the fake Identity Toolkit.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeToolkit {
    /// Error message to return from signInWithIdp, if any
    pub reject_with: Option<String>,
    pub create_auth_uri_calls: AtomicUsize,
    pub sign_in_calls: AtomicUsize,
    pub last_request_uri: Mutex<Option<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAuthUriBody {
    provider_id: String,
    continue_uri: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInBody {
    request_uri: String,
    session_id: String,
}

async fn fake_create_auth_uri(
    State(fake): State<Arc<FakeToolkit>>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<CreateAuthUriBody>,
) -> impl IntoResponse {
    fake.create_auth_uri_calls.fetch_add(1, Ordering::SeqCst);
    if params.get("key").map(String::as_str) != Some("test-key") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"code": 400, "message": "INVALID_API_KEY"}})),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "kind": "identitytoolkit#CreateAuthUriResponse",
            "providerId": body.provider_id,
            "authUri": format!("https://accounts.example/o/oauth2/auth?redirect_uri={}", body.continue_uri),
            "sessionId": "session-1",
        })),
    )
}

async fn fake_sign_in_with_idp(
    State(fake): State<Arc<FakeToolkit>>,
    Json(body): Json<SignInBody>,
) -> impl IntoResponse {
    fake.sign_in_calls.fetch_add(1, Ordering::SeqCst);
    *fake.last_request_uri.lock().unwrap() = Some(body.request_uri.clone());

    if let Some(message) = &fake.reject_with {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"code": 400, "message": message}})),
        );
    }

    if body.session_id != "session-1" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"code": 400, "message": "INVALID_SESSION"}})),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "providerId": "google.com",
            "localId": "uid-google-1",
            "email": "ada@example.com",
            "displayName": "Ada Lovelace",
            "idToken": "header.payload.sig",
            "refreshToken": "refresh-1",
            "expiresIn": "3600",
            "isNewUser": true,
        })),
    )
}

/// Serve a fake Identity Toolkit on a loopback port; returns its `/v1` base URL.
#[allow(dead_code)]
pub async fn spawn_fake_toolkit(fake: Arc<FakeToolkit>) -> String {
    let app = Router::new()
        .route("/v1/accounts:createAuthUri", post(fake_create_auth_uri))
        .route("/v1/accounts:signInWithIdp", post(fake_sign_in_with_idp))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/v1")
}

// ─── API app ─────────────────────────────────────────────────────

/// Create a test app over an in-memory profile store.
/// Uses the emulator verifier, which accepts unsigned tokens.
#[allow(dead_code)]
pub fn create_test_app(profiles: InMemoryProfileStore) -> axum::Router {
    let config = Config::test_default();
    let token_verifier = Arc::new(FirebaseTokenVerifier::new(&config).unwrap());

    let state = Arc::new(AppState {
        config,
        profiles,
        token_verifier,
    });

    create_router(state)
}

/// Build an unsigned emulator-style ID token for `uid` in `test-project`.
#[allow(dead_code)]
pub fn emulator_id_token(uid: &str) -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();
    let claims = json!({
        "iss": "https://securetoken.google.com/test-project",
        "aud": "test-project",
        "sub": uid,
        "user_id": uid,
        "iat": now,
        "exp": now + 3600,
        "email": format!("{uid}@example.com"),
        "firebase": {"sign_in_provider": "google.com"},
    });

    format!(
        "{}.{}.",
        URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    )
}
