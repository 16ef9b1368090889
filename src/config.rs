// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Every Firebase connection parameter has a literal fallback. The local
//! emulator suite is only used when `APP_HOSTNAME=localhost` is set.

use std::env;

/// Host name that switches all clients over to the local emulators.
pub const LOOPBACK_HOSTNAME: &str = "localhost";

/// Auth emulator base URL.
pub const AUTH_EMULATOR_URL: &str = "http://localhost:9099";
/// Firestore emulator host:port.
pub const FIRESTORE_EMULATOR_HOST: &str = "localhost:8080";

const IDENTITY_TOOLKIT_HOST: &str = "identitytoolkit.googleapis.com";

/// Firebase web app connection parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            api_key: "demo-key".to_string(),
            auth_domain: "demo-project.firebaseapp.com".to_string(),
            project_id: "property-mgmt-local".to_string(),
            storage_bucket: "property-mgmt-local.appspot.com".to_string(),
            messaging_sender_id: "123456789".to_string(),
            app_id: "1:123456789:web:abcdef".to_string(),
        }
    }
}

impl FirebaseConfig {
    /// Read each parameter from the environment, keeping the default when unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_key: env_or("FIREBASE_API_KEY", defaults.api_key),
            auth_domain: env_or("FIREBASE_AUTH_DOMAIN", defaults.auth_domain),
            project_id: env_or("FIREBASE_PROJECT_ID", defaults.project_id),
            storage_bucket: env_or("FIREBASE_STORAGE_BUCKET", defaults.storage_bucket),
            messaging_sender_id: env_or(
                "FIREBASE_MESSAGING_SENDER_ID",
                defaults.messaging_sender_id,
            ),
            app_id: env_or("FIREBASE_APP_ID", defaults.app_id),
        }
    }
}

/// Where the identity and document clients should send their requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    /// Identity Toolkit REST base, e.g. `https://identitytoolkit.googleapis.com/v1`.
    pub identity_toolkit_url: String,
    /// Firestore emulator `host:port`, or `None` for the public service.
    pub firestore_emulator_host: Option<String>,
}

impl ServiceEndpoints {
    /// Public Google endpoints.
    pub fn production() -> Self {
        Self {
            identity_toolkit_url: format!("https://{IDENTITY_TOOLKIT_HOST}/v1"),
            firestore_emulator_host: None,
        }
    }

    /// Local emulator suite endpoints.
    pub fn emulator() -> Self {
        Self {
            identity_toolkit_url: format!("{AUTH_EMULATOR_URL}/{IDENTITY_TOOLKIT_HOST}/v1"),
            firestore_emulator_host: Some(FIRESTORE_EMULATOR_HOST.to_string()),
        }
    }

    pub fn is_emulator(&self) -> bool {
        self.firestore_emulator_host.is_some()
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Firebase web app parameters
    pub firebase: FirebaseConfig,
    /// Host name this process is serving as; `localhost` selects the emulators
    pub app_hostname: Option<String>,
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        // Unset means production; the emulators must be asked for by name.
        let app_hostname = match env::var("APP_HOSTNAME") {
            Ok(v) if v.trim().is_empty() => return Err(ConfigError::Invalid("APP_HOSTNAME")),
            Ok(v) => Some(v.trim().to_string()),
            Err(_) => None,
        };

        Ok(Self {
            firebase: FirebaseConfig::from_env(),
            app_hostname,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            firebase: FirebaseConfig {
                project_id: "test-project".to_string(),
                ..FirebaseConfig::default()
            },
            app_hostname: Some(LOOPBACK_HOSTNAME.to_string()),
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
        }
    }

    /// Whether this process runs in a local development context.
    pub fn is_local_dev(&self) -> bool {
        self.app_hostname
            .as_deref()
            .is_some_and(|host| host.eq_ignore_ascii_case(LOOPBACK_HOSTNAME))
    }

    /// Endpoints for the current mode.
    pub fn endpoints(&self) -> ServiceEndpoints {
        if self.is_local_dev() {
            ServiceEndpoints::emulator()
        } else {
            ServiceEndpoints::production()
        }
    }
}

fn env_or(name: &str, default: String) -> String {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
