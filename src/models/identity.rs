// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authenticated identity returned by the identity provider.

use std::fmt;

/// Identity of a user who completed sign-in.
///
/// The tokens are kept so the session can be used against Firebase APIs;
/// they are never written to the profile store.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Identity {
    /// Firebase uid
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    /// Provider the user signed in with (e.g. `google.com`)
    pub provider_id: String,
    /// Firebase ID token
    pub id_token: String,
    pub refresh_token: String,
    /// ID token lifetime in seconds
    pub expires_in: u64,
    /// Whether Firebase created the account during this sign-in
    pub is_new_user: bool,
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("uid", &self.uid)
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .field("provider_id", &self.provider_id)
            .field("id_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .field("is_new_user", &self.is_new_user)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_tokens() {
        let identity = Identity {
            uid: "uid-1".to_string(),
            id_token: "secret-id-token".to_string(),
            refresh_token: "secret-refresh".to_string(),
            ..Identity::default()
        };

        let rendered = format!("{identity:?}");
        assert!(rendered.contains("uid-1"));
        assert!(!rendered.contains("secret-id-token"));
        assert!(!rendered.contains("secret-refresh"));
    }
}
