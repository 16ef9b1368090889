// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - sign-in, session, token verification, and uploads.

pub mod consent;
pub mod firebase;
pub mod identity_toolkit;
pub mod session;
pub mod sign_in;
pub mod token_verifier;
pub mod uploads;

pub use consent::{ConsentRequest, ConsentSurface, LoopbackConsent, Presenter};
pub use firebase::FirebaseServices;
pub use identity_toolkit::{AuthUri, IdentityToolkitClient, GOOGLE_PROVIDER_ID};
pub use session::SessionBootstrapper;
pub use sign_in::{GoogleSignIn, IdentityProvider};
pub use token_verifier::{FirebaseTokenVerifier, TokenError, VerifiedUser};
pub use uploads::{parse_readings, process_upload, ConsumptionRow, Reading, UploadPath};
