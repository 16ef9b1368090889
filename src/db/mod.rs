// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (Firestore) and the profile store abstraction.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::InMemoryProfileStore;

use crate::error::StorageError;
use crate::models::UserProfile;
use std::future::Future;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
}

/// Storage for user profile documents keyed by uid.
pub trait ProfileStore: Send + Sync {
    /// Fetch the profile for `uid`, if one has been provisioned.
    fn get_profile(
        &self,
        uid: &str,
    ) -> impl Future<Output = Result<Option<UserProfile>, StorageError>> + Send;

    /// Create the profile document only if none exists yet.
    ///
    /// Returns `true` if this call created it, `false` if a document was
    /// already present (the stored document is left untouched).
    fn create_profile(
        &self,
        profile: &UserProfile,
    ) -> impl Future<Output = Result<bool, StorageError>> + Send;
}
