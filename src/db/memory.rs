// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process profile store.

use crate::db::ProfileStore;
use crate::error::StorageError;
use crate::models::UserProfile;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// Profile store backed by a concurrent map, shared between clones.
#[derive(Clone, Default)]
pub struct InMemoryProfileStore {
    profiles: Arc<DashMap<String, UserProfile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Snapshot of the stored profile for `uid`.
    pub fn get(&self, uid: &str) -> Option<UserProfile> {
        self.profiles.get(uid).map(|entry| entry.value().clone())
    }
}

impl ProfileStore for InMemoryProfileStore {
    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, StorageError> {
        Ok(self.get(uid))
    }

    async fn create_profile(&self, profile: &UserProfile) -> Result<bool, StorageError> {
        match self.profiles.entry(profile.uid.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(profile.clone());
                Ok(true)
            }
        }
    }
}
