// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Principals and the identity store they are loaded from.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use super::{AuthoritySet, Role};
use crate::error::StoreResult;

// =============================================================================
// Principal
// =============================================================================

/// An authenticated identity subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Stable unique identity, usually an email address.
    pub identity: String,
    /// The single assigned role.
    pub role: Role,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Principal {
    /// Creates a new principal.
    pub fn new(identity: impl Into<String>, role: Role) -> Self {
        Self {
            identity: identity.into(),
            role,
            display_name: None,
        }
    }

    /// Sets the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Returns the identity.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Derives the authorities of this principal's role.
    pub fn authorities(&self) -> AuthoritySet {
        self.role.authorities()
    }
}

// =============================================================================
// IdentityStore
// =============================================================================

/// Read-only lookup of principals by identity.
///
/// Implementations may be slow or fail; callers treat an error the same as a
/// missing principal.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Finds a principal by identity. Returns `Ok(None)` if there is none.
    async fn find_by_identity(&self, identity: &str) -> StoreResult<Option<Principal>>;
}

/// In-memory identity store.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    principals: DashMap<String, Principal>,
}

impl MemoryIdentityStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a principal, replacing any with the same identity.
    pub fn insert(&self, principal: Principal) {
        self.principals.insert(principal.identity.clone(), principal);
    }

    /// Adds a principal (builder form).
    pub fn with_principal(self, principal: Principal) -> Self {
        self.insert(principal);
        self
    }

    /// Removes a principal.
    pub fn remove(&self, identity: &str) -> Option<Principal> {
        self.principals.remove(identity).map(|(_, p)| p)
    }

    /// Returns the number of principals.
    pub fn len(&self) -> usize {
        self.principals.len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.principals.is_empty()
    }
}

impl FromIterator<Principal> for MemoryIdentityStore {
    fn from_iter<I: IntoIterator<Item = Principal>>(iter: I) -> Self {
        let store = Self::new();
        for principal in iter {
            store.insert(principal);
        }
        store
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_by_identity(&self, identity: &str) -> StoreResult<Option<Principal>> {
        Ok(self.principals.get(identity).map(|p| p.value().clone()))
    }
}

// =============================================================================
// Tests
// =============================================================================
