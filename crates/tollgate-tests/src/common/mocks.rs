// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! Store implementations for exercising the degraded paths of the
//! authenticator.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tollgate_auth::{
    IdentityStore, LedgerEntry, MemoryIdentityStore, Principal, RevocationLedger, StoreError,
    StoreResult,
};

// =============================================================================
// Failing Stores
// =============================================================================

/// An identity store whose every lookup fails.
#[derive(Debug, Default)]
pub struct FailingIdentityStore;

#[async_trait]
impl IdentityStore for FailingIdentityStore {
    async fn find_by_identity(&self, _identity: &str) -> StoreResult<Option<Principal>> {
        Err(StoreError::unavailable("identity store offline"))
    }
}

/// A ledger whose every operation fails.
#[derive(Debug, Default)]
pub struct FailingLedger;

#[async_trait]
impl RevocationLedger for FailingLedger {
    async fn record(&self, _entry: LedgerEntry) -> StoreResult<()> {
        Err(StoreError::unavailable("ledger offline"))
    }

    async fn find(&self, _token: &str) -> StoreResult<Option<LedgerEntry>> {
        Err(StoreError::unavailable("ledger offline"))
    }

    async fn is_usable(&self, _token: &str) -> StoreResult<bool> {
        Err(StoreError::unavailable("ledger offline"))
    }

    async fn mark_revoked(&self, _token: &str) -> StoreResult<bool> {
        Err(StoreError::unavailable("ledger offline"))
    }

    async fn mark_expired(&self, _token: &str) -> StoreResult<bool> {
        Err(StoreError::unavailable("ledger offline"))
    }

    async fn usable_tokens_for(&self, _identity: &str) -> StoreResult<Vec<LedgerEntry>> {
        Err(StoreError::unavailable("ledger offline"))
    }

    async fn mark_all_revoked_for(&self, _identity: &str) -> StoreResult<usize> {
        Err(StoreError::unavailable("ledger offline"))
    }
}

// =============================================================================
// Counting Store
// =============================================================================

/// An in-memory identity store that counts lookups.
#[derive(Debug, Default)]
pub struct CountingIdentityStore {
    inner: MemoryIdentityStore,
    lookups: AtomicUsize,
}

impl CountingIdentityStore {
    /// Wraps an existing store.
    pub fn new(inner: MemoryIdentityStore) -> Self {
        Self {
            inner,
            lookups: AtomicUsize::new(0),
        }
    }

    /// Number of lookups so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityStore for CountingIdentityStore {
    async fn find_by_identity(&self, identity: &str) -> StoreResult<Option<Principal>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_identity(identity).await
    }
}
