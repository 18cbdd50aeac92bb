// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-memory revocation ledger.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::{LedgerEntry, RevocationLedger, TokenFingerprint};
use crate::error::StoreResult;

/// Concurrent in-memory ledger.
///
/// Each update takes the shard write lock of its key, so a revocation is
/// visible to every lookup that starts after the update returns.
///
/// By default a token with no entry is usable: only a recorded flag can
/// refuse a token. In strict mode a token must have been recorded.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    entries: DashMap<TokenFingerprint, LedgerEntry>,
    strict: bool,
}

impl MemoryLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty ledger that refuses unrecorded tokens.
    pub fn strict() -> Self {
        Self {
            entries: DashMap::new(),
            strict: true,
        }
    }

    /// Returns `true` if unrecorded tokens are refused.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Returns the number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn update(&self, token: &str, apply: impl FnOnce(&mut LedgerEntry)) -> bool {
        match self.entries.get_mut(&TokenFingerprint::of(token)) {
            Some(mut entry) => {
                apply(entry.value_mut());
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl RevocationLedger for MemoryLedger {
    async fn record(&self, entry: LedgerEntry) -> StoreResult<()> {
        match self.entries.entry(entry.fingerprint.clone()) {
            Entry::Occupied(mut existing) => existing.get_mut().absorb(&entry),
            Entry::Vacant(slot) => {
                slot.insert(entry);
            }
        }
        Ok(())
    }

    async fn find(&self, token: &str) -> StoreResult<Option<LedgerEntry>> {
        Ok(self
            .entries
            .get(&TokenFingerprint::of(token))
            .map(|e| e.value().clone()))
    }

    async fn is_usable(&self, token: &str) -> StoreResult<bool> {
        Ok(self
            .entries
            .get(&TokenFingerprint::of(token))
            .map_or(!self.strict, |e| e.is_usable()))
    }

    async fn mark_revoked(&self, token: &str) -> StoreResult<bool> {
        let found = self.update(token, LedgerEntry::revoke);
        if found {
            tracing::debug!(fingerprint = %TokenFingerprint::of(token).short(), "Token revoked");
        }
        Ok(found)
    }

    async fn mark_expired(&self, token: &str) -> StoreResult<bool> {
        Ok(self.update(token, LedgerEntry::expire))
    }

    async fn usable_tokens_for(&self, identity: &str) -> StoreResult<Vec<LedgerEntry>> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .filter(|e| e.identity == identity && e.is_usable())
            .map(|e| e.value().clone())
            .collect();
        entries.sort_by_key(|e| e.recorded_at);
        Ok(entries)
    }

    async fn mark_all_revoked_for(&self, identity: &str) -> StoreResult<usize> {
        let mut changed = 0;
        for mut entry in self.entries.iter_mut() {
            if entry.identity == identity && entry.is_usable() {
                entry.revoke();
                entry.expire();
                changed += 1;
            }
        }
        tracing::debug!(identity, changed, "Revoked all tokens for identity");
        Ok(changed)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::TokenKind;

    fn entry(token: &str, identity: &str) -> LedgerEntry {
        LedgerEntry::new(token, identity, TokenKind::Access)
    }

    #[tokio::test]
    async fn test_unknown_token_usable_unless_strict() {
        assert!(MemoryLedger::new().is_usable("never-recorded").await.unwrap());
        assert!(!MemoryLedger::strict().is_usable("never-recorded").await.unwrap());
    }

    #[tokio::test]
    async fn test_record_then_revoke() {
        let ledger = MemoryLedger::new();
        ledger.record(entry("t1", "alice@example.com")).await.unwrap();
        assert!(ledger.is_usable("t1").await.unwrap());

        assert!(ledger.mark_revoked("t1").await.unwrap());
        assert!(!ledger.is_usable("t1").await.unwrap());

        let found = ledger.find("t1").await.unwrap().unwrap();
        assert!(found.revoked);
        assert!(!found.expired);
    }

    #[tokio::test]
    async fn test_mark_unknown_token_reports_miss() {
        let ledger = MemoryLedger::new();
        assert!(!ledger.mark_revoked("ghost").await.unwrap());
        assert!(!ledger.mark_expired("ghost").await.unwrap());
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn test_rerecording_never_clears_flags() {
        let ledger = MemoryLedger::new();
        ledger.record(entry("t1", "alice@example.com")).await.unwrap();
        ledger.mark_expired("t1").await.unwrap();

        ledger.record(entry("t1", "alice@example.com")).await.unwrap();
        assert_eq!(ledger.len(), 1);
        assert!(!ledger.is_usable("t1").await.unwrap());
    }

    #[tokio::test]
    async fn test_mark_all_revoked_for_identity() {
        let ledger = MemoryLedger::new();
        ledger.record(entry("a1", "alice@example.com")).await.unwrap();
        ledger.record(entry("a2", "alice@example.com")).await.unwrap();
        ledger.record(entry("b1", "bob@example.com")).await.unwrap();
        ledger.mark_revoked("a2").await.unwrap();

        assert_eq!(ledger.usable_tokens_for("alice@example.com").await.unwrap().len(), 1);
        assert_eq!(ledger.mark_all_revoked_for("alice@example.com").await.unwrap(), 1);
        assert!(ledger.usable_tokens_for("alice@example.com").await.unwrap().is_empty());
        assert!(!ledger.is_usable("a1").await.unwrap());
        assert!(ledger.is_usable("b1").await.unwrap());
    }

    #[tokio::test]
    async fn test_revocation_visible_across_tasks() {
        let ledger = Arc::new(MemoryLedger::new());
        ledger.record(entry("shared", "alice@example.com")).await.unwrap();

        let writer = {
            let ledger = ledger.clone();
            tokio::spawn(async move { ledger.mark_revoked("shared").await.unwrap() })
        };
        assert!(writer.await.unwrap());

        let reader = {
            let ledger = ledger.clone();
            tokio::spawn(async move { ledger.is_usable("shared").await.unwrap() })
        };
        assert!(!reader.await.unwrap());
    }
}
