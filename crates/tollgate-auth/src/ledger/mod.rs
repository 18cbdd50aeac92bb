// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Revocation ledger.
//!
//! The ledger records issued tokens and two monotonic flags per token,
//! `expired` and `revoked`. A token that verifies cryptographically is still
//! refused if its entry carries either flag.
//!
//! Entries are keyed by a SHA-256 fingerprint of the raw token. The raw value
//! is never stored.

mod memory;

pub use memory::MemoryLedger;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::auth::{IssuedToken, TokenKind};
use crate::error::StoreResult;

// =============================================================================
// TokenFingerprint
// =============================================================================

/// Hex-encoded SHA-256 digest of a raw token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenFingerprint(String);

impl TokenFingerprint {
    /// Fingerprints a raw token.
    pub fn of(token: &str) -> Self {
        Self(hex::encode(Sha256::digest(token.as_bytes())))
    }

    /// Returns the full hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a short prefix suitable for log fields.
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl fmt::Display for TokenFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// LedgerEntry
// =============================================================================

/// Token transport type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenType {
    /// `Authorization: Bearer <token>`.
    #[default]
    Bearer,
}

/// A recorded token and its usability flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Fingerprint of the raw token.
    pub fingerprint: TokenFingerprint,
    /// Identity the token was issued to.
    pub identity: String,
    /// Access or refresh.
    pub kind: TokenKind,
    /// Transport type.
    pub token_type: TokenType,
    /// Set once the token has been retired by policy.
    pub expired: bool,
    /// Set once the token has been explicitly revoked.
    pub revoked: bool,
    /// When the entry was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Creates a fresh entry with both flags cleared.
    pub fn new(token: &str, identity: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            fingerprint: TokenFingerprint::of(token),
            identity: identity.into(),
            kind,
            token_type: TokenType::Bearer,
            expired: false,
            revoked: false,
            recorded_at: Utc::now(),
        }
    }

    /// Creates an entry for a freshly issued token.
    pub fn for_issued(token: &IssuedToken) -> Self {
        let mut entry = Self::new(&token.value, token.subject.clone(), token.kind);
        entry.recorded_at = token.issued_at;
        entry
    }

    /// Returns `true` if neither flag is set.
    pub fn is_usable(&self) -> bool {
        !self.expired && !self.revoked
    }

    /// Marks the entry revoked. There is no way to clear the flag.
    pub fn revoke(&mut self) {
        self.revoked = true;
    }

    /// Marks the entry expired. There is no way to clear the flag.
    pub fn expire(&mut self) {
        self.expired = true;
    }

    /// Folds another entry's flags into this one without ever clearing a flag.
    pub fn absorb(&mut self, other: &LedgerEntry) {
        self.expired |= other.expired;
        self.revoked |= other.revoked;
    }
}

// =============================================================================
// RevocationLedger
// =============================================================================

/// Store of issued tokens and their usability state.
///
/// A call to [`RevocationLedger::mark_revoked`] that has returned must be
/// visible to every later [`RevocationLedger::is_usable`] call.
#[async_trait]
pub trait RevocationLedger: Send + Sync {
    /// Records an issued token. Recording the same token twice keeps the
    /// union of both entries' flags.
    async fn record(&self, entry: LedgerEntry) -> StoreResult<()>;

    /// Looks up the entry for a raw token.
    async fn find(&self, token: &str) -> StoreResult<Option<LedgerEntry>>;

    /// Returns `true` if the token may be used to authenticate.
    async fn is_usable(&self, token: &str) -> StoreResult<bool>;

    /// Marks a token revoked. Returns `false` if the token was never recorded.
    async fn mark_revoked(&self, token: &str) -> StoreResult<bool>;

    /// Marks a token expired. Returns `false` if the token was never recorded.
    async fn mark_expired(&self, token: &str) -> StoreResult<bool>;

    /// Returns every still-usable entry issued to `identity`.
    async fn usable_tokens_for(&self, identity: &str) -> StoreResult<Vec<LedgerEntry>>;

    /// Revokes and expires every usable token of `identity`.
    ///
    /// Returns the number of entries changed.
    async fn mark_all_revoked_for(&self, identity: &str) -> StoreResult<usize>;
}

// =============================================================================
// Tests
// =============================================================================
