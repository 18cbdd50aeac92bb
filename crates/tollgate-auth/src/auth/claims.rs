// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form claims embedded next to the registered ones.
pub type ExtraClaims = Map<String, Value>;

/// Claim names owned by the codec. Extra claims may not override them.
pub const RESERVED_CLAIMS: &[&str] = &["sub", "iat", "exp"];

/// The verified payload of a token.
///
/// Instances only come out of the codec after the signature has been
/// checked, or are built by the codec right before signing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, the principal identity.
    pub sub: String,

    /// Issued at (Unix seconds).
    pub iat: i64,

    /// Expires at (Unix seconds).
    pub exp: i64,

    /// Extra key-value claims.
    #[serde(flatten)]
    pub extra: ExtraClaims,
}

impl Claims {
    /// Returns the subject.
    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// Returns the issued-at instant.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Returns the expiry instant.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Returns `true` if the claims are expired at `now`.
    ///
    /// Exact comparison: a token whose expiry equals `now` is still valid.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp < now
    }

    /// Returns an extra claim by name.
    pub fn extra(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

// =============================================================================
// Tests
// =============================================================================
