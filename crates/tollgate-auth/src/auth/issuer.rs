// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Access and refresh token issuance.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ClaimsCodec, ExtraClaims, Principal};
use crate::clock::{Clock, SystemClock};
use crate::config::JwtConfig;
use crate::error::{AuthResult, TokenError, TokenResult};
use crate::ledger::TokenFingerprint;

// =============================================================================
// TokenKind
// =============================================================================

/// The two token kinds. They share a shape and differ only in lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived token presented on every request.
    Access,
    /// Long-lived token used to obtain new access tokens.
    Refresh,
}

impl TokenKind {
    /// Returns the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// IssuedToken
// =============================================================================

/// A freshly signed token.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// The compact token string.
    pub value: String,
    /// Access or refresh.
    pub kind: TokenKind,
    /// Identity the token was issued to.
    pub subject: String,
    /// Issue instant (whole seconds).
    pub issued_at: DateTime<Utc>,
    /// Expiry instant (whole seconds).
    pub expires_at: DateTime<Utc>,
}

impl IssuedToken {
    /// Returns the token string.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns the ledger fingerprint of this token.
    pub fn fingerprint(&self) -> TokenFingerprint {
        TokenFingerprint::of(&self.value)
    }

    /// Returns the validity window.
    pub fn ttl(&self) -> chrono::Duration {
        self.expires_at - self.issued_at
    }
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("fingerprint", &self.fingerprint().short())
            .field("kind", &self.kind)
            .field("subject", &self.subject)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

// =============================================================================
// TokenIssuer
// =============================================================================

/// Builds signed access and refresh tokens for a principal.
///
/// Issuance has no side effects. Recording the result in a
/// [`RevocationLedger`](crate::ledger::RevocationLedger) is up to the caller.
#[derive(Clone)]
pub struct TokenIssuer {
    codec: Arc<ClaimsCodec>,
    clock: Arc<dyn Clock>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    /// Creates an issuer over an existing codec with the configured lifetimes.
    pub fn new(codec: Arc<ClaimsCodec>, config: &JwtConfig) -> Self {
        Self {
            codec,
            clock: Arc::new(SystemClock),
            access_ttl: config.access_token_ttl,
            refresh_ttl: config.refresh_token_ttl,
        }
    }

    /// Creates an issuer and its codec from configuration.
    pub fn from_config(config: &JwtConfig) -> AuthResult<Self> {
        config.validate()?;
        let codec = Arc::new(ClaimsCodec::from_config(config)?);
        Ok(Self::new(codec, config))
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the codec used for signing.
    pub fn codec(&self) -> &Arc<ClaimsCodec> {
        &self.codec
    }

    /// Returns the access token lifetime.
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Returns the refresh token lifetime.
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Issues an access token carrying optional extra claims.
    pub fn issue_access_token(
        &self,
        principal: &Principal,
        extra: Option<ExtraClaims>,
    ) -> TokenResult<IssuedToken> {
        self.issue(
            TokenKind::Access,
            principal,
            &extra.unwrap_or_default(),
            self.access_ttl,
        )
    }

    /// Issues a refresh token. Refresh tokens carry no extra claims.
    pub fn issue_refresh_token(&self, principal: &Principal) -> TokenResult<IssuedToken> {
        self.issue(
            TokenKind::Refresh,
            principal,
            &ExtraClaims::new(),
            self.refresh_ttl,
        )
    }

    fn issue(
        &self,
        kind: TokenKind,
        principal: &Principal,
        extra: &ExtraClaims,
        ttl: Duration,
    ) -> TokenResult<IssuedToken> {
        let issued_at = self.clock.timestamp();
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let expires_at = issued_at.saturating_add(ttl_secs);

        let value = self
            .codec
            .encode(&principal.identity, extra, issued_at, expires_at)?;

        let to_instant = |secs: i64| {
            DateTime::from_timestamp(secs, 0)
                .ok_or_else(|| TokenError::encoding(format!("timestamp {secs} out of range")))
        };

        Ok(IssuedToken {
            value,
            kind,
            subject: principal.identity.clone(),
            issued_at: to_instant(issued_at)?,
            expires_at: to_instant(expires_at)?,
        })
    }
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::clock::ManualClock;
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde_json::Value;

    const NOW: i64 = 1_700_000_000;

    fn issuer(clock: &ManualClock) -> TokenIssuer {
        let config = JwtConfig::new(STANDARD.encode([42u8; 32]))
            .with_access_ttl(Duration::from_secs(300))
            .with_refresh_ttl(Duration::from_secs(3_600));
        TokenIssuer::from_config(&config)
            .unwrap()
            .with_clock(Arc::new(clock.clone()))
    }

    fn alice() -> Principal {
        Principal::new("alice@example.com", Role::Manager)
    }

    #[test]
    fn test_access_token_window() {
        let clock = ManualClock::at_timestamp(NOW);
        let issuer = issuer(&clock);

        let token = issuer.issue_access_token(&alice(), None).unwrap();
        assert_eq!(token.kind, TokenKind::Access);
        assert_eq!(token.subject, "alice@example.com");
        assert_eq!(token.issued_at.timestamp(), NOW);
        assert_eq!(token.expires_at.timestamp(), NOW + 300);
        assert_eq!(token.ttl(), chrono::Duration::seconds(300));

        let claims = issuer.codec().decode_and_verify(token.as_str()).unwrap();
        assert_eq!(claims.sub, "alice@example.com");
        assert_eq!(claims.exp, NOW + 300);
        assert!(claims.extra.is_empty());
    }

    #[test]
    fn test_access_token_carries_extra_claims() {
        let clock = ManualClock::at_timestamp(NOW);
        let mut extra = ExtraClaims::new();
        extra.insert("scope".to_string(), Value::from("reports"));

        let token = issuer(&clock).issue_access_token(&alice(), Some(extra)).unwrap();
        let claims = issuer(&clock).codec().decode_and_verify(&token.value).unwrap();
        assert_eq!(claims.extra("scope"), Some(&Value::from("reports")));
    }

    #[test]
    fn test_refresh_token_outlives_access_token() {
        let clock = ManualClock::at_timestamp(NOW);
        let issuer = issuer(&clock);

        let access = issuer.issue_access_token(&alice(), None).unwrap();
        let refresh = issuer.issue_refresh_token(&alice()).unwrap();
        assert_eq!(refresh.kind, TokenKind::Refresh);
        assert_eq!(refresh.expires_at.timestamp(), NOW + 3_600);
        assert!(refresh.expires_at > access.expires_at);
        assert_ne!(refresh.value, access.value);
    }

    #[test]
    fn test_issue_follows_clock() {
        let clock = ManualClock::at_timestamp(NOW);
        let issuer = issuer(&clock);

        let first = issuer.issue_access_token(&alice(), None).unwrap();
        clock.advance(chrono::Duration::seconds(10));
        let second = issuer.issue_access_token(&alice(), None).unwrap();

        assert_eq!(second.issued_at.timestamp(), NOW + 10);
        assert_ne!(first.fingerprint(), second.fingerprint());
    }

    #[test]
    fn test_from_config_requires_secret() {
        assert!(TokenIssuer::from_config(&JwtConfig::default()).is_err());
    }

    #[test]
    fn test_debug_hides_token_value() {
        let clock = ManualClock::at_timestamp(NOW);
        let token = issuer(&clock).issue_access_token(&alice(), None).unwrap();
        assert!(!format!("{token:?}").contains(&token.value));
    }
}
