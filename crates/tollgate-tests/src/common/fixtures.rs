// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Pre-built principals and a fully wired authentication stack driven by a
//! manual clock.

use std::sync::Arc;
use std::time::Duration;

use tollgate_auth::{
    Authenticator, IdentityStore, IssuedToken, JwtConfig, LedgerEntry, ManualClock,
    MemoryIdentityStore, MemoryLedger, Principal, RevocationLedger, Role, TokenIssuer,
};

/// Base64 secret decoding to 38 bytes.
pub const TEST_SECRET: &str = "dG9sbGdhdGUtaW50ZWdyYXRpb24tdGVzdC1zaWduaW5nLWtleSE=";

/// A second valid secret, for foreign-key tests.
pub const OTHER_SECRET: &str = "b3RoZXItdG9sbGdhdGUtc2lnbmluZy1rZXktZm9yLXRlc3RzIQ==";

/// Fixed start instant for the manual clock (2023-11-14T22:13:20Z).
pub const EPOCH: i64 = 1_700_000_000;

// =============================================================================
// Principal Fixtures
// =============================================================================

/// Fixture providing the standard principals.
pub struct PrincipalFixtures;

impl PrincipalFixtures {
    /// A manager.
    pub fn alice() -> Principal {
        Principal::new("alice@example.com", Role::Manager).with_display_name("Alice")
    }

    /// A plain user.
    pub fn bob() -> Principal {
        Principal::new("bob@example.com", Role::User).with_display_name("Bob")
    }

    /// An administrator.
    pub fn carol() -> Principal {
        Principal::new("carol@example.com", Role::Admin).with_display_name("Carol")
    }

    /// An identity store holding alice, bob and carol.
    pub fn identity_store() -> MemoryIdentityStore {
        [Self::alice(), Self::bob(), Self::carol()]
            .into_iter()
            .collect()
    }
}

// =============================================================================
// Config Fixtures
// =============================================================================

/// Signing configuration with the test secret and default lifetimes.
pub fn test_jwt_config() -> JwtConfig {
    JwtConfig::new(TEST_SECRET)
}

// =============================================================================
// AuthFixture
// =============================================================================

/// An issuer and an authenticator sharing one codec and one manual clock.
pub struct AuthFixture {
    /// Shared clock. Advance it to move both issuer and authenticator.
    pub clock: ManualClock,
    /// Token issuer.
    pub issuer: TokenIssuer,
    /// Identity store seen by the authenticator.
    pub identities: Arc<dyn IdentityStore>,
    /// Revocation ledger seen by the authenticator.
    pub ledger: Arc<dyn RevocationLedger>,
    /// Authenticator over the stores above.
    pub authenticator: Arc<Authenticator>,
}

impl AuthFixture {
    /// Default stack: standard principals, permissive in-memory ledger.
    pub fn new() -> Self {
        Self::with_config(test_jwt_config())
    }

    /// Default stores with custom lifetimes.
    pub fn with_config(config: JwtConfig) -> Self {
        Self::build(
            config,
            Arc::new(PrincipalFixtures::identity_store()),
            Arc::new(MemoryLedger::new()),
        )
    }

    /// Custom stores with the default configuration.
    pub fn with_stores(
        identities: Arc<dyn IdentityStore>,
        ledger: Arc<dyn RevocationLedger>,
    ) -> Self {
        Self::build(test_jwt_config(), identities, ledger)
    }

    fn build(
        config: JwtConfig,
        identities: Arc<dyn IdentityStore>,
        ledger: Arc<dyn RevocationLedger>,
    ) -> Self {
        let clock = ManualClock::at_timestamp(EPOCH);
        let issuer = TokenIssuer::from_config(&config)
            .expect("test config is valid")
            .with_clock(Arc::new(clock.clone()));
        let authenticator = Authenticator::new(
            issuer.codec().clone(),
            identities.clone(),
            ledger.clone(),
        )
        .with_clock(Arc::new(clock.clone()));

        Self {
            clock,
            issuer,
            identities,
            ledger,
            authenticator: Arc::new(authenticator),
        }
    }

    /// Issues an access token and records it in the ledger.
    pub async fn issue_recorded(&self, principal: &Principal) -> IssuedToken {
        let token = self
            .issuer
            .issue_access_token(principal, None)
            .expect("issuance succeeds");
        self.ledger
            .record(LedgerEntry::for_issued(&token))
            .await
            .expect("ledger accepts entry");
        token
    }

    /// Moves the shared clock forward.
    pub fn advance(&self, by: Duration) {
        self.clock.advance(chrono::Duration::from_std(by).expect("duration in range"));
    }
}

impl Default for AuthFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats a bearer `Authorization` header value.
pub fn bearer(token: &IssuedToken) -> String {
    format!("Bearer {}", token.as_str())
}
