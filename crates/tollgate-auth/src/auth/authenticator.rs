// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Per-request bearer token validation.
//!
//! [`Authenticator`] runs the full check sequence for one presented
//! credential and returns an [`AuthOutcome`]. It never returns an error:
//! every failure, including a failing identity store or ledger, ends in
//! [`AuthOutcome::Anonymous`] with the reason attached for logging.

use std::fmt;
use std::sync::Arc;

use super::{Authentication, ClaimsCodec, IdentityStore};
use crate::clock::{Clock, SystemClock};
use crate::error::TokenError;
use crate::ledger::{RevocationLedger, TokenFingerprint};

/// Scheme prefix of a bearer `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Extracts the raw token from an `Authorization` header value.
///
/// Returns `None` if the value does not use the bearer scheme.
pub fn bearer_token(header: &str) -> Option<&str> {
    header.strip_prefix(BEARER_PREFIX)
}

// =============================================================================
// AuthOutcome
// =============================================================================

/// Why a request stayed anonymous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnonymousReason {
    /// No header, or a non-bearer scheme.
    MissingCredentials,
    /// The token is structurally invalid.
    Malformed,
    /// The signature does not verify.
    InvalidSignature,
    /// The embedded expiry has passed.
    Expired,
    /// No principal exists for the token subject.
    PrincipalNotFound,
    /// The loaded principal does not match the token subject.
    SubjectMismatch,
    /// The ledger marks the token revoked or expired.
    Revoked,
    /// The identity store failed.
    IdentityLookupFailed,
    /// The revocation ledger failed.
    LedgerUnavailable,
}

impl AnonymousReason {
    /// Returns the reason as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnonymousReason::MissingCredentials => "missing_credentials",
            AnonymousReason::Malformed => "malformed",
            AnonymousReason::InvalidSignature => "invalid_signature",
            AnonymousReason::Expired => "expired",
            AnonymousReason::PrincipalNotFound => "principal_not_found",
            AnonymousReason::SubjectMismatch => "subject_mismatch",
            AnonymousReason::Revoked => "revoked",
            AnonymousReason::IdentityLookupFailed => "identity_lookup_failed",
            AnonymousReason::LedgerUnavailable => "ledger_unavailable",
        }
    }
}

impl fmt::Display for AnonymousReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&TokenError> for AnonymousReason {
    fn from(err: &TokenError) -> Self {
        match err {
            TokenError::InvalidSignature => AnonymousReason::InvalidSignature,
            TokenError::Expired { .. } => AnonymousReason::Expired,
            TokenError::Malformed { .. } | TokenError::Encoding { .. } => AnonymousReason::Malformed,
        }
    }
}

/// Result of authenticating one credential.
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    /// A principal was established.
    Authenticated(Authentication),
    /// No identity was established.
    Anonymous(AnonymousReason),
}

impl AuthOutcome {
    /// Returns `true` if a principal was established.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthOutcome::Authenticated(_))
    }

    /// Returns the authentication, if any.
    pub fn authentication(&self) -> Option<&Authentication> {
        match self {
            AuthOutcome::Authenticated(auth) => Some(auth),
            AuthOutcome::Anonymous(_) => None,
        }
    }

    /// Consumes the outcome and returns the authentication, if any.
    pub fn into_authentication(self) -> Option<Authentication> {
        match self {
            AuthOutcome::Authenticated(auth) => Some(auth),
            AuthOutcome::Anonymous(_) => None,
        }
    }

    /// Returns the anonymous reason, if any.
    pub fn anonymous_reason(&self) -> Option<AnonymousReason> {
        match self {
            AuthOutcome::Authenticated(_) => None,
            AuthOutcome::Anonymous(reason) => Some(*reason),
        }
    }
}

// =============================================================================
// Authenticator
// =============================================================================

/// Validates bearer tokens against the codec, identity store and ledger.
#[derive(Clone)]
pub struct Authenticator {
    codec: Arc<ClaimsCodec>,
    identities: Arc<dyn IdentityStore>,
    ledger: Arc<dyn RevocationLedger>,
    clock: Arc<dyn Clock>,
}

impl Authenticator {
    /// Creates an authenticator using the system clock.
    pub fn new(
        codec: Arc<ClaimsCodec>,
        identities: Arc<dyn IdentityStore>,
        ledger: Arc<dyn RevocationLedger>,
    ) -> Self {
        Self {
            codec,
            identities,
            ledger,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Authenticates the value of an `Authorization` header.
    pub async fn authenticate_header(&self, header: Option<&str>) -> AuthOutcome {
        match header.and_then(bearer_token) {
            Some(token) => self.authenticate_token(token).await,
            None => {
                tracing::debug!("No bearer credentials presented");
                AuthOutcome::Anonymous(AnonymousReason::MissingCredentials)
            }
        }
    }

    /// Authenticates a raw token.
    ///
    /// Checks run in order: signature and structure, expiry, principal
    /// lookup, subject match, ledger. The first failure decides the reason.
    pub async fn authenticate_token(&self, token: &str) -> AuthOutcome {
        let fingerprint = TokenFingerprint::of(token);
        let now = self.clock.timestamp();

        let claims = match self.codec.verify_at(token, now) {
            Ok(claims) => claims,
            Err(e) => return anonymous(AnonymousReason::from(&e), &fingerprint, None),
        };
        let subject = claims.subject();

        let principal = match self.identities.find_by_identity(subject).await {
            Ok(Some(principal)) => principal,
            Ok(None) => {
                return anonymous(AnonymousReason::PrincipalNotFound, &fingerprint, Some(subject))
            }
            Err(e) => {
                tracing::warn!(error = %e, subject, "Identity lookup failed");
                return anonymous(AnonymousReason::IdentityLookupFailed, &fingerprint, Some(subject));
            }
        };

        if principal.identity != subject {
            return anonymous(AnonymousReason::SubjectMismatch, &fingerprint, Some(subject));
        }

        match self.ledger.is_usable(token).await {
            Ok(true) => {}
            Ok(false) => return anonymous(AnonymousReason::Revoked, &fingerprint, Some(subject)),
            Err(e) => {
                tracing::warn!(error = %e, fingerprint = %fingerprint.short(), "Revocation ledger check failed");
                return anonymous(AnonymousReason::LedgerUnavailable, &fingerprint, Some(subject));
            }
        }

        tracing::debug!(
            subject,
            role = %principal.role,
            fingerprint = %fingerprint.short(),
            "Request authenticated"
        );

        let mut auth = Authentication::new(principal).with_token(fingerprint);
        if let Some(expires_at) = claims.expires_at() {
            auth = auth.with_expires_at(expires_at);
        }
        AuthOutcome::Authenticated(auth)
    }
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("codec", &self.codec)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

fn anonymous(
    reason: AnonymousReason,
    fingerprint: &TokenFingerprint,
    subject: Option<&str>,
) -> AuthOutcome {
    tracing::debug!(
        reason = %reason,
        fingerprint = %fingerprint.short(),
        subject = subject.unwrap_or("-"),
        "Token not accepted, continuing anonymously"
    );
    AuthOutcome::Anonymous(reason)
}

// =============================================================================
// Tests
// =============================================================================
