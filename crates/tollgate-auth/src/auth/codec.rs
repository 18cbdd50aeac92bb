// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Signed claims encoding and verification.
//!
//! Tokens use the compact three-segment form (`header.payload.signature`)
//! signed with HMAC-SHA256. Every read of a claim goes through
//! [`ClaimsCodec::decode_and_verify`]; there is no unverified decode.

use std::fmt;
use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::{Claims, ExtraClaims, Principal, RESERVED_CLAIMS};
use crate::config::JwtConfig;
use crate::error::{AuthResult, TokenError, TokenResult};

/// The only accepted signing algorithm.
pub const ALGORITHM: Algorithm = Algorithm::HS256;

// =============================================================================
// ClaimsCodec
// =============================================================================

/// Encodes and verifies signed claims with a process-wide symmetric key.
///
/// The key is derived once at construction and never mutated, so a codec can
/// be shared across tasks behind an `Arc` without locking.
#[derive(Clone)]
pub struct ClaimsCodec {
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl ClaimsCodec {
    /// Creates a codec from a base64-encoded secret.
    pub fn new(secret: impl Into<String>) -> AuthResult<Self> {
        Self::from_config(&JwtConfig::new(secret))
    }

    /// Creates a codec from the signing configuration.
    pub fn from_config(config: &JwtConfig) -> AuthResult<Self> {
        let key = config.key_bytes()?;

        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked against an injected clock with exact comparison.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Ok(Self {
            encoding_key: Arc::new(EncodingKey::from_secret(&key)),
            decoding_key: Arc::new(DecodingKey::from_secret(&key)),
            validation: Arc::new(validation),
        })
    }

    /// Encodes and signs a claims set.
    ///
    /// Extra claims named `sub`, `iat` or `exp` are dropped; the explicit
    /// arguments always win.
    pub fn encode(
        &self,
        subject: &str,
        extra: &ExtraClaims,
        issued_at: i64,
        expires_at: i64,
    ) -> TokenResult<String> {
        let extra = extra
            .iter()
            .filter(|(name, _)| {
                let reserved = RESERVED_CLAIMS.contains(&name.as_str());
                if reserved {
                    tracing::warn!(claim = %name, "Ignoring extra claim with a reserved name");
                }
                !reserved
            })
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at,
            exp: expires_at,
            extra,
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::encoding(e.to_string()))
    }

    /// Verifies the signature and structure of a token and returns its claims.
    ///
    /// Expiry is not checked here; see [`ClaimsCodec::verify_at`].
    pub fn decode_and_verify(&self, token: &str) -> TokenResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::from)
    }

    /// Verifies a token and rejects it if it is expired at `now`.
    pub fn verify_at(&self, token: &str, now: i64) -> TokenResult<Claims> {
        let claims = self.decode_and_verify(token)?;
        if claims.is_expired_at(now) {
            return Err(TokenError::Expired {
                expired_at: claims.exp,
            });
        }
        Ok(claims)
    }

    /// Verifies a token and applies `selector` to its claims.
    pub fn extract_claim<T, F>(&self, token: &str, selector: F) -> TokenResult<T>
    where
        F: FnOnce(&Claims) -> T,
    {
        self.decode_and_verify(token).map(|claims| selector(&claims))
    }

    /// Returns the verified subject of a token.
    pub fn extract_subject(&self, token: &str) -> TokenResult<String> {
        self.extract_claim(token, |claims| claims.sub.clone())
    }

    /// Returns the verified expiry of a token (Unix seconds).
    pub fn extract_expiration(&self, token: &str) -> TokenResult<i64> {
        self.extract_claim(token, |claims| claims.exp)
    }

    /// Returns `true` if the token verifies, belongs to `principal` and is
    /// not expired at `now`.
    pub fn is_token_valid(&self, token: &str, principal: &Principal, now: i64) -> bool {
        match self.verify_at(token, now) {
            Ok(claims) => claims.sub == principal.identity,
            Err(_) => false,
        }
    }
}

impl fmt::Debug for ClaimsCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClaimsCodec")
            .field("algorithm", &ALGORITHM)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
