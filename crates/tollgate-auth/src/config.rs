// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Signing key and token lifetime configuration.

use std::fmt;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// Minimum decoded key length for HMAC-SHA256 (256 bits).
pub const MIN_SECRET_BYTES: usize = 32;

/// Default access token lifetime (24 hours).
pub const DEFAULT_ACCESS_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default refresh token lifetime (7 days).
pub const DEFAULT_REFRESH_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

// =============================================================================
// JwtConfig
// =============================================================================

/// Token signing configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    /// Base64-encoded symmetric signing secret.
    #[serde(skip_serializing)]
    pub secret: Option<String>,

    /// Access token lifetime.
    #[serde(rename = "access_token_ttl_secs", with = "duration_secs")]
    pub access_token_ttl: Duration,

    /// Refresh token lifetime.
    #[serde(rename = "refresh_token_ttl_secs", with = "duration_secs")]
    pub refresh_token_ttl: Duration,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: None, // Must be set by the operator
            access_token_ttl: DEFAULT_ACCESS_TOKEN_TTL,
            refresh_token_ttl: DEFAULT_REFRESH_TOKEN_TTL,
        }
    }
}

impl JwtConfig {
    /// Creates a configuration with the given base64 secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            ..Default::default()
        }
    }

    /// Sets the access token lifetime.
    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_token_ttl = ttl;
        self
    }

    /// Sets the refresh token lifetime.
    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_token_ttl = ttl;
        self
    }

    /// Decodes the secret into raw key bytes.
    ///
    /// Fails with [`AuthError::KeyMisconfigured`] if the secret is missing,
    /// not valid base64, or shorter than [`MIN_SECRET_BYTES`] once decoded.
    pub fn key_bytes(&self) -> AuthResult<Vec<u8>> {
        let secret = self
            .secret
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AuthError::key_misconfigured("signing secret is not configured"))?;

        let bytes = STANDARD
            .decode(secret)
            .map_err(|e| AuthError::key_misconfigured(format!("signing secret is not valid base64: {e}")))?;

        if bytes.len() < MIN_SECRET_BYTES {
            return Err(AuthError::key_misconfigured(format!(
                "signing secret decodes to {} bytes, at least {} required",
                bytes.len(),
                MIN_SECRET_BYTES
            )));
        }

        Ok(bytes)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AuthResult<()> {
        self.key_bytes()?;

        if self.access_token_ttl.is_zero() {
            return Err(AuthError::invalid_config("access_token_ttl_secs", "cannot be zero"));
        }
        if self.refresh_token_ttl.is_zero() {
            return Err(AuthError::invalid_config("refresh_token_ttl_secs", "cannot be zero"));
        }
        if self.refresh_token_ttl < self.access_token_ttl {
            tracing::warn!(
                access_ttl_secs = self.access_token_ttl.as_secs(),
                refresh_ttl_secs = self.refresh_token_ttl.as_secs(),
                "Refresh token lifetime is shorter than access token lifetime"
            );
        }
        Ok(())
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .finish()
    }
}

// =============================================================================
// Duration serialization
// =============================================================================

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// =============================================================================
// Tests
// =============================================================================
