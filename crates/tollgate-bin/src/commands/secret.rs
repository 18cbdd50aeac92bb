// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `gen-secret` command.

use base64::{engine::general_purpose::STANDARD, Engine};
use rand::{rngs::OsRng, RngCore};
use tollgate_auth::config::MIN_SECRET_BYTES;

use crate::cli::{Cli, GenSecretArgs};
use crate::error::{BinError, BinResult};

/// Executes the `gen-secret` command.
pub fn gen_secret(_cli: &Cli, args: &GenSecretArgs) -> BinResult<()> {
    let secret = generate_secret(args.bytes)?;

    println!("{}", secret);
    eprintln!();
    eprintln!("Set it as jwt.secret or export TOLLGATE_JWT_SECRET.");
    eprintln!("Keep it out of version control.");

    Ok(())
}

/// Generates a base64-encoded random secret of `bytes` bytes.
pub fn generate_secret(bytes: usize) -> BinResult<String> {
    if bytes < MIN_SECRET_BYTES {
        return Err(BinError::invalid_argument(format!(
            "secret must be at least {} bytes, got {}",
            MIN_SECRET_BYTES, bytes
        )));
    }

    let mut key = vec![0u8; bytes];
    OsRng.fill_bytes(&mut key);
    Ok(STANDARD.encode(&key))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tollgate_auth::JwtConfig;

    #[test]
    fn test_generated_secret_is_usable() {
        let secret = generate_secret(32).unwrap();
        let key = JwtConfig::new(secret).key_bytes().unwrap();
        assert_eq!(key.len(), 32);
    }

    #[test]
    fn test_generated_secrets_differ() {
        assert_ne!(generate_secret(48).unwrap(), generate_secret(48).unwrap());
    }

    #[test]
    fn test_short_secret_rejected() {
        assert!(matches!(
            generate_secret(16),
            Err(BinError::InvalidArgument(_))
        ));
    }
}
