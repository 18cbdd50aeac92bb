// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `verify` command.

use chrono::Utc;
use tollgate_auth::{Claims, ClaimsCodec, TokenFingerprint};

use crate::cli::{Cli, OutputFormat, VerifyArgs};
use crate::error::BinResult;

/// Executes the `verify` command.
///
/// Only the signature and expiry are checked. The identity store and the
/// revocation ledger belong to the running service.
pub fn verify(cli: &Cli, args: &VerifyArgs) -> BinResult<()> {
    let config = super::load_config(cli)?;
    let codec = ClaimsCodec::from_config(&config.jwt)?;

    let token = args.token.trim();
    let fingerprint = TokenFingerprint::of(token);

    let claims = match codec.verify_at(token, Utc::now().timestamp()) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!(error = %e, fingerprint = %fingerprint.short(), "Token rejected");
            return Err(e.into());
        }
    };

    match args.format {
        OutputFormat::Text => print_text(&claims, &fingerprint),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "fingerprint": fingerprint,
                "claims": claims,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn print_text(claims: &Claims, fingerprint: &TokenFingerprint) {
    println!("✓ Token is valid");
    println!();
    println!("  Subject:     {}", claims.subject());
    if let Some(issued_at) = claims.issued_at() {
        println!("  Issued at:   {}", issued_at.to_rfc3339());
    }
    if let Some(expires_at) = claims.expires_at() {
        println!("  Expires at:  {}", expires_at.to_rfc3339());
    }
    println!("  Fingerprint: {}", fingerprint);

    if !claims.extra.is_empty() {
        println!();
        println!("Claims:");
        for (name, value) in &claims.extra {
            println!("  {}: {}", name, value);
        }
    }
}
