// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `issue` command.

use serde_json::Value;
use tollgate_auth::{ExtraClaims, Principal, Role, TokenIssuer, TokenKind};

use crate::cli::{Cli, IssueArgs, OutputFormat};
use crate::error::{BinError, BinResult};

/// Executes the `issue` command.
///
/// Prints the bare token in text mode so the output can be piped.
pub fn issue(cli: &Cli, args: &IssueArgs) -> BinResult<()> {
    let config = super::load_config(cli)?;
    let issuer = TokenIssuer::from_config(&config.jwt)?;

    let role = Role::from(args.role);
    let principal = Principal::new(args.subject.clone(), role);
    let kind = TokenKind::from(args.kind);

    let token = match kind {
        TokenKind::Access => {
            let extra = parse_claims(&args.claims)?;
            issuer.issue_access_token(&principal, Some(extra))?
        }
        TokenKind::Refresh => {
            if !args.claims.is_empty() {
                return Err(BinError::invalid_argument(
                    "refresh tokens do not carry extra claims",
                ));
            }
            issuer.issue_refresh_token(&principal)?
        }
    };

    tracing::info!(
        subject = %token.subject,
        kind = %token.kind,
        fingerprint = %token.fingerprint().short(),
        expires_at = %token.expires_at,
        "Token issued"
    );

    match args.format {
        OutputFormat::Text => println!("{}", token.as_str()),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "token": token.as_str(),
                "kind": token.kind,
                "subject": token.subject,
                "role": role.as_str(),
                "authorities": principal.authorities().to_strings(),
                "issued_at": token.issued_at.to_rfc3339(),
                "expires_at": token.expires_at.to_rfc3339(),
                "fingerprint": token.fingerprint(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Parses `key=value` pairs into extra claims.
///
/// Values that parse as JSON keep their type (`level=3` becomes a number),
/// anything else is taken as a string.
pub fn parse_claims(pairs: &[String]) -> BinResult<ExtraClaims> {
    let mut claims = ExtraClaims::new();

    for pair in pairs {
        let (key, raw) = pair.split_once('=').ok_or_else(|| {
            BinError::invalid_argument(format!("expected KEY=VALUE, got '{}'", pair))
        })?;

        let key = key.trim();
        if key.is_empty() {
            return Err(BinError::invalid_argument(format!(
                "empty claim name in '{}'",
                pair
            )));
        }

        let value = serde_json::from_str::<Value>(raw)
            .unwrap_or_else(|_| Value::String(raw.to_string()));
        claims.insert(key.to_string(), value);
    }

    Ok(claims)
}

// =============================================================================
// Tests
// =============================================================================
