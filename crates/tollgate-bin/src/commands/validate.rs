// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use std::time::Duration;

use tollgate_config::TollgateConfig;

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::{BinError, BinResult};

const MAX_ACCESS_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Executes the `validate` command to validate configuration.
pub fn validate(cli: &Cli, args: &ValidateArgs) -> BinResult<()> {
    let config_path = &cli.config;
    let config = super::load_config(cli)
        .map_err(|e| e.with_context("Configuration validation failed"))?;

    let warnings = collect_warnings(&config);
    let key_bytes = config.jwt.key_bytes()?.len();

    match args.format {
        OutputFormat::Text => {
            println!("✓ Configuration is valid: {}", config_path.display());
            println!();
            println!("Summary:");
            println!("  Secret:       {} bytes", key_bytes);
            println!("  Access TTL:   {}s", config.jwt.access_token_ttl.as_secs());
            println!("  Refresh TTL:  {}s", config.jwt.refresh_token_ttl.as_secs());
            println!("  Log level:    {}", config.logging.level);

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  ⚠ {}", warning);
                }
            }

            if args.show_config {
                println!();
                println!("Parsed configuration (secret omitted):");
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "config_path": config_path.display().to_string(),
                "summary": {
                    "secret_bytes": key_bytes,
                    "access_token_ttl_secs": config.jwt.access_token_ttl.as_secs(),
                    "refresh_token_ttl_secs": config.jwt.refresh_token_ttl.as_secs(),
                    "log_level": config.logging.level,
                },
                "warnings": warnings,
                "config": if args.show_config { Some(&config) } else { None },
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    if args.strict && !warnings.is_empty() {
        return Err(BinError::config(format!(
            "Strict mode: {} warning(s) found",
            warnings.len()
        )));
    }

    Ok(())
}

/// Returns non-fatal findings for a loaded configuration.
fn collect_warnings(config: &TollgateConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    let jwt = &config.jwt;

    if jwt.refresh_token_ttl < jwt.access_token_ttl {
        warnings.push("Refresh token lifetime is shorter than access token lifetime".to_string());
    }
    if jwt.access_token_ttl > MAX_ACCESS_TTL {
        warnings.push("Access token lifetime exceeds seven days".to_string());
    }

    warnings
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tollgate_auth::JwtConfig;

    const SECRET: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";

    fn config(jwt: JwtConfig) -> TollgateConfig {
        TollgateConfig {
            jwt,
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_have_no_warnings() {
        assert!(collect_warnings(&config(JwtConfig::new(SECRET))).is_empty());
    }

    #[test]
    fn test_inverted_lifetimes_warn() {
        let jwt = JwtConfig::new(SECRET)
            .with_access_ttl(Duration::from_secs(3600))
            .with_refresh_ttl(Duration::from_secs(60));
        let warnings = collect_warnings(&config(jwt));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("shorter"));
    }
}
