// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.
//!
//! - `issue`: Sign an access or refresh token
//! - `verify`: Verify a token and print its claims
//! - `gen-secret`: Generate a signing secret
//! - `validate`: Validate configuration file
//! - `version`: Show version information

mod issue;
mod secret;
mod validate;
mod verify;
mod version;

pub use issue::{issue, parse_claims};
pub use secret::{gen_secret, generate_secret};
pub use validate::validate;
pub use verify::verify;
pub use version::version;

use tollgate_config::TollgateConfig;

use crate::cli::{Cli, Commands};
use crate::error::{BinError, BinResult};

/// Executes the appropriate command based on CLI arguments.
pub fn execute(cli: &Cli) -> BinResult<()> {
    match &cli.command {
        Commands::Issue(args) => issue::issue(cli, args),
        Commands::Verify(args) => verify::verify(cli, args),
        Commands::GenSecret(args) => secret::gen_secret(cli, args),
        Commands::Validate(args) => validate::validate(cli, args),
        Commands::Version => version::version(cli),
    }
}

/// Loads and validates the configuration named on the command line.
fn load_config(cli: &Cli) -> BinResult<TollgateConfig> {
    let path = &cli.config;
    if !path.exists() {
        return Err(BinError::config(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let config = tollgate_config::load_config(path)?;
    tracing::debug!(path = %path.display(), "Configuration loaded");
    Ok(config)
}
