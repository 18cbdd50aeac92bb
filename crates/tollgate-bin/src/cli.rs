// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `issue`: Sign an access or refresh token
//! - `verify`: Verify a token and print its claims
//! - `gen-secret`: Generate a signing secret
//! - `validate`: Validate the configuration file
//! - `version`: Show version information

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tollgate_auth::{Role, TokenKind};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// tollgate - bearer token issuance and verification
#[derive(Parser, Debug)]
#[command(
    name = "tollgate",
    author = "Sylvex <contact@sylvex.io>",
    version = crate::VERSION,
    about = "Bearer token issuance and verification",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "tollgate.yaml",
        env = "TOLLGATE_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (text, json, compact)
    #[arg(long, default_value = "text", env = "TOLLGATE_LOG_FORMAT", global = true)]
    pub log_format: LogFormat,

    /// Enable quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Issue a signed token
    ///
    /// Signs an access or refresh token for the given subject with the
    /// configured secret and lifetimes.
    Issue(IssueArgs),

    /// Verify a token
    ///
    /// Checks the signature and expiry and prints the claims. Exits non-zero
    /// if the token is not accepted.
    Verify(VerifyArgs),

    /// Generate a new signing secret
    ///
    /// Prints a random base64 secret suitable for `jwt.secret`.
    #[command(name = "gen-secret")]
    GenSecret(GenSecretArgs),

    /// Validate the configuration file
    Validate(ValidateArgs),

    /// Show detailed version information
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `issue` command.
#[derive(Args, Debug, Clone)]
pub struct IssueArgs {
    /// Token subject (principal identity)
    #[arg(short, long)]
    pub subject: String,

    /// Role of the principal
    #[arg(short, long, default_value = "user", ignore_case = true)]
    pub role: RoleArg,

    /// Token kind
    #[arg(short, long, default_value = "access")]
    pub kind: KindArg,

    /// Extra claim as key=value (repeatable, access tokens only)
    #[arg(long = "claim", value_name = "KEY=VALUE")]
    pub claims: Vec<String>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `verify` command.
#[derive(Args, Debug, Clone)]
pub struct VerifyArgs {
    /// The token to verify
    pub token: String,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `gen-secret` command.
#[derive(Args, Debug, Clone)]
pub struct GenSecretArgs {
    /// Secret length in bytes (at least 32)
    #[arg(short, long, default_value_t = 32)]
    pub bytes: usize,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Show parsed configuration after validation
    #[arg(short, long)]
    pub show_config: bool,

    /// Output format for validation results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

/// Principal role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RoleArg {
    /// USER
    User,
    /// MANAGER
    Manager,
    /// ADMIN
    Admin,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::User => Role::User,
            RoleArg::Manager => Role::Manager,
            RoleArg::Admin => Role::Admin,
        }
    }
}

/// Token kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum KindArg {
    /// Short-lived access token
    Access,
    /// Long-lived refresh token
    Refresh,
}

impl From<KindArg> for TokenKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Access => TokenKind::Access,
            KindArg::Refresh => TokenKind::Refresh,
        }
    }
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective log level based on flags.
    pub fn effective_log_level(&self) -> &str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            &self.log_level
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
