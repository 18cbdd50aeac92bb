// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # tollgate-config
//!
//! Configuration management for tollgate.
//!
//! ## Features
//!
//! - **Multi-Format Support**: YAML, TOML, and JSON configuration files
//! - **Placeholders**: `${VAR}` and `${VAR:default}` expansion before parsing
//! - **Environment Overrides**: `TOLLGATE_*` variables applied after parsing
//! - **Validation**: a missing or weak signing secret fails the load
//!
//! ## Quick Start
//!
//! ```no_run
//! use tollgate_config::loader::load_config;
//!
//! let config = load_config("tollgate.yaml").unwrap();
//! println!("Access TTL: {:?}", config.jwt.access_token_ttl);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, load_config_str, ConfigFormat, ConfigLoader};
pub use schema::{LogFormat, LogLevel, LoggingConfig, TollgateConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
