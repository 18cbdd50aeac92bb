// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # tollgate Integration Tests
//!
//! Integration tests and shared helpers for the tollgate crates.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `fixtures`: Principals, secrets and a wired-up authentication stack
//!   - `mocks`: Failing and counting store implementations
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p tollgate-tests
//! cargo test -p tollgate-tests --test integration_auth
//! cargo test -p tollgate-tests --test integration_config
//! ```
//!
//! ## Test Categories
//!
//! ### Auth Tests (`integration_auth.rs`)
//! - Issuance and verification through an axum router
//! - Expiry, revocation and tampering
//! - Authority guards (401 versus 403)
//! - Degraded identity stores and ledgers
//!
//! ### Config Tests (`integration_config.rs`)
//! - YAML, TOML and JSON files
//! - Placeholders and environment overrides
//! - Secret validation at load time

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::fixtures::*;
    pub use crate::common::mocks::*;
}
