// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # tollgate-auth
//!
//! Bearer token issuance, validation and authorization core.
//!
//! The crate covers the token lifecycle from signing to per-request
//! validation:
//!
//! - [`auth`]: roles, permissions, claims, the codec, the issuer and the
//!   per-request [`Authenticator`]
//! - [`ledger`]: the revocation ledger interface and an in-memory ledger
//! - [`middleware`]: tower layers for authentication and authority guards
//! - [`extractors`]: axum extractors for the attached [`Authentication`]
//!
//! # Example
//!
//! ```rust,ignore
//! let config = JwtConfig::new(secret);
//! let issuer = TokenIssuer::from_config(&config)?;
//! let authenticator = Authenticator::new(issuer.codec().clone(), identities, ledger);
//!
//! let app = Router::new()
//!     .route("/reports", get(reports).layer(require_authority!(Permission::ManagerRead)))
//!     .layer(AuthLayer::new(Arc::new(authenticator)));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod extractors;
pub mod ledger;
pub mod middleware;

pub use auth::{
    authorities_for, AnonymousReason, AuthOutcome, Authentication, Authenticator, Authority,
    AuthoritySet, Claims, ClaimsCodec, ExtraClaims, IdentityStore, IssuedToken,
    MemoryIdentityStore, Permission, Principal, Role, TokenIssuer, TokenKind,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::JwtConfig;
pub use error::{ApiError, ApiResult, AuthError, AuthResult, StoreError, StoreResult, TokenError, TokenResult};
pub use extractors::{Auth, OptionalAuth};
pub use ledger::{LedgerEntry, MemoryLedger, RevocationLedger, TokenFingerprint, TokenType};
pub use middleware::{AuthLayer, AuthMiddleware, RequireAuthority};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
