// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication and authorization module.
//!
//! This module provides:
//! - The closed role and permission model, and the authorities derived from it
//! - Signed claims encoding and verification
//! - Access and refresh token issuance
//! - Principals and the identity store interface
//! - The per-request authenticator

mod authenticator;
mod claims;
mod codec;
mod context;
mod issuer;
pub mod permission;
mod principal;
mod role;

pub use authenticator::{bearer_token, AnonymousReason, AuthOutcome, Authenticator, BEARER_PREFIX};
pub use claims::{Claims, ExtraClaims, RESERVED_CLAIMS};
pub use codec::{ClaimsCodec, ALGORITHM};
pub use context::Authentication;
pub use issuer::{IssuedToken, TokenIssuer, TokenKind};
pub use permission::Permission;
pub use principal::{IdentityStore, MemoryIdentityStore, Principal};
pub use role::{authorities_for, Authority, AuthoritySet, Role};
