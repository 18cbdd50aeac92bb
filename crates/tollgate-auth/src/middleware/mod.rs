// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Tower middleware.
//!
//! - [`AuthMiddleware`]: bearer token authentication, never rejects
//! - [`RequireAuthority`]: per-route authority guard, rejects with 401/403

mod auth;
mod authority;

pub use auth::{AuthLayer, AuthMiddleware};
pub use authority::{RequireAuthority, RequireAuthorityMiddleware};
