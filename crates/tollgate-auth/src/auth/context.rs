// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Request-scoped authentication.

use std::net::IpAddr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{Authority, AuthoritySet, Permission, Principal, Role};
use crate::ledger::TokenFingerprint;

/// An established identity for one request.
///
/// The authentication middleware inserts this into the request extensions
/// after a token has been fully validated. It is immutable once attached and
/// is dropped with the request.
#[derive(Debug, Clone, Serialize)]
pub struct Authentication {
    /// The loaded principal.
    pub principal: Principal,
    /// Authorities derived from the principal's role.
    #[serde(skip)]
    pub authorities: Arc<AuthoritySet>,
    /// Fingerprint of the presented token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenFingerprint>,
    /// Expiry of the presented token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Request ID for tracing.
    pub request_id: Uuid,
    /// Client IP address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<IpAddr>,
}

impl Authentication {
    /// Creates an authentication for `principal`, deriving its authorities.
    pub fn new(principal: Principal) -> Self {
        let authorities = Arc::new(principal.authorities());
        Self {
            principal,
            authorities,
            token: None,
            expires_at: None,
            request_id: Uuid::now_v7(),
            client_ip: None,
        }
    }

    /// Sets the token fingerprint.
    pub fn with_token(mut self, token: TokenFingerprint) -> Self {
        self.token = Some(token);
        self
    }

    /// Sets the token expiry.
    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Sets the request ID.
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Sets the client IP address.
    pub fn with_client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }

    /// Returns the principal identity.
    pub fn identity(&self) -> &str {
        &self.principal.identity
    }

    /// Returns the principal's role.
    pub fn role(&self) -> Role {
        self.principal.role
    }

    /// Returns `true` if the given authority is held.
    pub fn has_authority(&self, authority: impl Into<Authority>) -> bool {
        self.authorities.contains(authority)
    }

    /// Returns `true` if all of the given authorities are held.
    pub fn has_all_authorities(&self, authorities: &[Authority]) -> bool {
        self.authorities.contains_all(authorities)
    }

    /// Returns `true` if any of the given authorities is held.
    pub fn has_any_authority(&self, authorities: &[Authority]) -> bool {
        self.authorities.contains_any(authorities)
    }

    /// Returns `true` if the given permission is held.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.has_authority(permission)
    }

    /// Returns `true` if the role marker is held.
    pub fn has_role(&self, role: Role) -> bool {
        self.has_authority(role)
    }

    /// Returns `true` for administrators.
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_from_principal() {
        let auth = Authentication::new(Principal::new("alice@example.com", Role::Manager));

        assert_eq!(auth.identity(), "alice@example.com");
        assert_eq!(auth.role(), Role::Manager);
        assert!(auth.has_permission(Permission::ManagerRead));
        assert!(auth.has_role(Role::Manager));
        assert!(!auth.has_permission(Permission::AdminRead));
        assert!(!auth.is_admin());
    }

    #[test]
    fn test_admin_passes_manager_checks() {
        let auth = Authentication::new(Principal::new("root@example.com", Role::Admin));

        assert!(auth.is_admin());
        assert!(auth.has_role(Role::Manager));
        assert!(auth.has_all_authorities(&[Permission::ManagerDelete.into(), Permission::AdminDelete.into()]));
    }

    #[test]
    fn test_user_has_no_permissions() {
        let auth = Authentication::new(Principal::new("user@example.com", Role::User));

        assert!(auth.has_role(Role::User));
        assert!(!auth.has_any_authority(
            &Permission::all().iter().copied().map(Authority::from).collect::<Vec<_>>()
        ));
    }

    #[test]
    fn test_builders() {
        let ip: IpAddr = "10.0.0.7".parse().unwrap();
        let id = Uuid::now_v7();
        let auth = Authentication::new(Principal::new("alice@example.com", Role::User))
            .with_request_id(id)
            .with_client_ip(ip)
            .with_token(TokenFingerprint::of("t"));

        assert_eq!(auth.request_id, id);
        assert_eq!(auth.client_ip, Some(ip));
        assert_eq!(auth.token, Some(TokenFingerprint::of("t")));

        let json = serde_json::to_value(&auth).unwrap();
        assert_eq!(json["principal"]["role"], "USER");
        assert!(json.get("authorities").is_none());
    }
}
