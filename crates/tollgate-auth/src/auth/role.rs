// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Roles and the authorities derived from them.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::Permission;

// =============================================================================
// Role
// =============================================================================

/// Coarse-grained identity classification.
///
/// The set of roles is closed. Each role maps to a fixed slice of
/// permissions defined below; there is no way to extend a role at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular authenticated user. Holds no fine-grained permissions.
    User,
    /// Manages day-to-day resources.
    Manager,
    /// Full administrative access, including everything a manager can do.
    Admin,
}

const USER_PERMISSIONS: &[Permission] = &[];

const MANAGER_PERMISSIONS: &[Permission] = &[
    Permission::ManagerRead,
    Permission::ManagerUpdate,
    Permission::ManagerDelete,
    Permission::ManagerCreate,
];

const ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::AdminRead,
    Permission::AdminUpdate,
    Permission::AdminDelete,
    Permission::AdminCreate,
    Permission::ManagerRead,
    Permission::ManagerUpdate,
    Permission::ManagerDelete,
    Permission::ManagerCreate,
];

impl Role {
    /// Returns the role name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Manager => "MANAGER",
            Role::Admin => "ADMIN",
        }
    }

    /// Parses a role from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "USER" => Some(Role::User),
            "MANAGER" => Some(Role::Manager),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Returns every defined role.
    pub fn all() -> &'static [Role] {
        &[Role::User, Role::Manager, Role::Admin]
    }

    /// Returns the permissions granted to this role.
    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            Role::User => USER_PERMISSIONS,
            Role::Manager => MANAGER_PERMISSIONS,
            Role::Admin => ADMIN_PERMISSIONS,
        }
    }

    /// Returns the roles whose authorities this role also carries.
    ///
    /// An admin holds every manager permission, so it also carries the
    /// manager marker and passes any check a manager passes.
    pub fn included_roles(&self) -> &'static [Role] {
        match self {
            Role::User | Role::Manager => &[],
            Role::Admin => &[Role::Manager],
        }
    }

    /// Returns the synthetic `ROLE_<NAME>` marker for this role.
    pub fn marker(&self) -> String {
        format!("ROLE_{}", self.as_str())
    }

    /// Derives the authorities held by this role.
    ///
    /// The result is the role's permissions plus its `ROLE_<NAME>` marker and
    /// the markers of the roles it includes. It is recomputed on every call
    /// and never stored.
    pub fn authorities(&self) -> AuthoritySet {
        self.permissions()
            .iter()
            .copied()
            .map(Authority::Permission)
            .chain(std::iter::once(Authority::Role(*self)))
            .chain(self.included_roles().iter().copied().map(Authority::Role))
            .collect()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the authorities held by `role`.
pub fn authorities_for(role: Role) -> AuthoritySet {
    role.authorities()
}

// =============================================================================
// Authority
// =============================================================================

/// A runtime-derived access token used by authorization checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Authority {
    /// A fine-grained permission, rendered as its capability string.
    Permission(Permission),
    /// A role marker, rendered as `ROLE_<NAME>`.
    Role(Role),
}

impl Authority {
    /// Renders the authority as the string used by access checks.
    pub fn render(&self) -> String {
        match self {
            Authority::Permission(p) => p.as_str().to_string(),
            Authority::Role(r) => r.marker(),
        }
    }

    /// Parses an authority from its rendered form.
    pub fn parse(s: &str) -> Option<Self> {
        match s.strip_prefix("ROLE_") {
            Some(role) => Role::parse(role).map(Authority::Role),
            None => Permission::parse(s).map(Authority::Permission),
        }
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Authority::Permission(p) => f.write_str(p.as_str()),
            Authority::Role(r) => write!(f, "ROLE_{}", r.as_str()),
        }
    }
}

impl From<Permission> for Authority {
    fn from(permission: Permission) -> Self {
        Authority::Permission(permission)
    }
}

impl From<Role> for Authority {
    fn from(role: Role) -> Self {
        Authority::Role(role)
    }
}

// =============================================================================
// Authority Set
// =============================================================================

/// An ordered set of authorities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthoritySet {
    authorities: BTreeSet<Authority>,
}

impl AuthoritySet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the set contains the given authority.
    pub fn contains(&self, authority: impl Into<Authority>) -> bool {
        self.authorities.contains(&authority.into())
    }

    /// Returns `true` if the set contains an authority with this rendered form.
    pub fn contains_str(&self, authority: &str) -> bool {
        Authority::parse(authority).is_some_and(|a| self.authorities.contains(&a))
    }

    /// Returns `true` if the set contains all of the given authorities.
    pub fn contains_all(&self, authorities: &[Authority]) -> bool {
        authorities.iter().all(|a| self.authorities.contains(a))
    }

    /// Returns `true` if the set contains any of the given authorities.
    pub fn contains_any(&self, authorities: &[Authority]) -> bool {
        authorities.iter().any(|a| self.authorities.contains(a))
    }

    /// Returns `true` if every authority in `self` is also in `other`.
    pub fn is_subset(&self, other: &AuthoritySet) -> bool {
        self.authorities.is_subset(&other.authorities)
    }

    /// Returns the number of authorities in the set.
    pub fn len(&self) -> usize {
        self.authorities.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.authorities.is_empty()
    }

    /// Returns an iterator over the authorities in order.
    pub fn iter(&self) -> impl Iterator<Item = &Authority> {
        self.authorities.iter()
    }

    /// Returns the rendered authority strings in order.
    pub fn to_strings(&self) -> Vec<String> {
        self.authorities.iter().map(Authority::render).collect()
    }
}

impl FromIterator<Authority> for AuthoritySet {
    fn from_iter<I: IntoIterator<Item = Authority>>(iter: I) -> Self {
        Self {
            authorities: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
