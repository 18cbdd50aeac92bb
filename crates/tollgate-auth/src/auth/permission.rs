// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Permission definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fine-grained capability tags.
///
/// Permissions are never created at runtime. Each one is granted to roles
/// through the static table in [`Role::permissions`](super::Role::permissions),
/// so "who can do X" can always be answered by reading that table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    // =========================================================================
    // Administration
    // =========================================================================
    /// Read administrative resources.
    AdminRead,
    /// Update administrative resources.
    AdminUpdate,
    /// Delete administrative resources.
    AdminDelete,
    /// Create administrative resources.
    AdminCreate,

    // =========================================================================
    // Management
    // =========================================================================
    /// Read management resources.
    ManagerRead,
    /// Update management resources.
    ManagerUpdate,
    /// Delete management resources.
    ManagerDelete,
    /// Create management resources.
    ManagerCreate,
}

impl Permission {
    /// Returns the capability string used in authority checks.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::AdminRead => "ADMIN_READ",
            Permission::AdminUpdate => "ADMIN_UPDATE",
            Permission::AdminDelete => "ADMIN_DELETE",
            Permission::AdminCreate => "ADMIN_CREATE",
            Permission::ManagerRead => "MANAGER_READ",
            Permission::ManagerUpdate => "MANAGER_UPDATE",
            Permission::ManagerDelete => "MANAGER_DELETE",
            Permission::ManagerCreate => "MANAGER_CREATE",
        }
    }

    /// Parses a permission from its capability string.
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|p| p.as_str() == s)
    }

    /// Returns every defined permission.
    pub fn all() -> &'static [Permission] {
        &[
            Permission::AdminRead,
            Permission::AdminUpdate,
            Permission::AdminDelete,
            Permission::AdminCreate,
            Permission::ManagerRead,
            Permission::ManagerUpdate,
            Permission::ManagerDelete,
            Permission::ManagerCreate,
        ]
    }

    /// Returns `true` for permissions only administrators hold.
    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            Permission::AdminRead
                | Permission::AdminUpdate
                | Permission::AdminDelete
                | Permission::AdminCreate
        )
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_as_str() {
        assert_eq!(Permission::ManagerRead.as_str(), "MANAGER_READ");
        assert_eq!(Permission::AdminCreate.to_string(), "ADMIN_CREATE");
    }

    #[test]
    fn test_permission_parse() {
        for permission in Permission::all() {
            assert_eq!(Permission::parse(permission.as_str()), Some(*permission));
        }
        assert_eq!(Permission::parse("manager:read"), None);
        assert_eq!(Permission::parse(""), None);
    }

    #[test]
    fn test_permission_is_admin() {
        assert!(Permission::AdminDelete.is_admin());
        assert!(!Permission::ManagerDelete.is_admin());
    }

    #[test]
    fn test_permission_serde_matches_capability_string() {
        let json = serde_json::to_string(&Permission::ManagerUpdate).unwrap();
        assert_eq!(json, "\"MANAGER_UPDATE\"");
    }
}
