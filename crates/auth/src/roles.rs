use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::permissions::Permission;

/// Role tag stored next to each user.
///
/// Roles are opaque strings; `admin` and `employee` are the ones the shop
/// assigns permissions to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const ADMIN: Role = Role(Cow::Borrowed("admin"));
    pub const EMPLOYEE: Role = Role(Cow::Borrowed("employee"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_admin(&self) -> bool {
        *self == Self::ADMIN
    }

    /// Permissions granted to this role. Unknown roles get none.
    pub fn permissions(&self) -> Vec<Permission> {
        if self.is_admin() {
            vec![Permission::ALL]
        } else if *self == Self::EMPLOYEE {
            vec![
                Permission::INVENTORY_READ,
                Permission::INVENTORY_WRITE,
                Permission::ORDERS_PLACE,
                Permission::HISTORY_READ,
            ]
        } else {
            Vec::new()
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::EMPLOYEE
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_role_is_employee() {
        assert_eq!(Role::default(), Role::new("employee"));
        assert!(!Role::default().is_admin());
    }

    #[test]
    fn admin_holds_wildcard() {
        assert_eq!(Role::new("admin").permissions(), vec![Permission::ALL]);
    }

    #[test]
    fn unknown_role_has_no_permissions() {
        assert!(Role::new("guest").permissions().is_empty());
    }
}
