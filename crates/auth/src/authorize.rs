use thiserror::Error;

use crate::{Identity, Permission};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: role '{role}' lacks permission '{permission}'")]
    Forbidden { role: String, permission: String },
}

/// Check that an authenticated identity may perform an action.
///
/// Pure policy check: no IO, no panics.
pub fn authorize(identity: &Identity, required: &Permission) -> Result<(), AuthzError> {
    let granted = identity
        .role
        .permissions()
        .iter()
        .any(|p| p.is_wildcard() || p == required);

    if granted {
        Ok(())
    } else {
        Err(AuthzError::Forbidden {
            role: identity.role.to_string(),
            permission: required.to_string(),
        })
    }
}
