use std::collections::HashSet;

use thiserror::Error;

use estoque_core::UserId;

use crate::{Permission, Role};

/// A fully resolved principal for authorization decisions.
///
/// Construction is intentionally decoupled from storage and transport: the
/// API derives permissions from token roles and a policy mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Authorize a principal against a required permission.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    let perms: HashSet<&str> = principal.permissions.iter().map(|p| p.as_str()).collect();

    if perms.contains("*") || perms.contains(required.as_str()) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(permissions: Vec<Permission>) -> Principal {
        Principal {
            user_id: UserId::new(),
            roles: vec![],
            permissions,
        }
    }

    #[test]
    fn explicit_permission_grants() {
        let p = principal(vec![Permission::new("inventory.manage")]);
        assert!(authorize(&p, &Permission::new("inventory.manage")).is_ok());
    }

    #[test]
    fn wildcard_grants_everything() {
        let p = principal(vec![Permission::new("*")]);
        assert!(authorize(&p, &Permission::new("inventory.manage")).is_ok());
    }

    #[test]
    fn missing_permission_is_forbidden() {
        let p = principal(vec![]);
        let err = authorize(&p, &Permission::new("inventory.manage")).unwrap_err();
        assert_eq!(err, AuthzError::Forbidden("inventory.manage".to_string()));
    }
}
