//! API-side authorization guard for administrative routes.
//!
//! Authorization is enforced at the handler boundary, keeping the domain
//! and storage layers auth-agnostic.

use estoque_auth::{authorize, AuthzError, Permission, Principal, Role};

use crate::context::CurrentUser;

/// Check that the current user holds `required`.
pub fn require_permission(user: &CurrentUser, required: &Permission) -> Result<(), AuthzError> {
    let principal = Principal {
        user_id: user.user_id(),
        roles: user.roles().to_vec(),
        permissions: permissions_from_roles(user.roles()),
    };

    authorize(&principal, required)
}

/// Minimal role→permission mapping.
///
/// This is intentionally simple until a real policy source exists (e.g. DB-backed).
fn permissions_from_roles(roles: &[Role]) -> Vec<Permission> {
    // Convention: "admin" grants all permissions.
    if roles.iter().any(|r| r.as_str() == "admin") {
        return vec![Permission::new("*")];
    }

    Vec::new()
}
