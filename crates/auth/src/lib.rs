//! `estoque-auth` — authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage. The login
//! flow that mints tokens is an external collaborator; this crate only
//! validates tokens and answers policy questions.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod permissions;
pub mod roles;

pub use authorize::{authorize, AuthzError, Principal};
pub use claims::{validate_claims, JwtClaims, TokenValidationError};
pub use jwt::{Hs256JwtValidator, JwtValidator};
pub use permissions::Permission;
pub use roles::Role;
