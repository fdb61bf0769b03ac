//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- The authenticated user from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.

pub mod auth;
pub mod rbac;
