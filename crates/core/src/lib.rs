//! Domain types and pure business rules for the Trilha learning platform.
//!
//! Nothing in this crate performs I/O. Repositories (`trilha-db`) and HTTP
//! handlers (`trilha-api`) call into these modules to validate input and to
//! compute orderings before touching the database.

pub mod content;
pub mod error;
pub mod gender;
pub mod hierarchy;
pub mod roles;
pub mod serde_helpers;
pub mod setup;
pub mod tag;
pub mod track;
pub mod types;
