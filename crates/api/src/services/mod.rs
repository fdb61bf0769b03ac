//! Multi-step operations that span several repositories.
//!
//! - [`hierarchy`] -- Track / section / sequence writes, each in one transaction.
//! - [`setup`] -- One-time bootstrap of the first admin and default context.

pub mod hierarchy;
pub mod setup;
