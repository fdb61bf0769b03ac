//! Row structs (`FromRow` + `Serialize`) and request DTOs (`Deserialize`).
//!
//! Request DTOs reject unknown fields.

pub mod content;
pub mod context;
pub mod form;
pub mod gender;
pub mod tag;
pub mod track;
pub mod user;
