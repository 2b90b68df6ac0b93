//! Shared blueprint model for Questforge projects.

pub mod defs;
pub mod validate;

pub use defs::*;
pub use validate::{ValidationError, validate_project};
