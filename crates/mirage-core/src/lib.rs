//! Core shared types for Mirage.
//!
//! This crate is intentionally small: interned names, the error taxonomy shared by the
//! model/builder/relation crates, and the identifier sanitizer used by generation tooling.

#![forbid(unsafe_code)]

mod error;
mod ident;
mod name;

pub use crate::error::{ModelError, Result};
pub use crate::ident::{IdentifierSanitizer, SanitizeError};
pub use crate::name::{Name, NameId, NameTable};
