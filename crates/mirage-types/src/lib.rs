//! Type relations over the Mirage model: sameness, subtyping, assignability, supertypes,
//! erasure, boxing and method specificity.
//!
//! Everything is available as free functions taking a [`ModelContext`] and through the
//! [`Types`] facade.
//!
//! [`ModelContext`]: mirage_model::ModelContext

#![forbid(unsafe_code)]

mod conversions;
mod facade;
mod methods;
mod relations;
mod supertypes;

pub use crate::conversions::{boxed_class, erasure, unboxed_type};
pub use crate::facade::Types;
pub use crate::methods::{compare_specificity, most_specific, overrides};
pub use crate::relations::{is_assignable, is_primitive_widening, is_same_type, is_subtype};
pub use crate::supertypes::{direct_supertypes, supertype_closure};
