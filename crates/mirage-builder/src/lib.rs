//! Builders that assemble synthetic elements.
//!
//! A [`ClassBuilder`] reserves its element up front so that other builders, and its own
//! members, can reference it before it exists. Member builders borrow their class builder
//! mutably, which keeps at most one member under construction per class.

#![forbid(unsafe_code)]

mod class;
mod member;
mod resolve;
mod scope;

pub use crate::class::ClassBuilder;
pub use crate::member::{FieldBuilder, MethodBuilder};
pub use crate::resolve::resolve_type;
pub use crate::scope::TypeParamScope;
