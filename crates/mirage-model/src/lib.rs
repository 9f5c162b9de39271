//! The Mirage element and type-mirror model.
//!
//! A [`ModelContext`] owns every element of one modelling session. Elements come from two
//! places: reflection metadata supplied by a [`mirage_reflect::TypeProvider`], realized lazily
//! and memoized, and synthetic definitions for code that is about to be generated. Both kinds
//! answer the same queries and can refer to each other freely.

#![forbid(unsafe_code)]

mod annotation;
mod bridge;
mod context;
mod element;
mod elements;
mod ids;
mod kinds;
mod mirror;
mod synthetic;
mod view;

pub use crate::annotation::{AnnotationMirror, AnnotationValue};
pub use crate::context::ModelContext;
pub use crate::element::Element;
pub use crate::elements::constant_expression;
pub use crate::ids::ElementId;
pub use crate::kinds::{ElementKind, Modifier, Modifiers, NestingKind, NoTypeKind, PrimitiveKind, TypeKind};
pub use crate::mirror::{
    ArrayType, DeclaredType, ExecutableType, MirrorKind, TypeMirror, TypeVariable, TypeVisitor,
    WildcardType,
};
pub use crate::synthetic::{ExecutableDefinition, TypeDefinition, VariableDefinition};
pub use crate::view::ElementView;

pub use mirage_core::{ModelError, Name, Result};
pub use mirage_reflect::ConstValue;
