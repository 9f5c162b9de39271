//! Runtime type descriptors ("reflection metadata") consumed by the Mirage model.
//!
//! A [`ClassInfo`] describes a class the way a reflection API would report it: its access
//! flags, generic supertypes, type parameters, members and annotations. Descriptors are found
//! through a [`TypeProvider`], the name-to-descriptor lookup service the model synthesizes its
//! elements from.

#![forbid(unsafe_code)]

mod annotation;
mod descriptor;
mod error;
pub mod flags;
mod generic;
mod info;
mod jdk;
mod provider;
mod signature;

pub use crate::annotation::{AnnotationInfo, AnnotationValue, ConstValue};
pub use crate::descriptor::{parse_field_descriptor, parse_method_descriptor, MethodDescriptor};
pub use crate::error::{Error, Result};
pub use crate::generic::{BaseType, GenericType};
pub use crate::info::{ClassInfo, FieldInfo, MethodInfo, ParameterInfo, TypeParamInfo};
pub use crate::jdk::minimal_jdk;
pub use crate::provider::{
    lookup_qualified, ChainedProvider, JsonTypeProvider, MapTypeProvider, TypeProvider,
};
pub use crate::signature::{
    parse_class_signature, parse_field_signature, parse_method_signature, ClassSignature,
    MethodSignature,
};
