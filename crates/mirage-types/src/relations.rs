//! Same-type, subtype and assignability.
//!
//! The queries dispatch on the shape of the right-hand type through [`TypeVisitor`]; the
//! left-hand side is inspected inside each arm.

use mirage_core::{ModelError, Result};
use mirage_model::{
    ArrayType, DeclaredType, ExecutableType, MirrorKind, ModelContext, NoTypeKind, PrimitiveKind,
    TypeMirror, TypeVariable, TypeVisitor, WildcardType,
};

use crate::supertypes::supertype_closure;

/// Whether `a` and `b` denote the same type.
///
/// Wildcards are never the same type as anything, themselves included. Declared types are
/// compared by the qualified name of their element only, so `List<String>` is the same type
/// as `List<Integer>` here even though the two mirrors are not `==`. Type variables compare
/// their upper and lower bounds.
pub fn is_same_type(ctx: &ModelContext, a: &TypeMirror, b: &TypeMirror) -> Result<bool> {
    if a.as_wildcard().is_some() || b.as_wildcard().is_some() {
        return Ok(false);
    }
    if let Some(exec) = [a, b].into_iter().find(|ty| ty.as_executable().is_some()) {
        return Err(ModelError::invalid_argument(format!(
            "executable type `{exec}` has no type identity"
        )));
    }
    if a.same_instance(b) {
        return Ok(true);
    }
    b.accept(&mut SameType { ctx, other: a })
}

/// Whether `sub` is a subtype of `sup`.
pub fn is_subtype(ctx: &ModelContext, sub: &TypeMirror, sup: &TypeMirror) -> Result<bool> {
    if is_same_type(ctx, sub, sup)? {
        return Ok(true);
    }
    sup.accept(&mut Subtype { ctx, sub })
}

/// Whether a value of type `from` can be assigned to a variable of type `to`.
///
/// Subtyping already covers a type-variable target through its upper bound; its lower bound
/// plays no part, so `Integer` is assignable to a `T` bounded below by `Number`.
pub fn is_assignable(ctx: &ModelContext, from: &TypeMirror, to: &TypeMirror) -> Result<bool> {
    if is_subtype(ctx, from, to)? {
        return Ok(true);
    }
    match (from.shape(), to.shape()) {
        (MirrorKind::Null, MirrorKind::Declared(_) | MirrorKind::Array(_)) => Ok(true),
        (MirrorKind::Array(from), MirrorKind::Array(to)) => {
            is_assignable(ctx, from.component_type(), to.component_type())
        }
        (MirrorKind::Array(_), MirrorKind::Declared(to)) => Ok(is_root(ctx, to)),
        _ => Ok(false),
    }
}

/// Strict primitive widening: `byte < short < int < long < float < double`, with `char`
/// below `int` but unrelated to `byte` and `short`. `boolean` widens to nothing.
pub fn is_primitive_widening(from: PrimitiveKind, to: PrimitiveKind) -> bool {
    match (from, to) {
        (PrimitiveKind::Boolean, _) | (_, PrimitiveKind::Boolean) | (_, PrimitiveKind::Char) => false,
        (PrimitiveKind::Char, to) => numeric_rank(to) >= numeric_rank(PrimitiveKind::Int),
        (from, to) => numeric_rank(from) < numeric_rank(to),
    }
}

fn numeric_rank(kind: PrimitiveKind) -> u8 {
    match kind {
        PrimitiveKind::Boolean => 0,
        PrimitiveKind::Byte => 1,
        PrimitiveKind::Short => 2,
        PrimitiveKind::Char | PrimitiveKind::Int => 3,
        PrimitiveKind::Long => 4,
        PrimitiveKind::Float => 5,
        PrimitiveKind::Double => 6,
    }
}

pub(crate) fn is_root(ctx: &ModelContext, declared: &DeclaredType) -> bool {
    declared.qualified_name() == ctx.root_type_name()
}

struct SameType<'a> {
    ctx: &'a ModelContext,
    other: &'a TypeMirror,
}

impl TypeVisitor for SameType<'_> {
    type Output = Result<bool>;

    fn visit_primitive(&mut self, _ty: &TypeMirror, kind: PrimitiveKind) -> Result<bool> {
        Ok(self.other.as_primitive() == Some(kind))
    }

    fn visit_declared(&mut self, _ty: &TypeMirror, declared: &DeclaredType) -> Result<bool> {
        Ok(self
            .other
            .as_declared()
            .is_some_and(|other| other.qualified_name() == declared.qualified_name()))
    }

    fn visit_array(&mut self, _ty: &TypeMirror, array: &ArrayType) -> Result<bool> {
        match self.other.as_array() {
            Some(other) => is_same_type(self.ctx, other.component_type(), array.component_type()),
            None => Ok(false),
        }
    }

    fn visit_wildcard(&mut self, _ty: &TypeMirror, _wildcard: &WildcardType) -> Result<bool> {
        Ok(false)
    }

    fn visit_type_variable(&mut self, ty: &TypeMirror, _var: &TypeVariable) -> Result<bool> {
        if self.other.as_type_variable().is_none() {
            return Ok(false);
        }
        let ctx = self.ctx;
        Ok(is_same_type(ctx, &ctx.upper_bound(self.other)?, &ctx.upper_bound(ty)?)?
            && is_same_type(ctx, &ctx.lower_bound(self.other)?, &ctx.lower_bound(ty)?)?)
    }

    fn visit_null(&mut self, _ty: &TypeMirror) -> Result<bool> {
        Ok(matches!(self.other.shape(), MirrorKind::Null))
    }

    fn visit_no_type(&mut self, _ty: &TypeMirror, kind: NoTypeKind) -> Result<bool> {
        Ok(matches!(self.other.shape(), MirrorKind::NoType(other) if *other == kind))
    }

    fn visit_executable(&mut self, ty: &TypeMirror, _exec: &ExecutableType) -> Result<bool> {
        Err(ModelError::invalid_argument(format!(
            "executable type `{ty}` has no type identity"
        )))
    }
}

struct Subtype<'a> {
    ctx: &'a ModelContext,
    sub: &'a TypeMirror,
}

impl TypeVisitor for Subtype<'_> {
    type Output = Result<bool>;

    fn visit_primitive(&mut self, _ty: &TypeMirror, kind: PrimitiveKind) -> Result<bool> {
        Ok(self
            .sub
            .as_primitive()
            .is_some_and(|from| is_primitive_widening(from, kind)))
    }

    fn visit_declared(&mut self, ty: &TypeMirror, declared: &DeclaredType) -> Result<bool> {
        let ctx = self.ctx;
        match self.sub.shape() {
            MirrorKind::Null => Ok(true),
            MirrorKind::TypeVariable(_) => is_subtype(ctx, &ctx.upper_bound(self.sub)?, ty),
            MirrorKind::Declared(_) => {
                for supertype in supertype_closure(ctx, self.sub)? {
                    if supertype
                        .as_declared()
                        .is_some_and(|found| found.qualified_name() == declared.qualified_name())
                    {
                        return Ok(true);
                    }
                }
                if is_root(ctx, declared) {
                    tracing::trace!(
                        target: "mirage.types",
                        sub = %self.sub,
                        sup = %ty,
                        "root type accepted as supertype without a supertype path"
                    );
                    return Ok(true);
                }
                Ok(false)
            }
            MirrorKind::Array(_) => Ok(is_root(ctx, declared)),
            _ => Ok(false),
        }
    }

    fn visit_array(&mut self, _ty: &TypeMirror, _array: &ArrayType) -> Result<bool> {
        Ok(false)
    }

    fn visit_wildcard(&mut self, _ty: &TypeMirror, _wildcard: &WildcardType) -> Result<bool> {
        Ok(false)
    }

    fn visit_type_variable(&mut self, ty: &TypeMirror, _var: &TypeVariable) -> Result<bool> {
        is_subtype(self.ctx, self.sub, &self.ctx.upper_bound(ty)?)
    }

    fn visit_null(&mut self, _ty: &TypeMirror) -> Result<bool> {
        Ok(false)
    }

    fn visit_no_type(&mut self, _ty: &TypeMirror, _kind: NoTypeKind) -> Result<bool> {
        Ok(false)
    }

    fn visit_executable(&mut self, ty: &TypeMirror, _exec: &ExecutableType) -> Result<bool> {
        Err(ModelError::invalid_argument(format!(
            "executable type `{ty}` has no subtypes"
        )))
    }
}
