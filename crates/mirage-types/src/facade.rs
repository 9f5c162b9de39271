use std::cmp::Ordering;

use mirage_core::{ModelError, Result};
use mirage_model::{ElementId, ModelContext, NoTypeKind, PrimitiveKind, TypeMirror};

use crate::{conversions, methods, relations, supertypes};

/// Type utilities bound to one [`ModelContext`].
#[derive(Debug, Clone, Copy)]
pub struct Types<'ctx> {
    ctx: &'ctx ModelContext,
}

impl<'ctx> Types<'ctx> {
    pub fn new(ctx: &'ctx ModelContext) -> Self {
        Types { ctx }
    }

    pub fn context(&self) -> &'ctx ModelContext {
        self.ctx
    }

    pub fn is_same_type(&self, a: &TypeMirror, b: &TypeMirror) -> Result<bool> {
        relations::is_same_type(self.ctx, a, b)
    }

    pub fn is_subtype(&self, sub: &TypeMirror, sup: &TypeMirror) -> Result<bool> {
        relations::is_subtype(self.ctx, sub, sup)
    }

    pub fn is_assignable(&self, from: &TypeMirror, to: &TypeMirror) -> Result<bool> {
        relations::is_assignable(self.ctx, from, to)
    }

    pub fn direct_supertypes(&self, ty: &TypeMirror) -> Result<Vec<TypeMirror>> {
        supertypes::direct_supertypes(self.ctx, ty)
    }

    pub fn supertype_closure(&self, ty: &TypeMirror) -> Result<Vec<TypeMirror>> {
        supertypes::supertype_closure(self.ctx, ty)
    }

    pub fn erasure(&self, ty: &TypeMirror) -> Result<TypeMirror> {
        conversions::erasure(self.ctx, ty)
    }

    pub fn boxed_class(&self, kind: PrimitiveKind) -> Result<ElementId> {
        conversions::boxed_class(self.ctx, kind)
    }

    pub fn unboxed_type(&self, ty: &TypeMirror) -> Result<TypeMirror> {
        conversions::unboxed_type(self.ctx, ty)
    }

    pub fn compare_specificity(&self, first: ElementId, second: ElementId) -> Result<Ordering> {
        methods::compare_specificity(self.ctx, first, second)
    }

    pub fn most_specific(&self, candidates: &[ElementId]) -> Result<Option<ElementId>> {
        methods::most_specific(self.ctx, candidates)
    }

    pub fn overrides(&self, overrider: ElementId, overridden: ElementId, owner: ElementId) -> Result<bool> {
        methods::overrides(self.ctx, overrider, overridden, owner)
    }

    pub fn as_element(&self, ty: &TypeMirror) -> Option<ElementId> {
        self.ctx.as_element(ty)
    }

    pub fn primitive_type(&self, kind: PrimitiveKind) -> TypeMirror {
        self.ctx.primitive_type(kind)
    }

    pub fn null_type(&self) -> TypeMirror {
        self.ctx.null_type()
    }

    pub fn no_type(&self, kind: NoTypeKind) -> TypeMirror {
        self.ctx.no_type(kind)
    }

    pub fn array_type(&self, component: TypeMirror) -> Result<TypeMirror> {
        self.ctx.array_type(component)
    }

    pub fn wildcard_type(
        &self,
        extends_bound: Option<TypeMirror>,
        super_bound: Option<TypeMirror>,
    ) -> Result<TypeMirror> {
        self.ctx.wildcard_type(extends_bound, super_bound)
    }

    pub fn declared_type(&self, element: ElementId, args: &[TypeMirror]) -> Result<TypeMirror> {
        self.ctx.declared_type(element, args)
    }

    pub fn capture(&self, _ty: &TypeMirror) -> Result<TypeMirror> {
        Err(ModelError::unsupported("capture conversion"))
    }

    pub fn contains(&self, _a: &TypeMirror, _b: &TypeMirror) -> Result<bool> {
        Err(ModelError::unsupported("type argument containment"))
    }

    pub fn as_member_of(&self, _containing: &TypeMirror, _element: ElementId) -> Result<TypeMirror> {
        Err(ModelError::unsupported("member type substitution"))
    }

    pub fn is_subsignature(&self, _first: ElementId, _second: ElementId) -> Result<bool> {
        Err(ModelError::unsupported("subsignature checks"))
    }
}
