use mirage_core::{ModelError, Result};
use mirage_model::{ElementId, MirrorKind, ModelContext, PrimitiveKind, TypeMirror};

/// The erasure of `ty`: declared types lose their type arguments (and those of their
/// enclosing types), type variables and wildcards erase to their upper bound, arrays erase
/// their component.
pub fn erasure(ctx: &ModelContext, ty: &TypeMirror) -> Result<TypeMirror> {
    match ty.shape() {
        MirrorKind::Declared(declared) => {
            let enclosing = declared.enclosing_type();
            if declared.type_arguments().is_empty() && enclosing.is_no_type() {
                return Ok(ty.clone());
            }
            let enclosing = match enclosing.as_declared() {
                Some(_) => erasure(ctx, enclosing)?,
                None => enclosing.clone(),
            };
            ctx.declared_type_in(&enclosing, declared.element(), &[])
        }
        MirrorKind::Array(array) => ctx.array_type(erasure(ctx, array.component_type())?),
        MirrorKind::TypeVariable(_) | MirrorKind::Wildcard(_) => erasure(ctx, &ctx.upper_bound(ty)?),
        MirrorKind::Executable(_) => Err(ModelError::unsupported(format!(
            "erasure of executable type `{ty}`"
        ))),
        _ => Ok(ty.clone()),
    }
}

/// The wrapper class of a primitive kind, e.g. `java.lang.Integer` for `int`.
pub fn boxed_class(ctx: &ModelContext, kind: PrimitiveKind) -> Result<ElementId> {
    ctx.require_type_element(kind.box_class())
}

/// The primitive a wrapper type unboxes to.
pub fn unboxed_type(ctx: &ModelContext, ty: &TypeMirror) -> Result<TypeMirror> {
    let kind = ty.as_declared().and_then(|declared| {
        PrimitiveKind::ALL
            .into_iter()
            .find(|kind| declared.names(kind.box_class()))
    });
    match kind {
        Some(kind) => Ok(ctx.primitive_type(kind)),
        None => Err(ModelError::invalid_argument(format!(
            "`{ty}` is not a primitive wrapper type"
        ))),
    }
}
