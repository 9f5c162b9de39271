use std::collections::{HashMap, HashSet};

use mirage_core::{ModelError, Result};
use mirage_model::{DeclaredType, ElementId, MirrorKind, ModelContext, TypeMirror};

use crate::conversions::erasure;

/// The direct superclass (if any) followed by the direct interfaces of a declared type.
///
/// Supertypes are instantiated with the type's arguments, so the supertypes of
/// `ArrayList<String>` include `List<String>`. A raw type has erased supertypes.
pub fn direct_supertypes(ctx: &ModelContext, ty: &TypeMirror) -> Result<Vec<TypeMirror>> {
    let Some(declared) = ty.as_declared() else {
        return Err(ModelError::unsupported(format!(
            "direct supertypes of {:?} type `{ty}`",
            ty.kind()
        )));
    };
    let element = declared.element();
    let params = ctx.type_parameters(element)?;
    let raw = declared.type_arguments().is_empty() && !params.is_empty();
    let bindings: HashMap<ElementId, TypeMirror> = if declared.type_arguments().len() == params.len() {
        params
            .iter()
            .copied()
            .zip(declared.type_arguments().iter().cloned())
            .collect()
    } else {
        HashMap::new()
    };
    let instantiate = |supertype: &TypeMirror| {
        if raw {
            erasure(ctx, supertype)
        } else {
            substitute(ctx, supertype, &bindings)
        }
    };

    let mut supertypes = Vec::new();
    let superclass = ctx.superclass(element)?;
    if superclass.as_declared().is_some() {
        supertypes.push(instantiate(&superclass)?);
    }
    for interface in ctx.interfaces(element)?.iter() {
        supertypes.push(instantiate(interface)?);
    }
    Ok(supertypes)
}

/// Every proper supertype of a declared type: the superclass chain and, for the type and each
/// superclass, its interfaces and their superinterfaces. Each element appears once.
pub fn supertype_closure(ctx: &ModelContext, ty: &TypeMirror) -> Result<Vec<TypeMirror>> {
    let Some(declared) = ty.as_declared() else {
        return Err(ModelError::unsupported(format!(
            "supertypes of {:?} type `{ty}`",
            ty.kind()
        )));
    };

    let mut closure = Vec::new();
    let mut seen = HashSet::from([declared.element()]);
    let mut chain = Some(ty.clone());
    while let Some(current) = chain.take() {
        for supertype in direct_supertypes(ctx, &current)? {
            let Some(element) = supertype.as_declared().map(DeclaredType::element) else {
                continue;
            };
            if ctx.kind(element)?.is_interface() {
                collect_interfaces(ctx, supertype, &mut seen, &mut closure)?;
            } else if seen.insert(element) {
                closure.push(supertype.clone());
                chain = Some(supertype);
            }
        }
    }
    Ok(closure)
}

fn collect_interfaces(
    ctx: &ModelContext,
    interface: TypeMirror,
    seen: &mut HashSet<ElementId>,
    closure: &mut Vec<TypeMirror>,
) -> Result<()> {
    let Some(element) = interface.as_declared().map(DeclaredType::element) else {
        return Ok(());
    };
    if !seen.insert(element) {
        return Ok(());
    }
    closure.push(interface.clone());
    for superinterface in direct_supertypes(ctx, &interface)? {
        collect_interfaces(ctx, superinterface, seen, closure)?;
    }
    Ok(())
}

/// Replaces type variables bound in `bindings`.
pub(crate) fn substitute(
    ctx: &ModelContext,
    ty: &TypeMirror,
    bindings: &HashMap<ElementId, TypeMirror>,
) -> Result<TypeMirror> {
    if bindings.is_empty() {
        return Ok(ty.clone());
    }
    match ty.shape() {
        MirrorKind::TypeVariable(var) => Ok(bindings.get(&var.element()).cloned().unwrap_or_else(|| ty.clone())),
        MirrorKind::Declared(declared) => {
            if declared.type_arguments().is_empty() && declared.enclosing_type().is_no_type() {
                return Ok(ty.clone());
            }
            let enclosing = substitute(ctx, declared.enclosing_type(), bindings)?;
            let args = declared
                .type_arguments()
                .iter()
                .map(|arg| substitute(ctx, arg, bindings))
                .collect::<Result<Vec<_>>>()?;
            ctx.declared_type_in(&enclosing, declared.element(), &args)
        }
        MirrorKind::Array(array) => {
            // `E[]` with `E := ?` has no array form; the wildcard's bound stands in.
            let component = substitute_bound(ctx, array.component_type(), bindings)?;
            ctx.array_type(component)
        }
        MirrorKind::Wildcard(wildcard) => {
            let extends = wildcard
                .extends_bound()
                .map(|bound| substitute_bound(ctx, bound, bindings))
                .transpose()?;
            let super_bound = wildcard
                .super_bound()
                .map(|bound| substitute_bound(ctx, bound, bindings))
                .transpose()?;
            ctx.wildcard_type(extends, super_bound)
        }
        _ => Ok(ty.clone()),
    }
}

fn substitute_bound(
    ctx: &ModelContext,
    ty: &TypeMirror,
    bindings: &HashMap<ElementId, TypeMirror>,
) -> Result<TypeMirror> {
    let ty = substitute(ctx, ty, bindings)?;
    if ty.as_wildcard().is_some() {
        return ctx.upper_bound(&ty);
    }
    Ok(ty)
}
