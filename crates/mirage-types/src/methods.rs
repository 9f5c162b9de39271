//! Method ranking and override checks.

use std::cmp::Ordering;

use mirage_core::{ModelError, Result};
use mirage_model::{ElementId, ElementKind, ModelContext, TypeMirror};

use crate::relations::{is_assignable, is_subtype};

/// Orders two methods of equal arity by specificity.
///
/// `Less` means `first` is more specific: each of its parameter types is a subtype of the
/// corresponding parameter type of `second`, and not the other way round. Methods that are
/// unrelated, or whose parameters are mutually subtypes, compare `Equal`.
pub fn compare_specificity(ctx: &ModelContext, first: ElementId, second: ElementId) -> Result<Ordering> {
    let first_params = parameter_types(ctx, first)?;
    let second_params = parameter_types(ctx, second)?;
    if first_params.len() != second_params.len() {
        return Err(ModelError::invalid_argument(format!(
            "cannot rank methods of arity {} and {}",
            first_params.len(),
            second_params.len()
        )));
    }

    let narrower = pairwise(&first_params, &second_params, |a, b| is_subtype(ctx, a, b))?;
    let wider = pairwise(&second_params, &first_params, |a, b| is_subtype(ctx, a, b))?;
    Ok(match (narrower, wider) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => Ordering::Equal,
    })
}

/// The most specific of a set of same-arity candidates; on ties the earlier candidate wins.
pub fn most_specific(ctx: &ModelContext, candidates: &[ElementId]) -> Result<Option<ElementId>> {
    let mut best: Option<ElementId> = None;
    for &candidate in candidates {
        best = match best {
            None => Some(candidate),
            Some(current) => {
                if compare_specificity(ctx, candidate, current)? == Ordering::Less {
                    Some(candidate)
                } else {
                    Some(current)
                }
            }
        };
    }
    Ok(best)
}

/// Whether `overrider` overrides `overridden` as a member of `owner`.
///
/// Names must match, the overrider's return type must be assignable to the overridden
/// return type and every parameter must be assignable to its counterpart. Access and
/// `throws` clauses are not checked.
pub fn overrides(
    ctx: &ModelContext,
    overrider: ElementId,
    overridden: ElementId,
    owner: ElementId,
) -> Result<bool> {
    if !ctx.kind(owner)?.is_type() {
        return Err(ModelError::invalid_argument(format!("{owner:?} is not a type element")));
    }
    if ctx.kind(overrider)? != ElementKind::Method || ctx.kind(overridden)? != ElementKind::Method {
        return Ok(false);
    }
    if ctx.simple_name(overrider)? != ctx.simple_name(overridden)? {
        return Ok(false);
    }
    if !is_assignable(ctx, &ctx.return_type(overrider)?, &ctx.return_type(overridden)?)? {
        return Ok(false);
    }
    let overrider_params = parameter_types(ctx, overrider)?;
    let overridden_params = parameter_types(ctx, overridden)?;
    if overrider_params.len() != overridden_params.len() {
        return Ok(false);
    }
    pairwise(&overrider_params, &overridden_params, |a, b| is_assignable(ctx, a, b))
}

fn parameter_types(ctx: &ModelContext, method: ElementId) -> Result<Vec<TypeMirror>> {
    if !ctx.kind(method)?.is_executable() {
        return Err(ModelError::invalid_argument(format!("{method:?} is not an executable element")));
    }
    ctx.parameters(method)?
        .iter()
        .map(|param| ctx.variable_type(*param))
        .collect()
}

fn pairwise(
    left: &[TypeMirror],
    right: &[TypeMirror],
    mut relation: impl FnMut(&TypeMirror, &TypeMirror) -> Result<bool>,
) -> Result<bool> {
    for (a, b) in left.iter().zip(right) {
        if !relation(a, b)? {
            return Ok(false);
        }
    }
    Ok(true)
}
