//! Textual type references.
//!
//! Accepted forms: primitive keywords and `void`, qualified or `java.lang` simple class
//! names, type parameters in scope, a leading `[` array marker, trailing `[]` or `...`,
//! generic arguments (`java.util.Map<K, ? extends V>`) and wildcards.

use mirage_core::{ModelError, Result};
use mirage_model::{ModelContext, NoTypeKind, PrimitiveKind, TypeMirror};

use crate::scope::TypeParamScope;

const IMPLICIT_PACKAGE: &str = "java.lang";

pub fn resolve_type(ctx: &ModelContext, scope: &TypeParamScope, text: &str) -> Result<TypeMirror> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ModelError::invalid_argument("type reference must not be blank"));
    }

    if let Some(component) = text.strip_prefix('[') {
        return array_of(ctx, scope, component);
    }
    if let Some(component) = text.strip_suffix("[]").or_else(|| text.strip_suffix("...")) {
        return array_of(ctx, scope, component);
    }
    if let Some(kind) = PrimitiveKind::from_keyword(text) {
        return Ok(ctx.primitive_type(kind));
    }
    if text == "void" {
        return Ok(ctx.no_type(NoTypeKind::Void));
    }
    if let Some(rest) = text.strip_prefix('?') {
        return wildcard(ctx, scope, rest.trim(), text);
    }

    match text.find('<') {
        Some(open) => {
            let Some(inner) = text[open + 1..].strip_suffix('>') else {
                return Err(ModelError::InvalidReference(text.to_string()));
            };
            let args = split_arguments(inner)
                .ok_or_else(|| ModelError::InvalidReference(text.to_string()))?
                .into_iter()
                .map(|arg| resolve_type(ctx, scope, arg))
                .collect::<Result<Vec<_>>>()?;
            let element = type_element(ctx, text[..open].trim(), text)?;
            ctx.declared_type(element, &args)
        }
        None => {
            if let Some(param) = scope.lookup(text) {
                return ctx.as_type(param);
            }
            let element = type_element(ctx, text, text)?;
            ctx.declared_type(element, &[])
        }
    }
}

fn array_of(ctx: &ModelContext, scope: &TypeParamScope, component: &str) -> Result<TypeMirror> {
    let component = resolve_type(ctx, scope, component)?;
    ctx.array_type(component)
}

fn wildcard(ctx: &ModelContext, scope: &TypeParamScope, rest: &str, text: &str) -> Result<TypeMirror> {
    if rest.is_empty() {
        return ctx.wildcard_type(None, None);
    }
    if let Some(bound) = rest.strip_prefix("extends ") {
        let bound = resolve_type(ctx, scope, bound)?;
        return ctx.wildcard_type(Some(bound), None);
    }
    if let Some(bound) = rest.strip_prefix("super ") {
        let bound = resolve_type(ctx, scope, bound)?;
        return ctx.wildcard_type(None, Some(bound));
    }
    Err(ModelError::InvalidReference(text.to_string()))
}

fn type_element(ctx: &ModelContext, name: &str, text: &str) -> Result<mirage_model::ElementId> {
    if let Some(element) = ctx.type_element(name)? {
        return Ok(element);
    }
    if !name.contains('.') {
        if let Some(element) = ctx.type_element(&format!("{IMPLICIT_PACKAGE}.{name}"))? {
            return Ok(element);
        }
    }
    Err(ModelError::InvalidReference(text.to_string()))
}

/// Splits `A, B<C, D>, ?` at top-level commas. `None` on unbalanced brackets.
fn split_arguments(inner: &str) -> Option<Vec<&str>> {
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in inner.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                args.push(inner[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    args.push(inner[start..].trim());
    if args.iter().any(|arg| arg.is_empty()) {
        return None;
    }
    Some(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_only_top_level_commas() {
        assert_eq!(
            split_arguments("K, java.util.List<V, W>, ?"),
            Some(vec!["K", "java.util.List<V, W>", "?"])
        );
        assert_eq!(split_arguments("A<B"), None);
        assert_eq!(split_arguments("A,,B"), None);
    }
}
