use std::collections::HashMap;

use mirage_core::{ModelError, Name, Result};
use mirage_model::{ElementId, ModelContext, TypeMirror};

use crate::resolve::resolve_type;

/// Type parameters visible to a builder.
///
/// A scope holds the parameters its own builder declares, in declaration order, on top of the
/// parameters inherited from enclosing builders. Own parameters shadow inherited ones.
#[derive(Debug, Clone, Default)]
pub struct TypeParamScope {
    inherited: HashMap<Name, ElementId>,
    own: Vec<(Name, ElementId)>,
}

impl TypeParamScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scope for a nested builder: everything visible here, nothing of its own yet.
    pub fn child(&self) -> Self {
        let mut inherited = self.inherited.clone();
        inherited.extend(self.own.iter().cloned());
        TypeParamScope {
            inherited,
            own: Vec::new(),
        }
    }

    pub fn declare(&mut self, name: Name, param: ElementId) -> Result<()> {
        if self.own.iter().any(|(existing, _)| *existing == name) {
            return Err(ModelError::invalid_argument(format!(
                "type parameter `{name}` is already declared"
            )));
        }
        self.own.push((name, param));
        Ok(())
    }

    /// Declares a type parameter of `generic` whose bounds may mention it, as in
    /// `T extends Comparable<T>`. The scope is left untouched unless every bound resolves.
    pub(crate) fn declare_bounded(
        &mut self,
        ctx: &ModelContext,
        generic: ElementId,
        name: &str,
        bounds: &[&str],
    ) -> Result<(ElementId, Vec<TypeMirror>)> {
        let name = Name::new(name.trim());
        if self.own.iter().any(|(existing, _)| *existing == name) {
            return Err(ModelError::invalid_argument(format!(
                "type parameter `{name}` is already declared"
            )));
        }
        let param = ctx.reserve_type_parameter(name.as_str(), generic)?;
        let mut staged = self.clone();
        staged.declare(name, param)?;
        let bounds = bounds
            .iter()
            .map(|bound| resolve_type(ctx, &staged, bound))
            .collect::<Result<Vec<_>>>()?;
        *self = staged;
        Ok((param, bounds))
    }

    pub fn lookup(&self, name: &str) -> Option<ElementId> {
        self.own
            .iter()
            .rev()
            .find(|(own, _)| own == name)
            .map(|(_, param)| *param)
            .or_else(|| self.inherited.get(name).copied())
    }

    /// Parameters declared by this scope's own builder, in order.
    pub fn own_parameters(&self) -> Vec<ElementId> {
        self.own.iter().map(|(_, param)| *param).collect()
    }

    /// The type arguments this scope contributes: one type variable per own parameter.
    pub fn type_arguments(&self, ctx: &ModelContext) -> Result<Vec<TypeMirror>> {
        self.own.iter().map(|(_, param)| ctx.as_type(*param)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.own.is_empty() && self.inherited.is_empty()
    }
}
