use std::sync::Arc;

use mirage_core::{ModelError, Name, Result};

use crate::annotation::AnnotationMirror;
use crate::context::ModelContext;
use crate::element::{Detail, Element, Origin};
use crate::ids::ElementId;
use crate::kinds::{ElementKind, Modifiers};
use crate::mirror::TypeMirror;

/// An element seen through a set of overrides.
///
/// Each accessor returns the override when one is set and otherwise asks the base element.
/// Used to place an existing element at a new position (another enclosing type, other
/// modifiers, another name) without copying it.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementView {
    base: ElementId,
    enclosing: Option<ElementId>,
    modifiers: Option<Modifiers>,
    simple_name: Option<Name>,
}

impl ElementView {
    pub fn new(base: ElementId) -> Self {
        ElementView {
            base,
            enclosing: None,
            modifiers: None,
            simple_name: None,
        }
    }

    pub fn with_enclosing(mut self, enclosing: ElementId) -> Self {
        self.enclosing = Some(enclosing);
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = Some(modifiers);
        self
    }

    pub fn with_simple_name(mut self, name: impl Into<Name>) -> Self {
        self.simple_name = Some(name.into());
        self
    }

    pub fn base(&self) -> ElementId {
        self.base
    }

    pub fn kind(&self, ctx: &ModelContext) -> Result<ElementKind> {
        ctx.kind(self.base)
    }

    pub fn enclosing_element(&self, ctx: &ModelContext) -> Result<Option<ElementId>> {
        match self.enclosing {
            Some(enclosing) => Ok(Some(enclosing)),
            None => ctx.enclosing_element(self.base),
        }
    }

    pub fn modifiers(&self, ctx: &ModelContext) -> Result<Modifiers> {
        match self.modifiers {
            Some(modifiers) => Ok(modifiers),
            None => ctx.modifiers(self.base),
        }
    }

    pub fn simple_name(&self, ctx: &ModelContext) -> Result<Name> {
        match &self.simple_name {
            Some(name) => Ok(name.clone()),
            None => ctx.simple_name(self.base),
        }
    }

    pub fn as_type(&self, ctx: &ModelContext) -> Result<TypeMirror> {
        ctx.as_type(self.base)
    }

    pub fn annotation_mirrors(&self, ctx: &ModelContext) -> Result<Arc<[AnnotationMirror]>> {
        ctx.annotation_mirrors(self.base)
    }
}

impl ModelContext {
    /// Registers `view` as an element of its own.
    ///
    /// The new element answers name, modifier and enclosing queries from the view and every
    /// structural query (members, supertypes, types, annotations) from the base element.
    pub fn adopt_view(&self, view: &ElementView) -> Result<ElementId> {
        let base = self.structural(view.base)?;
        if base.kind == ElementKind::Package {
            return Err(ModelError::invalid_argument("packages cannot be viewed"));
        }

        let simple_name = view.simple_name(self)?;
        let modifiers = view.modifiers(self)?;
        let enclosing = view.enclosing_element(self)?;
        let qualified_name = match (&base.qualified_name, enclosing) {
            (Some(original), _) if view.simple_name.is_none() && view.enclosing.is_none() => {
                Some(original.clone())
            }
            (Some(_), Some(enclosing)) => Some(match self.qualified_name(enclosing)? {
                Some(outer) => outer.child(simple_name.as_str()),
                None => simple_name.clone(),
            }),
            (Some(_), None) => Some(simple_name.clone()),
            (None, _) => None,
        };

        let element = self.alloc(|id| {
            let element = Element::new(
                id,
                base.kind,
                simple_name,
                qualified_name,
                Origin::View(base.id),
                Detail::Delegated,
            )
            .with_modifiers(modifiers);
            match enclosing {
                Some(enclosing) => element.with_enclosing(enclosing),
                None => element,
            }
        });
        tracing::debug!(target: "mirage.model", base = ?base.id, view = ?element.id, "adopted element view");
        Ok(element.id)
    }
}
