//! Elements for code that does not exist yet.
//!
//! A synthetic element is reserved first, so that other elements and mirrors can refer to it,
//! and defined later, in one step, when its builder finishes. Until then every query returns
//! an empty default.

use std::sync::Arc;

use mirage_core::{ModelError, Name, Result};
use mirage_reflect::ConstValue;

use crate::annotation::{AnnotationMirror, AnnotationValue};
use crate::context::{display_name, ModelContext};
use crate::element::{Detail, Element, Origin};
use crate::ids::ElementId;
use crate::kinds::{ElementKind, Modifiers, NestingKind};
use crate::mirror::TypeMirror;

#[derive(Debug, Clone)]
pub struct TypeDefinition {
    pub modifiers: Modifiers,
    pub enclosing: ElementId,
    pub nesting: NestingKind,
    /// `NoType(None)` when the type has no superclass.
    pub superclass: TypeMirror,
    pub interfaces: Vec<TypeMirror>,
    pub type_parameters: Vec<ElementId>,
    pub enclosed: Vec<ElementId>,
    pub annotations: Vec<AnnotationMirror>,
    /// Derived from the element and its type parameters when absent.
    pub as_type: Option<TypeMirror>,
}

#[derive(Debug, Clone)]
pub struct ExecutableDefinition {
    pub modifiers: Modifiers,
    pub enclosing: ElementId,
    pub type_parameters: Vec<ElementId>,
    pub parameters: Vec<ElementId>,
    pub return_type: TypeMirror,
    pub thrown_types: Vec<TypeMirror>,
    pub varargs: bool,
    pub default_value: Option<AnnotationValue>,
    pub annotations: Vec<AnnotationMirror>,
}

#[derive(Debug, Clone)]
pub struct VariableDefinition {
    pub modifiers: Modifiers,
    pub enclosing: ElementId,
    pub ty: TypeMirror,
    pub constant: Option<ConstValue>,
    pub annotations: Vec<AnnotationMirror>,
}

impl ModelContext {
    /// Reserves a new type element under `qualified_name`.
    ///
    /// Fails if the name is blank or already names a type, either in this context or in the
    /// provider.
    pub fn reserve_type(&self, qualified_name: &str, kind: ElementKind) -> Result<ElementId> {
        if !kind.is_type() {
            return Err(ModelError::invalid_argument(format!("{kind:?} is not a type kind")));
        }
        let qualified_name = qualified_name.trim();
        if let Some(existing) = self.type_element(qualified_name)? {
            return Err(ModelError::invalid_argument(format!(
                "type `{qualified_name}` already exists as {existing:?}"
            )));
        }

        let name = Name::new(qualified_name);
        let element = self.alloc(|id| {
            Element::new(
                id,
                kind,
                name.simple(),
                Some(name.clone()),
                Origin::Synthetic,
                Detail::for_kind(kind),
            )
        });
        if let Some(existing) = self.register_type_name(&name, element.id) {
            return Err(ModelError::invalid_argument(format!(
                "type `{qualified_name}` already exists as {existing:?}"
            )));
        }
        tracing::debug!(target: "mirage.model", qualified_name, id = ?element.id, "reserved synthetic type");
        Ok(element.id)
    }

    /// Withdraws a reserved type that was never defined. Its name becomes free again; the
    /// element itself stays pending and is no longer found by name.
    pub fn release_type(&self, id: ElementId) -> Result<()> {
        let el = self.element(id)?;
        if !el.is_synthetic() || !el.kind.is_type() {
            return Err(ModelError::invalid_argument(format!(
                "`{}` is not a reserved type",
                display_name(&el)
            )));
        }
        if el.is_complete() {
            return Err(ModelError::invalid_state(format!(
                "`{}` is already defined",
                display_name(&el)
            )));
        }
        if let Some(name) = &el.qualified_name {
            if self.unregister_type_name(name, id) {
                tracing::debug!(target: "mirage.model", qualified_name = %name, id = ?id, "released synthetic type");
            }
        }
        Ok(())
    }

    /// Reserves a method, constructor, field, parameter or enum constant.
    pub fn reserve_member(&self, kind: ElementKind, simple_name: &str) -> Result<ElementId> {
        if !(kind.is_executable() || kind.is_variable()) {
            return Err(ModelError::invalid_argument(format!("{kind:?} is not a member kind")));
        }
        let simple_name = simple_name.trim();
        if simple_name.is_empty() {
            return Err(ModelError::invalid_argument("member name must not be blank"));
        }
        let element = self.alloc(|id| {
            Element::new(
                id,
                kind,
                Name::new(simple_name),
                None,
                Origin::Synthetic,
                Detail::for_kind(kind),
            )
        });
        Ok(element.id)
    }

    /// Creates a type parameter of `generic_element`; its bounds are set with
    /// [`ModelContext::define_type_parameter`].
    pub fn reserve_type_parameter(&self, name: &str, generic_element: ElementId) -> Result<ElementId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ModelError::invalid_argument("type parameter name must not be blank"));
        }
        let owner = self.kind(generic_element)?;
        if !(owner.is_type() || owner.is_executable()) {
            return Err(ModelError::invalid_argument(format!(
                "{owner:?} cannot declare type parameters"
            )));
        }
        let element = self.alloc(|id| {
            Element::new(
                id,
                ElementKind::TypeParameter,
                Name::new(name),
                None,
                Origin::Synthetic,
                Detail::type_parameter(generic_element),
            )
            .with_modifiers(Modifiers::EMPTY)
            .with_enclosing(generic_element)
        });
        Ok(element.id)
    }

    pub fn define_type_parameter(&self, id: ElementId, bounds: Vec<TypeMirror>) -> Result<()> {
        let el = self.claim(id, |kind| kind == ElementKind::TypeParameter)?;
        if let Some(detail) = el.type_parameter_detail() {
            let _ = detail.bounds.set(Arc::from(bounds));
        }
        Ok(())
    }

    pub fn define_type(&self, id: ElementId, definition: TypeDefinition) -> Result<TypeMirror> {
        let el = self.claim(id, ElementKind::is_type)?;
        let Some(detail) = el.type_detail() else {
            return Err(ModelError::invalid_state(format!("{id:?} has no type structure")));
        };
        set_enclosing(&el, definition.enclosing)?;
        let _ = el.modifiers.set(definition.modifiers);
        let _ = el.annotations.set(Arc::from(definition.annotations));
        let _ = detail.nesting.set(definition.nesting);
        let _ = detail.superclass.set(definition.superclass);
        let _ = detail.interfaces.set(Arc::from(definition.interfaces));
        let _ = detail.type_parameters.set(Arc::from(definition.type_parameters));
        let _ = detail.enclosed.set(Arc::from(definition.enclosed));
        let as_type = match definition.as_type {
            Some(ty) => ty,
            None => self.derive_declared(&el)?,
        };
        let as_type = detail.as_type.get_or_init(|| as_type).clone();

        tracing::debug!(
            target: "mirage.model",
            qualified_name = %display_name(&el),
            kind = ?el.kind,
            "defined synthetic type"
        );
        Ok(as_type)
    }

    pub fn define_executable(&self, id: ElementId, definition: ExecutableDefinition) -> Result<()> {
        let el = self.claim(id, ElementKind::is_executable)?;
        let Some(detail) = el.executable_detail() else {
            return Err(ModelError::invalid_state(format!("{id:?} has no executable structure")));
        };
        set_enclosing(&el, definition.enclosing)?;
        let _ = el.modifiers.set(definition.modifiers);
        let _ = el.annotations.set(Arc::from(definition.annotations));
        let _ = detail.type_parameters.set(Arc::from(definition.type_parameters));
        let _ = detail.parameters.set(Arc::from(definition.parameters));
        let _ = detail.return_type.set(definition.return_type);
        let _ = detail.thrown.set(Arc::from(definition.thrown_types));
        let _ = detail.varargs.set(definition.varargs);
        let _ = detail.default_value.set(definition.default_value);
        Ok(())
    }

    pub fn define_variable(&self, id: ElementId, definition: VariableDefinition) -> Result<()> {
        let el = self.claim(id, ElementKind::is_variable)?;
        let Some(detail) = el.variable_detail() else {
            return Err(ModelError::invalid_state(format!("{id:?} has no variable structure")));
        };
        set_enclosing(&el, definition.enclosing)?;
        let _ = el.modifiers.set(definition.modifiers);
        let _ = el.annotations.set(Arc::from(definition.annotations));
        let _ = detail.ty.set(definition.ty);
        let _ = detail.constant.set(definition.constant);
        Ok(())
    }

    /// Sets the enclosing element of a synthetic element. It can be set once; setting it
    /// again to the same element is a no-op.
    pub fn set_enclosing_element(&self, id: ElementId, enclosing: ElementId) -> Result<()> {
        let el = self.element(id)?;
        if !el.is_synthetic() {
            return Err(ModelError::invalid_argument(format!(
                "{id:?} is not a synthetic element"
            )));
        }
        set_enclosing(&el, enclosing)
    }

    /// Marks a synthetic element of an accepted kind as finalized, exactly once.
    fn claim(&self, id: ElementId, accepts: impl Fn(ElementKind) -> bool) -> Result<Arc<Element>> {
        let el = self.element(id)?;
        if !el.is_synthetic() {
            return Err(ModelError::invalid_argument(format!(
                "`{}` is not a synthetic element",
                display_name(&el)
            )));
        }
        if !accepts(el.kind) {
            return Err(ModelError::invalid_argument(format!(
                "`{}` has kind {:?}",
                display_name(&el),
                el.kind
            )));
        }
        if el.finalized.set(()).is_err() {
            return Err(ModelError::invalid_state(format!(
                "`{}` is already finalized",
                display_name(&el)
            )));
        }
        Ok(el)
    }
}

fn set_enclosing(el: &Element, enclosing: ElementId) -> Result<()> {
    let current = *el.enclosing.get_or_init(|| enclosing);
    if current != enclosing {
        return Err(ModelError::invalid_state(format!(
            "`{}` is already enclosed by {current:?}",
            display_name(el)
        )));
    }
    Ok(())
}
