//! Element storage.
//!
//! An [`Element`] keeps what is known when it is created (kind, names, origin). Everything
//! else lives in `OnceLock` cells that are filled either on first query (reflective
//! elements) or when a builder finalizes (synthetic elements). Queries go through
//! [`crate::ModelContext`], which knows how to fill the cells.

use std::sync::{Arc, OnceLock};

use mirage_core::Name;
use mirage_reflect::{ClassInfo, ConstValue, MethodInfo, ParameterInfo, TypeParamInfo};

use crate::annotation::{AnnotationMirror, AnnotationValue};
use crate::ids::ElementId;
use crate::kinds::{ElementKind, Modifiers, NestingKind};
use crate::mirror::TypeMirror;

pub struct Element {
    pub(crate) id: ElementId,
    pub(crate) kind: ElementKind,
    pub(crate) simple_name: Name,
    pub(crate) qualified_name: Option<Name>,
    pub(crate) origin: Origin,
    pub(crate) modifiers: OnceLock<Modifiers>,
    pub(crate) enclosing: OnceLock<ElementId>,
    pub(crate) annotations: OnceLock<Arc<[AnnotationMirror]>>,
    /// Set once a synthetic element's builder has finished.
    pub(crate) finalized: OnceLock<()>,
    pub(crate) detail: Detail,
}

/// Where an element's data comes from.
pub(crate) enum Origin {
    Reflective(Reflected),
    /// Built for generated code; cells are filled when the builder finalizes.
    Synthetic,
    /// A view registered through `adopt_view`; structure is read from the base element.
    View(ElementId),
}

pub(crate) enum Reflected {
    Package,
    Class(Arc<ClassInfo>),
    Field { owner: Arc<ClassInfo>, index: usize },
    Constructor { owner: Arc<ClassInfo>, index: usize },
    Method { owner: Arc<ClassInfo>, index: usize },
    Parameter(ParameterInfo),
    TypeParameter(TypeParamInfo),
}

impl Reflected {
    pub(crate) fn method_info(&self) -> Option<&MethodInfo> {
        match self {
            Reflected::Constructor { owner, index } => owner.constructors.get(*index),
            Reflected::Method { owner, index } => owner.methods.get(*index),
            _ => None,
        }
    }
}

pub(crate) enum Detail {
    Package,
    Type(TypeDetail),
    Executable(ExecutableDetail),
    Variable(VariableDetail),
    TypeParameter(TypeParameterDetail),
    /// Views carry no structure of their own.
    Delegated,
}

#[derive(Default)]
pub(crate) struct TypeDetail {
    pub(crate) nesting: OnceLock<NestingKind>,
    pub(crate) superclass: OnceLock<TypeMirror>,
    pub(crate) interfaces: OnceLock<Arc<[TypeMirror]>>,
    pub(crate) type_parameters: OnceLock<Arc<[ElementId]>>,
    pub(crate) enclosed: OnceLock<Arc<[ElementId]>>,
    pub(crate) as_type: OnceLock<TypeMirror>,
}

#[derive(Default)]
pub(crate) struct ExecutableDetail {
    pub(crate) type_parameters: OnceLock<Arc<[ElementId]>>,
    pub(crate) parameters: OnceLock<Arc<[ElementId]>>,
    pub(crate) return_type: OnceLock<TypeMirror>,
    pub(crate) thrown: OnceLock<Arc<[TypeMirror]>>,
    pub(crate) varargs: OnceLock<bool>,
    pub(crate) default_value: OnceLock<Option<AnnotationValue>>,
    pub(crate) as_type: OnceLock<TypeMirror>,
}

#[derive(Default)]
pub(crate) struct VariableDetail {
    pub(crate) ty: OnceLock<TypeMirror>,
    pub(crate) constant: OnceLock<Option<ConstValue>>,
}

pub(crate) struct TypeParameterDetail {
    pub(crate) generic_element: ElementId,
    pub(crate) bounds: OnceLock<Arc<[TypeMirror]>>,
    pub(crate) as_type: OnceLock<TypeMirror>,
}

impl Detail {
    pub(crate) fn for_kind(kind: ElementKind) -> Detail {
        match kind {
            ElementKind::Package => Detail::Package,
            ElementKind::Class | ElementKind::Interface | ElementKind::Enum | ElementKind::AnnotationType => {
                Detail::Type(TypeDetail::default())
            }
            ElementKind::Method | ElementKind::Constructor => Detail::Executable(ExecutableDetail::default()),
            ElementKind::Field | ElementKind::Parameter | ElementKind::EnumConstant => {
                Detail::Variable(VariableDetail::default())
            }
            // Type parameters are created through `Detail::type_parameter`.
            ElementKind::TypeParameter => Detail::Delegated,
        }
    }

    pub(crate) fn type_parameter(generic_element: ElementId) -> Detail {
        Detail::TypeParameter(TypeParameterDetail {
            generic_element,
            bounds: OnceLock::new(),
            as_type: OnceLock::new(),
        })
    }
}

impl Element {
    pub(crate) fn new(
        id: ElementId,
        kind: ElementKind,
        simple_name: Name,
        qualified_name: Option<Name>,
        origin: Origin,
        detail: Detail,
    ) -> Self {
        Element {
            id,
            kind,
            simple_name,
            qualified_name,
            origin,
            modifiers: OnceLock::new(),
            enclosing: OnceLock::new(),
            annotations: OnceLock::new(),
            finalized: OnceLock::new(),
            detail,
        }
    }

    pub(crate) fn with_modifiers(self, modifiers: Modifiers) -> Self {
        let _ = self.modifiers.set(modifiers);
        self
    }

    pub(crate) fn with_enclosing(self, enclosing: ElementId) -> Self {
        let _ = self.enclosing.set(enclosing);
        self
    }

    /// Reflective elements and views are complete from the start; synthetic ones once built.
    pub fn is_complete(&self) -> bool {
        match self.origin {
            Origin::Synthetic => self.finalized.get().is_some(),
            Origin::Reflective(_) | Origin::View(_) => true,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn simple_name(&self) -> &Name {
        &self.simple_name
    }

    /// Fully qualified name of packages and type elements.
    pub fn qualified_name(&self) -> Option<&Name> {
        self.qualified_name.as_ref()
    }

    /// Modifiers; empty while a synthetic element is still being built.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers.get().copied().unwrap_or_default()
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self.origin, Origin::Synthetic)
    }

    pub fn is_reflective(&self) -> bool {
        matches!(self.origin, Origin::Reflective(_))
    }

    pub fn is_view(&self) -> bool {
        matches!(self.origin, Origin::View(_))
    }

    pub(crate) fn reflected(&self) -> Option<&Reflected> {
        match &self.origin {
            Origin::Reflective(reflected) => Some(reflected),
            _ => None,
        }
    }

    pub(crate) fn type_detail(&self) -> Option<&TypeDetail> {
        match &self.detail {
            Detail::Type(detail) => Some(detail),
            _ => None,
        }
    }

    pub(crate) fn executable_detail(&self) -> Option<&ExecutableDetail> {
        match &self.detail {
            Detail::Executable(detail) => Some(detail),
            _ => None,
        }
    }

    pub(crate) fn variable_detail(&self) -> Option<&VariableDetail> {
        match &self.detail {
            Detail::Variable(detail) => Some(detail),
            _ => None,
        }
    }

    pub(crate) fn type_parameter_detail(&self) -> Option<&TypeParameterDetail> {
        match &self.detail {
            Detail::TypeParameter(detail) => Some(detail),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("name", &self.qualified_name.as_ref().unwrap_or(&self.simple_name))
            .finish_non_exhaustive()
    }
}
