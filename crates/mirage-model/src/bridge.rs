//! Synthesis of model elements and mirrors from reflection metadata.
//!
//! Every descriptor maps to exactly one model instance: classes are memoized by binary name,
//! members by their position in the owning [`ClassInfo`] (they are created once, when the
//! owner's enclosed elements are first requested), annotations by the element carrying them,
//! and generic types by `(scope, GenericType)`.

use std::sync::Arc;

use mirage_core::{ModelError, Name, Result};
use mirage_reflect::{
    AnnotationInfo, AnnotationValue as ReflectedValue, ClassInfo, GenericType, MethodInfo,
    TypeParamInfo,
};

use crate::annotation::{AnnotationMirror, AnnotationValue};
use crate::context::ModelContext;
use crate::element::{Detail, Element, Origin, Reflected};
use crate::ids::ElementId;
use crate::kinds::{ElementKind, Modifiers, NoTypeKind};
use crate::mirror::TypeMirror;

/// Reflection reports at most this many bounds per side of a wildcard that the model can hold.
const MAX_WILDCARD_BOUNDS: usize = 1;

impl ModelContext {
    /// Returns the type element for `info`, creating it on first sight.
    pub(crate) fn reflect_class(&self, info: Arc<ClassInfo>) -> ElementId {
        if let Some(id) = self.by_binary.read().get(&info.binary_name) {
            return *id;
        }

        let mut by_binary = self.by_binary.write();
        if let Some(id) = by_binary.get(&info.binary_name) {
            return *id;
        }
        let kind = ElementKind::for_class_flags(info.access_flags);
        let qualified_name = Name::new(info.canonical_name());
        let element = self.alloc(|id| {
            Element::new(
                id,
                kind,
                Name::new(info.simple_name()),
                Some(qualified_name.clone()),
                Origin::Reflective(Reflected::Class(info.clone())),
                Detail::for_kind(kind),
            )
            .with_modifiers(Modifiers::from_access_flags(info.access_flags, kind))
        });
        by_binary.insert(info.binary_name.clone(), element.id);
        drop(by_binary);

        if let Some(existing) = self.register_type_name(&qualified_name, element.id) {
            tracing::debug!(
                target: "mirage.bridge",
                qualified_name = %qualified_name,
                existing = ?existing,
                "qualified name already registered; keeping the earlier element"
            );
        }
        tracing::debug!(
            target: "mirage.bridge",
            binary_name = %info.binary_name,
            kind = ?kind,
            id = ?element.id,
            "materialized reflective type"
        );
        element.id
    }

    /// Fields, constructors, methods, then nested types.
    pub(crate) fn reflect_members(&self, owner: ElementId, info: &Arc<ClassInfo>) -> Result<Arc<[ElementId]>> {
        let mut members = Vec::with_capacity(
            info.fields.len() + info.constructors.len() + info.methods.len() + info.nested_classes.len(),
        );

        for (index, field) in info.fields.iter().enumerate() {
            let kind = if field.is_enum_constant() {
                ElementKind::EnumConstant
            } else {
                ElementKind::Field
            };
            let origin = Reflected::Field {
                owner: info.clone(),
                index,
            };
            members.push(self.alloc_member(kind, &field.name, owner, field.access_flags, origin));
        }
        for (index, ctor) in info.constructors.iter().enumerate() {
            let origin = Reflected::Constructor {
                owner: info.clone(),
                index,
            };
            members.push(self.alloc_member(ElementKind::Constructor, "<init>", owner, ctor.access_flags, origin));
        }
        for (index, method) in info.methods.iter().enumerate() {
            let origin = Reflected::Method {
                owner: info.clone(),
                index,
            };
            members.push(self.alloc_member(ElementKind::Method, &method.name, owner, method.access_flags, origin));
        }
        for nested in &info.nested_classes {
            match self.type_element_by_binary_name(nested) {
                Ok(id) => members.push(id),
                Err(ModelError::NotFound(_)) => {
                    tracing::warn!(
                        target: "mirage.bridge",
                        owner = %info.binary_name,
                        nested = %nested,
                        "nested class has no descriptor; skipping"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        tracing::debug!(
            target: "mirage.bridge",
            owner = %info.binary_name,
            count = members.len(),
            "materialized enclosed elements"
        );
        Ok(members.into())
    }

    fn alloc_member(
        &self,
        kind: ElementKind,
        name: &str,
        enclosing: ElementId,
        access_flags: u16,
        reflected: Reflected,
    ) -> ElementId {
        self.alloc(|id| {
            Element::new(
                id,
                kind,
                Name::new(name),
                None,
                Origin::Reflective(reflected),
                Detail::for_kind(kind),
            )
            .with_modifiers(Modifiers::from_access_flags(access_flags, kind))
            .with_enclosing(enclosing)
        })
        .id
    }

    pub(crate) fn reflect_type_parameters(&self, generic: ElementId, params: &[TypeParamInfo]) -> Arc<[ElementId]> {
        params
            .iter()
            .map(|param| {
                self.alloc(|id| {
                    Element::new(
                        id,
                        ElementKind::TypeParameter,
                        Name::new(&param.name),
                        None,
                        Origin::Reflective(Reflected::TypeParameter(param.clone())),
                        Detail::type_parameter(generic),
                    )
                    .with_modifiers(Modifiers::EMPTY)
                    .with_enclosing(generic)
                })
                .id
            })
            .collect()
    }

    pub(crate) fn reflect_parameters(&self, method: ElementId, info: &MethodInfo) -> Arc<[ElementId]> {
        info.params
            .iter()
            .map(|param| {
                self.alloc_member(
                    ElementKind::Parameter,
                    &param.name,
                    method,
                    param.access_flags,
                    Reflected::Parameter(param.clone()),
                )
            })
            .collect()
    }

    /// The mirror for a reflected type, with type variables resolved from `scope` outwards.
    pub(crate) fn mirror_of(&self, ty: &GenericType, scope: ElementId) -> Result<TypeMirror> {
        match ty {
            GenericType::Primitive(base) => return Ok(self.primitive_type((*base).into())),
            GenericType::Void => return Ok(self.no_type(NoTypeKind::Void)),
            _ => {}
        }

        let key = (scope, ty.clone());
        if let Some(mirror) = self.mirror_cache.read().get(&key) {
            return Ok(mirror.clone());
        }
        let mirror = self.build_mirror(ty, scope)?;
        Ok(self.mirror_cache.write().entry(key).or_insert(mirror).clone())
    }

    fn build_mirror(&self, ty: &GenericType, scope: ElementId) -> Result<TypeMirror> {
        match ty {
            GenericType::Primitive(base) => Ok(self.primitive_type((*base).into())),
            GenericType::Void => Ok(self.no_type(NoTypeKind::Void)),
            GenericType::Class(binary_name) => {
                let element = self.type_element_by_binary_name(binary_name)?;
                self.declared_type(element, &[])
            }
            GenericType::Array(component) => {
                let component = self.mirror_of(component, scope)?;
                self.array_type(component)
            }
            GenericType::Parameterized { raw, owner, args } => {
                let element = self.type_element_by_binary_name(raw)?;
                let args = args
                    .iter()
                    .map(|arg| self.mirror_of(arg, scope))
                    .collect::<Result<Vec<_>>>()?;
                let expected = self.type_parameters(element)?.len();
                if args.len() != expected {
                    return Err(ModelError::Descriptor(format!(
                        "{raw} takes {expected} type argument(s), descriptor gives {}",
                        args.len()
                    )));
                }
                let enclosing = match owner {
                    Some(owner) => self.mirror_of(owner, scope)?,
                    None => self.no_type(NoTypeKind::None),
                };
                let el = self.element(element)?;
                Ok(self.make_declared(&el, enclosing, args))
            }
            GenericType::Wildcard {
                upper_bounds,
                lower_bounds,
            } => self.reflect_wildcard(upper_bounds, lower_bounds, scope),
            GenericType::TypeVariable(name) => match self.resolve_type_variable(scope, name)? {
                Some(param) => self.as_type(param),
                None => {
                    tracing::warn!(
                        target: "mirage.bridge",
                        type_variable = %name,
                        scope = ?scope,
                        "type variable not declared in scope; using the root type"
                    );
                    self.root_type()
                }
            },
        }
    }

    fn reflect_wildcard(
        &self,
        upper_bounds: &[GenericType],
        lower_bounds: &[GenericType],
        scope: ElementId,
    ) -> Result<TypeMirror> {
        if upper_bounds.len() > MAX_WILDCARD_BOUNDS || lower_bounds.len() > MAX_WILDCARD_BOUNDS {
            return Err(ModelError::unsupported(format!(
                "wildcard with {} upper and {} lower bound(s)",
                upper_bounds.len(),
                lower_bounds.len()
            )));
        }
        // Reflection reports `?` and `? super T` with the root type as upper bound.
        let extends = match upper_bounds.first() {
            Some(GenericType::Class(name)) if self.root_type_name() == name.as_str() => None,
            Some(bound) => Some(self.mirror_of(bound, scope)?),
            None => None,
        };
        let super_bound = match lower_bounds.first() {
            Some(bound) => Some(self.mirror_of(bound, scope)?),
            None => None,
        };
        self.wildcard_type(extends, super_bound)
    }

    /// Looks `name` up among the type parameters of `scope` and its enclosing elements.
    pub(crate) fn resolve_type_variable(&self, scope: ElementId, name: &str) -> Result<Option<ElementId>> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let kind = self.kind(id)?;
            if kind == ElementKind::Package {
                break;
            }
            if kind.is_type() || kind.is_executable() {
                for param in self.type_parameters(id)?.iter() {
                    if self.element(*param)?.simple_name == name {
                        return Ok(Some(*param));
                    }
                }
            }
            current = self.enclosing_element(id)?;
        }
        Ok(None)
    }

    pub(crate) fn reflect_annotation(&self, info: &AnnotationInfo, scope: ElementId) -> Result<AnnotationMirror> {
        let annotation_type = self.type_element_by_binary_name(&info.type_name)?;
        let values = info
            .elements
            .iter()
            .map(|(name, value)| {
                let accessor = self.annotation_accessor(annotation_type, name)?;
                Ok((accessor, self.reflect_annotation_value(value, scope)?))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(AnnotationMirror::new(self.as_type(annotation_type)?, values))
    }

    pub(crate) fn reflect_annotation_value(&self, value: &ReflectedValue, scope: ElementId) -> Result<AnnotationValue> {
        Ok(match value {
            ReflectedValue::Const(value) => AnnotationValue::Const(value.clone()),
            ReflectedValue::Enum {
                type_name,
                const_name,
            } => {
                let enum_type = self.type_element_by_binary_name(type_name)?;
                let constant = self
                    .enclosed_elements(enum_type)?
                    .iter()
                    .copied()
                    .find(|member| {
                        self.element(*member).is_ok_and(|el| {
                            el.kind == ElementKind::EnumConstant && el.simple_name == const_name.as_str()
                        })
                    })
                    .ok_or_else(|| {
                        ModelError::Descriptor(format!("{type_name} has no enum constant {const_name}"))
                    })?;
                AnnotationValue::EnumConstant(constant)
            }
            ReflectedValue::Class(ty) => AnnotationValue::Type(self.mirror_of(ty, scope)?),
            ReflectedValue::Annotation(info) => AnnotationValue::Annotation(self.reflect_annotation(info, scope)?),
            ReflectedValue::Array(values) => AnnotationValue::Array(
                values
                    .iter()
                    .map(|value| self.reflect_annotation_value(value, scope))
                    .collect::<Result<Vec<_>>>()?,
            ),
        })
    }

    /// The accessor method `name` of an annotation type.
    pub(crate) fn annotation_accessor(&self, annotation_type: ElementId, name: &str) -> Result<ElementId> {
        for member in self.enclosed_elements(annotation_type)?.iter() {
            let el = self.element(*member)?;
            if el.kind == ElementKind::Method && el.simple_name == name {
                return Ok(el.id);
            }
        }
        Err(ModelError::Descriptor(format!(
            "annotation type {annotation_type:?} has no element `{name}`"
        )))
    }
}
