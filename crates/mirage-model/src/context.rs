use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use mirage_config::ModelConfig;
use mirage_core::{ModelError, Name, NameId, NameTable, Result};
use mirage_reflect::{lookup_qualified, ConstValue, GenericType, TypeProvider};
use parking_lot::RwLock;

use crate::annotation::{AnnotationMirror, AnnotationValue};
use crate::element::{Detail, Element, Origin, Reflected, TypeDetail};
use crate::ids::ElementId;
use crate::kinds::{ElementKind, Modifier, Modifiers, NestingKind, NoTypeKind, PrimitiveKind};
use crate::mirror::{
    ArrayType, DeclaredType, ExecutableType, MirrorKind, TypeMirror, TypeVariable, WildcardType,
};

/// One modelling session: the element arena, the name registry, the reflective caches and the
/// singleton mirrors.
///
/// Elements refer to each other by [`ElementId`], so supertype and enclosing/enclosed cycles
/// never become ownership cycles. The context is `Send + Sync`; every lazily derived field is
/// a `OnceLock` and every shared map sits behind a `parking_lot::RwLock`.
pub struct ModelContext {
    config: ModelConfig,
    root_name: Name,
    provider: Arc<dyn TypeProvider>,

    elements: RwLock<Vec<Arc<Element>>>,
    names: RwLock<NameTable>,
    /// Type elements by canonical qualified name.
    types: RwLock<HashMap<NameId, ElementId>>,
    /// Reflective type elements by binary name.
    pub(crate) by_binary: RwLock<HashMap<String, ElementId>>,
    packages: RwLock<HashMap<Name, ElementId>>,
    /// Mirrors built from reflection, per declaring scope.
    pub(crate) mirror_cache: RwLock<HashMap<(ElementId, GenericType), TypeMirror>>,

    primitives: [TypeMirror; 8],
    null: TypeMirror,
    void: TypeMirror,
    none: TypeMirror,
    package: TypeMirror,
}

impl std::fmt::Debug for ModelContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelContext")
            .field("root_type", &self.root_name)
            .field("elements", &self.elements.read().len())
            .finish_non_exhaustive()
    }
}

impl ModelContext {
    pub fn new(provider: impl TypeProvider + 'static) -> Self {
        Self::with_config(ModelConfig::default(), provider)
    }

    /// A context backed by the built-in `java.lang`/`java.util` descriptors.
    pub fn with_minimal_jdk() -> Self {
        Self::new(mirage_reflect::minimal_jdk())
    }

    pub fn with_config(config: ModelConfig, provider: impl TypeProvider + 'static) -> Self {
        let primitives = PrimitiveKind::ALL.map(|kind| TypeMirror::new(MirrorKind::Primitive(kind)));
        let ctx = ModelContext {
            root_name: Name::new(config.root_type.trim()),
            config,
            provider: Arc::new(provider),
            elements: RwLock::new(Vec::new()),
            names: RwLock::new(NameTable::new()),
            types: RwLock::new(HashMap::new()),
            by_binary: RwLock::new(HashMap::new()),
            packages: RwLock::new(HashMap::new()),
            mirror_cache: RwLock::new(HashMap::new()),
            primitives,
            null: TypeMirror::new(MirrorKind::Null),
            void: TypeMirror::new(MirrorKind::NoType(NoTypeKind::Void)),
            none: TypeMirror::new(MirrorKind::NoType(NoTypeKind::None)),
            package: TypeMirror::new(MirrorKind::NoType(NoTypeKind::Package)),
        };

        for name in &ctx.config.preload {
            match ctx.type_element(name) {
                Ok(Some(_)) => {}
                Ok(None) => {
                    tracing::warn!(target: "mirage.model", qualified_name = %name, "preload type not found")
                }
                Err(err) => {
                    tracing::warn!(target: "mirage.model", qualified_name = %name, error = %err, "failed to preload type")
                }
            }
        }
        ctx
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn provider(&self) -> &dyn TypeProvider {
        &*self.provider
    }

    /// Qualified name of the universal root reference type.
    pub fn root_type_name(&self) -> &Name {
        &self.root_name
    }

    pub fn root_type(&self) -> Result<TypeMirror> {
        let root = self.require_type_element(self.root_name.as_str())?;
        self.as_type(root)
    }

    /// Number of elements materialized so far.
    pub fn element_count(&self) -> usize {
        self.elements.read().len()
    }

    // ---------------------------------------------------------------------
    // Arena and registry
    // ---------------------------------------------------------------------

    pub(crate) fn alloc(&self, make: impl FnOnce(ElementId) -> Element) -> Arc<Element> {
        let mut elements = self.elements.write();
        let id = ElementId(elements.len() as u32);
        let element = Arc::new(make(id));
        elements.push(element.clone());
        element
    }

    pub fn element(&self, id: ElementId) -> Result<Arc<Element>> {
        self.elements
            .read()
            .get(id.index())
            .cloned()
            .ok_or_else(|| ModelError::invalid_argument(format!("unknown element {id:?}")))
    }

    /// Follows views down to the element that owns the structure.
    pub(crate) fn structural(&self, id: ElementId) -> Result<Arc<Element>> {
        let mut element = self.element(id)?;
        loop {
            let base = match &element.origin {
                Origin::View(base) => *base,
                _ => return Ok(element),
            };
            element = self.element(base)?;
        }
    }

    /// Registers `id` under `name`; returns the element already registered there, if any.
    pub(crate) fn register_type_name(&self, name: &Name, id: ElementId) -> Option<ElementId> {
        let key = self.names.write().intern(name.as_str());
        match self.types.write().entry(key) {
            Entry::Occupied(existing) => Some(*existing.get()),
            Entry::Vacant(slot) => {
                slot.insert(id);
                None
            }
        }
    }

    /// Removes `name` from the registry if it is registered to `id`.
    pub(crate) fn unregister_type_name(&self, name: &Name, id: ElementId) -> bool {
        let Some(key) = self.names.read().get(name.as_str()) else {
            return false;
        };
        let mut types = self.types.write();
        match types.get(&key) {
            Some(registered) if *registered == id => {
                types.remove(&key);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn registered_type(&self, qualified_name: &str) -> Option<ElementId> {
        let key = self.names.read().get(qualified_name)?;
        self.types.read().get(&key).copied()
    }

    /// Finds a type element by canonical qualified name: the registry first, then the
    /// provider. `Ok(None)` when neither knows the name.
    pub fn type_element(&self, qualified_name: &str) -> Result<Option<ElementId>> {
        let qualified_name = qualified_name.trim();
        if qualified_name.is_empty() {
            return Err(ModelError::invalid_argument("type name must not be blank"));
        }
        if let Some(id) = self.registered_type(qualified_name) {
            return Ok(Some(id));
        }
        match lookup_qualified(
            &*self.provider,
            qualified_name,
            self.config.nested_binary_fallback,
        ) {
            Some(info) => Ok(Some(self.reflect_class(info))),
            None => {
                tracing::debug!(target: "mirage.model", qualified_name, "type lookup missed");
                Ok(None)
            }
        }
    }

    pub fn require_type_element(&self, qualified_name: &str) -> Result<ElementId> {
        self.type_element(qualified_name)?
            .ok_or_else(|| ModelError::NotFound(Name::new(qualified_name)))
    }

    /// Resolves a binary name (`java.util.Map$Entry`) as used in reflection metadata.
    pub fn type_element_by_binary_name(&self, binary_name: &str) -> Result<ElementId> {
        if let Some(id) = self.by_binary.read().get(binary_name) {
            return Ok(*id);
        }
        if let Some(info) = self.provider.lookup_type(binary_name) {
            return Ok(self.reflect_class(info));
        }
        // Generated types are registered by canonical name only.
        self.registered_type(&binary_name.replace('$', "."))
            .ok_or_else(|| ModelError::NotFound(Name::new(binary_name)))
    }

    pub fn package_element(&self, qualified_name: &str) -> ElementId {
        let name = Name::new(qualified_name.trim());
        if let Some(id) = self.packages.read().get(&name) {
            return *id;
        }
        let mut packages = self.packages.write();
        if let Some(id) = packages.get(&name) {
            return *id;
        }
        let element = self.alloc(|id| {
            Element::new(
                id,
                ElementKind::Package,
                name.simple(),
                Some(name.clone()),
                Origin::Reflective(Reflected::Package),
                Detail::Package,
            )
            .with_modifiers(Modifiers::EMPTY)
        });
        packages.insert(name, element.id);
        element.id
    }

    // ---------------------------------------------------------------------
    // Singleton and composite mirrors
    // ---------------------------------------------------------------------

    pub fn primitive_type(&self, kind: PrimitiveKind) -> TypeMirror {
        self.primitives[kind.index()].clone()
    }

    pub fn null_type(&self) -> TypeMirror {
        self.null.clone()
    }

    pub fn no_type(&self, kind: NoTypeKind) -> TypeMirror {
        match kind {
            NoTypeKind::Void => self.void.clone(),
            NoTypeKind::None => self.none.clone(),
            NoTypeKind::Package => self.package.clone(),
        }
    }

    pub fn array_type(&self, component: TypeMirror) -> Result<TypeMirror> {
        match component.shape() {
            MirrorKind::Primitive(_)
            | MirrorKind::Declared(_)
            | MirrorKind::Array(_)
            | MirrorKind::TypeVariable(_) => {
                Ok(TypeMirror::new(MirrorKind::Array(ArrayType { component })))
            }
            _ => Err(ModelError::invalid_argument(format!(
                "`{component}` cannot be an array component type"
            ))),
        }
    }

    pub fn wildcard_type(
        &self,
        extends_bound: Option<TypeMirror>,
        super_bound: Option<TypeMirror>,
    ) -> Result<TypeMirror> {
        if extends_bound.is_some() && super_bound.is_some() {
            return Err(ModelError::invalid_argument(
                "a wildcard cannot have both an extends bound and a super bound",
            ));
        }
        for bound in extends_bound.iter().chain(super_bound.iter()) {
            if !matches!(
                bound.shape(),
                MirrorKind::Declared(_) | MirrorKind::Array(_) | MirrorKind::TypeVariable(_)
            ) {
                return Err(ModelError::invalid_argument(format!(
                    "`{bound}` cannot bound a wildcard"
                )));
            }
        }
        Ok(TypeMirror::new(MirrorKind::Wildcard(WildcardType {
            extends_bound,
            super_bound,
        })))
    }

    /// The declared type of `element` applied to `args`.
    ///
    /// An empty `args` gives the raw type (or the element's own type when it is not generic);
    /// otherwise the count must match the element's type parameters. Synthetic types that are
    /// still being built accept any number of arguments.
    pub fn declared_type(&self, element: ElementId, args: &[TypeMirror]) -> Result<TypeMirror> {
        let enclosing = self.default_enclosing_type(element)?;
        self.declared_type_in(&enclosing, element, args)
    }

    /// Like [`ModelContext::declared_type`], with an explicit enclosing instance type.
    pub fn declared_type_in(
        &self,
        enclosing: &TypeMirror,
        element: ElementId,
        args: &[TypeMirror],
    ) -> Result<TypeMirror> {
        let el = self.structural(element)?;
        if !el.kind.is_type() {
            return Err(ModelError::invalid_argument(format!(
                "{element:?} ({:?}) is not a type element",
                el.kind
            )));
        }
        if !matches!(enclosing.shape(), MirrorKind::Declared(_) | MirrorKind::NoType(NoTypeKind::None)) {
            return Err(ModelError::invalid_argument(format!(
                "`{enclosing}` cannot enclose a declared type"
            )));
        }
        let params = self.type_parameters(el.id)?;
        if args.is_empty() && params.is_empty() {
            let own = self.as_type(el.id)?;
            if own.as_declared().is_some_and(|declared| declared.enclosing == *enclosing) {
                return Ok(own);
            }
        }
        // Type parameters of a synthetic type are only known once its builder finishes.
        if el.is_complete() && !args.is_empty() && args.len() != params.len() {
            return Err(ModelError::invalid_argument(format!(
                "{} expects {} type argument(s), got {}",
                display_name(&el),
                params.len(),
                args.len()
            )));
        }
        if let Some(bad) = args.iter().find(|arg| {
            !matches!(
                arg.shape(),
                MirrorKind::Declared(_)
                    | MirrorKind::Array(_)
                    | MirrorKind::TypeVariable(_)
                    | MirrorKind::Wildcard(_)
            )
        }) {
            return Err(ModelError::invalid_argument(format!(
                "`{bad}` is not a valid type argument"
            )));
        }
        Ok(self.make_declared(&el, enclosing.clone(), args.to_vec()))
    }

    /// Convenience for `require_type_element` followed by `declared_type`.
    pub fn declared_type_named(&self, qualified_name: &str, args: &[TypeMirror]) -> Result<TypeMirror> {
        let element = self.require_type_element(qualified_name)?;
        self.declared_type(element, args)
    }

    /// A use of type parameter `element`, optionally with a lower bound.
    pub fn type_variable(&self, element: ElementId, lower_bound: Option<TypeMirror>) -> Result<TypeMirror> {
        let el = self.structural(element)?;
        if el.kind != ElementKind::TypeParameter {
            return Err(ModelError::invalid_argument(format!(
                "{element:?} is not a type parameter"
            )));
        }
        match lower_bound {
            None => self.as_type(element),
            Some(lower) => Ok(TypeMirror::new(MirrorKind::TypeVariable(TypeVariable {
                element: el.id,
                name: el.simple_name.clone(),
                lower,
            }))),
        }
    }

    pub(crate) fn make_declared(&self, el: &Element, enclosing: TypeMirror, args: Vec<TypeMirror>) -> TypeMirror {
        TypeMirror::new(MirrorKind::Declared(DeclaredType {
            element: el.id,
            qualified_name: display_name(el),
            enclosing,
            args,
        }))
    }

    /// Inner (non-static member) classes are enclosed by their outer class's type.
    fn default_enclosing_type(&self, element: ElementId) -> Result<TypeMirror> {
        let el = self.element(element)?;
        if !el.kind.is_class()
            || el.kind == ElementKind::Enum
            || el.modifiers().contains(Modifier::Static)
            || self.nesting_kind(element)? != NestingKind::Member
        {
            return Ok(self.none.clone());
        }
        match self.enclosing_element(element)? {
            Some(outer) if self.kind(outer)?.is_type() => self.as_type(outer),
            _ => Ok(self.none.clone()),
        }
    }

    // ---------------------------------------------------------------------
    // Lazy element accessors
    // ---------------------------------------------------------------------

    /// Reads `cell`, filling it from reflection on first use. Synthetic elements still being
    /// built get `pending()` and the cell stays empty.
    fn lazy<T: Clone>(
        &self,
        element: &Element,
        cell: &OnceLock<T>,
        pending: impl FnOnce() -> T,
        reflect: impl FnOnce(&Reflected) -> Result<T>,
    ) -> Result<T> {
        if let Some(value) = cell.get() {
            return Ok(value.clone());
        }
        match element.reflected() {
            Some(reflected) => {
                let value = reflect(reflected)?;
                Ok(cell.get_or_init(|| value).clone())
            }
            None => Ok(pending()),
        }
    }

    pub fn kind(&self, id: ElementId) -> Result<ElementKind> {
        Ok(self.element(id)?.kind)
    }

    pub fn simple_name(&self, id: ElementId) -> Result<Name> {
        Ok(self.element(id)?.simple_name.clone())
    }

    pub fn qualified_name(&self, id: ElementId) -> Result<Option<Name>> {
        Ok(self.element(id)?.qualified_name.clone())
    }

    pub fn modifiers(&self, id: ElementId) -> Result<Modifiers> {
        Ok(self.element(id)?.modifiers())
    }

    /// `None` for packages and for synthetic elements whose enclosing element is not set yet.
    pub fn enclosing_element(&self, id: ElementId) -> Result<Option<ElementId>> {
        let el = self.element(id)?;
        if el.kind == ElementKind::Package {
            return Ok(None);
        }
        if let Some(enclosing) = el.enclosing.get() {
            return Ok(Some(*enclosing));
        }
        let Some(Reflected::Class(info)) = el.reflected() else {
            return Ok(None);
        };
        let enclosing = match &info.declaring_class {
            Some(outer) => self.type_element_by_binary_name(outer)?,
            None => self.package_element(info.package_name()),
        };
        Ok(Some(*el.enclosing.get_or_init(|| enclosing)))
    }

    /// Reflective types list fields, constructors, methods and nested types, in that order.
    /// Synthetic types list exactly what their builder added. Packages list the top-level
    /// types materialized so far.
    pub fn enclosed_elements(&self, id: ElementId) -> Result<Arc<[ElementId]>> {
        let el = self.structural(id)?;
        if el.kind == ElementKind::Package {
            return Ok(self.package_members(&el));
        }
        let detail = require_type(&el)?;
        self.lazy(&el, &detail.enclosed, empty, |reflected| match reflected {
            Reflected::Class(info) => self.reflect_members(el.id, info),
            _ => Ok(empty()),
        })
    }

    fn package_members(&self, package: &Element) -> Arc<[ElementId]> {
        let Some(package_name) = package.qualified_name.as_ref() else {
            return empty();
        };
        let names = self.names.read();
        let mut members: Vec<(&str, ElementId)> = self
            .types
            .read()
            .iter()
            .map(|(key, id)| (names.resolve(*key), *id))
            .filter(|(name, _)| match name.rfind('.') {
                Some(idx) => &name[..idx] == package_name.as_str(),
                None => package_name.is_empty(),
            })
            .collect();
        members.sort_unstable();
        members.into_iter().map(|(_, id)| id).collect()
    }

    pub fn nesting_kind(&self, id: ElementId) -> Result<NestingKind> {
        let el = self.structural(id)?;
        let detail = require_type(&el)?;
        self.lazy(&el, &detail.nesting, || NestingKind::TopLevel, |reflected| match reflected {
            Reflected::Class(info) if info.declaring_class.is_some() => Ok(NestingKind::Member),
            _ => Ok(NestingKind::TopLevel),
        })
    }

    /// The superclass type; `NoType(None)` for interfaces, the root type and unset builders.
    pub fn superclass(&self, id: ElementId) -> Result<TypeMirror> {
        let el = self.structural(id)?;
        let detail = require_type(&el)?;
        self.lazy(&el, &detail.superclass, || self.none.clone(), |reflected| match reflected {
            Reflected::Class(info) => match &info.superclass {
                Some(superclass) => self.mirror_of(superclass, el.id),
                None => Ok(self.none.clone()),
            },
            _ => Ok(self.none.clone()),
        })
    }

    pub fn interfaces(&self, id: ElementId) -> Result<Arc<[TypeMirror]>> {
        let el = self.structural(id)?;
        let detail = require_type(&el)?;
        self.lazy(&el, &detail.interfaces, empty, |reflected| match reflected {
            Reflected::Class(info) => info
                .interfaces
                .iter()
                .map(|iface| self.mirror_of(iface, el.id))
                .collect(),
            _ => Ok(empty()),
        })
    }

    /// Type parameters of a type or executable element.
    pub fn type_parameters(&self, id: ElementId) -> Result<Arc<[ElementId]>> {
        let el = self.structural(id)?;
        if let Some(detail) = el.type_detail() {
            return self.lazy(&el, &detail.type_parameters, empty, |reflected| match reflected {
                Reflected::Class(info) => Ok(self.reflect_type_parameters(el.id, &info.type_params)),
                _ => Ok(empty()),
            });
        }
        if let Some(detail) = el.executable_detail() {
            return self.lazy(&el, &detail.type_parameters, empty, |reflected| {
                Ok(match reflected.method_info() {
                    Some(info) => self.reflect_type_parameters(el.id, &info.type_params),
                    None => empty(),
                })
            });
        }
        Err(not_a(&el, "generic element"))
    }

    /// The type an element stands for: the declared type of a type element, the type
    /// variable of a type parameter, the executable type of a method, the type of a
    /// variable, or `NoType(Package)`.
    pub fn as_type(&self, id: ElementId) -> Result<TypeMirror> {
        let el = self.structural(id)?;
        match &el.detail {
            Detail::Package => Ok(self.package.clone()),
            Detail::Type(detail) => {
                if let Some(ty) = detail.as_type.get() {
                    return Ok(ty.clone());
                }
                let ty = self.derive_declared(&el)?;
                if el.is_complete() {
                    return Ok(detail.as_type.get_or_init(|| ty).clone());
                }
                Ok(ty)
            }
            Detail::TypeParameter(detail) => Ok(detail
                .as_type
                .get_or_init(|| {
                    TypeMirror::new(MirrorKind::TypeVariable(TypeVariable {
                        element: el.id,
                        name: el.simple_name.clone(),
                        lower: self.null.clone(),
                    }))
                })
                .clone()),
            Detail::Executable(_) => self.executable_type(el.id),
            Detail::Variable(_) => self.variable_type(el.id),
            Detail::Delegated => Err(ModelError::invalid_state(format!(
                "{:?} has no structure of its own",
                el.id
            ))),
        }
    }

    pub(crate) fn derive_declared(&self, el: &Element) -> Result<TypeMirror> {
        let args = self
            .type_parameters(el.id)?
            .iter()
            .map(|param| self.as_type(*param))
            .collect::<Result<Vec<_>>>()?;
        let enclosing = self.default_enclosing_type(el.id)?;
        Ok(self.make_declared(el, enclosing, args))
    }

    pub fn parameters(&self, id: ElementId) -> Result<Arc<[ElementId]>> {
        let el = self.structural(id)?;
        let detail = el.executable_detail().ok_or_else(|| not_a(&el, "executable"))?;
        self.lazy(&el, &detail.parameters, empty, |reflected| {
            Ok(match reflected.method_info() {
                Some(info) => self.reflect_parameters(el.id, info),
                None => empty(),
            })
        })
    }

    /// `void` for constructors.
    pub fn return_type(&self, id: ElementId) -> Result<TypeMirror> {
        let el = self.structural(id)?;
        let detail = el.executable_detail().ok_or_else(|| not_a(&el, "executable"))?;
        self.lazy(&el, &detail.return_type, || self.void.clone(), |reflected| match reflected {
            Reflected::Method { .. } => match reflected.method_info() {
                Some(info) => self.mirror_of(&info.return_type, el.id),
                None => Ok(self.void.clone()),
            },
            _ => Ok(self.void.clone()),
        })
    }

    pub fn thrown_types(&self, id: ElementId) -> Result<Arc<[TypeMirror]>> {
        let el = self.structural(id)?;
        let detail = el.executable_detail().ok_or_else(|| not_a(&el, "executable"))?;
        self.lazy(&el, &detail.thrown, empty, |reflected| match reflected.method_info() {
            Some(info) => info
                .throws
                .iter()
                .map(|ty| self.mirror_of(ty, el.id))
                .collect(),
            None => Ok(empty()),
        })
    }

    pub fn is_varargs(&self, id: ElementId) -> Result<bool> {
        let el = self.structural(id)?;
        let detail = el.executable_detail().ok_or_else(|| not_a(&el, "executable"))?;
        self.lazy(&el, &detail.varargs, || false, |reflected| {
            Ok(reflected.method_info().is_some_and(|info| info.is_varargs()))
        })
    }

    /// Default value of an annotation type element.
    pub fn default_value(&self, id: ElementId) -> Result<Option<AnnotationValue>> {
        let el = self.structural(id)?;
        let detail = el.executable_detail().ok_or_else(|| not_a(&el, "executable"))?;
        self.lazy(&el, &detail.default_value, || None, |reflected| {
            match reflected.method_info().and_then(|info| info.default_value.as_ref()) {
                Some(value) => self.reflect_annotation_value(value, el.id).map(Some),
                None => Ok(None),
            }
        })
    }

    pub fn executable_type(&self, id: ElementId) -> Result<TypeMirror> {
        let el = self.structural(id)?;
        let detail = el.executable_detail().ok_or_else(|| not_a(&el, "executable"))?;
        if let Some(ty) = detail.as_type.get() {
            return Ok(ty.clone());
        }
        let type_variables = self
            .type_parameters(el.id)?
            .iter()
            .map(|param| self.as_type(*param))
            .collect::<Result<Vec<_>>>()?;
        let parameter_types = self
            .parameters(el.id)?
            .iter()
            .map(|param| self.variable_type(*param))
            .collect::<Result<Vec<_>>>()?;
        let ty = TypeMirror::new(MirrorKind::Executable(ExecutableType {
            type_variables,
            parameter_types,
            return_type: self.return_type(el.id)?,
            thrown_types: self.thrown_types(el.id)?.to_vec(),
        }));
        if el.is_complete() {
            return Ok(detail.as_type.get_or_init(|| ty).clone());
        }
        Ok(ty)
    }

    pub fn variable_type(&self, id: ElementId) -> Result<TypeMirror> {
        let el = self.structural(id)?;
        let detail = el.variable_detail().ok_or_else(|| not_a(&el, "variable"))?;
        self.lazy(&el, &detail.ty, || self.none.clone(), |reflected| {
            let scope = el.enclosing.get().copied().unwrap_or(el.id);
            match reflected {
                Reflected::Field { owner, index } => match owner.fields.get(*index) {
                    Some(field) => self.mirror_of(&field.ty, scope),
                    None => Err(stale_index(owner.binary_name.as_str(), *index)),
                },
                Reflected::Parameter(info) => self.mirror_of(&info.ty, scope),
                _ => Ok(self.none.clone()),
            }
        })
    }

    /// Compile-time constant of a field, if any.
    pub fn constant_value(&self, id: ElementId) -> Result<Option<ConstValue>> {
        let el = self.structural(id)?;
        let detail = el.variable_detail().ok_or_else(|| not_a(&el, "variable"))?;
        self.lazy(&el, &detail.constant, || None, |reflected| match reflected {
            Reflected::Field { owner, index } => {
                Ok(owner.fields.get(*index).and_then(|field| field.constant.clone()))
            }
            _ => Ok(None),
        })
    }

    /// Declared bounds of a type parameter, in declaration order.
    pub fn bounds(&self, id: ElementId) -> Result<Arc<[TypeMirror]>> {
        let el = self.structural(id)?;
        let detail = el.type_parameter_detail().ok_or_else(|| not_a(&el, "type parameter"))?;
        self.lazy(&el, &detail.bounds, empty, |reflected| match reflected {
            Reflected::TypeParameter(info) => info
                .bounds
                .iter()
                .map(|bound| self.mirror_of(bound, detail.generic_element))
                .collect(),
            _ => Ok(empty()),
        })
    }

    /// The type or executable that declares a type parameter.
    pub fn generic_element(&self, id: ElementId) -> Result<ElementId> {
        let el = self.structural(id)?;
        let detail = el.type_parameter_detail().ok_or_else(|| not_a(&el, "type parameter"))?;
        Ok(detail.generic_element)
    }

    /// Upper bound of a type variable (its first declared bound, else the root type) or of a
    /// wildcard (its extends bound, else the root type).
    pub fn upper_bound(&self, ty: &TypeMirror) -> Result<TypeMirror> {
        match ty.shape() {
            MirrorKind::TypeVariable(var) => match self.bounds(var.element)?.first() {
                Some(bound) => Ok(bound.clone()),
                None => self.root_type(),
            },
            MirrorKind::Wildcard(wildcard) => match &wildcard.extends_bound {
                Some(bound) => Ok(bound.clone()),
                None => self.root_type(),
            },
            _ => Err(ModelError::invalid_argument(format!(
                "`{ty}` is neither a type variable nor a wildcard"
            ))),
        }
    }

    /// Lower bound of a type variable or wildcard; the null type when there is none.
    pub fn lower_bound(&self, ty: &TypeMirror) -> Result<TypeMirror> {
        match ty.shape() {
            MirrorKind::TypeVariable(var) => Ok(var.lower.clone()),
            MirrorKind::Wildcard(wildcard) => {
                Ok(wildcard.super_bound.clone().unwrap_or_else(|| self.null.clone()))
            }
            _ => Err(ModelError::invalid_argument(format!(
                "`{ty}` is neither a type variable nor a wildcard"
            ))),
        }
    }

    pub fn annotation_mirrors(&self, id: ElementId) -> Result<Arc<[AnnotationMirror]>> {
        let el = self.structural(id)?;
        self.lazy(&el, &el.annotations, empty, |reflected| {
            let infos = match reflected {
                Reflected::Class(info) => &info.annotations,
                Reflected::Field { owner, index } => match owner.fields.get(*index) {
                    Some(field) => &field.annotations,
                    None => return Err(stale_index(owner.binary_name.as_str(), *index)),
                },
                Reflected::Constructor { .. } | Reflected::Method { .. } => {
                    match reflected.method_info() {
                        Some(info) => &info.annotations,
                        None => return Ok(empty()),
                    }
                }
                Reflected::Parameter(info) => &info.annotations,
                Reflected::Package | Reflected::TypeParameter(_) => return Ok(empty()),
            };
            infos
                .iter()
                .map(|info| self.reflect_annotation(info, el.id))
                .collect()
        })
    }

    /// The element a declared type or type variable refers to.
    pub fn as_element(&self, ty: &TypeMirror) -> Option<ElementId> {
        ty.element()
    }
}

pub(crate) fn empty<T>() -> Arc<[T]> {
    Arc::from(Vec::new())
}

pub(crate) fn display_name(el: &Element) -> Name {
    el.qualified_name
        .clone()
        .unwrap_or_else(|| el.simple_name.clone())
}

fn require_type(el: &Element) -> Result<&TypeDetail> {
    el.type_detail().ok_or_else(|| not_a(el, "type element"))
}

fn not_a(el: &Element, what: &str) -> ModelError {
    ModelError::invalid_argument(format!(
        "`{}` ({:?}) is not a {what}",
        display_name(el),
        el.kind
    ))
}

fn stale_index(owner: &str, index: usize) -> ModelError {
    ModelError::Descriptor(format!("{owner} has no member at index {index}"))
}
