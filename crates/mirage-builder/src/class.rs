use mirage_core::{ModelError, Name, Result};
use mirage_model::{
    AnnotationMirror, AnnotationValue, ElementId, ElementKind, ElementView, Modifier, Modifiers,
    ModelContext, NestingKind, NoTypeKind, TypeDefinition, TypeMirror,
};

use crate::member::{FieldBuilder, MethodBuilder};
use crate::resolve::resolve_type;
use crate::scope::TypeParamScope;

/// Assembles a new class, interface, enum or annotation type.
///
/// The element is reserved in the context as soon as the builder is created, so other
/// builders (and this one) can refer to it by name before it is finished. Nothing is
/// validated until [`ClassBuilder::finish`].
#[derive(Debug)]
pub struct ClassBuilder<'ctx> {
    pub(crate) ctx: &'ctx ModelContext,
    pub(crate) id: ElementId,
    qualified_name: Name,
    kind: ElementKind,
    modifiers: Modifiers,
    enclosing: Option<ElementId>,
    nesting: NestingKind,
    superclass: Option<TypeMirror>,
    interfaces: Vec<TypeMirror>,
    pub(crate) scope: TypeParamScope,
    type_params: Vec<(ElementId, Vec<TypeMirror>)>,
    pub(crate) enclosed: Vec<ElementId>,
    annotations: Vec<AnnotationMirror>,
    as_type: Option<TypeMirror>,
}

impl<'ctx> ClassBuilder<'ctx> {
    /// A builder with no enclosing element; set one with [`ClassBuilder::enclosed_by`].
    pub fn new(ctx: &'ctx ModelContext, qualified_name: &str, kind: ElementKind) -> Result<Self> {
        let id = ctx.reserve_type(qualified_name, kind)?;
        Ok(ClassBuilder {
            ctx,
            id,
            qualified_name: Name::new(qualified_name.trim()),
            kind,
            modifiers: Modifiers::EMPTY,
            enclosing: None,
            nesting: NestingKind::TopLevel,
            superclass: None,
            interfaces: Vec::new(),
            scope: TypeParamScope::new(),
            type_params: Vec::new(),
            enclosed: Vec::new(),
            annotations: Vec::new(),
            as_type: None,
        })
    }

    /// A top-level type enclosed by the package its qualified name implies.
    pub fn top_level(ctx: &'ctx ModelContext, qualified_name: &str, kind: ElementKind) -> Result<Self> {
        let mut builder = Self::new(ctx, qualified_name, kind)?;
        let package = builder.qualified_name.qualifier().unwrap_or_default();
        builder.enclosing = Some(ctx.package_element(package.as_str()));
        Ok(builder)
    }

    /// A member type of this one. It sees this builder's type parameters and is listed among
    /// its enclosed elements; it must be finished before this builder is.
    pub fn nested(&mut self, simple_name: &str, kind: ElementKind) -> Result<ClassBuilder<'ctx>> {
        let simple_name = simple_name.trim();
        if simple_name.is_empty() || simple_name.contains('.') {
            return Err(ModelError::invalid_argument(format!(
                "`{simple_name}` is not a simple name"
            )));
        }
        let mut nested = ClassBuilder::new(self.ctx, self.qualified_name.child(simple_name).as_str(), kind)?;
        nested.enclosing = Some(self.id);
        nested.nesting = NestingKind::Member;
        nested.scope = self.scope.child();
        self.enclosed.push(nested.id);
        Ok(nested)
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn qualified_name(&self) -> &Name {
        &self.qualified_name
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn context(&self) -> &'ctx ModelContext {
        self.ctx
    }

    pub fn modifiers(&mut self, modifiers: Modifiers) -> &mut Self {
        self.modifiers = modifiers;
        self
    }

    pub fn add_modifier(&mut self, modifier: Modifier) -> &mut Self {
        self.modifiers.insert(modifier);
        self
    }

    pub fn enclosed_by(&mut self, enclosing: ElementId) -> &mut Self {
        self.enclosing = Some(enclosing);
        self
    }

    pub fn nesting(&mut self, nesting: NestingKind) -> &mut Self {
        self.nesting = nesting;
        self
    }

    /// The superclass may be a type that is itself still being built.
    pub fn superclass(&mut self, superclass: TypeMirror) -> Result<&mut Self> {
        if superclass.as_declared().is_none() {
            return Err(ModelError::invalid_argument(format!(
                "`{superclass}` cannot be a superclass"
            )));
        }
        self.superclass = Some(superclass);
        Ok(self)
    }

    pub fn superclass_named(&mut self, text: &str) -> Result<&mut Self> {
        let superclass = self.resolve_type(text)?;
        self.superclass(superclass)
    }

    pub fn add_interface(&mut self, interface: TypeMirror) -> Result<&mut Self> {
        if interface.as_declared().is_none() {
            return Err(ModelError::invalid_argument(format!(
                "`{interface}` cannot be implemented"
            )));
        }
        self.interfaces.push(interface);
        Ok(self)
    }

    pub fn add_interface_named(&mut self, text: &str) -> Result<&mut Self> {
        let interface = self.resolve_type(text)?;
        self.add_interface(interface)
    }

    /// Declares a type parameter. Bounds are resolved after the parameter is in scope, so
    /// `T extends Comparable<T>` works.
    pub fn add_type_parameter(&mut self, name: &str, bounds: &[&str]) -> Result<ElementId> {
        let (param, bounds) = self.scope.declare_bounded(self.ctx, self.id, name, bounds)?;
        self.type_params.push((param, bounds));
        Ok(param)
    }

    pub fn annotate(&mut self, annotation: AnnotationMirror) -> &mut Self {
        self.annotations.push(annotation);
        self
    }

    /// Adds an annotation of the named type with values keyed by accessor name.
    pub fn annotate_named<'a>(
        &mut self,
        annotation_type: &str,
        values: impl IntoIterator<Item = (&'a str, AnnotationValue)>,
    ) -> Result<&mut Self> {
        let element = self.ctx.type_element(annotation_type)?.ok_or_else(|| {
            ModelError::InvalidReference(annotation_type.to_string())
        })?;
        let annotation = self.ctx.annotation_mirror(element, values)?;
        Ok(self.annotate(annotation))
    }

    /// Overrides the derived declared type.
    pub fn set_as_type(&mut self, ty: TypeMirror) -> &mut Self {
        self.as_type = Some(ty);
        self
    }

    /// The declared type of the class being built: the explicit one if set, otherwise this
    /// element applied to the type parameters declared so far.
    pub fn as_type(&self) -> Result<TypeMirror> {
        if let Some(ty) = &self.as_type {
            return Ok(ty.clone());
        }
        let args = self.scope.type_arguments(self.ctx)?;
        self.ctx.declared_type(self.id, &args)
    }

    pub fn resolve_type(&self, text: &str) -> Result<TypeMirror> {
        resolve_type(self.ctx, &self.scope, text)
    }

    pub fn field(&mut self, name: &str) -> Result<FieldBuilder<'_, 'ctx>> {
        FieldBuilder::new(self, ElementKind::Field, name)
    }

    pub fn enum_constant(&mut self, name: &str) -> Result<FieldBuilder<'_, 'ctx>> {
        if self.kind != ElementKind::Enum {
            return Err(ModelError::invalid_argument(format!(
                "{} is not an enum",
                self.qualified_name
            )));
        }
        FieldBuilder::new(self, ElementKind::EnumConstant, name)
    }

    pub fn method(&mut self, name: &str) -> Result<MethodBuilder<'_, 'ctx>> {
        MethodBuilder::new(self, ElementKind::Method, name)
    }

    pub fn constructor(&mut self) -> Result<MethodBuilder<'_, 'ctx>> {
        if self.kind.is_interface() {
            return Err(ModelError::invalid_argument(format!(
                "interface {} cannot declare constructors",
                self.qualified_name
            )));
        }
        MethodBuilder::new(self, ElementKind::Constructor, "<init>")
    }

    /// Places an existing element inside this type through a view. The view's enclosing
    /// element defaults to this type.
    pub fn add_element_view(&mut self, view: ElementView) -> Result<ElementId> {
        let view = match view.enclosing_element(self.ctx)? {
            Some(enclosing) if enclosing == self.id => view,
            _ => view.with_enclosing(self.id),
        };
        let id = self.ctx.adopt_view(&view)?;
        self.enclosed.push(id);
        Ok(id)
    }

    /// Validates the accumulated state and defines the element.
    ///
    /// Nothing is applied when validation fails, so the caller can fix the builder and call
    /// `finish` again. Once it succeeds the element is final and further calls fail.
    pub fn finish(&self) -> Result<ElementId> {
        let ctx = self.ctx;
        let Some(enclosing) = self.enclosing else {
            return Err(ModelError::invalid_state(format!(
                "{} has no enclosing element",
                self.qualified_name
            )));
        };
        let superclass = match &self.superclass {
            Some(superclass) => superclass.clone(),
            None => self.default_superclass()?,
        };
        for member in &self.enclosed {
            if !ctx.element(*member)?.is_complete() {
                return Err(ModelError::invalid_state(format!(
                    "{} encloses {:?}, which was never finished",
                    self.qualified_name,
                    ctx.simple_name(*member)?
                )));
            }
        }
        if ctx.element(self.id)?.is_complete() {
            return Err(ModelError::invalid_state(format!(
                "{} is already finished",
                self.qualified_name
            )));
        }

        let mut type_parameters = Vec::with_capacity(self.type_params.len());
        for (param, bounds) in &self.type_params {
            ctx.define_type_parameter(*param, bounds.clone())?;
            type_parameters.push(*param);
        }
        ctx.define_type(
            self.id,
            TypeDefinition {
                modifiers: self.modifiers,
                enclosing,
                nesting: self.nesting,
                superclass,
                interfaces: self.interfaces.clone(),
                type_parameters,
                enclosed: self.enclosed.clone(),
                annotations: self.annotations.clone(),
                as_type: self.as_type.clone(),
            },
        )?;

        tracing::debug!(
            target: "mirage.builder",
            qualified_name = %self.qualified_name,
            kind = ?self.kind,
            enclosed = self.enclosed.len(),
            "finished class builder"
        );
        Ok(self.id)
    }

    /// Abandons an unfinished builder and frees its name.
    pub fn discard(self) -> Result<()> {
        self.ctx.release_type(self.id)?;
        tracing::debug!(target: "mirage.builder", qualified_name = %self.qualified_name, "discarded class builder");
        Ok(())
    }

    /// Abandons a member type created with [`ClassBuilder::nested`], so this builder no
    /// longer waits for it.
    pub fn discard_nested(&mut self, nested: ClassBuilder<'ctx>) -> Result<()> {
        if nested.enclosing != Some(self.id) {
            return Err(ModelError::invalid_argument(format!(
                "{} is not nested in {}",
                nested.qualified_name, self.qualified_name
            )));
        }
        let id = nested.id;
        nested.discard()?;
        self.enclosed.retain(|member| *member != id);
        Ok(())
    }

    fn default_superclass(&self) -> Result<TypeMirror> {
        match self.kind {
            ElementKind::Class if self.qualified_name != *self.ctx.root_type_name() => {
                Err(ModelError::invalid_state(format!(
                    "{} has no superclass",
                    self.qualified_name
                )))
            }
            ElementKind::Enum => {
                let own = self.as_type()?;
                match self.ctx.type_element("java.lang.Enum")? {
                    Some(enum_type) => self.ctx.declared_type(enum_type, &[own]),
                    None => Ok(self.ctx.no_type(NoTypeKind::None)),
                }
            }
            _ => Ok(self.ctx.no_type(NoTypeKind::None)),
        }
    }
}
