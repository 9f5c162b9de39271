use mirage_core::{ModelError, Name, Result};
use mirage_model::{
    AnnotationMirror, AnnotationValue, ConstValue, ElementId, ElementKind, ExecutableDefinition,
    Modifier, Modifiers, NoTypeKind, TypeKind, TypeMirror, VariableDefinition,
};

use crate::class::ClassBuilder;
use crate::resolve::resolve_type;
use crate::scope::TypeParamScope;

/// Builds a method or constructor of the enclosing [`ClassBuilder`].
///
/// Method type parameters are added to a scope nested in the class scope, so both are
/// visible when resolving parameter, return and thrown types.
#[derive(Debug)]
pub struct MethodBuilder<'a, 'ctx> {
    owner: &'a mut ClassBuilder<'ctx>,
    id: ElementId,
    kind: ElementKind,
    name: Name,
    modifiers: Modifiers,
    scope: TypeParamScope,
    type_params: Vec<(ElementId, Vec<TypeMirror>)>,
    params: Vec<ElementId>,
    return_type: Option<TypeMirror>,
    thrown: Vec<TypeMirror>,
    varargs: bool,
    default_value: Option<AnnotationValue>,
    annotations: Vec<AnnotationMirror>,
}

impl<'a, 'ctx> MethodBuilder<'a, 'ctx> {
    pub(crate) fn new(owner: &'a mut ClassBuilder<'ctx>, kind: ElementKind, name: &str) -> Result<Self> {
        let id = owner.ctx.reserve_member(kind, name)?;
        let scope = owner.scope.child();
        Ok(MethodBuilder {
            owner,
            id,
            kind,
            name: Name::new(name.trim()),
            modifiers: Modifiers::EMPTY,
            scope,
            type_params: Vec::new(),
            params: Vec::new(),
            return_type: None,
            thrown: Vec::new(),
            varargs: false,
            default_value: None,
            annotations: Vec::new(),
        })
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    pub fn type_parameter(mut self, name: &str, bounds: &[&str]) -> Result<Self> {
        let (param, bounds) = self.scope.declare_bounded(self.owner.ctx, self.id, name, bounds)?;
        self.type_params.push((param, bounds));
        Ok(self)
    }

    pub fn param(self, name: &str, type_text: &str) -> Result<Self> {
        let ty = self.resolve_type(type_text)?;
        self.param_of_type(name, ty)
    }

    pub fn param_of_type(mut self, name: &str, ty: TypeMirror) -> Result<Self> {
        let ctx = self.owner.ctx;
        if matches!(ty.kind(), TypeKind::Void | TypeKind::None | TypeKind::Package | TypeKind::Executable | TypeKind::Wildcard) {
            return Err(ModelError::invalid_argument(format!(
                "parameter `{name}` cannot have type `{ty}`"
            )));
        }
        let param = ctx.reserve_member(ElementKind::Parameter, name)?;
        ctx.define_variable(
            param,
            VariableDefinition {
                modifiers: Modifiers::EMPTY,
                enclosing: self.id,
                ty,
                constant: None,
                annotations: Vec::new(),
            },
        )?;
        self.params.push(param);
        Ok(self)
    }

    pub fn returns(self, type_text: &str) -> Result<Self> {
        let ty = self.resolve_type(type_text)?;
        self.returns_type(ty)
    }

    pub fn returns_type(mut self, ty: TypeMirror) -> Result<Self> {
        if self.kind == ElementKind::Constructor {
            return Err(ModelError::invalid_argument("constructors have no return type"));
        }
        self.return_type = Some(ty);
        Ok(self)
    }

    pub fn throws(mut self, type_text: &str) -> Result<Self> {
        let ty = self.resolve_type(type_text)?;
        self.thrown.push(ty);
        Ok(self)
    }

    /// Marks the last parameter as variable arity; checked when the method is finished.
    pub fn varargs(mut self) -> Self {
        self.varargs = true;
        self
    }

    /// Default value of an annotation type element.
    pub fn default_value(mut self, value: AnnotationValue) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn annotate(mut self, annotation: AnnotationMirror) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn resolve_type(&self, text: &str) -> Result<TypeMirror> {
        resolve_type(self.owner.ctx, &self.scope, text)
    }

    /// Defines the executable and appends it to the owner's enclosed elements.
    pub fn finish(self) -> Result<ElementId> {
        let ctx = self.owner.ctx;
        if self.varargs {
            let last = match self.params.last() {
                Some(param) => Some(ctx.variable_type(*param)?),
                None => None,
            };
            if !last.is_some_and(|ty| ty.kind() == TypeKind::Array) {
                return Err(ModelError::invalid_state(format!(
                    "variable-arity method `{}` must end with an array parameter",
                    self.name
                )));
            }
        }
        if self.default_value.is_some() && self.owner.kind() != ElementKind::AnnotationType {
            return Err(ModelError::invalid_state(format!(
                "`{}` has a default value but {} is not an annotation type",
                self.name,
                self.owner.qualified_name()
            )));
        }

        let mut type_parameters = Vec::with_capacity(self.type_params.len());
        for (param, bounds) in self.type_params {
            ctx.define_type_parameter(param, bounds)?;
            type_parameters.push(param);
        }
        let mut modifiers = self.modifiers;
        if self.owner.kind().is_interface() && !modifiers.contains(Modifier::Default) && !modifiers.contains(Modifier::Static) {
            modifiers.insert(Modifier::Abstract);
        }
        let return_type = self
            .return_type
            .unwrap_or_else(|| ctx.no_type(NoTypeKind::Void));

        ctx.define_executable(
            self.id,
            ExecutableDefinition {
                modifiers,
                enclosing: self.owner.id,
                type_parameters,
                parameters: self.params,
                return_type,
                thrown_types: self.thrown,
                varargs: self.varargs,
                default_value: self.default_value,
                annotations: self.annotations,
            },
        )?;
        self.owner.enclosed.push(self.id);
        tracing::debug!(
            target: "mirage.builder",
            owner = %self.owner.qualified_name(),
            name = %self.name,
            kind = ?self.kind,
            "finished executable builder"
        );
        Ok(self.id)
    }
}

/// Builds a field or enum constant of the enclosing [`ClassBuilder`].
#[derive(Debug)]
pub struct FieldBuilder<'a, 'ctx> {
    owner: &'a mut ClassBuilder<'ctx>,
    id: ElementId,
    kind: ElementKind,
    name: Name,
    modifiers: Modifiers,
    ty: Option<TypeMirror>,
    constant: Option<ConstValue>,
    annotations: Vec<AnnotationMirror>,
}

impl<'a, 'ctx> FieldBuilder<'a, 'ctx> {
    pub(crate) fn new(owner: &'a mut ClassBuilder<'ctx>, kind: ElementKind, name: &str) -> Result<Self> {
        let id = owner.ctx.reserve_member(kind, name)?;
        let modifiers = match kind {
            ElementKind::EnumConstant => [Modifier::Public, Modifier::Static, Modifier::Final]
                .into_iter()
                .collect(),
            _ => Modifiers::EMPTY,
        };
        Ok(FieldBuilder {
            owner,
            id,
            kind,
            name: Name::new(name.trim()),
            modifiers,
            ty: None,
            constant: None,
            annotations: Vec::new(),
        })
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    pub fn of_type(self, type_text: &str) -> Result<Self> {
        let ty = resolve_type(self.owner.ctx, &self.owner.scope, type_text)?;
        self.with_type(ty)
    }

    pub fn with_type(mut self, ty: TypeMirror) -> Result<Self> {
        if !(ty.is_primitive() || ty.is_reference()) || ty.kind() == TypeKind::Null {
            return Err(ModelError::invalid_argument(format!(
                "field `{}` cannot have type `{ty}`",
                self.name
            )));
        }
        self.ty = Some(ty);
        Ok(self)
    }

    pub fn constant(mut self, value: ConstValue) -> Self {
        self.constant = Some(value);
        self
    }

    pub fn annotate(mut self, annotation: AnnotationMirror) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Defines the variable and appends it to the owner's enclosed elements. Enum constants
    /// default to the owner's type.
    pub fn finish(self) -> Result<ElementId> {
        let ctx = self.owner.ctx;
        let ty = match (self.ty, self.kind) {
            (Some(ty), _) => ty,
            (None, ElementKind::EnumConstant) => self.owner.as_type()?,
            (None, _) => {
                return Err(ModelError::invalid_state(format!(
                    "field `{}` has no type",
                    self.name
                )))
            }
        };
        ctx.define_variable(
            self.id,
            VariableDefinition {
                modifiers: self.modifiers,
                enclosing: self.owner.id,
                ty,
                constant: self.constant,
                annotations: self.annotations,
            },
        )?;
        self.owner.enclosed.push(self.id);
        tracing::debug!(
            target: "mirage.builder",
            owner = %self.owner.qualified_name(),
            name = %self.name,
            "finished field builder"
        );
        Ok(self.id)
    }
}
