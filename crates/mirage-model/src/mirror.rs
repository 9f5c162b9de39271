//! Type mirrors: immutable, shareable descriptions of Java types.
//!
//! A [`TypeMirror`] is a cheap handle (`Arc`) to a [`MirrorKind`]. Equality first checks
//! whether both handles point at the same allocation and otherwise compares the structure.
//! Type-relation questions (`is_same_type`, subtyping, assignability) are answered by the
//! relation engine, not by `==`.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use mirage_core::Name;

use crate::ids::ElementId;
use crate::kinds::{NoTypeKind, PrimitiveKind, TypeKind};

#[derive(Clone)]
pub struct TypeMirror(Arc<MirrorKind>);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MirrorKind {
    Primitive(PrimitiveKind),
    Declared(DeclaredType),
    Array(ArrayType),
    Wildcard(WildcardType),
    TypeVariable(TypeVariable),
    Null,
    NoType(NoTypeKind),
    Executable(ExecutableType),
}

/// A class or interface type, possibly parameterized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclaredType {
    pub(crate) element: ElementId,
    pub(crate) qualified_name: Name,
    pub(crate) enclosing: TypeMirror,
    pub(crate) args: Vec<TypeMirror>,
}

impl DeclaredType {
    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn qualified_name(&self) -> &Name {
        &self.qualified_name
    }

    /// The enclosing instance type, or `NoType(None)` for top-level and static nested types.
    pub fn enclosing_type(&self) -> &TypeMirror {
        &self.enclosing
    }

    pub fn type_arguments(&self) -> &[TypeMirror] {
        &self.args
    }

    /// Whether this type names `qualified_name`, ignoring type arguments.
    pub fn names(&self, qualified_name: &str) -> bool {
        self.qualified_name == qualified_name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayType {
    pub(crate) component: TypeMirror,
}

impl ArrayType {
    pub fn component_type(&self) -> &TypeMirror {
        &self.component
    }
}

/// `?`, `? extends T` or `? super T`. Never both bounds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WildcardType {
    pub(crate) extends_bound: Option<TypeMirror>,
    pub(crate) super_bound: Option<TypeMirror>,
}

impl WildcardType {
    pub fn extends_bound(&self) -> Option<&TypeMirror> {
        self.extends_bound.as_ref()
    }

    pub fn super_bound(&self) -> Option<&TypeMirror> {
        self.super_bound.as_ref()
    }
}

/// A use of a type parameter.
///
/// The upper bound is not stored: it is derived from the parameter element on demand, which
/// lets bounds such as `E extends Enum<E>` refer back to the variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeVariable {
    pub(crate) element: ElementId,
    pub(crate) name: Name,
    pub(crate) lower: TypeMirror,
}

impl TypeVariable {
    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The lower bound; the null type when the variable has none.
    pub fn lower_bound(&self) -> &TypeMirror {
        &self.lower
    }
}

/// The type of a method or constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExecutableType {
    pub(crate) type_variables: Vec<TypeMirror>,
    pub(crate) parameter_types: Vec<TypeMirror>,
    pub(crate) return_type: TypeMirror,
    pub(crate) thrown_types: Vec<TypeMirror>,
}

impl ExecutableType {
    pub fn type_variables(&self) -> &[TypeMirror] {
        &self.type_variables
    }

    pub fn parameter_types(&self) -> &[TypeMirror] {
        &self.parameter_types
    }

    pub fn return_type(&self) -> &TypeMirror {
        &self.return_type
    }

    pub fn thrown_types(&self) -> &[TypeMirror] {
        &self.thrown_types
    }
}

impl TypeMirror {
    pub(crate) fn new(kind: MirrorKind) -> Self {
        TypeMirror(Arc::new(kind))
    }

    pub fn shape(&self) -> &MirrorKind {
        &self.0
    }

    pub fn kind(&self) -> TypeKind {
        match &*self.0 {
            MirrorKind::Primitive(kind) => TypeKind::Primitive(*kind),
            MirrorKind::Declared(_) => TypeKind::Declared,
            MirrorKind::Array(_) => TypeKind::Array,
            MirrorKind::Wildcard(_) => TypeKind::Wildcard,
            MirrorKind::TypeVariable(_) => TypeKind::TypeVariable,
            MirrorKind::Null => TypeKind::Null,
            MirrorKind::NoType(NoTypeKind::Void) => TypeKind::Void,
            MirrorKind::NoType(NoTypeKind::None) => TypeKind::None,
            MirrorKind::NoType(NoTypeKind::Package) => TypeKind::Package,
            MirrorKind::Executable(_) => TypeKind::Executable,
        }
    }

    /// Whether both handles share one allocation.
    pub fn same_instance(&self, other: &TypeMirror) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match &*self.0 {
            MirrorKind::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn as_declared(&self) -> Option<&DeclaredType> {
        match &*self.0 {
            MirrorKind::Declared(declared) => Some(declared),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayType> {
        match &*self.0 {
            MirrorKind::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_wildcard(&self) -> Option<&WildcardType> {
        match &*self.0 {
            MirrorKind::Wildcard(wildcard) => Some(wildcard),
            _ => None,
        }
    }

    pub fn as_type_variable(&self) -> Option<&TypeVariable> {
        match &*self.0 {
            MirrorKind::TypeVariable(var) => Some(var),
            _ => None,
        }
    }

    pub fn as_executable(&self) -> Option<&ExecutableType> {
        match &*self.0 {
            MirrorKind::Executable(exec) => Some(exec),
            _ => None,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(&*self.0, MirrorKind::Primitive(_))
    }

    /// Declared, array, type-variable and null types.
    pub fn is_reference(&self) -> bool {
        matches!(
            &*self.0,
            MirrorKind::Declared(_) | MirrorKind::Array(_) | MirrorKind::TypeVariable(_) | MirrorKind::Null
        )
    }

    pub fn is_no_type(&self) -> bool {
        matches!(&*self.0, MirrorKind::NoType(_))
    }

    /// Whether this is a declared type naming `qualified_name`.
    pub fn is_declared_named(&self, qualified_name: &str) -> bool {
        matches!(&*self.0, MirrorKind::Declared(declared) if declared.names(qualified_name))
    }

    /// The element a declared type or type variable refers to.
    pub fn element(&self) -> Option<ElementId> {
        match &*self.0 {
            MirrorKind::Declared(declared) => Some(declared.element),
            MirrorKind::TypeVariable(var) => Some(var.element),
            _ => None,
        }
    }

    pub fn accept<V: TypeVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match &*self.0 {
            MirrorKind::Primitive(kind) => visitor.visit_primitive(self, *kind),
            MirrorKind::Declared(declared) => visitor.visit_declared(self, declared),
            MirrorKind::Array(array) => visitor.visit_array(self, array),
            MirrorKind::Wildcard(wildcard) => visitor.visit_wildcard(self, wildcard),
            MirrorKind::TypeVariable(var) => visitor.visit_type_variable(self, var),
            MirrorKind::Null => visitor.visit_null(self),
            MirrorKind::NoType(kind) => visitor.visit_no_type(self, *kind),
            MirrorKind::Executable(exec) => visitor.visit_executable(self, exec),
        }
    }
}

/// Double dispatch over the shapes of [`TypeMirror`].
pub trait TypeVisitor {
    type Output;

    fn visit_primitive(&mut self, ty: &TypeMirror, kind: PrimitiveKind) -> Self::Output;
    fn visit_declared(&mut self, ty: &TypeMirror, declared: &DeclaredType) -> Self::Output;
    fn visit_array(&mut self, ty: &TypeMirror, array: &ArrayType) -> Self::Output;
    fn visit_wildcard(&mut self, ty: &TypeMirror, wildcard: &WildcardType) -> Self::Output;
    fn visit_type_variable(&mut self, ty: &TypeMirror, var: &TypeVariable) -> Self::Output;
    fn visit_null(&mut self, ty: &TypeMirror) -> Self::Output;
    fn visit_no_type(&mut self, ty: &TypeMirror, kind: NoTypeKind) -> Self::Output;
    fn visit_executable(&mut self, ty: &TypeMirror, exec: &ExecutableType) -> Self::Output;
}

impl PartialEq for TypeMirror {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other) || *self.0 == *other.0
    }
}

impl Eq for TypeMirror {}

impl Hash for TypeMirror {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for TypeMirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeMirror({self})")
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[TypeMirror], sep: &str) -> fmt::Result {
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for TypeMirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            MirrorKind::Primitive(kind) => f.write_str(kind.keyword()),
            MirrorKind::Declared(declared) => {
                match declared.enclosing.as_declared() {
                    Some(outer) if !outer.args.is_empty() => {
                        let simple = declared.qualified_name.simple();
                        write!(f, "{}.{simple}", declared.enclosing)?;
                    }
                    _ => f.write_str(declared.qualified_name.as_str())?,
                }
                if !declared.args.is_empty() {
                    f.write_str("<")?;
                    write_list(f, &declared.args, ",")?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            MirrorKind::Array(array) => write!(f, "{}[]", array.component),
            MirrorKind::Wildcard(wildcard) => match (&wildcard.extends_bound, &wildcard.super_bound) {
                (Some(bound), _) => write!(f, "? extends {bound}"),
                (None, Some(bound)) => write!(f, "? super {bound}"),
                (None, None) => f.write_str("?"),
            },
            MirrorKind::TypeVariable(var) => f.write_str(var.name.as_str()),
            MirrorKind::Null => f.write_str("null"),
            MirrorKind::NoType(NoTypeKind::Void) => f.write_str("void"),
            MirrorKind::NoType(NoTypeKind::None) => f.write_str("none"),
            MirrorKind::NoType(NoTypeKind::Package) => f.write_str("package"),
            MirrorKind::Executable(exec) => {
                if !exec.type_variables.is_empty() {
                    f.write_str("<")?;
                    write_list(f, &exec.type_variables, ",")?;
                    f.write_str(">")?;
                }
                f.write_str("(")?;
                write_list(f, &exec.parameter_types, ",")?;
                write!(f, "){}", exec.return_type)?;
                if !exec.thrown_types.is_empty() {
                    f.write_str(" throws ")?;
                    write_list(f, &exec.thrown_types, ",")?;
                }
                Ok(())
            }
        }
    }
}
