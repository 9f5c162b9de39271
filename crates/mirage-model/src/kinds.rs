use std::fmt;

use mirage_reflect::flags::{self, *};
use mirage_reflect::BaseType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 8] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::Short,
        PrimitiveKind::Char,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        PrimitiveKind::ALL
            .into_iter()
            .find(|kind| kind.keyword() == keyword)
    }

    pub fn is_numeric(self) -> bool {
        self != PrimitiveKind::Boolean
    }

    /// Binary name of the wrapper class.
    pub fn box_class(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "java.lang.Boolean",
            PrimitiveKind::Byte => "java.lang.Byte",
            PrimitiveKind::Short => "java.lang.Short",
            PrimitiveKind::Char => "java.lang.Character",
            PrimitiveKind::Int => "java.lang.Integer",
            PrimitiveKind::Long => "java.lang.Long",
            PrimitiveKind::Float => "java.lang.Float",
            PrimitiveKind::Double => "java.lang.Double",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl From<BaseType> for PrimitiveKind {
    fn from(base: BaseType) -> Self {
        match base {
            BaseType::Boolean => PrimitiveKind::Boolean,
            BaseType::Byte => PrimitiveKind::Byte,
            BaseType::Short => PrimitiveKind::Short,
            BaseType::Char => PrimitiveKind::Char,
            BaseType::Int => PrimitiveKind::Int,
            BaseType::Long => PrimitiveKind::Long,
            BaseType::Float => PrimitiveKind::Float,
            BaseType::Double => PrimitiveKind::Double,
        }
    }
}

/// The pseudo-types that stand for "no type".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoTypeKind {
    Void,
    None,
    Package,
}

/// Flattened shape kind of a type mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive(PrimitiveKind),
    Declared,
    Array,
    Wildcard,
    TypeVariable,
    Null,
    Void,
    None,
    Package,
    Executable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Package,
    Class,
    Interface,
    Enum,
    AnnotationType,
    Method,
    Constructor,
    Field,
    Parameter,
    EnumConstant,
    TypeParameter,
}

impl ElementKind {
    pub fn is_type(self) -> bool {
        matches!(
            self,
            ElementKind::Class | ElementKind::Interface | ElementKind::Enum | ElementKind::AnnotationType
        )
    }

    pub fn is_class(self) -> bool {
        matches!(self, ElementKind::Class | ElementKind::Enum)
    }

    pub fn is_interface(self) -> bool {
        matches!(self, ElementKind::Interface | ElementKind::AnnotationType)
    }

    pub fn is_executable(self) -> bool {
        matches!(self, ElementKind::Method | ElementKind::Constructor)
    }

    pub fn is_variable(self) -> bool {
        matches!(
            self,
            ElementKind::Field | ElementKind::Parameter | ElementKind::EnumConstant
        )
    }

    pub fn is_field(self) -> bool {
        matches!(self, ElementKind::Field | ElementKind::EnumConstant)
    }

    pub(crate) fn for_class_flags(access_flags: u16) -> Self {
        if flags::has(access_flags, ACC_ANNOTATION) {
            ElementKind::AnnotationType
        } else if flags::has(access_flags, ACC_INTERFACE) {
            ElementKind::Interface
        } else if flags::has(access_flags, ACC_ENUM) {
            ElementKind::Enum
        } else {
            ElementKind::Class
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NestingKind {
    TopLevel,
    Member,
    Local,
    Anonymous,
}

impl NestingKind {
    pub fn is_nested(self) -> bool {
        self != NestingKind::TopLevel
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Default,
    Static,
    Final,
    Transient,
    Volatile,
    Synchronized,
    Native,
    Strictfp,
}

impl Modifier {
    const ALL: [Modifier; 12] = [
        Modifier::Public,
        Modifier::Protected,
        Modifier::Private,
        Modifier::Abstract,
        Modifier::Default,
        Modifier::Static,
        Modifier::Final,
        Modifier::Transient,
        Modifier::Volatile,
        Modifier::Synchronized,
        Modifier::Native,
        Modifier::Strictfp,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Default => "default",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Transient => "transient",
            Modifier::Volatile => "volatile",
            Modifier::Synchronized => "synchronized",
            Modifier::Native => "native",
            Modifier::Strictfp => "strictfp",
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// A set of [`Modifier`]s, iterated in canonical source order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u16);

impl Modifiers {
    pub const EMPTY: Modifiers = Modifiers(0);

    pub fn contains(self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    pub fn insert(&mut self, modifier: Modifier) {
        self.0 |= modifier.bit();
    }

    pub fn remove(&mut self, modifier: Modifier) {
        self.0 &= !modifier.bit();
    }

    pub fn with(mut self, modifier: Modifier) -> Self {
        self.insert(modifier);
        self
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Modifier> {
        Modifier::ALL
            .into_iter()
            .filter(move |modifier| self.contains(*modifier))
    }

    /// Translates JVM access flags; `kind` decides how the shared flag bits are read.
    pub fn from_access_flags(access_flags: u16, kind: ElementKind) -> Self {
        let mut out = Modifiers::EMPTY;
        let has = |flag| flags::has(access_flags, flag);
        if has(ACC_PUBLIC) {
            out.insert(Modifier::Public);
        }
        if has(ACC_PROTECTED) {
            out.insert(Modifier::Protected);
        }
        if has(ACC_PRIVATE) {
            out.insert(Modifier::Private);
        }
        if has(ACC_STATIC) {
            out.insert(Modifier::Static);
        }
        if has(ACC_FINAL) {
            out.insert(Modifier::Final);
        }
        if has(ACC_STRICT) {
            out.insert(Modifier::Strictfp);
        }
        if kind.is_type() {
            if has(ACC_ABSTRACT) || kind.is_interface() {
                out.insert(Modifier::Abstract);
            }
        } else if kind.is_executable() {
            if has(ACC_ABSTRACT) {
                out.insert(Modifier::Abstract);
            }
            if has(ACC_SYNCHRONIZED) {
                out.insert(Modifier::Synchronized);
            }
            if has(ACC_NATIVE) {
                out.insert(Modifier::Native);
            }
        } else if kind.is_field() {
            if has(ACC_VOLATILE) {
                out.insert(Modifier::Volatile);
            }
            if has(ACC_TRANSIENT) {
                out.insert(Modifier::Transient);
            }
        }
        out
    }
}

impl FromIterator<Modifier> for Modifiers {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        let mut out = Modifiers::EMPTY;
        for modifier in iter {
            out.insert(modifier);
        }
        out
    }
}

impl fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, modifier) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            f.write_str(modifier.keyword())?;
        }
        Ok(())
    }
}
