use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl BaseType {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "boolean" => BaseType::Boolean,
            "byte" => BaseType::Byte,
            "char" => BaseType::Char,
            "short" => BaseType::Short,
            "int" => BaseType::Int,
            "long" => BaseType::Long,
            "float" => BaseType::Float,
            "double" => BaseType::Double,
            _ => return None,
        })
    }

    pub fn keyword(self) -> &'static str {
        match self {
            BaseType::Boolean => "boolean",
            BaseType::Byte => "byte",
            BaseType::Char => "char",
            BaseType::Short => "short",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Float => "float",
            BaseType::Double => "double",
        }
    }

    pub(crate) fn from_descriptor_char(ch: u8) -> Option<Self> {
        Some(match ch {
            b'Z' => BaseType::Boolean,
            b'B' => BaseType::Byte,
            b'C' => BaseType::Char,
            b'S' => BaseType::Short,
            b'I' => BaseType::Int,
            b'J' => BaseType::Long,
            b'F' => BaseType::Float,
            b'D' => BaseType::Double,
            _ => return None,
        })
    }
}

/// A type as reported by reflection.
///
/// Class names are binary names (`java.util.Map$Entry`). Wildcard bounds are kept as the
/// vectors reflection reports; the model rejects shapes it cannot represent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenericType {
    Primitive(BaseType),
    Void,
    Class(String),
    Array(Box<GenericType>),
    Parameterized {
        raw: String,
        #[serde(default)]
        owner: Option<Box<GenericType>>,
        #[serde(default)]
        args: Vec<GenericType>,
    },
    Wildcard {
        #[serde(default)]
        upper_bounds: Vec<GenericType>,
        #[serde(default)]
        lower_bounds: Vec<GenericType>,
    },
    TypeVariable(String),
}

impl GenericType {
    pub fn class(binary_name: impl Into<String>) -> Self {
        GenericType::Class(binary_name.into())
    }

    pub fn parameterized(raw: impl Into<String>, args: Vec<GenericType>) -> Self {
        GenericType::Parameterized {
            raw: raw.into(),
            owner: None,
            args,
        }
    }

    pub fn array(component: GenericType) -> Self {
        GenericType::Array(Box::new(component))
    }

    pub fn type_var(name: impl Into<String>) -> Self {
        GenericType::TypeVariable(name.into())
    }

    pub fn unbounded_wildcard() -> Self {
        GenericType::Wildcard {
            upper_bounds: Vec::new(),
            lower_bounds: Vec::new(),
        }
    }

    pub fn extends_wildcard(bound: GenericType) -> Self {
        GenericType::Wildcard {
            upper_bounds: vec![bound],
            lower_bounds: Vec::new(),
        }
    }

    pub fn super_wildcard(bound: GenericType) -> Self {
        GenericType::Wildcard {
            upper_bounds: Vec::new(),
            lower_bounds: vec![bound],
        }
    }

    /// The binary name of the class this type refers to, ignoring type arguments.
    pub fn raw_class(&self) -> Option<&str> {
        match self {
            GenericType::Class(name) => Some(name),
            GenericType::Parameterized { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

impl fmt::Display for GenericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenericType::Primitive(base) => f.write_str(base.keyword()),
            GenericType::Void => f.write_str("void"),
            GenericType::Class(name) => f.write_str(name),
            GenericType::Array(component) => write!(f, "{component}[]"),
            GenericType::Parameterized { raw, args, .. } => {
                f.write_str(raw)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (idx, arg) in args.iter().enumerate() {
                        if idx > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            GenericType::Wildcard {
                upper_bounds,
                lower_bounds,
            } => {
                f.write_str("?")?;
                for bound in upper_bounds {
                    write!(f, " extends {bound}")?;
                }
                for bound in lower_bounds {
                    write!(f, " super {bound}")?;
                }
                Ok(())
            }
            GenericType::TypeVariable(name) => f.write_str(name),
        }
    }
}
