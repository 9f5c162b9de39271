use serde::{Deserialize, Serialize};

use crate::annotation::{AnnotationInfo, AnnotationValue, ConstValue};
use crate::error::Result;
use crate::flags::{self, ACC_ANNOTATION, ACC_ENUM, ACC_INTERFACE, ACC_VARARGS};
use crate::generic::GenericType;
use crate::signature::{parse_class_signature, parse_field_signature, parse_method_signature};

/// Reflection metadata for a class, interface, enum or annotation type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub binary_name: String,
    #[serde(default)]
    pub access_flags: u16,
    #[serde(default)]
    pub superclass: Option<GenericType>,
    #[serde(default)]
    pub interfaces: Vec<GenericType>,
    #[serde(default)]
    pub type_params: Vec<TypeParamInfo>,
    #[serde(default)]
    pub fields: Vec<FieldInfo>,
    #[serde(default)]
    pub constructors: Vec<MethodInfo>,
    #[serde(default)]
    pub methods: Vec<MethodInfo>,
    /// Binary names of member classes, in declaration order.
    #[serde(default)]
    pub nested_classes: Vec<String>,
    #[serde(default)]
    pub declaring_class: Option<String>,
    #[serde(default)]
    pub annotations: Vec<AnnotationInfo>,
}

impl ClassInfo {
    pub fn new(binary_name: impl Into<String>, access_flags: u16) -> Self {
        Self {
            binary_name: binary_name.into(),
            access_flags,
            superclass: None,
            interfaces: Vec::new(),
            type_params: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
            nested_classes: Vec::new(),
            declaring_class: None,
            annotations: Vec::new(),
        }
    }

    /// Builds a descriptor from a class signature such as
    /// `<T:Ljava/lang/Object;>Ljava/lang/Object;Ljava/lang/Comparable<TT;>;`.
    ///
    /// Interfaces never report a superclass, matching what reflection returns for them.
    pub fn from_signature(
        binary_name: impl Into<String>,
        access_flags: u16,
        signature: &str,
    ) -> Result<Self> {
        let sig = parse_class_signature(signature)?;
        let mut info = Self::new(binary_name, access_flags);
        info.type_params = sig.type_params;
        if !flags::has(access_flags, ACC_INTERFACE) {
            info.superclass = Some(sig.superclass);
        }
        info.interfaces = sig.interfaces;
        Ok(info)
    }

    pub fn extends(mut self, superclass: GenericType) -> Self {
        self.superclass = Some(superclass);
        self
    }

    pub fn implements(mut self, interface: GenericType) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn type_param(mut self, param: TypeParamInfo) -> Self {
        self.type_params.push(param);
        self
    }

    pub fn field(mut self, field: FieldInfo) -> Self {
        self.fields.push(field);
        self
    }

    pub fn constructor(mut self, constructor: MethodInfo) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn method(mut self, method: MethodInfo) -> Self {
        self.methods.push(method);
        self
    }

    pub fn nested(mut self, binary_name: impl Into<String>) -> Self {
        self.nested_classes.push(binary_name.into());
        self
    }

    pub fn declared_in(mut self, binary_name: impl Into<String>) -> Self {
        self.declaring_class = Some(binary_name.into());
        self
    }

    pub fn annotated(mut self, annotation: AnnotationInfo) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn is_interface(&self) -> bool {
        flags::has(self.access_flags, ACC_INTERFACE)
    }

    pub fn is_annotation(&self) -> bool {
        flags::has(self.access_flags, ACC_ANNOTATION)
    }

    pub fn is_enum(&self) -> bool {
        flags::has(self.access_flags, ACC_ENUM)
    }

    /// The package part of the binary name (empty for the unnamed package).
    pub fn package_name(&self) -> &str {
        match self.binary_name.rfind('.') {
            Some(idx) => &self.binary_name[..idx],
            None => "",
        }
    }

    pub fn simple_name(&self) -> &str {
        let local = match self.binary_name.rfind('.') {
            Some(idx) => &self.binary_name[idx + 1..],
            None => self.binary_name.as_str(),
        };
        if self.declaring_class.is_some() {
            if let Some(idx) = local.rfind('$') {
                return &local[idx + 1..];
            }
        }
        local
    }

    /// The source-level name: nested classes use `.` between enclosing and member names.
    pub fn canonical_name(&self) -> String {
        if self.declaring_class.is_some() {
            self.binary_name.replace('$', ".")
        } else {
            self.binary_name.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeParamInfo {
    pub name: String,
    #[serde(default)]
    pub bounds: Vec<GenericType>,
}

impl TypeParamInfo {
    pub fn new(name: impl Into<String>, bounds: Vec<GenericType>) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    #[serde(default)]
    pub access_flags: u16,
    pub ty: GenericType,
    /// Compile-time constant value of a `static final` field.
    #[serde(default)]
    pub constant: Option<ConstValue>,
    #[serde(default)]
    pub annotations: Vec<AnnotationInfo>,
}

impl FieldInfo {
    pub fn new(name: impl Into<String>, access_flags: u16, ty: GenericType) -> Self {
        Self {
            name: name.into(),
            access_flags,
            ty,
            constant: None,
            annotations: Vec::new(),
        }
    }

    pub fn from_signature(name: impl Into<String>, access_flags: u16, signature: &str) -> Result<Self> {
        Ok(Self::new(name, access_flags, parse_field_signature(signature)?))
    }

    pub fn with_constant(mut self, value: ConstValue) -> Self {
        self.constant = Some(value);
        self
    }

    pub fn annotated(mut self, annotation: AnnotationInfo) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn is_enum_constant(&self) -> bool {
        flags::has(self.access_flags, ACC_ENUM)
    }
}

/// Reflection metadata for a method or constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    #[serde(default)]
    pub access_flags: u16,
    #[serde(default)]
    pub type_params: Vec<TypeParamInfo>,
    #[serde(default)]
    pub params: Vec<ParameterInfo>,
    #[serde(default = "void_type")]
    pub return_type: GenericType,
    #[serde(default)]
    pub throws: Vec<GenericType>,
    #[serde(default)]
    pub annotations: Vec<AnnotationInfo>,
    /// Default value of an annotation type element.
    #[serde(default)]
    pub default_value: Option<AnnotationValue>,
}

fn void_type() -> GenericType {
    GenericType::Void
}

impl MethodInfo {
    pub fn new(name: impl Into<String>, access_flags: u16) -> Self {
        Self {
            name: name.into(),
            access_flags,
            type_params: Vec::new(),
            params: Vec::new(),
            return_type: GenericType::Void,
            throws: Vec::new(),
            annotations: Vec::new(),
            default_value: None,
        }
    }

    /// Builds a descriptor from a method signature; parameters are named `arg0`, `arg1`, ...
    /// the way reflection names them without `-parameters` metadata.
    pub fn from_signature(name: impl Into<String>, access_flags: u16, signature: &str) -> Result<Self> {
        let sig = parse_method_signature(signature)?;
        let mut info = Self::new(name, access_flags);
        info.type_params = sig.type_params;
        info.params = sig
            .params
            .into_iter()
            .enumerate()
            .map(|(idx, ty)| ParameterInfo::new(format!("arg{idx}"), ty))
            .collect();
        info.return_type = sig.return_type;
        info.throws = sig.throws;
        Ok(info)
    }

    pub fn param(mut self, param: ParameterInfo) -> Self {
        self.params.push(param);
        self
    }

    pub fn returns(mut self, ty: GenericType) -> Self {
        self.return_type = ty;
        self
    }

    pub fn with_default(mut self, value: AnnotationValue) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn annotated(mut self, annotation: AnnotationInfo) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn is_varargs(&self) -> bool {
        flags::has(self.access_flags, ACC_VARARGS)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    pub ty: GenericType,
    #[serde(default)]
    pub access_flags: u16,
    #[serde(default)]
    pub annotations: Vec<AnnotationInfo>,
}

impl ParameterInfo {
    pub fn new(name: impl Into<String>, ty: GenericType) -> Self {
        Self {
            name: name.into(),
            ty,
            access_flags: 0,
            annotations: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{ACC_PUBLIC, ACC_STATIC};

    #[test]
    fn nested_class_names() {
        let entry = ClassInfo::new("java.util.Map$Entry", ACC_PUBLIC | ACC_STATIC | ACC_INTERFACE)
            .declared_in("java.util.Map");
        assert_eq!(entry.simple_name(), "Entry");
        assert_eq!(entry.canonical_name(), "java.util.Map.Entry");
        assert_eq!(entry.package_name(), "java.util");
        assert!(entry.is_interface());

        let top = ClassInfo::new("Foo", 0);
        assert_eq!(top.simple_name(), "Foo");
        assert_eq!(top.package_name(), "");
    }

    #[test]
    fn interface_signature_drops_superclass() {
        let info = ClassInfo::from_signature(
            "java.util.List",
            ACC_PUBLIC | ACC_INTERFACE,
            "<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/Collection<TE;>;",
        )
        .unwrap();
        assert_eq!(info.superclass, None);
        assert_eq!(info.interfaces.len(), 1);
        assert_eq!(info.type_params[0].name, "E");
    }
}
