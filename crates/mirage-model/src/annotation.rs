use mirage_reflect::ConstValue;

use crate::ids::ElementId;
use crate::mirror::TypeMirror;

/// An annotation instance: its type plus the values given explicitly, keyed by accessor method.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationMirror {
    annotation_type: TypeMirror,
    values: Vec<(ElementId, AnnotationValue)>,
}

impl AnnotationMirror {
    pub fn new(annotation_type: TypeMirror, values: Vec<(ElementId, AnnotationValue)>) -> Self {
        AnnotationMirror {
            annotation_type,
            values,
        }
    }

    pub fn annotation_type(&self) -> &TypeMirror {
        &self.annotation_type
    }

    /// Explicit values only; see `ModelContext::element_values_with_defaults`.
    pub fn element_values(&self) -> &[(ElementId, AnnotationValue)] {
        &self.values
    }

    pub fn value(&self, accessor: ElementId) -> Option<&AnnotationValue> {
        self.values
            .iter()
            .find(|(id, _)| *id == accessor)
            .map(|(_, value)| value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    /// Primitive constants and strings.
    Const(ConstValue),
    /// A class literal.
    Type(TypeMirror),
    EnumConstant(ElementId),
    Annotation(AnnotationMirror),
    Array(Vec<AnnotationValue>),
}

impl AnnotationValue {
    pub fn as_const(&self) -> Option<&ConstValue> {
        match self {
            AnnotationValue::Const(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationValue::Const(ConstValue::String(value)) => Some(value),
            _ => None,
        }
    }
}

impl From<ConstValue> for AnnotationValue {
    fn from(value: ConstValue) -> Self {
        AnnotationValue::Const(value)
    }
}
