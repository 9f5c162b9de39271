use serde::{Deserialize, Serialize};

use crate::generic::GenericType;

/// An annotation instance attached to a class, member or parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationInfo {
    /// Binary name of the annotation type.
    pub type_name: String,
    /// Explicitly present element values, in declaration order.
    #[serde(default)]
    pub elements: Vec<(String, AnnotationValue)>,
}

impl AnnotationInfo {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            elements: Vec::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: AnnotationValue) -> Self {
        self.elements.push((name.into(), value));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationValue {
    Const(ConstValue),
    Enum {
        type_name: String,
        const_name: String,
    },
    Class(GenericType),
    Annotation(Box<AnnotationInfo>),
    Array(Vec<AnnotationValue>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstValue {
    Boolean(bool),
    Byte(i8),
    Char(char),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
}
