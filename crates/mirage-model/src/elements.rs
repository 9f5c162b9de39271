//! Element utilities layered on top of the context accessors.

use std::collections::{HashSet, VecDeque};

use mirage_core::{ModelError, Name, Result};
use mirage_reflect::ConstValue;

use crate::annotation::{AnnotationMirror, AnnotationValue};
use crate::context::ModelContext;
use crate::element::Reflected;
use crate::ids::ElementId;
use crate::kinds::{ElementKind, Modifier};

impl ModelContext {
    /// The package that (transitively) encloses `id`.
    pub fn package_of(&self, id: ElementId) -> Result<ElementId> {
        let mut current = id;
        loop {
            if self.kind(current)? == ElementKind::Package {
                return Ok(current);
            }
            current = self.enclosing_element(current)?.ok_or_else(|| {
                ModelError::invalid_state(format!("{current:?} has no enclosing element yet"))
            })?;
        }
    }

    /// The JVM binary name of a type element (`java.util.Map$Entry`).
    pub fn binary_name(&self, id: ElementId) -> Result<Name> {
        let el = self.structural(id)?;
        if !el.kind.is_type() {
            return Err(ModelError::invalid_argument(format!("{id:?} is not a type element")));
        }
        if let Some(Reflected::Class(info)) = el.reflected() {
            if self.element(id)?.is_reflective() {
                return Ok(Name::new(&info.binary_name));
            }
        }
        match self.enclosing_element(id)? {
            Some(outer) if self.kind(outer)?.is_type() => {
                let outer = self.binary_name(outer)?;
                Ok(Name::new(format!("{outer}${}", self.simple_name(id)?)))
            }
            _ => Ok(self
                .qualified_name(id)?
                .unwrap_or_else(|| el.simple_name.clone())),
        }
    }

    /// Members of a type and of all its supertypes.
    ///
    /// Own members come first, then superclass-chain and interface members breadth first.
    /// Inherited constructors and private members are skipped, as are methods matching an
    /// already collected method by name and arity, and fields or nested types hidden by an
    /// already collected one of the same name.
    pub fn all_members(&self, id: ElementId) -> Result<Vec<ElementId>> {
        if !self.kind(id)?.is_type() {
            return Err(ModelError::invalid_argument(format!("{id:?} is not a type element")));
        }

        let mut members = Vec::new();
        let mut methods: HashSet<(Name, usize)> = HashSet::new();
        let mut hidden: HashSet<(bool, Name)> = HashSet::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([id]);

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            let inherited = current != id;
            for member in self.enclosed_elements(current)?.iter().copied() {
                let el = self.element(member)?;
                if inherited && (el.kind == ElementKind::Constructor || el.modifiers().contains(Modifier::Private)) {
                    continue;
                }
                let fresh = match el.kind {
                    ElementKind::Method => {
                        methods.insert((el.simple_name.clone(), self.parameters(member)?.len()))
                    }
                    ElementKind::Constructor => true,
                    kind => hidden.insert((kind.is_type(), el.simple_name.clone())),
                };
                if fresh {
                    members.push(member);
                }
            }

            if let Some(superclass) = self.superclass(current)?.element() {
                queue.push_back(superclass);
            }
            for iface in self.interfaces(current)?.iter() {
                if let Some(element) = iface.element() {
                    queue.push_back(element);
                }
            }
        }
        Ok(members)
    }

    /// Every value of an annotation, explicit or defaulted, in accessor declaration order.
    pub fn element_values_with_defaults(
        &self,
        annotation: &AnnotationMirror,
    ) -> Result<Vec<(ElementId, AnnotationValue)>> {
        let annotation_type = annotation.annotation_type().element().ok_or_else(|| {
            ModelError::invalid_argument(format!(
                "`{}` is not an annotation type",
                annotation.annotation_type()
            ))
        })?;

        let mut values = Vec::new();
        for member in self.enclosed_elements(annotation_type)?.iter().copied() {
            if self.kind(member)? != ElementKind::Method {
                continue;
            }
            match annotation.value(member) {
                Some(value) => values.push((member, value.clone())),
                None => {
                    if let Some(default) = self.default_value(member)? {
                        values.push((member, default));
                    }
                }
            }
        }
        Ok(values)
    }

    /// Builds an annotation instance, naming values by accessor.
    pub fn annotation_mirror<'a>(
        &self,
        annotation_type: ElementId,
        values: impl IntoIterator<Item = (&'a str, AnnotationValue)>,
    ) -> Result<AnnotationMirror> {
        if self.kind(annotation_type)? != ElementKind::AnnotationType {
            return Err(ModelError::invalid_argument(format!(
                "{annotation_type:?} is not an annotation type"
            )));
        }
        let values = values
            .into_iter()
            .map(|(name, value)| {
                let accessor = self
                    .annotation_accessor(annotation_type, name)
                    .map_err(|_| ModelError::invalid_argument(format!("no annotation element `{name}`")))?;
                Ok((accessor, value))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(AnnotationMirror::new(self.as_type(annotation_type)?, values))
    }

    pub fn doc_comment(&self, _id: ElementId) -> Result<Option<String>> {
        Err(ModelError::unsupported("doc comments are not modelled"))
    }

    pub fn is_deprecated(&self, _id: ElementId) -> Result<bool> {
        Err(ModelError::unsupported("deprecation queries are not modelled"))
    }
}

/// Java source text of a constant, as it would appear in generated code.
pub fn constant_expression(value: &ConstValue) -> String {
    match value {
        ConstValue::Boolean(value) => value.to_string(),
        ConstValue::Byte(value) => format!("(byte){value}"),
        ConstValue::Short(value) => format!("(short){value}"),
        ConstValue::Char(value) => format!("'{}'", escape_char(*value, '\'')),
        ConstValue::Int(value) => value.to_string(),
        ConstValue::Long(value) => format!("{value}L"),
        ConstValue::Float(value) => {
            if value.is_nan() {
                "0.0f/0.0f".to_string()
            } else if value.is_infinite() {
                let literal = if *value > 0.0 { "1.0f/0.0f" } else { "-1.0f/0.0f" };
                literal.to_string()
            } else {
                format!("{value:?}f")
            }
        }
        ConstValue::Double(value) => {
            if value.is_nan() {
                "0.0/0.0".to_string()
            } else if value.is_infinite() {
                let literal = if *value > 0.0 { "1.0/0.0" } else { "-1.0/0.0" };
                literal.to_string()
            } else {
                format!("{value:?}")
            }
        }
        ConstValue::String(value) => {
            let mut out = String::with_capacity(value.len() + 2);
            out.push('"');
            for ch in value.chars() {
                out.push_str(&escape_char(ch, '"'));
            }
            out.push('"');
            out
        }
    }
}

fn escape_char(ch: char, quote: char) -> String {
    match ch {
        '\n' => "\\n".to_string(),
        '\t' => "\\t".to_string(),
        '\r' => "\\r".to_string(),
        '\u{8}' => "\\b".to_string(),
        '\u{c}' => "\\f".to_string(),
        '\\' => "\\\\".to_string(),
        ch if ch == quote => format!("\\{ch}"),
        ch if ch.is_control() => format!("\\u{:04x}", ch as u32),
        ch => ch.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_expressions_use_java_literal_syntax() {
        assert_eq!(constant_expression(&ConstValue::Long(7)), "7L");
        assert_eq!(constant_expression(&ConstValue::Byte(-1)), "(byte)-1");
        assert_eq!(constant_expression(&ConstValue::Float(1.5)), "1.5f");
        assert_eq!(constant_expression(&ConstValue::Double(f64::NAN)), "0.0/0.0");
        assert_eq!(constant_expression(&ConstValue::Char('\'')), "'\\''");
        assert_eq!(
            constant_expression(&ConstValue::String("a\"b\n".to_string())),
            "\"a\\\"b\\n\""
        );
    }
}
