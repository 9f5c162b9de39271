//! Generic signature parsing (the `Signature` attribute grammar).

use crate::descriptor::internal_to_binary;
use crate::error::{Error, Result};
use crate::generic::{BaseType, GenericType};
use crate::info::TypeParamInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSignature {
    pub type_params: Vec<TypeParamInfo>,
    pub superclass: GenericType,
    pub interfaces: Vec<GenericType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub type_params: Vec<TypeParamInfo>,
    pub params: Vec<GenericType>,
    pub return_type: GenericType,
    pub throws: Vec<GenericType>,
}

pub fn parse_class_signature(sig: &str) -> Result<ClassSignature> {
    let mut p = Parser::new(sig);
    let type_params = p.type_params()?;
    let superclass = p.class_type()?;
    let mut interfaces = Vec::new();
    while !p.at_end() {
        interfaces.push(p.class_type()?);
    }
    Ok(ClassSignature {
        type_params,
        superclass,
        interfaces,
    })
}

pub fn parse_method_signature(sig: &str) -> Result<MethodSignature> {
    let mut p = Parser::new(sig);
    let type_params = p.type_params()?;
    p.expect(b'(')?;
    let mut params = Vec::new();
    while p.peek() != Some(b')') {
        params.push(p.java_type()?);
    }
    p.expect(b')')?;
    let return_type = if p.eat(b'V') {
        GenericType::Void
    } else {
        p.java_type()?
    };
    let mut throws = Vec::new();
    while p.eat(b'^') {
        throws.push(p.reference_type()?);
    }
    p.finish()?;
    Ok(MethodSignature {
        type_params,
        params,
        return_type,
        throws,
    })
}

/// Parses a field signature; plain field descriptors are accepted too.
pub fn parse_field_signature(sig: &str) -> Result<GenericType> {
    let mut p = Parser::new(sig);
    let ty = p.java_type()?;
    p.finish()?;
    Ok(ty)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn error(&self) -> Error {
        Error::InvalidSignature(self.input.to_string())
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(self.error())
        }
    }

    fn finish(&self) -> Result<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.error())
        }
    }

    fn identifier(&mut self, terminators: &[u8]) -> Result<&'a str> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if terminators.contains(&b) {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error());
        }
        Ok(&self.input[start..self.pos])
    }

    fn type_params(&mut self) -> Result<Vec<TypeParamInfo>> {
        let mut out = Vec::new();
        if !self.eat(b'<') {
            return Ok(out);
        }
        while !self.eat(b'>') {
            let name = self.identifier(b":>")?.to_string();
            let mut bounds = Vec::new();
            self.expect(b':')?;
            // The class bound may be empty (`T::Ljava/lang/Comparable<TT;>;`).
            if !matches!(self.peek(), Some(b':') | Some(b'>')) {
                bounds.push(self.reference_type()?);
            }
            while self.eat(b':') {
                bounds.push(self.reference_type()?);
            }
            out.push(TypeParamInfo { name, bounds });
            if self.at_end() {
                return Err(self.error());
            }
        }
        Ok(out)
    }

    fn java_type(&mut self) -> Result<GenericType> {
        match self.peek() {
            Some(b) => match BaseType::from_descriptor_char(b) {
                Some(base) => {
                    self.pos += 1;
                    Ok(GenericType::Primitive(base))
                }
                None => self.reference_type(),
            },
            None => Err(self.error()),
        }
    }

    fn reference_type(&mut self) -> Result<GenericType> {
        match self.peek() {
            Some(b'L') => self.class_type(),
            Some(b'T') => {
                self.pos += 1;
                let name = self.identifier(b";")?.to_string();
                self.expect(b';')?;
                Ok(GenericType::TypeVariable(name))
            }
            Some(b'[') => {
                self.pos += 1;
                Ok(GenericType::Array(Box::new(self.java_type()?)))
            }
            _ => Err(self.error()),
        }
    }

    fn class_type(&mut self) -> Result<GenericType> {
        self.expect(b'L')?;
        let mut binary = internal_to_binary(self.identifier(b"<.;")?);
        let mut args = self.type_args()?;
        let mut owner: Option<GenericType> = None;

        while self.eat(b'.') {
            let outer = make_class_type(binary.clone(), owner.take(), std::mem::take(&mut args));
            owner = Some(outer);
            let inner = self.identifier(b"<.;")?;
            binary = format!("{binary}${inner}");
            args = self.type_args()?;
        }
        self.expect(b';')?;

        Ok(make_class_type(binary, owner, args))
    }

    fn type_args(&mut self) -> Result<Vec<GenericType>> {
        let mut out = Vec::new();
        if !self.eat(b'<') {
            return Ok(out);
        }
        while !self.eat(b'>') {
            let arg = match self.peek() {
                Some(b'*') => {
                    self.pos += 1;
                    GenericType::unbounded_wildcard()
                }
                Some(b'+') => {
                    self.pos += 1;
                    GenericType::extends_wildcard(self.reference_type()?)
                }
                Some(b'-') => {
                    self.pos += 1;
                    GenericType::super_wildcard(self.reference_type()?)
                }
                Some(_) => self.reference_type()?,
                None => return Err(self.error()),
            };
            out.push(arg);
        }
        Ok(out)
    }
}

fn make_class_type(raw: String, owner: Option<GenericType>, args: Vec<GenericType>) -> GenericType {
    let owner_is_generic = matches!(owner, Some(GenericType::Parameterized { .. }));
    if args.is_empty() && !owner_is_generic {
        return GenericType::Class(raw);
    }
    GenericType::Parameterized {
        raw,
        owner: owner.map(Box::new),
        args,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn class_signature_with_self_referential_bound() {
        let sig = parse_class_signature(
            "<E:Ljava/lang/Enum<TE;>;>Ljava/lang/Object;Ljava/lang/Comparable<TE;>;Ljava/io/Serializable;",
        )
        .unwrap();
        assert_eq!(sig.type_params.len(), 1);
        assert_eq!(sig.type_params[0].name, "E");
        assert_eq!(
            sig.type_params[0].bounds,
            vec![GenericType::parameterized(
                "java.lang.Enum",
                vec![GenericType::type_var("E")]
            )]
        );
        assert_eq!(sig.superclass, GenericType::class("java.lang.Object"));
        assert_eq!(
            sig.interfaces,
            vec![
                GenericType::parameterized("java.lang.Comparable", vec![GenericType::type_var("E")]),
                GenericType::class("java.io.Serializable"),
            ]
        );
    }

    #[test]
    fn interface_only_bound_and_wildcards() {
        let sig = parse_method_signature(
            "<T::Ljava/lang/Comparable<-TT;>;>(Ljava/util/List<+TT;>;[I)TT;^Ljava/lang/Exception;",
        )
        .unwrap();
        assert_eq!(
            sig.type_params[0].bounds,
            vec![GenericType::parameterized(
                "java.lang.Comparable",
                vec![GenericType::super_wildcard(GenericType::type_var("T"))]
            )]
        );
        assert_eq!(
            sig.params,
            vec![
                GenericType::parameterized(
                    "java.util.List",
                    vec![GenericType::extends_wildcard(GenericType::type_var("T"))]
                ),
                GenericType::array(GenericType::Primitive(BaseType::Int)),
            ]
        );
        assert_eq!(sig.return_type, GenericType::type_var("T"));
        assert_eq!(sig.throws, vec![GenericType::class("java.lang.Exception")]);
    }

    #[test]
    fn inner_class_segments_become_owner_chain() {
        let ty = parse_field_signature("Ljava/util/Map<TK;TV;>.Entry<TK;TV;>;").unwrap();
        assert_eq!(
            ty,
            GenericType::Parameterized {
                raw: "java.util.Map$Entry".to_string(),
                owner: Some(Box::new(GenericType::parameterized(
                    "java.util.Map",
                    vec![GenericType::type_var("K"), GenericType::type_var("V")]
                ))),
                args: vec![GenericType::type_var("K"), GenericType::type_var("V")],
            }
        );
    }

    #[test]
    fn rejects_truncated_input() {
        assert!(parse_field_signature("Ljava/util/List<TT;").is_err());
        assert!(parse_class_signature("<T:").is_err());
        assert!(parse_method_signature("(I").is_err());
    }
}
