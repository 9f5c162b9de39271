use crate::error::{Error, Result};
use crate::generic::{BaseType, GenericType};

/// A parsed erased method descriptor such as `(ILjava/lang/String;)[I`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub params: Vec<GenericType>,
    pub return_type: GenericType,
}

pub fn parse_field_descriptor(desc: &str) -> Result<GenericType> {
    let (ty, rest) = parse_field_type(desc)?;
    if !rest.is_empty() {
        return Err(Error::InvalidDescriptor(desc.to_string()));
    }
    Ok(ty)
}

pub fn parse_method_descriptor(desc: &str) -> Result<MethodDescriptor> {
    let Some(mut rest) = desc.strip_prefix('(') else {
        return Err(Error::InvalidDescriptor(desc.to_string()));
    };

    let mut params = Vec::new();
    loop {
        if let Some(after) = rest.strip_prefix(')') {
            rest = after;
            break;
        }
        if rest.is_empty() {
            return Err(Error::InvalidDescriptor(desc.to_string()));
        }
        let (param, after) = parse_field_type(rest)?;
        params.push(param);
        rest = after;
    }

    let (return_type, rest) = if let Some(after) = rest.strip_prefix('V') {
        (GenericType::Void, after)
    } else {
        parse_field_type(rest)?
    };

    if !rest.is_empty() {
        return Err(Error::InvalidDescriptor(desc.to_string()));
    }

    Ok(MethodDescriptor {
        params,
        return_type,
    })
}

fn parse_field_type(input: &str) -> Result<(GenericType, &str)> {
    let Some(&first) = input.as_bytes().first() else {
        return Err(Error::InvalidDescriptor(input.to_string()));
    };
    if let Some(base) = BaseType::from_descriptor_char(first) {
        return Ok((GenericType::Primitive(base), &input[1..]));
    }
    match first {
        b'L' => match input.find(';') {
            Some(end) if end > 1 => Ok((
                GenericType::Class(internal_to_binary(&input[1..end])),
                &input[end + 1..],
            )),
            _ => Err(Error::InvalidDescriptor(input.to_string())),
        },
        b'[' => {
            let (component, rest) = parse_field_type(&input[1..])?;
            Ok((GenericType::Array(Box::new(component)), rest))
        }
        _ => Err(Error::InvalidDescriptor(input.to_string())),
    }
}

pub(crate) fn internal_to_binary(internal: &str) -> String {
    internal.replace('/', ".")
}
