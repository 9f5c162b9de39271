use std::collections::HashMap;

/// Java reserved words and literals that can never be used as identifiers.
const RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface",
    "long", "native", "new", "null", "package", "private", "protected", "public", "return",
    "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "void", "volatile", "while", "_",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SanitizeError {
    #[error("`{input}` and `{existing}` both sanitize to identifier `{identifier}`")]
    Conflict {
        input: String,
        existing: String,
        identifier: String,
    },
}

/// Maps arbitrary strings onto valid Java identifiers.
///
/// The mapping is stable (the same input always yields the same identifier) and injective: if
/// two distinct inputs would collide the second one is rejected with
/// [`SanitizeError::Conflict`].
#[derive(Debug, Default)]
pub struct IdentifierSanitizer {
    by_input: HashMap<String, String>,
    by_output: HashMap<String, String>,
}

impl IdentifierSanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sanitize(&mut self, input: &str) -> Result<String, SanitizeError> {
        if let Some(existing) = self.by_input.get(input) {
            return Ok(existing.clone());
        }

        let identifier = sanitize_identifier(input);
        if let Some(existing) = self.by_output.get(&identifier) {
            return Err(SanitizeError::Conflict {
                input: input.to_string(),
                existing: existing.clone(),
                identifier,
            });
        }

        self.by_output
            .insert(identifier.clone(), input.to_string());
        self.by_input.insert(input.to_string(), identifier.clone());
        Ok(identifier)
    }
}

/// Stateless sanitization: invalid characters become `_`, a leading character that cannot
/// start an identifier gets a `_` prefix and reserved words get a `_` suffix.
pub(crate) fn sanitize_identifier(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 1);
    for (idx, ch) in input.chars().enumerate() {
        let valid = if idx == 0 {
            unicode_ident::is_xid_start(ch) || ch == '_' || ch == '$'
        } else {
            unicode_ident::is_xid_continue(ch) || ch == '$'
        };
        if valid {
            out.push(ch);
        } else if idx == 0 && unicode_ident::is_xid_continue(ch) {
            out.push('_');
            out.push(ch);
        } else {
            out.push('_');
        }
    }

    if out.is_empty() {
        out.push('_');
    }
    if RESERVED.contains(&out.as_str()) {
        out.push('_');
    }
    out
}
