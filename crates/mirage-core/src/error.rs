use crate::Name;

pub type Result<T> = std::result::Result<T, ModelError>;

/// Failures reported by the model, the builders and the relation engine.
///
/// Nothing is retried or swallowed: every error is reported synchronously to the caller that
/// triggered it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Malformed or out-of-contract caller input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A query shape that is deliberately not implemented.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// A builder finalized without its required fields.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A textual type reference that resolves neither in scope nor through the provider.
    #[error("cannot resolve type reference `{0}`")]
    InvalidReference(String),

    /// A qualified name unknown to both the registry and the provider.
    #[error("no type named `{0}`")]
    NotFound(Name),

    /// Reflection metadata that could not be interpreted.
    #[error("malformed descriptor: {0}")]
    Descriptor(String),
}

impl ModelError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }
}
