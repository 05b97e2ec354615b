use thiserror::Error;

/// Result type for type graph and registry operations.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("type name '{name}' is registered more than once")]
    DuplicateName { name: String },

    #[error("type '{name}' was declared but never defined")]
    UndefinedType { name: String },

    #[error("type '{name}' is already defined")]
    AlreadyDefined { name: String },

    #[error("capabilities can only be attached to named types, got '{ty}'")]
    NotNamed { ty: String },
}
