use thiserror::Error;

/// Errors raised by [`NamingRegistry`](crate::NamingRegistry) mutations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    /// The name already has an object bound to it
    #[error("Name already bound: {0}")]
    AlreadyBound(String),

    /// Empty names cannot be bound
    #[error("Cannot bind an empty name")]
    EmptyName,
}

/// Result type for naming operations
pub type Result<T> = std::result::Result<T, NamingError>;
