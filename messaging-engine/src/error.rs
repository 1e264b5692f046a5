//! Error types for the messaging-engine crate.

use std::path::PathBuf;

use naming_registry::NamingError;

use crate::destination::DestinationKind;

/// Errors reported by an engine or its launcher
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The configuration resource could not be read
    #[error("Failed to read configuration resource {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration resource is not valid broker XML
    #[error("Invalid broker configuration: {0}")]
    ConfigParse(String),

    /// The engine has been stopped and rejects further operations
    #[error("Engine is stopped")]
    Stopped,

    /// A destination binding collided with an existing one
    #[error("Binding failed: {0}")]
    Binding(#[from] NamingError),

    /// The configured destination limit has been reached
    #[error("Destination limit of {max} reached")]
    DestinationLimit { max: usize },

    /// A destination still has consumers and removal was not forced
    #[error("{kind} {name} still has {consumers} consumer(s) attached")]
    ConsumersAttached {
        kind: DestinationKind,
        name: String,
        consumers: usize,
    },

    /// Engine start-up failed for a reason not covered above
    #[error("Engine start failed: {0}")]
    Start(String),

    /// Engine shutdown failed
    #[error("Engine shutdown failed: {0}")]
    Shutdown(String),

    /// Releasing a client resource failed
    #[error("Failed to close {resource}: {reason}")]
    Close { resource: String, reason: String },
}

/// Convenience type alias for Results using EngineError.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_display() {
        let error = EngineError::DestinationLimit { max: 4 };
        assert_eq!(error.to_string(), "Destination limit of 4 reached");

        let error = EngineError::ConsumersAttached {
            kind: DestinationKind::Queue,
            name: "orders".to_string(),
            consumers: 2,
        };
        assert_eq!(
            error.to_string(),
            "queue orders still has 2 consumer(s) attached"
        );

        let error: EngineError = NamingError::AlreadyBound("java:/x".to_string()).into();
        assert!(error.to_string().contains("java:/x"));
    }
}
