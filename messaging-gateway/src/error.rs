use messaging_engine::{DestinationKind, EngineError};
use naming_registry::NamingError;
use thiserror::Error;

/// A resource that failed to release while stopping the broker
#[derive(Debug)]
pub struct StopFailure {
    /// What was being released
    pub resource: String,
    /// Why releasing it failed
    pub error: EngineError,
}

impl std::fmt::Display for StopFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.resource, self.error)
    }
}

fn summarize(failures: &[StopFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur in the messaging gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The embedded engine could not be started; nothing was left running
    #[error("Failed to start embedded broker: {0}")]
    BrokerStart(#[source] EngineError),

    /// One or more resources failed to release; the broker is stopped regardless
    #[error("Broker stopped with {} error(s): {}", .0.len(), summarize(.0))]
    BrokerStop(Vec<StopFailure>),

    /// The operation requires a started broker
    #[error("Messaging is not running")]
    NotRunning,

    /// The name already has an object bound to it
    #[error("Name already bound: {0}")]
    AlreadyBound(String),

    /// A destination with this name already exists
    #[error("{kind} {name} already exists")]
    DestinationExists { kind: DestinationKind, name: String },

    /// No destination with this name exists
    #[error("{kind} {name} not found")]
    DestinationNotFound { kind: DestinationKind, name: String },

    /// Invalid configuration or options
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Any other engine failure
    #[error("Engine error: {0}")]
    Engine(#[source] EngineError),
}

impl From<NamingError> for GatewayError {
    fn from(error: NamingError) -> Self {
        match error {
            NamingError::AlreadyBound(name) => GatewayError::AlreadyBound(name),
            NamingError::EmptyName => GatewayError::Configuration(error.to_string()),
        }
    }
}

impl From<EngineError> for GatewayError {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::Binding(naming) => naming.into(),
            // The engine was stopped underneath us
            EngineError::Stopped => GatewayError::NotRunning,
            other => GatewayError::Engine(other),
        }
    }
}

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;
