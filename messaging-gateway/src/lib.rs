//! # Messaging Gateway
//!
//! Lifecycle adapter around an embedded message broker. It starts and stops
//! the engine, publishes the default in-VM connection factories, and manages
//! queues and topics by name.
//!
//! ## Quick Start
//!
//! ```rust
//! use messaging_gateway::{EmbeddedMessaging, GatewayConfig, Messaging, DEFAULT_CF_NAME};
//!
//! let messaging = EmbeddedMessaging::new(GatewayConfig::from_env("orders"));
//! messaging.start()?;
//!
//! let factory = messaging.naming().lookup_connection_factory(DEFAULT_CF_NAME)?;
//! assert!(factory.is_some());
//!
//! let queue = messaging.create_queue("incoming", Some("priority > 4"), true)?;
//! let found = messaging.lookup_queue("java:/jms/queue/incoming")?;
//! assert_eq!(found.as_deref(), Some(queue.as_ref()));
//!
//! messaging.destroy_queue("incoming")?;
//! messaging.stop()?;
//! # Ok::<(), messaging_gateway::GatewayError>(())
//! ```
//!
//! ## Configuration lookup
//!
//! On start the lifecycle searches its lookup path for `broker.xml`. If none
//! is found the engine starts from the built-in `default-broker.xml`.

pub mod codec;
pub mod config;
pub mod destinations;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod messaging;
pub mod naming;

pub use config::{GatewayConfig, RemoteConnectionOptions, CALLER_RESOURCE_NAME, CONFIG_PATH_ENV};
pub use destinations::DestinationLifecycleManager;
pub use error::{GatewayError, Result, StopFailure};
pub use lifecycle::{BrokerLifecycle, Closeable, LifecycleState, DEFAULT_CF_NAME, DEFAULT_XA_CF_NAME};
pub use messaging::{EmbeddedMessaging, EmbeddedMessagingBuilder, Messaging};
pub use naming::NamingView;

pub use messaging_engine::{
    Bound, ConfigOrigin, ConnectionFactory, DestinationKind, FactoryType, Queue, ReconnectPolicy,
    Topic, TransportConfig,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        BrokerLifecycle, DestinationKind, EmbeddedMessaging, GatewayConfig, GatewayError,
        Messaging, Queue, RemoteConnectionOptions, Topic,
    };
}
