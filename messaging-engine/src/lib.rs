//! # Messaging Engine
//!
//! The seam between the embedded messaging gateway and the broker engine it
//! wraps, plus an in-memory engine that implements it.
//!
//! ## Overview
//!
//! - [`Engine`] / [`EngineLauncher`]: what a gateway needs from an embedded broker
//! - [`EmbeddedEngine`]: destination tables and a binding registry held in memory
//! - [`ConfigResource`]: the named XML resource an engine is started from
//! - [`ConnectionFactory`]: client-side factory descriptors bound for discovery
//!
//! ## Usage
//!
//! ```rust
//! use messaging_engine::{ConfigResource, EmbeddedLauncher, EngineLauncher};
//!
//! let engine = EmbeddedLauncher.launch(&ConfigResource::builtin()).unwrap();
//!
//! let bindings = vec!["java:/jms/queue/orders".to_string()];
//! assert!(engine.create_queue("orders", None, true, &bindings).unwrap());
//! assert_eq!(engine.bindings_on_queue("orders"), bindings);
//!
//! engine.stop().unwrap();
//! ```

pub mod binding;
pub mod client;
pub mod config;
pub mod destination;
pub mod embedded;
pub mod engine;
pub mod error;

pub use binding::{BindingRegistry, Bound};
pub use client::{ConnectionFactory, FactoryType, ReconnectPolicy, TransportConfig};
pub use config::{ConfigOrigin, ConfigResource, EngineConfig, DEFAULT_RESOURCE_NAME};
pub use destination::{ConsumerGuard, DestinationKind, ParseKindError, Queue, Topic};
pub use embedded::{EmbeddedEngine, EmbeddedLauncher};
pub use engine::{Engine, EngineLauncher};
pub use error::{EngineError, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Bound, ConfigResource, ConnectionFactory, DestinationKind, EmbeddedLauncher, Engine,
        EngineError, EngineLauncher, Queue, Topic,
    };
}
