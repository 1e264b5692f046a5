//! Generic Naming Registry
//!
//! A thread-safe, generic name-to-object binding table used to publish
//! connection factories and destinations for discovery by clients.
//!
//! # Features
//!
//! - **Unique Names**: A name is bound to at most one object at any instant
//! - **Explicit Rebinding**: Binding a taken name fails; unbind it first
//! - **Ordered Resolution**: Resolve the first match from a list of candidate names
//! - **Generic Values**: Bind any cloneable object (typically `Arc<T>` or an enum of `Arc`s)
//!
//! # Quick Start
//!
//! ```rust
//! use naming_registry::{NamingError, NamingRegistry};
//!
//! let registry = NamingRegistry::<u32>::new();
//!
//! registry.bind("java:/answer", 42).unwrap();
//! assert_eq!(registry.lookup("java:/answer"), Some(42));
//!
//! // Rebinding requires an explicit unbind first
//! assert!(matches!(
//!     registry.bind("java:/answer", 7),
//!     Err(NamingError::AlreadyBound(_))
//! ));
//!
//! registry.unbind("java:/answer");
//! assert_eq!(registry.lookup("java:/answer"), None);
//! ```

pub mod error;
pub mod registry;

pub use error::{NamingError, Result};
pub use registry::{NamingEntry, NamingRegistry};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{NamingError, Result};
    pub use crate::registry::{NamingEntry, NamingRegistry};
}
