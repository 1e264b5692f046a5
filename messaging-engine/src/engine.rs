//! The engine seam
//!
//! A gateway never talks to a concrete broker. It launches one through an
//! [`EngineLauncher`] and drives it through the [`Engine`] trait, so any
//! embedded broker can sit behind the gateway by implementing both.

use std::sync::Arc;

use crate::binding::BindingRegistry;
use crate::config::ConfigResource;
use crate::error::Result;

/// A running embedded broker engine
///
/// Implementations must be safe to call from many threads at once: the
/// gateway adds no locking around destination operations.
pub trait Engine: Send + Sync {
    /// Engine name from its configuration
    fn name(&self) -> &str;

    /// The engine's own binding registry
    fn registry(&self) -> &BindingRegistry;

    /// Create a queue bound under each of `bindings`
    ///
    /// Returns `Ok(false)` without side effects if the queue already exists.
    fn create_queue(
        &self,
        name: &str,
        selector: Option<&str>,
        durable: bool,
        bindings: &[String],
    ) -> Result<bool>;

    /// Create a topic bound under each of `bindings`
    ///
    /// Returns `Ok(false)` without side effects if the topic already exists.
    fn create_topic(&self, name: &str, bindings: &[String]) -> Result<bool>;

    /// Destroy a queue and unbind all its names
    ///
    /// Returns `Ok(false)` if there was no such queue. With
    /// `remove_consumers == false`, a queue with attached consumers is kept
    /// and an error is returned.
    fn destroy_queue(&self, name: &str, remove_consumers: bool) -> Result<bool>;

    /// Destroy a topic and unbind all its names; see [`Engine::destroy_queue`]
    fn destroy_topic(&self, name: &str, remove_consumers: bool) -> Result<bool>;

    /// Registry names a queue is bound under, in binding order
    fn bindings_on_queue(&self, name: &str) -> Vec<String>;

    /// Registry names a topic is bound under, in binding order
    fn bindings_on_topic(&self, name: &str) -> Vec<String>;

    /// Whether the engine still accepts operations
    fn is_active(&self) -> bool;

    /// Halt the engine, releasing its destinations and bindings
    fn stop(&self) -> Result<()>;
}

/// Starts engines from configuration resources
pub trait EngineLauncher: Send + Sync {
    fn launch(&self, resource: &ConfigResource) -> Result<Arc<dyn Engine>>;
}
