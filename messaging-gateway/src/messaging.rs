//! The messaging capability and its embedded implementation

use std::sync::Arc;

use messaging_engine::{ConnectionFactory, EmbeddedLauncher, EngineLauncher, Queue, Topic};
use tracing::Span;

use crate::config::{GatewayConfig, RemoteConnectionOptions};
use crate::destinations::DestinationLifecycleManager;
use crate::error::Result;
use crate::lifecycle::BrokerLifecycle;
use crate::naming::NamingView;

/// A named messaging service with queues and topics
///
/// Every destination operation requires the service to be running.
pub trait Messaging: Send + Sync {
    /// Instance name
    fn name(&self) -> &str;

    fn start(&self) -> Result<()>;

    fn stop(&self) -> Result<()>;

    fn is_running(&self) -> bool;

    fn create_queue(&self, name: &str, selector: Option<&str>, durable: bool) -> Result<Arc<Queue>>;

    fn create_topic(&self, name: &str) -> Result<Arc<Topic>>;

    fn lookup_queue(&self, name: &str) -> Result<Option<Arc<Queue>>>;

    fn lookup_topic(&self, name: &str) -> Result<Option<Arc<Topic>>>;

    fn destroy_queue(&self, name: &str) -> Result<()>;

    fn destroy_topic(&self, name: &str) -> Result<()>;
}

/// Messaging backed by an engine running in this process
///
/// Dropping a running instance stops it.
///
/// ```rust
/// use messaging_gateway::{EmbeddedMessaging, GatewayConfig, Messaging};
///
/// let messaging = EmbeddedMessaging::new(
///     GatewayConfig::new("docs").with_lookup_path(vec!["/nonexistent".into()]),
/// );
/// messaging.start()?;
///
/// let queue = messaging.create_queue("orders", None, true)?;
/// assert_eq!(queue.name(), "orders");
///
/// messaging.stop()?;
/// # Ok::<(), messaging_gateway::GatewayError>(())
/// ```
#[derive(Debug)]
pub struct EmbeddedMessaging {
    lifecycle: Arc<BrokerLifecycle>,
    destinations: DestinationLifecycleManager,
    naming: NamingView,
    /// Lifecycle references held by this struct's own components
    internal_holders: usize,
}

impl EmbeddedMessaging {
    /// Messaging over the in-memory engine with default logging span
    pub fn new(config: GatewayConfig) -> Self {
        Self::builder().config(config).build()
    }

    pub fn builder() -> EmbeddedMessagingBuilder {
        EmbeddedMessagingBuilder::default()
    }

    /// Bindings of the running engine
    pub fn naming(&self) -> &NamingView {
        &self.naming
    }

    pub fn lifecycle(&self) -> &Arc<BrokerLifecycle> {
        &self.lifecycle
    }

    pub fn destinations(&self) -> &DestinationLifecycleManager {
        &self.destinations
    }

    /// See [`BrokerLifecycle::create_remote_connection_factory`]
    pub fn create_remote_connection_factory(
        &self,
        options: &RemoteConnectionOptions,
    ) -> Result<Arc<ConnectionFactory>> {
        self.lifecycle.create_remote_connection_factory(options)
    }
}

impl Messaging for EmbeddedMessaging {
    fn name(&self) -> &str {
        &self.lifecycle.config().name
    }

    fn start(&self) -> Result<()> {
        self.lifecycle.start()
    }

    fn stop(&self) -> Result<()> {
        self.lifecycle.stop()
    }

    fn is_running(&self) -> bool {
        self.lifecycle.is_running()
    }

    fn create_queue(&self, name: &str, selector: Option<&str>, durable: bool) -> Result<Arc<Queue>> {
        self.destinations.create_queue(name, selector, durable)
    }

    fn create_topic(&self, name: &str) -> Result<Arc<Topic>> {
        self.destinations.create_topic(name)
    }

    fn lookup_queue(&self, name: &str) -> Result<Option<Arc<Queue>>> {
        self.destinations.lookup_queue(name)
    }

    fn lookup_topic(&self, name: &str) -> Result<Option<Arc<Topic>>> {
        self.destinations.lookup_topic(name)
    }

    fn destroy_queue(&self, name: &str) -> Result<()> {
        self.destinations.destroy_queue(name)
    }

    fn destroy_topic(&self, name: &str) -> Result<()> {
        self.destinations.destroy_topic(name)
    }
}

impl Drop for EmbeddedMessaging {
    fn drop(&mut self) {
        if !self.lifecycle.is_running() {
            return;
        }

        // Other holders of the lifecycle keep it alive; only the last owner stops it
        if Arc::strong_count(&self.lifecycle) > self.internal_holders {
            return;
        }

        tracing::debug!("EmbeddedMessaging {} dropped while running, stopping", self.name());
        if let Err(e) = self.lifecycle.stop() {
            tracing::warn!("Failed to stop messaging on drop: {}", e);
        }
    }
}

/// Builder for [`EmbeddedMessaging`]
pub struct EmbeddedMessagingBuilder {
    config: GatewayConfig,
    launcher: Arc<dyn EngineLauncher>,
    span: Option<Span>,
}

impl Default for EmbeddedMessagingBuilder {
    fn default() -> Self {
        Self {
            config: GatewayConfig::default(),
            launcher: Arc::new(EmbeddedLauncher),
            span: None,
        }
    }
}

impl EmbeddedMessagingBuilder {
    pub fn config(mut self, config: GatewayConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a different engine behind the lifecycle
    pub fn launcher(mut self, launcher: Arc<dyn EngineLauncher>) -> Self {
        self.launcher = launcher;
        self
    }

    /// Span every component logs inside
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn build(self) -> EmbeddedMessaging {
        let mut lifecycle = BrokerLifecycle::with_launcher(self.config, self.launcher);
        if let Some(span) = self.span {
            lifecycle = lifecycle.with_span(span);
        }

        let lifecycle = Arc::new(lifecycle);
        let destinations = DestinationLifecycleManager::new(Arc::clone(&lifecycle));
        let naming = NamingView::new(Arc::clone(&lifecycle));
        let internal_holders = Arc::strong_count(&lifecycle);

        EmbeddedMessaging {
            lifecycle,
            destinations,
            naming,
            internal_holders,
        }
    }
}
