//! Start/stop state machine for the embedded engine
//!
//! `BrokerLifecycle` owns the running engine handle. `start` and `stop` are
//! serialized by a transition lock held for their whole run. The state
//! itself sits behind a second mutex that is only held for short reads and
//! writes: a started engine is published after its default factories are
//! bound, and `stop` unpublishes everything before releasing any of it. No
//! caller observes a half-initialized engine, and tracked resources are
//! closed without the state mutex held.
//!
//! ```text
//!            start()                         stop()
//!  STOPPED ──────────▶ resolve config ──▶ launch engine ──▶ bind default factories ──▶ STARTED
//!     ▲                                                                                  │
//!     └──── close tracked resources ◀── stop engine ◀── (always ends STOPPED) ◀──────────┘
//! ```

use std::sync::Arc;

use messaging_engine::{
    Bound, ConfigOrigin, ConnectionFactory, EmbeddedLauncher, Engine, EngineError, EngineLauncher,
    FactoryType, TransportConfig,
};
use parking_lot::Mutex;
use tracing::Span;

use crate::config::{GatewayConfig, RemoteConnectionOptions};
use crate::error::{GatewayError, Result, StopFailure};

/// Registry name of the default in-VM connection factory
pub const DEFAULT_CF_NAME: &str = "java:/ConnectionFactory";

/// Registry name of the default in-VM XA connection factory
pub const DEFAULT_XA_CF_NAME: &str = "java:/JmsXA";

/// Whether the embedded engine is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Stopped,
    Started,
}

/// A resource released when the broker stops
///
/// `close` may query the lifecycle but must not call `start` or `stop`.
pub trait Closeable: Send + Sync {
    /// Short description used in logs and stop errors
    fn describe(&self) -> String;

    fn close(&self) -> std::result::Result<(), EngineError>;

    /// Already released by its owner; closed resources are dropped from tracking
    fn is_closed(&self) -> bool {
        false
    }
}

impl Closeable for ConnectionFactory {
    fn describe(&self) -> String {
        format!("{:?} connection factory ({})", self.factory_type(), self.transport())
    }

    fn close(&self) -> std::result::Result<(), EngineError> {
        ConnectionFactory::close(self);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        ConnectionFactory::is_closed(self)
    }
}

struct LifecycleInner {
    state: LifecycleState,
    engine: Option<Arc<dyn Engine>>,
    origin: Option<ConfigOrigin>,
    closeables: Vec<Arc<dyn Closeable>>,
}

impl LifecycleInner {
    fn track(&mut self, resource: Arc<dyn Closeable>) {
        self.closeables.retain(|tracked| !tracked.is_closed());
        self.closeables.push(resource);
    }
}

/// Guarded owner of the embedded engine
pub struct BrokerLifecycle {
    config: GatewayConfig,
    launcher: Arc<dyn EngineLauncher>,
    transition: Mutex<()>,
    inner: Mutex<LifecycleInner>,
    span: Span,
}

impl BrokerLifecycle {
    /// Lifecycle backed by the in-memory embedded engine
    pub fn new(config: GatewayConfig) -> Self {
        Self::with_launcher(config, Arc::new(EmbeddedLauncher))
    }

    /// Lifecycle backed by a custom engine launcher
    pub fn with_launcher(config: GatewayConfig, launcher: Arc<dyn EngineLauncher>) -> Self {
        let span = tracing::info_span!("messaging", name = %config.name);
        Self {
            config,
            launcher,
            transition: Mutex::new(()),
            inner: Mutex::new(LifecycleInner {
                state: LifecycleState::Stopped,
                engine: None,
                origin: None,
                closeables: Vec::new(),
            }),
            span,
        }
    }

    /// Log lifecycle events inside `span` instead of the default one
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub(crate) fn span(&self) -> &Span {
        &self.span
    }

    /// Start the engine and bind the default connection factories
    ///
    /// A no-op when already started. On failure the lifecycle stays stopped
    /// and nothing the attempt bound is left behind.
    pub fn start(&self) -> Result<()> {
        let _entered = self.span.enter();
        let _transition = self.transition.lock();

        if self.is_running() {
            tracing::trace!("start() ignored, already running");
            return Ok(());
        }

        self.config.validate()?;
        let resource = self.config.resolve().map_err(GatewayError::BrokerStart)?;
        let engine = self
            .launcher
            .launch(&resource)
            .map_err(GatewayError::BrokerStart)?;

        if let Err(e) = bind_default_factories(engine.as_ref()) {
            if let Err(stop_err) = engine.stop() {
                tracing::warn!("Failed to stop engine after aborted start: {}", stop_err);
            }
            return Err(GatewayError::BrokerStart(e));
        }

        let mut inner = self.inner.lock();
        inner.state = LifecycleState::Started;
        inner.engine = Some(engine);
        inner.origin = Some(resource.origin().clone());
        drop(inner);

        tracing::info!("Messaging started from {}", resource.origin());
        Ok(())
    }

    /// Release tracked resources and stop the engine
    ///
    /// A no-op when already stopped. Every tracked resource is closed even
    /// if some fail; failures are reported together as
    /// [`GatewayError::BrokerStop`] and the lifecycle ends stopped either way.
    pub fn stop(&self) -> Result<()> {
        let _entered = self.span.enter();
        let _transition = self.transition.lock();

        let (closeables, engine) = {
            let mut inner = self.inner.lock();
            if inner.state == LifecycleState::Stopped {
                tracing::trace!("stop() ignored, not running");
                return Ok(());
            }

            inner.state = LifecycleState::Stopped;
            inner.origin = None;
            (std::mem::take(&mut inner.closeables), inner.engine.take())
        };

        let mut failures = Vec::new();

        for closeable in closeables.into_iter().rev() {
            if let Err(error) = closeable.close() {
                let resource = closeable.describe();
                tracing::warn!("Failed to close {}: {}", resource, error);
                failures.push(StopFailure { resource, error });
            }
        }

        if let Some(engine) = engine {
            if let Err(error) = engine.stop() {
                tracing::warn!("Engine {} failed to stop cleanly: {}", engine.name(), error);
                failures.push(StopFailure {
                    resource: format!("engine {}", engine.name()),
                    error,
                });
            }
        }

        if failures.is_empty() {
            tracing::info!("Messaging stopped");
            Ok(())
        } else {
            Err(GatewayError::BrokerStop(failures))
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.lock().state == LifecycleState::Started
    }

    pub fn state(&self) -> LifecycleState {
        self.inner.lock().state
    }

    /// The running engine
    pub fn engine(&self) -> Result<Arc<dyn Engine>> {
        self.inner
            .lock()
            .engine
            .as_ref()
            .map(Arc::clone)
            .ok_or(GatewayError::NotRunning)
    }

    /// Where the running engine's configuration came from
    pub fn config_origin(&self) -> Option<ConfigOrigin> {
        self.inner.lock().origin.clone()
    }

    /// Close `resource` when the broker stops
    pub fn track_closeable(&self, resource: Arc<dyn Closeable>) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.state != LifecycleState::Started {
            return Err(GatewayError::NotRunning);
        }
        inner.track(resource);
        Ok(())
    }

    /// Number of resources currently tracked for release on stop
    pub fn tracked_count(&self) -> usize {
        self.inner.lock().closeables.len()
    }

    /// Build a factory for out-of-process clients
    ///
    /// The factory is not bound in the registry; it is tracked and closed
    /// when the broker stops.
    pub fn create_remote_connection_factory(
        &self,
        options: &RemoteConnectionOptions,
    ) -> Result<Arc<ConnectionFactory>> {
        options.validate()?;

        let mut inner = self.inner.lock();
        if inner.state != LifecycleState::Started {
            return Err(GatewayError::NotRunning);
        }

        let factory_type = if options.xa {
            FactoryType::Xa
        } else {
            FactoryType::Standard
        };
        let transport = TransportConfig::Remote {
            host: options.host.clone(),
            port: options.port,
        };
        let factory = Arc::new(
            ConnectionFactory::without_ha(factory_type, transport)
                .with_reconnect(options.reconnect.clone()),
        );

        inner.track(Arc::clone(&factory) as Arc<dyn Closeable>);

        let _entered = self.span.enter();
        tracing::debug!("Created remote {:?} connection factory for {}:{}", factory_type, options.host, options.port);
        Ok(factory)
    }
}

fn bind_default_factories(engine: &dyn Engine) -> std::result::Result<(), EngineError> {
    let registry = engine.registry();

    let standard = ConnectionFactory::without_ha(FactoryType::Standard, TransportConfig::InVm);
    registry.bind(DEFAULT_CF_NAME, Bound::ConnectionFactory(Arc::new(standard)))?;

    let xa = ConnectionFactory::without_ha(FactoryType::Xa, TransportConfig::InVm);
    if let Err(e) = registry.bind(DEFAULT_XA_CF_NAME, Bound::ConnectionFactory(Arc::new(xa))) {
        registry.unbind(DEFAULT_CF_NAME);
        return Err(e.into());
    }

    Ok(())
}

impl std::fmt::Debug for BrokerLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("BrokerLifecycle")
            .field("name", &self.config.name)
            .field("state", &inner.state)
            .field("origin", &inner.origin)
            .field("tracked", &inner.closeables.len())
            .finish()
    }
}
