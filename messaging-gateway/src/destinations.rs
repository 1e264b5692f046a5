//! Queue and topic create/lookup/destroy
//!
//! Every operation requires a started broker. The manager takes a snapshot
//! of the engine handle and releases the lifecycle lock before calling the
//! engine, which is responsible for its own destination-table concurrency.

use std::sync::Arc;

use messaging_engine::{Bound, DestinationKind, Engine, Queue, Topic};
use tracing::Span;

use crate::codec;
use crate::error::{GatewayError, Result};
use crate::lifecycle::BrokerLifecycle;

/// Creates, resolves and destroys destinations on the running engine
#[derive(Debug)]
pub struct DestinationLifecycleManager {
    lifecycle: Arc<BrokerLifecycle>,
    span: Span,
}

impl DestinationLifecycleManager {
    /// Manager logging inside the lifecycle's span
    pub fn new(lifecycle: Arc<BrokerLifecycle>) -> Self {
        let span = lifecycle.span().clone();
        Self { lifecycle, span }
    }

    /// Log destination events inside `span` instead
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Create a queue bound under its lookup name
    ///
    /// Fails with [`GatewayError::DestinationExists`] if the queue exists.
    /// If its lookup name is already bound to something that is not this
    /// queue, fails with [`GatewayError::AlreadyBound`] naming that lookup
    /// name, and no queue is created.
    pub fn create_queue(
        &self,
        name: &str,
        selector: Option<&str>,
        durable: bool,
    ) -> Result<Arc<Queue>> {
        let _entered = self.span.enter();
        let engine = self.lifecycle.engine()?;
        let bindings = [codec::lookup_name(name, DestinationKind::Queue)];

        if !engine.create_queue(name, selector, durable, &bindings)? {
            return Err(exists(DestinationKind::Queue, name));
        }

        tracing::debug!("Created queue {} (durable: {}, selector: {:?})", name, durable, selector);

        resolve(engine.as_ref(), name, DestinationKind::Queue, Bound::as_queue)
            .ok_or_else(|| not_found(DestinationKind::Queue, name))
    }

    /// Create a topic bound under its lookup name
    ///
    /// Fails with [`GatewayError::DestinationExists`] if the topic exists,
    /// or [`GatewayError::AlreadyBound`] if its lookup name is taken.
    pub fn create_topic(&self, name: &str) -> Result<Arc<Topic>> {
        let _entered = self.span.enter();
        let engine = self.lifecycle.engine()?;
        let bindings = [codec::lookup_name(name, DestinationKind::Topic)];

        if !engine.create_topic(name, &bindings)? {
            return Err(exists(DestinationKind::Topic, name));
        }

        tracing::debug!("Created topic {}", name);

        resolve(engine.as_ref(), name, DestinationKind::Topic, Bound::as_topic)
            .ok_or_else(|| not_found(DestinationKind::Topic, name))
    }

    /// Resolve a queue by name; `Ok(None)` when it does not resolve
    pub fn lookup_queue(&self, name: &str) -> Result<Option<Arc<Queue>>> {
        let engine = self.lifecycle.engine()?;
        Ok(resolve(engine.as_ref(), name, DestinationKind::Queue, Bound::as_queue))
    }

    /// Resolve a topic by name; `Ok(None)` when it does not resolve
    pub fn lookup_topic(&self, name: &str) -> Result<Option<Arc<Topic>>> {
        let engine = self.lifecycle.engine()?;
        Ok(resolve(engine.as_ref(), name, DestinationKind::Topic, Bound::as_topic))
    }

    /// Destroy a queue, detaching any consumers
    pub fn destroy_queue(&self, name: &str) -> Result<()> {
        let _entered = self.span.enter();
        let engine = self.lifecycle.engine()?;

        if !engine.destroy_queue(name, true)? {
            return Err(not_found(DestinationKind::Queue, name));
        }

        tracing::debug!("Destroyed queue {}", name);
        Ok(())
    }

    /// Destroy a topic, detaching any subscribers
    pub fn destroy_topic(&self, name: &str) -> Result<()> {
        let _entered = self.span.enter();
        let engine = self.lifecycle.engine()?;

        if !engine.destroy_topic(name, true)? {
            return Err(not_found(DestinationKind::Topic, name));
        }

        tracing::debug!("Destroyed topic {}", name);
        Ok(())
    }
}

/// First candidate name bound to a destination of the requested kind
fn resolve<T>(
    engine: &dyn Engine,
    name: &str,
    kind: DestinationKind,
    select: fn(&Bound) -> Option<Arc<T>>,
) -> Option<Arc<T>> {
    let engine_bindings = match kind {
        DestinationKind::Queue => engine.bindings_on_queue(name),
        DestinationKind::Topic => engine.bindings_on_topic(name),
    };

    let candidates = codec::lookup_candidates(engine_bindings, name, kind);
    engine.registry().lookup_first(candidates, select)
}

fn exists(kind: DestinationKind, name: &str) -> GatewayError {
    GatewayError::DestinationExists {
        kind,
        name: name.to_string(),
    }
}

fn not_found(kind: DestinationKind, name: &str) -> GatewayError {
    GatewayError::DestinationNotFound {
        kind,
        name: name.to_string(),
    }
}
