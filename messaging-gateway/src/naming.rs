//! Consistent view of the running engine's binding registry
//!
//! The view stores nothing itself. Every call goes to the registry of the
//! engine that is running at that moment, so bindings live exactly as long
//! as the broker's STARTED window.

use std::sync::Arc;

use messaging_engine::{Bound, ConnectionFactory};
use naming_registry::NamingEntry;

use crate::error::Result;
use crate::lifecycle::BrokerLifecycle;

/// Bind/lookup/unbind against the running engine's registry
#[derive(Debug, Clone)]
pub struct NamingView {
    lifecycle: Arc<BrokerLifecycle>,
}

impl NamingView {
    pub fn new(lifecycle: Arc<BrokerLifecycle>) -> Self {
        Self { lifecycle }
    }

    /// Bind `object` under `name`; a taken name fails with `AlreadyBound`
    pub fn bind(&self, name: &str, object: Bound) -> Result<()> {
        let engine = self.lifecycle.engine()?;
        engine.registry().bind(name, object)?;
        Ok(())
    }

    /// The object bound under `name`, if any
    pub fn lookup(&self, name: &str) -> Result<Option<Bound>> {
        Ok(self.lifecycle.engine()?.registry().lookup(name))
    }

    /// The connection factory bound under `name`, if that is what is bound there
    pub fn lookup_connection_factory(&self, name: &str) -> Result<Option<Arc<ConnectionFactory>>> {
        Ok(self.lookup(name)?.and_then(|bound| bound.as_connection_factory()))
    }

    /// Remove the binding for `name`; a no-op if absent
    pub fn unbind(&self, name: &str) -> Result<Option<Bound>> {
        Ok(self.lifecycle.engine()?.registry().unbind(name))
    }

    /// All bound names, sorted
    pub fn names(&self) -> Result<Vec<String>> {
        Ok(self.lifecycle.engine()?.registry().names())
    }

    /// Snapshot of every binding, sorted by name
    pub fn entries(&self) -> Result<Vec<NamingEntry<Bound>>> {
        Ok(self.lifecycle.engine()?.registry().entries())
    }
}
