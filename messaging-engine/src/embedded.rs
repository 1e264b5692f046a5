//! In-memory embedded engine
//!
//! `EmbeddedEngine` keeps destination tables and a binding registry in
//! process memory. It holds no messages: routing, persistence and delivery
//! belong to a real broker behind the same [`Engine`] seam.
//!
//! # Architecture
//!
//! ```text
//! EmbeddedEngine
//! ├── registry: NamingRegistry<Bound>             (binding name -> object)
//! ├── queues:   DashMap<name, Entry<Queue>>       (handle + binding names)
//! ├── topics:   DashMap<name, Entry<Topic>>
//! └── destination_count                           (checked against max-destinations)
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::binding::{BindingRegistry, Bound};
use crate::config::{BindingEntry, ConfigResource, EngineConfig};
use crate::destination::{DestinationKind, Queue, Topic};
use crate::engine::{Engine, EngineLauncher};
use crate::error::{EngineError, Result};

/// A destination handle together with the names it is bound under
struct DestinationEntry<T> {
    handle: Arc<T>,
    bindings: Vec<String>,
}

/// In-memory engine implementing the [`Engine`] seam
pub struct EmbeddedEngine {
    node_id: Uuid,
    name: String,
    registry: BindingRegistry,
    queues: DashMap<String, DestinationEntry<Queue>>,
    topics: DashMap<String, DestinationEntry<Topic>>,
    destination_count: AtomicUsize,
    max_destinations: Option<usize>,
    active: AtomicBool,
}

impl EmbeddedEngine {
    /// Parse `resource` and start an engine from it
    pub fn start(resource: &ConfigResource) -> Result<Self> {
        let config = resource.parse()?;
        tracing::debug!("Starting embedded engine from {}", resource.origin());
        Self::with_config(config)
    }

    /// Start an engine from parsed configuration
    ///
    /// Declared destinations are created immediately, bound under their
    /// `<entry>` names or, without entries, under their bare name.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        if config.core.persistence_enabled {
            tracing::warn!(
                "Engine {} requested persistence, which the in-memory engine does not provide",
                config.core.name
            );
        }

        let engine = Self {
            node_id: Uuid::new_v4(),
            name: config.core.name.clone(),
            registry: BindingRegistry::new(),
            queues: DashMap::new(),
            topics: DashMap::new(),
            destination_count: AtomicUsize::new(0),
            max_destinations: config.core.max_destinations,
            active: AtomicBool::new(true),
        };

        for queue in &config.jms.queues {
            let bindings = declared_bindings(&queue.name, &queue.entries);
            let created = engine.create_queue(
                &queue.name,
                queue.selector.as_deref(),
                queue.durable,
                &bindings,
            )?;
            if !created {
                return Err(EngineError::Start(format!(
                    "queue {} declared more than once",
                    queue.name
                )));
            }
        }

        for topic in &config.jms.topics {
            let bindings = declared_bindings(&topic.name, &topic.entries);
            if !engine.create_topic(&topic.name, &bindings)? {
                return Err(EngineError::Start(format!(
                    "topic {} declared more than once",
                    topic.name
                )));
            }
        }

        tracing::info!(
            node_id = %engine.node_id,
            "Embedded engine {} started with {} declared destination(s)",
            engine.name,
            engine.destination_count()
        );

        Ok(engine)
    }

    /// Unique id of this engine instance
    pub fn node_id(&self) -> Uuid {
        self.node_id
    }

    /// Number of live queues and topics
    pub fn destination_count(&self) -> usize {
        self.destination_count.load(Ordering::SeqCst)
    }

    /// Names of live destinations of `kind`, sorted
    pub fn destinations(&self, kind: DestinationKind) -> Vec<String> {
        let mut names: Vec<String> = match kind {
            DestinationKind::Queue => self.queues.iter().map(|e| e.key().clone()).collect(),
            DestinationKind::Topic => self.topics.iter().map(|e| e.key().clone()).collect(),
        };
        names.sort();
        names
    }

    fn ensure_active(&self) -> Result<()> {
        if self.active.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(EngineError::Stopped)
        }
    }

    fn reserve_slot(&self) -> Result<()> {
        match self.max_destinations {
            None => {
                self.destination_count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            Some(max) => self
                .destination_count
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                    (count < max).then_some(count + 1)
                })
                .map(|_| ())
                .map_err(|_| EngineError::DestinationLimit { max }),
        }
    }

    fn release_slot(&self) {
        let _ = self
            .destination_count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| count.checked_sub(1));
    }

    /// Bind `object` under every name, undoing partial work on failure
    fn bind_all(&self, names: &[String], object: Bound) -> Result<()> {
        for (i, name) in names.iter().enumerate() {
            if let Err(e) = self.registry.bind(name.clone(), object.clone()) {
                for bound in &names[..i] {
                    self.registry.unbind(bound);
                }
                return Err(e.into());
            }
        }
        Ok(())
    }

    fn create_destination<T>(
        &self,
        table: &DashMap<String, DestinationEntry<T>>,
        kind: DestinationKind,
        name: &str,
        bindings: &[String],
        make: impl FnOnce() -> T,
    ) -> Result<bool>
    where
        Arc<T>: Into<Bound>,
    {
        self.ensure_active()?;

        if table.contains_key(name) {
            return Ok(false);
        }

        self.reserve_slot()?;

        match table.entry(name.to_string()) {
            Entry::Occupied(_) => {
                self.release_slot();
                Ok(false)
            }
            Entry::Vacant(vacant) => {
                let handle = Arc::new(make());
                if let Err(e) = self.bind_all(bindings, Arc::clone(&handle).into()) {
                    self.release_slot();
                    return Err(e);
                }

                vacant.insert(DestinationEntry {
                    handle,
                    bindings: bindings.to_vec(),
                });

                tracing::debug!("Created {} {} bound as {:?}", kind, name, bindings);
                Ok(true)
            }
        }
    }

    fn destroy_destination<T>(
        &self,
        table: &DashMap<String, DestinationEntry<T>>,
        kind: DestinationKind,
        name: &str,
        remove_consumers: bool,
        consumer_count: impl Fn(&T) -> usize,
    ) -> Result<bool>
    where
        Arc<T>: Into<Bound>,
    {
        self.ensure_active()?;

        if let Some(entry) = table.get(name) {
            let consumers = consumer_count(&entry.handle);
            if consumers > 0 {
                if !remove_consumers {
                    return Err(EngineError::ConsumersAttached {
                        kind,
                        name: name.to_string(),
                        consumers,
                    });
                }
                tracing::warn!("Destroying {} {} with {} consumer(s) attached", kind, name, consumers);
            }
        }

        match table.remove(name) {
            Some((_, entry)) => {
                // Names rebound to something else since creation are left alone
                let bound: Bound = Arc::clone(&entry.handle).into();
                for binding in &entry.bindings {
                    self.registry.unbind_if(binding, |current| current.is_same(&bound));
                }
                self.release_slot();
                tracing::debug!("Destroyed {} {}", kind, name);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn declared_bindings(name: &str, entries: &[BindingEntry]) -> Vec<String> {
    if entries.is_empty() {
        vec![name.to_string()]
    } else {
        entries.iter().map(|e| e.name.clone()).collect()
    }
}

impl Engine for EmbeddedEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    fn create_queue(
        &self,
        name: &str,
        selector: Option<&str>,
        durable: bool,
        bindings: &[String],
    ) -> Result<bool> {
        self.create_destination(&self.queues, DestinationKind::Queue, name, bindings, || {
            Queue::new(name, selector.map(str::to_string), durable)
        })
    }

    fn create_topic(&self, name: &str, bindings: &[String]) -> Result<bool> {
        self.create_destination(&self.topics, DestinationKind::Topic, name, bindings, || {
            Topic::new(name)
        })
    }

    fn destroy_queue(&self, name: &str, remove_consumers: bool) -> Result<bool> {
        self.destroy_destination(
            &self.queues,
            DestinationKind::Queue,
            name,
            remove_consumers,
            Queue::consumer_count,
        )
    }

    fn destroy_topic(&self, name: &str, remove_consumers: bool) -> Result<bool> {
        self.destroy_destination(
            &self.topics,
            DestinationKind::Topic,
            name,
            remove_consumers,
            Topic::consumer_count,
        )
    }

    fn bindings_on_queue(&self, name: &str) -> Vec<String> {
        self.queues
            .get(name)
            .map(|entry| entry.bindings.clone())
            .unwrap_or_default()
    }

    fn bindings_on_topic(&self, name: &str) -> Vec<String> {
        self.topics
            .get(name)
            .map(|entry| entry.bindings.clone())
            .unwrap_or_default()
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn stop(&self) -> Result<()> {
        if !self.active.swap(false, Ordering::SeqCst) {
            return Err(EngineError::Stopped);
        }

        let released = self.registry.clear();
        self.queues.clear();
        self.topics.clear();
        self.destination_count.store(0, Ordering::SeqCst);

        tracing::info!(
            node_id = %self.node_id,
            "Embedded engine {} stopped, released {} binding(s)",
            self.name,
            released
        );
        Ok(())
    }
}

impl std::fmt::Debug for EmbeddedEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddedEngine")
            .field("node_id", &self.node_id)
            .field("name", &self.name)
            .field("queues", &self.queues.len())
            .field("topics", &self.topics.len())
            .field("active", &self.is_active())
            .finish()
    }
}

/// Launches [`EmbeddedEngine`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedLauncher;

impl EngineLauncher for EmbeddedLauncher {
    fn launch(&self, resource: &ConfigResource) -> Result<Arc<dyn Engine>> {
        Ok(Arc::new(EmbeddedEngine::start(resource)?))
    }
}
