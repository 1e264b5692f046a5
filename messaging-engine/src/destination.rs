//! Queue and topic handles
//!
//! Handles are created by the engine and published in its binding registry
//! as `Arc`s, so every lookup hands out the very instance the engine created.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// The two destination types an engine manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DestinationKind {
    Queue,
    Topic,
}

impl DestinationKind {
    /// Lowercase label used in names and messages
    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationKind::Queue => "queue",
            DestinationKind::Topic => "topic",
        }
    }
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown destination kind
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown destination kind: {0}")]
pub struct ParseKindError(pub String);

impl FromStr for DestinationKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queue" => Ok(DestinationKind::Queue),
            "topic" => Ok(DestinationKind::Topic),
            other => Err(ParseKindError(other.to_string())),
        }
    }
}

/// Live consumer count shared between a destination and its guards
#[derive(Debug, Default, Clone)]
struct ConsumerCount(Arc<AtomicUsize>);

impl ConsumerCount {
    fn attach(&self, kind: DestinationKind, name: &str) -> ConsumerGuard {
        self.0.fetch_add(1, Ordering::SeqCst);
        ConsumerGuard {
            count: self.clone(),
            kind,
            name: name.to_string(),
        }
    }

    fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Keeps a consumer attached to a destination until dropped
#[derive(Debug)]
pub struct ConsumerGuard {
    count: ConsumerCount,
    kind: DestinationKind,
    name: String,
}

impl ConsumerGuard {
    /// Kind of the destination this consumer is attached to
    pub fn kind(&self) -> DestinationKind {
        self.kind
    }

    /// Name of the destination this consumer is attached to
    pub fn destination(&self) -> &str {
        &self.name
    }
}

impl Drop for ConsumerGuard {
    fn drop(&mut self) {
        self.count.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A point-to-point destination
#[derive(Debug)]
pub struct Queue {
    name: String,
    selector: Option<String>,
    durable: bool,
    consumers: ConsumerCount,
}

impl Queue {
    pub fn new(name: impl Into<String>, selector: Option<String>, durable: bool) -> Self {
        Self {
            name: name.into(),
            selector,
            durable,
            consumers: ConsumerCount::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Message selector restricting what consumers of this queue receive
    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    pub fn is_durable(&self) -> bool {
        self.durable
    }

    /// Register a consumer; it stays attached until the guard is dropped
    pub fn attach_consumer(&self) -> ConsumerGuard {
        self.consumers.attach(DestinationKind::Queue, &self.name)
    }

    pub fn consumer_count(&self) -> usize {
        self.consumers.get()
    }
}

impl PartialEq for Queue {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.selector == other.selector && self.durable == other.durable
    }
}

impl Eq for Queue {}

/// A publish-subscribe destination
#[derive(Debug)]
pub struct Topic {
    name: String,
    consumers: ConsumerCount,
}

impl Topic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            consumers: ConsumerCount::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a subscriber; it stays attached until the guard is dropped
    pub fn attach_consumer(&self) -> ConsumerGuard {
        self.consumers.attach(DestinationKind::Topic, &self.name)
    }

    pub fn consumer_count(&self) -> usize {
        self.consumers.get()
    }
}

impl PartialEq for Topic {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Topic {}
