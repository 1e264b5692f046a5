//! Objects an engine publishes in its binding registry

use std::sync::Arc;

use naming_registry::NamingRegistry;

use crate::client::ConnectionFactory;
use crate::destination::{DestinationKind, Queue, Topic};

/// The engine's binding registry
pub type BindingRegistry = NamingRegistry<Bound>;

/// A bound object
#[derive(Debug, Clone)]
pub enum Bound {
    ConnectionFactory(Arc<ConnectionFactory>),
    Queue(Arc<Queue>),
    Topic(Arc<Topic>),
}

impl Bound {
    pub fn as_connection_factory(&self) -> Option<Arc<ConnectionFactory>> {
        match self {
            Bound::ConnectionFactory(cf) => Some(Arc::clone(cf)),
            _ => None,
        }
    }

    pub fn as_queue(&self) -> Option<Arc<Queue>> {
        match self {
            Bound::Queue(queue) => Some(Arc::clone(queue)),
            _ => None,
        }
    }

    pub fn as_topic(&self) -> Option<Arc<Topic>> {
        match self {
            Bound::Topic(topic) => Some(Arc::clone(topic)),
            _ => None,
        }
    }

    /// Whether both refer to the identical bound instance
    pub fn is_same(&self, other: &Bound) -> bool {
        match (self, other) {
            (Bound::ConnectionFactory(a), Bound::ConnectionFactory(b)) => Arc::ptr_eq(a, b),
            (Bound::Queue(a), Bound::Queue(b)) => Arc::ptr_eq(a, b),
            (Bound::Topic(a), Bound::Topic(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Destination kind, if this is a destination
    pub fn destination_kind(&self) -> Option<DestinationKind> {
        match self {
            Bound::ConnectionFactory(_) => None,
            Bound::Queue(_) => Some(DestinationKind::Queue),
            Bound::Topic(_) => Some(DestinationKind::Topic),
        }
    }
}

impl From<Arc<ConnectionFactory>> for Bound {
    fn from(cf: Arc<ConnectionFactory>) -> Self {
        Bound::ConnectionFactory(cf)
    }
}

impl From<Arc<Queue>> for Bound {
    fn from(queue: Arc<Queue>) -> Self {
        Bound::Queue(queue)
    }
}

impl From<Arc<Topic>> for Bound {
    fn from(topic: Arc<Topic>) -> Self {
        Bound::Topic(topic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_same_compares_identity() {
        let queue = Arc::new(Queue::new("orders", None, true));
        let twin = Arc::new(Queue::new("orders", None, true));

        let bound = Bound::from(Arc::clone(&queue));
        assert!(bound.is_same(&Bound::from(queue)));
        assert!(!bound.is_same(&Bound::from(twin)));
        assert!(!bound.is_same(&Bound::from(Arc::new(Topic::new("orders")))));
    }
}
