//! Client-side connection factory descriptors
//!
//! A `ConnectionFactory` records how clients reach the engine: which
//! transport, whether it produces XA (two-phase commit) connections, and how
//! it reconnects after a failure. Factories are immutable apart from their
//! closed flag.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// How a connection factory reaches the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportConfig {
    /// In-process transport, only usable inside the hosting process
    InVm,
    /// Network transport for out-of-process clients
    Remote { host: String, port: u16 },
}

impl fmt::Display for TransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportConfig::InVm => write!(f, "in-vm"),
            TransportConfig::Remote { host, port } => write!(f, "remote://{}:{}", host, port),
        }
    }
}

/// Standard or distributed-transaction factory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactoryType {
    Standard,
    Xa,
}

/// Reconnect behaviour of connections created by a factory
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectPolicy {
    /// Reconnect attempts before giving up; `-1` retries forever, `0` never reconnects
    pub attempts: i32,
    /// Delay before the first retry
    pub retry_interval: Duration,
    /// Factor applied to the delay after each failed retry
    pub retry_interval_multiplier: f64,
    /// Upper bound for the delay between retries
    pub max_retry_interval: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            attempts: 0,
            retry_interval: Duration::from_millis(2000),
            retry_interval_multiplier: 1.0,
            max_retry_interval: Duration::from_millis(2000),
        }
    }
}

impl ReconnectPolicy {
    /// Delay before retry number `attempt` (zero-based), capped at `max_retry_interval`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self
            .retry_interval_multiplier
            .powi(i32::try_from(attempt).unwrap_or(i32::MAX));
        let millis = self.retry_interval.as_millis() as f64 * factor;
        let capped = millis.min(self.max_retry_interval.as_millis() as f64);
        Duration::from_millis(capped.max(0.0) as u64)
    }
}

/// A connection factory descriptor
#[derive(Debug)]
pub struct ConnectionFactory {
    factory_type: FactoryType,
    transport: TransportConfig,
    reconnect: ReconnectPolicy,
    closed: AtomicBool,
}

impl ConnectionFactory {
    /// Create a factory without high-availability topology
    pub fn without_ha(factory_type: FactoryType, transport: TransportConfig) -> Self {
        Self {
            factory_type,
            transport,
            reconnect: ReconnectPolicy::default(),
            closed: AtomicBool::new(false),
        }
    }

    /// Replace the reconnect policy
    pub fn with_reconnect(mut self, reconnect: ReconnectPolicy) -> Self {
        self.reconnect = reconnect;
        self
    }

    pub fn factory_type(&self) -> FactoryType {
        self.factory_type
    }

    pub fn is_xa(&self) -> bool {
        self.factory_type == FactoryType::Xa
    }

    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    pub fn reconnect(&self) -> &ReconnectPolicy {
        &self.reconnect
    }

    /// Close the factory
    ///
    /// Returns `true` if this call closed it, `false` if it was already closed.
    pub fn close(&self) -> bool {
        let newly_closed = !self.closed.swap(true, Ordering::SeqCst);
        if newly_closed {
            tracing::debug!("Closed {:?} connection factory ({})", self.factory_type, self.transport);
        }
        newly_closed
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconnect_delay_backoff() {
        let policy = ReconnectPolicy {
            attempts: -1,
            retry_interval: Duration::from_millis(100),
            retry_interval_multiplier: 2.0,
            max_retry_interval: Duration::from_millis(500),
        };

        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2), Duration::from_millis(400));
        assert_eq!(policy.delay_for(3), Duration::from_millis(500));
    }

    #[test]
    fn test_reconnect_delay_stays_capped_for_huge_attempts() {
        let policy = ReconnectPolicy {
            attempts: -1,
            retry_interval: Duration::from_millis(100),
            retry_interval_multiplier: 2.0,
            max_retry_interval: Duration::from_millis(500),
        };

        assert_eq!(policy.delay_for(1 << 31), Duration::from_millis(500));
        assert_eq!(policy.delay_for(u32::MAX), Duration::from_millis(500));
    }

    #[test]
    fn test_close_is_idempotent() {
        let factory = ConnectionFactory::without_ha(FactoryType::Standard, TransportConfig::InVm);
        assert!(!factory.is_closed());
        assert!(factory.close());
        assert!(!factory.close());
        assert!(factory.is_closed());
    }

    #[test]
    fn test_transport_display() {
        let remote = TransportConfig::Remote {
            host: "broker.local".to_string(),
            port: 5445,
        };
        assert_eq!(remote.to_string(), "remote://broker.local:5445");
        assert_eq!(TransportConfig::InVm.to_string(), "in-vm");
    }
}
