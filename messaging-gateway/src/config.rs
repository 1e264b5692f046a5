//! Configuration types for the messaging gateway
//!
//! `GatewayConfig` names a messaging instance and controls where the broker
//! configuration resource is looked up. `RemoteConnectionOptions` describes
//! a connection factory for out-of-process clients.

use std::path::PathBuf;
use std::time::Duration;

use messaging_engine::{ConfigResource, EngineError, ReconnectPolicy};

use crate::error::{GatewayError, Result};

/// Environment variable holding extra lookup directories (platform path-list syntax)
pub const CONFIG_PATH_ENV: &str = "GATEWAY_CONFIG_PATH";

/// Resource name a caller supplies to override the built-in configuration
pub const CALLER_RESOURCE_NAME: &str = "broker.xml";

/// Configuration for a messaging instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Name of the messaging instance, used in logs
    /// Default: "default"
    pub name: String,

    /// File name searched for on the lookup path
    /// Default: "broker.xml"
    pub resource_name: String,

    /// Directories searched, in order, for `resource_name`
    /// Default: the working directory
    pub lookup_path: Vec<PathBuf>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            resource_name: CALLER_RESOURCE_NAME.to_string(),
            lookup_path: vec![PathBuf::from(".")],
        }
    }
}

impl GatewayConfig {
    /// Create a config with the given instance name and default lookup
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create a config whose lookup path comes from the environment
    ///
    /// Searches the directories in `GATEWAY_CONFIG_PATH` first, then the
    /// user configuration directory (`<config dir>/embedded-messaging`),
    /// then the working directory.
    pub fn from_env(name: impl Into<String>) -> Self {
        let mut lookup_path: Vec<PathBuf> = std::env::var_os(CONFIG_PATH_ENV)
            .map(|paths| std::env::split_paths(&paths).collect())
            .unwrap_or_default();

        if let Some(config_dir) = dirs::config_dir() {
            lookup_path.push(config_dir.join("embedded-messaging"));
        }
        lookup_path.push(PathBuf::from("."));

        Self {
            name: name.into(),
            lookup_path,
            ..Default::default()
        }
    }

    /// Replace the lookup path
    pub fn with_lookup_path(mut self, lookup_path: Vec<PathBuf>) -> Self {
        self.lookup_path = lookup_path;
        self
    }

    /// Replace the resource name searched for
    pub fn with_resource_name(mut self, resource_name: impl Into<String>) -> Self {
        self.resource_name = resource_name.into();
        self
    }

    /// Validate the configuration and return any issues
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(GatewayError::Configuration(
                "Messaging name must not be empty".to_string(),
            ));
        }

        if self.resource_name.is_empty() {
            return Err(GatewayError::Configuration(
                "Resource name must not be empty".to_string(),
            ));
        }

        if self.resource_name.contains(|c: char| c == '/' || c == '\\') {
            return Err(GatewayError::Configuration(format!(
                "Resource name must be a bare file name: {}",
                self.resource_name
            )));
        }

        Ok(())
    }

    /// First lookup directory containing the resource, as a full path
    pub fn locate(&self) -> Option<PathBuf> {
        self.lookup_path
            .iter()
            .map(|dir| dir.join(&self.resource_name))
            .find(|candidate| candidate.is_file())
    }

    /// The caller-supplied resource if one is on the lookup path, else the built-in default
    pub fn resolve(&self) -> std::result::Result<ConfigResource, EngineError> {
        match self.locate() {
            Some(path) => {
                tracing::debug!("Using broker configuration {}", path.display());
                ConfigResource::from_file(path)
            }
            None => {
                tracing::debug!(
                    "No {} on lookup path, using built-in configuration",
                    self.resource_name
                );
                Ok(ConfigResource::builtin())
            }
        }
    }
}

/// Options for a remote connection factory
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteConnectionOptions {
    /// Broker host
    /// Default: "localhost"
    pub host: String,

    /// Broker port
    /// Default: 5445
    pub port: u16,

    /// Produce XA (two-phase commit) connections
    /// Default: false
    pub xa: bool,

    /// Reconnect behaviour
    /// Default: no reconnects, 2s interval, multiplier 1.0, 2s max interval
    pub reconnect: ReconnectPolicy,
}

impl Default for RemoteConnectionOptions {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5445,
            xa: false,
            reconnect: ReconnectPolicy::default(),
        }
    }
}

impl RemoteConnectionOptions {
    /// Options for `host:port` with default reconnect behaviour
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Request an XA factory
    pub fn xa(mut self) -> Self {
        self.xa = true;
        self
    }

    /// Replace the reconnect policy
    pub fn with_reconnect(mut self, reconnect: ReconnectPolicy) -> Self {
        self.reconnect = reconnect;
        self
    }

    /// Reconnect forever with exponential backoff between `initial` and `max`
    pub fn reconnect_forever(mut self, initial: Duration, max: Duration) -> Self {
        self.reconnect = ReconnectPolicy {
            attempts: -1,
            retry_interval: initial,
            retry_interval_multiplier: 2.0,
            max_retry_interval: max,
        };
        self
    }

    /// Validate the options and return any issues
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(GatewayError::Configuration(
                "Remote host must not be empty".to_string(),
            ));
        }

        if self.port == 0 {
            return Err(GatewayError::Configuration(
                "Remote port must be greater than 0".to_string(),
            ));
        }

        if self.reconnect.attempts < -1 {
            return Err(GatewayError::Configuration(format!(
                "Reconnect attempts must be -1 or greater, got {}",
                self.reconnect.attempts
            )));
        }

        let multiplier = self.reconnect.retry_interval_multiplier;
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(GatewayError::Configuration(format!(
                "Retry interval multiplier must be at least 1.0, got {}",
                multiplier
            )));
        }

        if self.reconnect.max_retry_interval < self.reconnect.retry_interval {
            return Err(GatewayError::Configuration(
                "Max retry interval must not be less than the retry interval".to_string(),
            ));
        }

        Ok(())
    }
}
