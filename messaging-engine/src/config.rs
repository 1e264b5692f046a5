//! Broker configuration resources
//!
//! An engine is started from a named XML configuration resource. Callers
//! either supply their own `broker.xml` or fall back to the built-in
//! `default-broker.xml` shipped with this crate.
//!
//! ```xml
//! <configuration>
//!   <core>
//!     <name>embedded</name>
//!     <persistence-enabled>false</persistence-enabled>
//!     <max-destinations>256</max-destinations>
//!   </core>
//!   <jms>
//!     <queue name="orders" durable="true">
//!       <selector>region = 'EU'</selector>
//!       <entry name="java:/jms/queue/orders"/>
//!     </queue>
//!     <topic name="prices">
//!       <entry name="java:/jms/topic/prices"/>
//!     </topic>
//!   </jms>
//! </configuration>
//! ```
//!
//! `<queue>` and `<topic>` elements may appear in any order.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{EngineError, Result};

/// Name of the configuration resource shipped with this crate
pub const DEFAULT_RESOURCE_NAME: &str = "default-broker.xml";

const DEFAULT_BROKER_XML: &str = include_str!("../resources/default-broker.xml");

/// Where a configuration resource came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// A caller-supplied file found on the lookup path
    File(PathBuf),
    /// A resource compiled into this crate
    Builtin(&'static str),
}

impl fmt::Display for ConfigOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigOrigin::File(path) => write!(f, "{}", path.display()),
            ConfigOrigin::Builtin(name) => write!(f, "builtin:{}", name),
        }
    }
}

/// A configuration resource ready to be handed to an engine launcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigResource {
    origin: ConfigOrigin,
    contents: String,
}

impl ConfigResource {
    /// The built-in default resource
    pub fn builtin() -> Self {
        Self {
            origin: ConfigOrigin::Builtin(DEFAULT_RESOURCE_NAME),
            contents: DEFAULT_BROKER_XML.to_string(),
        }
    }

    /// Read a caller-supplied resource from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            origin: ConfigOrigin::File(path.to_path_buf()),
            contents,
        })
    }

    /// Wrap in-memory XML, attributed to `origin`
    pub fn from_xml(origin: ConfigOrigin, contents: impl Into<String>) -> Self {
        Self {
            origin,
            contents: contents.into(),
        }
    }

    pub fn origin(&self) -> &ConfigOrigin {
        &self.origin
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Parse the resource into an [`EngineConfig`]
    pub fn parse(&self) -> Result<EngineConfig> {
        EngineConfig::from_xml(&self.contents)
            .map_err(|e| EngineError::ConfigParse(format!("{} ({})", e, self.origin)))
    }
}

/// Parsed broker configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub core: CoreConfig,
    #[serde(default)]
    pub jms: JmsConfig,
}

/// Engine-wide settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoreConfig {
    #[serde(default = "default_engine_name")]
    pub name: String,

    /// Accepted for compatibility; the in-memory engine never persists
    #[serde(rename = "persistence-enabled", default)]
    pub persistence_enabled: bool,

    /// Upper bound on queues plus topics; unbounded when absent
    #[serde(rename = "max-destinations", default)]
    pub max_destinations: Option<usize>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            name: default_engine_name(),
            persistence_enabled: false,
            max_destinations: None,
        }
    }
}

fn default_engine_name() -> String {
    "embedded".to_string()
}

/// Destinations created when the engine starts
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JmsConfig {
    #[serde(rename = "queue", default)]
    pub queues: Vec<QueueDeclaration>,
    #[serde(rename = "topic", default)]
    pub topics: Vec<TopicDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QueueDeclaration {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@durable", default = "default_durable")]
    pub durable: bool,
    #[serde(default)]
    pub selector: Option<String>,
    #[serde(rename = "entry", default)]
    pub entries: Vec<BindingEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TopicDeclaration {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "entry", default)]
    pub entries: Vec<BindingEntry>,
}

/// A registry name a declared destination is bound under
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BindingEntry {
    #[serde(rename = "@name")]
    pub name: String,
}

fn default_durable() -> bool {
    true
}

impl EngineConfig {
    /// Parse broker configuration XML
    pub fn from_xml(xml: &str) -> std::result::Result<Self, quick_xml::DeError> {
        quick_xml::de::from_str(xml)
    }
}
