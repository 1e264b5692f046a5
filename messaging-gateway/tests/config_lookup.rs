//! Broker configuration lookup from caller-supplied files.

use messaging_engine::{Engine, EngineError};
use messaging_gateway::{
    BrokerLifecycle, ConfigOrigin, EmbeddedMessaging, GatewayConfig, GatewayError, Messaging,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CALLER_BROKER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<configuration>
  <core>
    <name>from-file</name>
  </core>
  <jms>
    <topic name="announcements"/>
    <queue name="preloaded">
      <entry name="alias/preloaded"/>
    </queue>
  </jms>
</configuration>
"#;

fn write_broker_xml(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("broker.xml");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_caller_resource_preferred_over_builtin() {
    let dir = TempDir::new().unwrap();
    let path = write_broker_xml(dir.path(), CALLER_BROKER_XML);

    let config = GatewayConfig::new("file")
        .with_lookup_path(vec![PathBuf::from("/nonexistent/gateway-config"), dir.path().to_path_buf()]);
    assert_eq!(config.locate(), Some(path.clone()));

    let lifecycle = BrokerLifecycle::new(config);
    lifecycle.start().unwrap();

    assert_eq!(lifecycle.config_origin(), Some(ConfigOrigin::File(path)));
    assert_eq!(lifecycle.engine().unwrap().name(), "from-file");

    lifecycle.stop().unwrap();
}

#[test]
fn test_first_directory_on_lookup_path_wins() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let expected = write_broker_xml(first.path(), CALLER_BROKER_XML);
    write_broker_xml(second.path(), "<configuration/>");

    let config = GatewayConfig::new("order")
        .with_lookup_path(vec![first.path().to_path_buf(), second.path().to_path_buf()]);

    assert_eq!(config.locate(), Some(expected));
}

#[test]
fn test_declared_destinations_resolve_through_engine_bindings() {
    let dir = TempDir::new().unwrap();
    write_broker_xml(dir.path(), CALLER_BROKER_XML);

    let messaging = EmbeddedMessaging::new(
        GatewayConfig::new("declared").with_lookup_path(vec![dir.path().to_path_buf()]),
    );
    messaging.start().unwrap();

    let queue = messaging.lookup_queue("preloaded").unwrap().expect("declared queue resolves");
    assert_eq!(queue.name(), "preloaded");
    assert!(queue.is_durable());

    // Declared without entries: bound under its bare name
    assert!(messaging.lookup_topic("announcements").unwrap().is_some());

    let duplicate = messaging.create_queue("preloaded", None, true);
    assert!(matches!(duplicate, Err(GatewayError::DestinationExists { .. })));

    messaging.stop().unwrap();
}

#[test]
fn test_malformed_resource_fails_start() {
    let dir = TempDir::new().unwrap();
    write_broker_xml(dir.path(), "<configuration><core><max-destinations>many");

    let lifecycle = BrokerLifecycle::new(
        GatewayConfig::new("broken").with_lookup_path(vec![dir.path().to_path_buf()]),
    );

    match lifecycle.start() {
        Err(GatewayError::BrokerStart(EngineError::ConfigParse(message))) => {
            assert!(message.contains("broker.xml"));
        }
        other => panic!("expected ConfigParse, got {:?}", other),
    }
    assert!(!lifecycle.is_running());
}

#[test]
fn test_custom_resource_name() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("staging.xml");
    std::fs::write(&path, CALLER_BROKER_XML).unwrap();
    write_broker_xml(dir.path(), "<configuration/>");

    let config = GatewayConfig::new("staging")
        .with_lookup_path(vec![dir.path().to_path_buf()])
        .with_resource_name("staging.xml");

    let resource = config.resolve().unwrap();
    assert_eq!(resource.origin(), &ConfigOrigin::File(path));
    assert_eq!(resource.parse().unwrap().core.name, "from-file");
}
