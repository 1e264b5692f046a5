//! Queue and topic management through the messaging facade.


use messaging_engine::Engine;
use messaging_gateway::codec::{jms_name, lookup_name};
use messaging_gateway::{
    Bound, ConnectionFactory, DestinationKind, EmbeddedMessaging, FactoryType, GatewayError,
    Messaging, TransportConfig,
};
use mock_engine::{isolated_config, MockLauncher};
use rstest::rstest;
use std::sync::Arc;

fn started(name: &str) -> EmbeddedMessaging {
    let messaging = EmbeddedMessaging::new(isolated_config(name));
    messaging.start().unwrap();
    messaging
}

#[test]
fn test_create_lookup_destroy_queue() {
    let messaging = started("q1");

    let created = messaging.create_queue("q1", None, true).unwrap();
    let found = messaging.lookup_queue("q1").unwrap().expect("queue resolves");
    assert!(Arc::ptr_eq(&created, &found));

    messaging.destroy_queue("q1").unwrap();
    assert!(messaging.lookup_queue("q1").unwrap().is_none());
}

#[test]
fn test_lookup_absent_topic_is_none() {
    let messaging = started("absent");
    assert!(messaging.lookup_topic("absent").unwrap().is_none());
}

#[rstest]
#[case::queue(DestinationKind::Queue)]
#[case::topic(DestinationKind::Topic)]
fn test_duplicate_create_fails(#[case] kind: DestinationKind) {
    let messaging = started("dup");

    let second = match kind {
        DestinationKind::Queue => {
            messaging.create_queue("dup", None, true).unwrap();
            messaging.create_queue("dup", None, true).map(|_| ())
        }
        DestinationKind::Topic => {
            messaging.create_topic("dup").unwrap();
            messaging.create_topic("dup").map(|_| ())
        }
    };

    match second {
        Err(GatewayError::DestinationExists { kind: k, name }) => {
            assert_eq!(k, kind);
            assert_eq!(name, "dup");
        }
        other => panic!("expected DestinationExists, got {:?}", other),
    }
}

#[test]
fn test_create_topic_while_stopped_leaves_registry_alone() {
    let launcher = MockLauncher::new();
    let messaging = EmbeddedMessaging::builder()
        .config(isolated_config("stopped"))
        .launcher(Arc::new(launcher.clone()))
        .build();

    messaging.start().unwrap();
    messaging.stop().unwrap();
    let engine = launcher.last_engine().unwrap();
    let before = engine.registry().names();

    let result = messaging.create_topic("prices");

    assert!(matches!(result, Err(GatewayError::NotRunning)));
    assert_eq!(engine.registry().names(), before);
    assert!(engine.bindings_on_topic("prices").is_empty());
}

#[rstest]
#[case::bare("orders")]
#[case::lookup("java:/jms/queue/orders")]
fn test_queue_resolves_by_any_name(#[case] name: &str) {
    let messaging = started("names");
    let created = messaging.create_queue("orders", None, false).unwrap();

    let found = messaging.lookup_queue(name).unwrap().expect("queue resolves");
    assert!(Arc::ptr_eq(&created, &found));
}

#[test]
fn test_queue_bound_under_lookup_name() {
    let messaging = started("bound");
    messaging.create_queue("orders", None, true).unwrap();

    let naming = messaging.naming();
    assert!(naming.lookup(&lookup_name("orders", DestinationKind::Queue)).unwrap().is_some());
    assert!(naming.lookup(&jms_name("orders", DestinationKind::Queue)).unwrap().is_none());
}

#[test]
fn test_destroy_missing_queue() {
    let messaging = started("missing");
    let result = messaging.destroy_queue("ghost");
    assert!(matches!(
        result,
        Err(GatewayError::DestinationNotFound { kind: DestinationKind::Queue, .. })
    ));
}

#[test]
fn test_destroyed_topic_can_be_recreated() {
    let messaging = started("recreate");
    let first = messaging.create_topic("prices").unwrap();
    let _subscriber = first.attach_consumer();

    messaging.destroy_topic("prices").unwrap();
    let second = messaging.create_topic("prices").unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(second.consumer_count(), 0);
}

#[test]
fn test_operations_require_running() {
    let messaging = EmbeddedMessaging::new(isolated_config("idle"));

    assert!(matches!(messaging.create_queue("q", None, true), Err(GatewayError::NotRunning)));
    assert!(matches!(messaging.lookup_queue("q"), Err(GatewayError::NotRunning)));
    assert!(matches!(messaging.lookup_topic("t"), Err(GatewayError::NotRunning)));
    assert!(matches!(messaging.destroy_queue("q"), Err(GatewayError::NotRunning)));
    assert!(matches!(messaging.destroy_topic("t"), Err(GatewayError::NotRunning)));
}

#[test]
fn test_destinations_do_not_survive_restart() {
    let messaging = started("restart");
    messaging.create_queue("orders", None, true).unwrap();

    messaging.stop().unwrap();
    messaging.start().unwrap();

    assert!(messaging.lookup_queue("orders").unwrap().is_none());
    messaging.create_queue("orders", None, true).unwrap();
}

#[test]
fn test_concurrent_duplicate_create_has_one_winner() {
    let messaging = Arc::new(started("race"));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let messaging = Arc::clone(&messaging);
            std::thread::spawn(move || messaging.create_queue("contended", None, true))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let created = results.iter().filter(|r| r.is_ok()).count();
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(GatewayError::DestinationExists { .. })))
        .count();

    assert_eq!(created, 1);
    assert_eq!(rejected, 7);
}

#[test]
fn test_destroy_leaves_rebound_lookup_name_alone() {
    let messaging = started("rebound");
    messaging.create_queue("a", None, true).unwrap();

    let name = lookup_name("a", DestinationKind::Queue);
    let factory = Arc::new(ConnectionFactory::without_ha(FactoryType::Standard, TransportConfig::InVm));
    messaging.naming().unbind(&name).unwrap();
    messaging.naming().bind(&name, Bound::ConnectionFactory(Arc::clone(&factory))).unwrap();

    messaging.destroy_queue("a").unwrap();

    let survivor = messaging.naming().lookup_connection_factory(&name).unwrap();
    assert!(Arc::ptr_eq(&survivor.expect("factory still bound"), &factory));
    assert!(messaging.lookup_queue("a").unwrap().is_none());
}

#[test]
fn test_create_queue_over_foreign_binding_reports_name() {
    let messaging = started("occupied");
    let name = lookup_name("x", DestinationKind::Queue);
    let factory = Arc::new(ConnectionFactory::without_ha(FactoryType::Xa, TransportConfig::InVm));
    messaging.naming().bind(&name, Bound::ConnectionFactory(factory)).unwrap();

    match messaging.create_queue("x", None, true) {
        Err(GatewayError::AlreadyBound(bound)) => assert_eq!(bound, name),
        other => panic!("expected AlreadyBound, got {:?}", other),
    }

    // Nothing half-created: the name is free for a queue once unbound
    assert!(messaging.lookup_queue("x").unwrap().is_none());
    messaging.naming().unbind(&name).unwrap();
    messaging.create_queue("x", None, true).unwrap();
}
