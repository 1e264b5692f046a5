//! Property tests for destination name encoding.

use messaging_gateway::codec::{decode_jms_name, decode_lookup_name, jms_name, lookup_name};
use messaging_gateway::DestinationKind;
use proptest::prelude::*;

fn kind_strategy() -> impl Strategy<Value = DestinationKind> {
    prop_oneof![Just(DestinationKind::Queue), Just(DestinationKind::Topic)]
}

/// Destination names, including separators the decoders must keep intact
fn name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_./-]{1,32}"
}

proptest! {
    #[test]
    fn prop_lookup_name_round_trips(name in name_strategy(), kind in kind_strategy()) {
        let encoded = lookup_name(&name, kind);
        prop_assert_eq!(decode_lookup_name(&encoded), Some((name, kind)));
    }

    #[test]
    fn prop_jms_name_round_trips(name in name_strategy(), kind in kind_strategy()) {
        let encoded = jms_name(&name, kind);
        prop_assert_eq!(decode_jms_name(&encoded), Some((name, kind)));
    }

    #[test]
    fn prop_decoded_lookup_name_reencodes_exactly(name in name_strategy(), kind in kind_strategy()) {
        let original = lookup_name(&name, kind);
        let (decoded, decoded_kind) = decode_lookup_name(&original).unwrap();
        prop_assert_eq!(lookup_name(&decoded, decoded_kind), original);
    }

    #[test]
    fn prop_encoding_is_deterministic(name in name_strategy(), kind in kind_strategy()) {
        prop_assert_eq!(lookup_name(&name, kind), lookup_name(&name, kind));
        prop_assert_eq!(jms_name(&name, kind), jms_name(&name, kind));
    }

    #[test]
    fn prop_kinds_never_collide(name in name_strategy()) {
        prop_assert_ne!(
            lookup_name(&name, DestinationKind::Queue),
            lookup_name(&name, DestinationKind::Topic)
        );
    }
}

#[test]
fn test_orders_lookup_name_is_stable() {
    let first = lookup_name("orders", DestinationKind::Queue);
    let second = lookup_name("orders", DestinationKind::Queue);
    assert_eq!(first, "java:/jms/queue/orders");
    assert_eq!(first, second);
}
