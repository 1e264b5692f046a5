//! Destination name encoding
//!
//! Pure functions mapping a short destination name to the names it is
//! published under, and back:
//!
//! | kind  | lookup name              | JMS name           |
//! |-------|--------------------------|--------------------|
//! | queue | `java:/jms/queue/orders` | `jms.queue.orders` |
//! | topic | `java:/jms/topic/prices` | `jms.topic.prices` |
//!
//! Decoding then re-encoding reproduces the input exactly.

use messaging_engine::DestinationKind;

/// Prefix shared by every destination lookup name
pub const LOOKUP_PREFIX: &str = "java:/jms/";

/// Prefix shared by every canonical JMS name
pub const JMS_PREFIX: &str = "jms.";

/// Name a destination is bound under in the registry
///
/// ```rust
/// use messaging_gateway::codec::lookup_name;
/// use messaging_gateway::DestinationKind;
///
/// assert_eq!(lookup_name("orders", DestinationKind::Queue), "java:/jms/queue/orders");
/// ```
pub fn lookup_name(name: &str, kind: DestinationKind) -> String {
    format!("{}{}/{}", LOOKUP_PREFIX, kind, name)
}

/// Canonical JMS name of a destination
///
/// ```rust
/// use messaging_gateway::codec::jms_name;
/// use messaging_gateway::DestinationKind;
///
/// assert_eq!(jms_name("prices", DestinationKind::Topic), "jms.topic.prices");
/// ```
pub fn jms_name(name: &str, kind: DestinationKind) -> String {
    format!("{}{}.{}", JMS_PREFIX, kind, name)
}

/// Split a lookup name into its short name and kind
pub fn decode_lookup_name(lookup: &str) -> Option<(String, DestinationKind)> {
    let rest = lookup.strip_prefix(LOOKUP_PREFIX)?;
    let (kind, name) = rest.split_once('/')?;
    Some((name.to_string(), kind.parse().ok()?))
}

/// Split a canonical JMS name into its short name and kind
pub fn decode_jms_name(jms: &str) -> Option<(String, DestinationKind)> {
    let rest = jms.strip_prefix(JMS_PREFIX)?;
    let (kind, name) = rest.split_once('.')?;
    Some((name.to_string(), kind.parse().ok()?))
}

/// Registry names to try, in order, when resolving a destination
///
/// The engine's own bindings come first, then the bare name, the JMS name
/// and the lookup name.
pub fn lookup_candidates(
    engine_bindings: Vec<String>,
    name: &str,
    kind: DestinationKind,
) -> Vec<String> {
    let mut candidates = engine_bindings;
    candidates.reserve(3);
    candidates.push(name.to_string());
    candidates.push(jms_name(name, kind));
    candidates.push(lookup_name(name, kind));
    candidates
}
