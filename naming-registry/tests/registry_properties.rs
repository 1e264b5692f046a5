//! Property and concurrency tests for the naming registry
//!
//! The registry is checked against a plain `HashMap` model: after any
//! sequence of bind/unbind operations both hold the same bindings, and a bind
//! on a taken name never changes the existing binding.

use std::collections::HashMap;
use std::sync::{Arc, Barrier};
use std::thread;

use naming_registry::{NamingError, NamingRegistry};
use proptest::prelude::*;
use rstest::rstest;

#[derive(Debug, Clone)]
enum Op {
    Bind(String, u16),
    Unbind(String),
}

fn name_strategy() -> impl Strategy<Value = String> {
    // Small alphabet so that collisions are frequent
    "[a-d]{1,2}"
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (name_strategy(), any::<u16>()).prop_map(|(n, v)| Op::Bind(n, v)),
        name_strategy().prop_map(Op::Unbind),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Names stay unique and a taken name is never silently overwritten
    #[test]
    fn prop_registry_matches_model(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let registry = NamingRegistry::<u16>::new();
        let mut model: HashMap<String, u16> = HashMap::new();

        for op in ops {
            match op {
                Op::Bind(name, value) => {
                    let result = registry.bind(name.clone(), value);
                    if model.contains_key(&name) {
                        prop_assert_eq!(result, Err(NamingError::AlreadyBound(name.clone())));
                    } else {
                        prop_assert!(result.is_ok());
                        model.insert(name, value);
                    }
                }
                Op::Unbind(name) => {
                    prop_assert_eq!(registry.unbind(&name), model.remove(&name));
                }
            }
        }

        prop_assert_eq!(registry.len(), model.len());
        for (name, value) in &model {
            prop_assert_eq!(registry.lookup(name), Some(*value));
        }
    }
}

#[rstest]
#[case(vec!["a", "b", "c"], Some(1))]
#[case(vec!["x", "b", "c"], Some(2))]
#[case(vec!["x", "y", "c"], Some(3))]
#[case(vec!["x", "y", "z"], None)]
#[case(vec![], None)]
fn test_lookup_first_candidates(#[case] candidates: Vec<&str>, #[case] expected: Option<u8>) {
    let registry = NamingRegistry::<u8>::new();
    registry.bind("a", 1).unwrap();
    registry.bind("b", 2).unwrap();
    registry.bind("c", 3).unwrap();

    assert_eq!(registry.lookup_first(candidates, |v| Some(*v)), expected);
}

#[test]
fn test_concurrent_bind_single_winner() {
    let registry = Arc::new(NamingRegistry::<usize>::new());
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                registry.bind("java:/contended", i).is_ok()
            })
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|won| *won)
        .count();

    assert_eq!(winners, 1);
    assert_eq!(registry.len(), 1);
}
