//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store against a simple model of live and dead entries.

use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

use crate::cache::CacheStore;
use crate::error::CacheError;

// == Test Configuration ==
/// Long enough that no entry expires while a case runs
const LIVE_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
/// Small key space so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-d]{1,2}"
}

/// TTL that is either already elapsed or effectively infinite
fn ttl_strategy() -> impl Strategy<Value = (Duration, bool)> {
    prop_oneof![Just((Duration::ZERO, false)), Just((LIVE_TTL, true))]
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: u32, ttl: (Duration, bool) },
    Add { key: String, value: u32, ttl: (Duration, bool) },
    Replace { key: String, value: u32, ttl: (Duration, bool) },
    Get { key: String },
    Pop { key: String },
    Remove { key: String },
    RemoveExpired,
    Clear,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (key_strategy(), any::<u32>(), ttl_strategy())
            .prop_map(|(key, value, ttl)| CacheOp::Set { key, value, ttl }),
        2 => (key_strategy(), any::<u32>(), ttl_strategy())
            .prop_map(|(key, value, ttl)| CacheOp::Add { key, value, ttl }),
        2 => (key_strategy(), any::<u32>(), ttl_strategy())
            .prop_map(|(key, value, ttl)| CacheOp::Replace { key, value, ttl }),
        3 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        2 => key_strategy().prop_map(|key| CacheOp::Pop { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Remove { key }),
        1 => Just(CacheOp::RemoveExpired),
        1 => Just(CacheOp::Clear),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // For any sequence of operations, the store agrees with a model where each
    // key maps to (value, live): reads only ever surface live values, touching a
    // dead entry removes it, and failed Add/Replace calls never write.
    #[test]
    fn prop_store_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut store = CacheStore::new();
        let mut model: HashMap<String, (u32, bool)> = HashMap::new();
        let mut reads: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value, ttl: (ttl, live) } => {
                    store.set(key.clone(), value, ttl);
                    model.insert(key, (value, live));
                }
                CacheOp::Add { key, value, ttl: (ttl, live) } => {
                    let result = store.add(key.clone(), value, ttl);
                    match model.get(&key).copied() {
                        Some((_, true)) => {
                            prop_assert_eq!(result, Err(CacheError::AlreadyExists(key)));
                        }
                        _ => {
                            prop_assert_eq!(result, Ok(()));
                            model.insert(key, (value, live));
                        }
                    }
                }
                CacheOp::Replace { key, value, ttl: (ttl, live) } => {
                    let result = store.replace(key.clone(), value, ttl);
                    match model.get(&key).copied() {
                        None => {
                            prop_assert_eq!(result, Err(CacheError::NotFound(key)));
                        }
                        Some((_, false)) => {
                            model.remove(&key);
                            prop_assert_eq!(result, Err(CacheError::Expired(key)));
                        }
                        Some((_, true)) => {
                            prop_assert_eq!(result, Ok(()));
                            model.insert(key, (value, live));
                        }
                    }
                }
                CacheOp::Get { key } => {
                    reads += 1;
                    let expected = match model.get(&key).copied() {
                        Some((value, true)) => Some(value),
                        Some((_, false)) => {
                            model.remove(&key);
                            None
                        }
                        None => None,
                    };
                    prop_assert_eq!(store.get(&key), expected);
                }
                CacheOp::Pop { key } => {
                    reads += 1;
                    let expected = model
                        .remove(&key)
                        .and_then(|(value, live)| live.then_some(value));
                    prop_assert_eq!(store.pop(&key), expected);
                    prop_assert!(!store.contains_key(&key));
                }
                CacheOp::Remove { key } => {
                    store.remove(&key);
                    model.remove(&key);
                }
                CacheOp::RemoveExpired => {
                    let dead = model.values().filter(|(_, live)| !live).count();
                    prop_assert_eq!(store.remove_expired(), dead);
                    model.retain(|_, (_, live)| *live);
                }
                CacheOp::Clear => {
                    store.clear();
                    model.clear();
                }
            }

            prop_assert_eq!(store.len(), model.len(), "Physical entry count mismatch");
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits + stats.misses, reads, "Every read is a hit or a miss");
        prop_assert_eq!(stats.total_entries, store.len());
    }

    // Storing a value with a live TTL and reading it back yields the same value
    // without consuming it.
    #[test]
    fn prop_live_value_readable(key in key_strategy(), value in any::<u32>()) {
        let mut store = CacheStore::new();

        store.set(key.clone(), value, LIVE_TTL);

        prop_assert_eq!(store.get(&key), Some(value));
        prop_assert_eq!(store.get(&key), Some(value));
        prop_assert_eq!(store.len(), 1);
    }
}
