//! Property-based tests for attribute bag semantics.
//!
//! - Last write wins for every key
//! - Merge: entries of the right-hand bag override, others survive
//! - Equality ignores insertion order
//! - Wire maps round-trip, minus custom keys that spell a reserved name,
//!   which never decode into fixed keys

use klaviyo_types::{AttributeBag, AttributeKey, EventKey, ProfileKey, Value};
use proptest::prelude::*;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn profile_key_strategy() -> impl Strategy<Value = ProfileKey> {
    prop_oneof![
        prop::sample::select(ProfileKey::fixed().to_vec()),
        "[a-z]{1,8}_attr".prop_map(ProfileKey::Custom),
        prop::sample::select(ProfileKey::fixed().to_vec())
            .prop_map(|fixed| ProfileKey::Custom(fixed.name().to_owned())),
    ]
}

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,20}".prop_map(Value::from),
    ]
}

fn entries_strategy() -> impl Strategy<Value = Vec<(ProfileKey, Value)>> {
    prop::collection::vec((profile_key_strategy(), value_strategy()), 0..24)
}

proptest! {
    #[test]
    fn last_write_wins(entries in entries_strategy()) {
        let bag: AttributeBag<ProfileKey> = entries.iter().cloned().collect();
        for (key, _) in &entries {
            let last = entries.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v);
            prop_assert_eq!(bag.get(key), last);
        }
    }

    #[test]
    fn merge_prefers_other(left in entries_strategy(), right in entries_strategy()) {
        let mut merged: AttributeBag<ProfileKey> = left.iter().cloned().collect();
        let other: AttributeBag<ProfileKey> = right.iter().cloned().collect();
        let original = merged.clone();
        merged.merge(&other);

        for (key, value) in other.iter() {
            prop_assert_eq!(merged.get(key), Some(value));
        }
        for (key, value) in original.iter() {
            if !other.contains_key(key) {
                prop_assert_eq!(merged.get(key), Some(value));
            }
        }
    }

    #[test]
    fn equality_ignores_order(entries in entries_strategy()) {
        let forward: AttributeBag<ProfileKey> = entries.iter().cloned().collect();
        let deduped: Vec<_> = forward.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        let backward: AttributeBag<ProfileKey> = deduped.into_iter().rev().collect();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn wire_roundtrip(entries in entries_strategy()) {
        let bag: AttributeBag<ProfileKey> = entries.into_iter().collect();
        let decoded = AttributeBag::<ProfileKey>::from_wire_map(&bag.to_wire_map());
        let expected: AttributeBag<ProfileKey> = bag
            .iter()
            .filter(|(key, _)| !key.shadows_fixed())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        prop_assert_eq!(decoded, expected);
    }

    #[test]
    fn remove_then_get_is_absent(entries in entries_strategy(), name in "[a-z]{1,8}") {
        let mut bag: AttributeBag<EventKey> = entries
            .into_iter()
            .map(|(k, v)| (EventKey::custom(k.name()), v))
            .collect();
        let key = EventKey::custom(name);
        bag.set(key.clone(), 1);
        let before = bag.len();
        bag.remove(&key);
        prop_assert!(!bag.contains_key(&key));
        prop_assert_eq!(bag.len(), before - 1);
    }
}
