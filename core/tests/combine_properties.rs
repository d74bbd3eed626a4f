//! Property tests for the combine hot path.

use proptest::prelude::*;
use recombine_core::{
    Action, Composer, ComposerConfig, CompositeState, Reducer, ReducerEntry, ReducerMap,
};
use serde_json::{Value, json};
use std::collections::BTreeSet;
use std::sync::Arc;

fn identity_map(keys: &BTreeSet<String>) -> ReducerMap {
    keys.iter().fold(ReducerMap::new(), |map, key| {
        map.with_reducer(key.clone(), |state, _| {
            Some(state.cloned().unwrap_or_else(|| Arc::new(json!({}))))
        })
    })
}

fn quiet() -> ComposerConfig {
    ComposerConfig::new().with_diagnostics(false)
}

proptest! {
    /// Composers built purely from identity reducers never produce a new
    /// state reference, whatever is dispatched after initialization.
    #[test]
    fn identity_composers_preserve_references(
        keys in prop::collection::btree_set("[a-z]{1,8}", 1..6),
        action_names in prop::collection::vec("[a-zA-Z_]{1,12}", 1..8),
    ) {
        let mut composer = Composer::with_config(identity_map(&keys), quiet());
        let init = Action::init();
        let initial = composer.reduce(None, Some(&init)).map_err(|e| {
            TestCaseError::fail(e.to_string())
        })?;

        let mut current = initial.clone();
        for name in action_names {
            let action = Action::named(name);
            let next = composer.reduce(Some(&current), Some(&action)).map_err(|e| {
                TestCaseError::fail(e.to_string())
            })?;
            prop_assert!(next.ptr_eq(&current));
            current = next;
        }
        prop_assert!(current.ptr_eq(&initial));
    }

    /// Initialization always yields an aggregate whose key set equals the
    /// callable reducers' keys exactly, regardless of non-callable entries
    /// mixed into the map.
    #[test]
    fn init_state_keys_equal_callable_keys(
        callable in prop::collection::btree_set("[a-m]{1,6}", 1..5),
        junk in prop::collection::btree_set("[n-z]{1,6}", 0..4),
    ) {
        let mut map = identity_map(&callable);
        for key in &junk {
            map = map.with(key.clone(), ReducerEntry::Value(Value::Bool(true)));
        }

        let mut composer = Composer::with_config(map, quiet());
        let init = Action::init();
        let state = composer.reduce(None, Some(&init)).map_err(|e| {
            TestCaseError::fail(e.to_string())
        })?;

        let state_keys: BTreeSet<String> = match &state {
            CompositeState::Slices(slices) => slices.keys().cloned().collect(),
            CompositeState::Other(_) => BTreeSet::new(),
        };
        prop_assert_eq!(state_keys, callable);
    }

    /// Dispatching against a state with a changed key count always yields a
    /// new reference, even when every shared slice is untouched.
    #[test]
    fn key_count_changes_always_produce_new_state(
        keys in prop::collection::btree_set("[a-z]{1,8}", 2..6),
    ) {
        let mut full = Composer::with_config(identity_map(&keys), quiet());
        let init = Action::init();
        let initial = full.reduce(None, Some(&init)).map_err(|e| {
            TestCaseError::fail(e.to_string())
        })?;

        // Rebuild with one key removed, simulating a reducer swap.
        let mut fewer_keys = keys.clone();
        let removed = fewer_keys.iter().next().cloned();
        if let Some(removed) = removed {
            fewer_keys.remove(&removed);
        }
        let mut trimmed = Composer::with_config(identity_map(&fewer_keys), quiet());

        let replace = Action::replace();
        let next = trimmed.reduce(Some(&initial), Some(&replace)).map_err(|e| {
            TestCaseError::fail(e.to_string())
        })?;
        prop_assert!(!next.ptr_eq(&initial));
    }
}
