//! Store behavior suite: dispatch flow, subscriber notification, reducer
//! replacement, and preloaded-state diagnostics.

use recombine_core::{
    Action, AggregateState, ComposeError, Composer, ComposerConfig, CompositeState, ReducerEntry,
    ReducerMap,
};
use recombine_runtime::{Store, StoreError, create_store};
use recombine_testing::{
    reducers::{counter_reducer, identity_reducer, push_reducer},
    store_with_recording,
};
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

fn quiet_composer(map: ReducerMap) -> Composer {
    Composer::with_config(map, ComposerConfig::new().with_diagnostics(false))
}

fn identity_composer(keys: &[&str]) -> Composer {
    let map = keys.iter().fold(ReducerMap::new(), |map, key| {
        map.with(*key, ReducerEntry::Reducer(identity_reducer(json!({}))))
    });
    quiet_composer(map)
}

#[test]
fn drives_a_counter_and_stack_end_to_end() -> Result<(), StoreError> {
    let map = ReducerMap::new()
        .with("counter", ReducerEntry::Reducer(counter_reducer()))
        .with("stack", ReducerEntry::Reducer(push_reducer()));
    let mut store = Store::new(quiet_composer(map))?;

    store.dispatch(Action::named("increment"))?;
    assert_eq!(
        store.state(),
        &CompositeState::Slices(AggregateState::from_pairs([
            ("counter", json!(1)),
            ("stack", json!([])),
        ]))
    );

    let counter_before = store
        .state()
        .slices()
        .and_then(|s| s.get("counter"))
        .cloned();

    store.dispatch(Action::named("push").with_payload(json!("a")))?;
    assert_eq!(
        store.state(),
        &CompositeState::Slices(AggregateState::from_pairs([
            ("counter", json!(1)),
            ("stack", json!(["a"])),
        ]))
    );

    // Pushing onto the stack must not rebuild the counter slice.
    let counter_after = store
        .state()
        .slices()
        .and_then(|s| s.get("counter"))
        .cloned();
    match (counter_before, counter_after) {
        (Some(a), Some(b)) => assert!(Arc::ptr_eq(&a, &b)),
        _ => unreachable!("counter slice must exist before and after"),
    }
    Ok(())
}

#[test]
fn notifies_subscribers_only_when_the_reference_changes() -> Result<(), StoreError> {
    let map = ReducerMap::new().with("counter", ReducerEntry::Reducer(counter_reducer()));
    let mut store = Store::new(quiet_composer(map))?;

    let notifications = Rc::new(Cell::new(0));
    let seen = Rc::clone(&notifications);
    let id = store.subscribe(move |_| seen.set(seen.get() + 1));

    store.dispatch(Action::named("unrelated"))?;
    assert_eq!(notifications.get(), 0);

    store.dispatch(Action::named("increment"))?;
    assert_eq!(notifications.get(), 1);

    assert!(store.unsubscribe(id));
    store.dispatch(Action::named("increment"))?;
    assert_eq!(notifications.get(), 1);
    Ok(())
}

#[test]
fn replacing_with_added_reducers_yields_a_new_state() -> Result<(), StoreError> {
    let mut store = Store::new(identity_composer(&["foo"]))?;
    let before = store.state().clone();

    store.replace_reducer(identity_composer(&["foo", "bar"]))?;
    assert!(!store.state().ptr_eq(&before));

    let keys: Vec<String> = store
        .state()
        .slices()
        .map(|s| s.keys().cloned().collect())
        .unwrap_or_default();
    assert_eq!(keys, ["bar", "foo"]);
    Ok(())
}

#[test]
fn replacing_with_different_keys_yields_a_new_state() -> Result<(), StoreError> {
    let mut store = Store::new(identity_composer(&["foo"]))?;
    let before = store.state().clone();

    store.replace_reducer(identity_composer(&["bar"]))?;
    assert!(!store.state().ptr_eq(&before));

    let keys: Vec<String> = store
        .state()
        .slices()
        .map(|s| s.keys().cloned().collect())
        .unwrap_or_default();
    assert_eq!(keys, ["bar"]);
    Ok(())
}

#[test]
fn replacing_with_the_same_keys_keeps_the_reference() -> Result<(), StoreError> {
    let mut store = Store::new(identity_composer(&["foo", "bar"]))?;
    let before = store.state().clone();

    store.replace_reducer(identity_composer(&["foo", "bar"]))?;
    assert!(store.state().ptr_eq(&before));
    Ok(())
}

#[test]
fn replacing_with_removed_reducers_yields_a_new_state() -> Result<(), StoreError> {
    let mut store = Store::new(identity_composer(&["foo", "bar"]))?;
    let before = store.state().clone();

    store.replace_reducer(identity_composer(&["foo"]))?;
    assert!(!store.state().ptr_eq(&before));

    let keys: Vec<String> = store
        .state()
        .slices()
        .map(|s| s.keys().cloned().collect())
        .unwrap_or_default();
    assert_eq!(keys, ["foo"]);
    Ok(())
}

#[test]
fn preloaded_state_with_unknown_keys_is_diagnosed() -> Result<(), StoreError> {
    let map = ReducerMap::new()
        .with("foo", ReducerEntry::Reducer(identity_reducer(json!({}))))
        .with("bar", ReducerEntry::Reducer(identity_reducer(json!({}))));
    let preloaded = CompositeState::Slices(AggregateState::from_pairs([
        ("foo", json!({})),
        ("qux", json!(3)),
    ]));

    let (store, sink) = store_with_recording(map, Some(preloaded))?;
    let messages = sink.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("Unexpected key \"qux\""));
    assert!(messages[0].contains("preloaded state argument"));

    // The offending entry is dropped from the combined state.
    let keys: Vec<String> = store
        .state()
        .slices()
        .map(|s| s.keys().cloned().collect())
        .unwrap_or_default();
    assert_eq!(keys, ["bar", "foo"]);
    Ok(())
}

#[test]
fn preloaded_plain_object_values_seed_the_reducers() -> Result<(), StoreError> {
    let map = ReducerMap::new().with("counter", ReducerEntry::Reducer(counter_reducer()));
    let preloaded = CompositeState::from(json!({"counter": 5}));

    let (mut store, sink) = store_with_recording(map, Some(preloaded.clone()))?;
    // The object's keys match the reducer keys, so no diagnostic; the
    // untouched value comes back as the caller handed it in.
    assert!(sink.is_empty());
    assert!(store.state().ptr_eq(&preloaded));

    store.dispatch(Action::named("increment"))?;
    let counter = store
        .state()
        .slices()
        .and_then(|s| s.get("counter"))
        .and_then(|v| v.as_i64());
    assert_eq!(counter, Some(6));
    Ok(())
}

#[test]
fn scalar_preloaded_state_is_diagnosed_with_its_type() -> Result<(), StoreError> {
    let map = ReducerMap::new().with("foo", ReducerEntry::Reducer(identity_reducer(json!({}))));
    let (_store, sink) = store_with_recording(map, Some(CompositeState::from(json!(1))))?;

    let messages = sink.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("Unexpected type of \"number\""));
    Ok(())
}

#[test]
fn shape_broken_reducer_fails_store_construction() {
    let map = ReducerMap::new().with_reducer("broken", |state, _| state.cloned());
    let result = Store::new(Composer::new(map));
    assert!(matches!(
        result,
        Err(StoreError::Reducer(
            ComposeError::UndefinedInitialState { .. }
        ))
    ));
}

#[test]
fn failed_dispatch_leaves_the_state_untouched() -> Result<(), StoreError> {
    let map = ReducerMap::new().with_reducer("counter", |state, action| {
        match action.map(|a| a.kind.to_string()) {
            Some(kind) if kind == "whatever" => None,
            _ => Some(state.cloned().unwrap_or_else(|| Arc::new(json!(0)))),
        }
    });
    let mut store = Store::new(quiet_composer(map))?;
    let before = store.state().clone();

    let result = store.dispatch(Action::named("whatever"));
    assert!(matches!(
        result,
        Err(StoreError::Reducer(ComposeError::UndefinedResult { .. }))
    ));
    assert!(store.state().ptr_eq(&before));
    Ok(())
}

#[test]
fn create_store_matches_the_constructors() -> Result<(), StoreError> {
    let map = || ReducerMap::new().with("foo", ReducerEntry::Reducer(identity_reducer(json!(1))));

    let fresh = create_store(quiet_composer(map()), None)?;
    assert!(fresh.state().slices().is_some_and(|s| s.len() == 1));

    let seeded = CompositeState::Slices(AggregateState::from_pairs([("foo", json!(2))]));
    let preloaded = create_store(quiet_composer(map()), Some(seeded.clone()))?;
    assert!(preloaded.state().ptr_eq(&seeded));
    Ok(())
}
