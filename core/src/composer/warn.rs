//! Per-dispatch structural-shape diagnostics.
//!
//! Compares the incoming state's keys against the retained reducer keys and
//! produces at most one message per combine. Each offending key is reported
//! once per composer instance, ever: the cache grows monotonically and never
//! resets, regardless of future state shapes.

use crate::action::{Action, ActionKind};
use crate::reducer::SliceReducer;
use crate::state::{CompositeState, SliceKey};
use serde_json::Value;
use std::collections::HashSet;

/// Produce the shape-mismatch message for one combine invocation, if any.
///
/// `seen` is the per-composer unexpected-key cache; keys added here are never
/// reported again. The reserved replacement action suppresses the message (a
/// reducer swap legitimately changes the expected key set) but still feeds
/// the cache.
pub(super) fn unexpected_shape_message(
    state: Option<&CompositeState>,
    reducers: &[(SliceKey, SliceReducer)],
    action: Option<&Action>,
    seen: &mut HashSet<SliceKey>,
) -> Option<String> {
    if reducers.is_empty() {
        return Some(
            "Store does not have a valid reducer. Make sure the argument passed \
             to the composer has a value under every key."
                .to_owned(),
        );
    }

    let source = if matches!(action, Some(a) if a.kind == ActionKind::Init) {
        "the preloaded state argument passed to the store"
    } else {
        "the previous state received by the reducer"
    };
    let expected = quote_join(reducers.iter().map(|(key, _)| key.as_str()));

    // Absent state behaves as an empty mapping: every reducer will be asked
    // for its initial slice, which is the normal first dispatch.
    let state = state?;
    let state_keys: Vec<&SliceKey> = match state {
        CompositeState::Slices(aggregate) => aggregate.keys().collect(),
        CompositeState::Other(value) => match value.as_ref() {
            Value::Object(map) => map.keys().collect(),
            _ => {
                return Some(format!(
                    "Unexpected type of \"{}\" found in {source}. Expected the \
                     state to be a mapping with the following keys: {expected}",
                    state.kind_name(),
                ));
            }
        },
    };

    let unexpected: Vec<&SliceKey> = state_keys
        .into_iter()
        .filter(|key| !reducers.iter().any(|(known, _)| known == *key))
        .filter(|key| !seen.contains(*key))
        .collect();
    for key in &unexpected {
        seen.insert((*key).clone());
    }

    if matches!(action, Some(a) if a.kind == ActionKind::Replace) {
        return None;
    }
    if unexpected.is_empty() {
        return None;
    }

    let noun = if unexpected.len() > 1 { "keys" } else { "key" };
    let listed = quote_join(unexpected.iter().map(|key| key.as_str()));
    Some(format!(
        "Unexpected {noun} {listed} found in {source}. Expected to find one of \
         the known reducer keys instead: {expected}. Unexpected keys will be \
         ignored.",
    ))
}

fn quote_join<'a>(keys: impl Iterator<Item = &'a str>) -> String {
    keys.map(|key| format!("\"{key}\""))
        .collect::<Vec<_>>()
        .join(", ")
}
