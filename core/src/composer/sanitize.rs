//! Construction-time filtering of the reducer map.

use crate::diagnostics::ComposerConfig;
use crate::reducer::{ReducerEntry, ReducerMap, SliceReducer};
use crate::state::SliceKey;

/// Filter `map` down to its callable entries, preserving insertion order.
///
/// Explicitly absent entries are diagnosed once through `config`; any other
/// non-callable entry is dropped silently. Sanitization never fails.
pub(super) fn sanitize(map: ReducerMap, config: &ComposerConfig) -> Vec<(SliceKey, SliceReducer)> {
    let mut retained = Vec::new();
    for (key, entry) in map.into_entries() {
        match entry {
            ReducerEntry::Reducer(reducer) => retained.push((key, reducer)),
            ReducerEntry::Missing => {
                config.warn(&format!("No reducer provided for key \"{key}\""));
            }
            ReducerEntry::Value(_) => {}
        }
    }
    retained
}
