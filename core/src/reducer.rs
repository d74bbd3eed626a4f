//! Slice reducers, the reducer-map boundary, and the composite reducer trait.

use crate::action::Action;
use crate::error::ComposeError;
use crate::state::{CompositeState, SliceKey, SliceValue};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A slice reducer: pure function from the previous slice value and an action
/// to the next slice value.
///
/// The previous value is `None` when the slice has no state yet (first
/// dispatch, or a key newly added by a reducer swap); the reducer must return
/// its initial state in that case. Returning `None` from the reducer itself
/// is a contract violation the composer detects: to ignore an action, return
/// the previous value unchanged; to hold no value, return a null value.
pub type SliceReducer =
    Arc<dyn Fn(Option<&SliceValue>, Option<&Action>) -> Option<SliceValue> + Send + Sync>;

/// Wrap a closure as a [`SliceReducer`].
///
/// # Example
///
/// ```
/// use recombine_core::{slice_reducer, ActionKind};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let counter = slice_reducer(|state, action| {
///     let current = state.map_or(0, |v| v.as_i64().unwrap_or(0));
///     match action.map(|a| &a.kind) {
///         Some(ActionKind::Named(kind)) if kind == "increment" => {
///             Some(Arc::new(json!(current + 1)))
///         }
///         _ => Some(state.cloned().unwrap_or_else(|| Arc::new(json!(0)))),
///     }
/// });
/// ```
pub fn slice_reducer<F>(reducer: F) -> SliceReducer
where
    F: Fn(Option<&SliceValue>, Option<&Action>) -> Option<SliceValue> + Send + Sync + 'static,
{
    Arc::new(reducer)
}

/// An entry supplied to the composer under a slice key.
///
/// The boundary is deliberately duck typed: callers may hand in anything, and
/// construction-time sanitization retains only the callable entries.
#[derive(Clone)]
pub enum ReducerEntry {
    /// A callable slice reducer; retained.
    Reducer(SliceReducer),

    /// An explicitly absent entry; dropped with a diagnostic at construction.
    Missing,

    /// Any other non-callable value; dropped silently.
    Value(Value),
}

impl fmt::Debug for ReducerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reducer(_) => write!(f, "ReducerEntry::Reducer(<fn>)"),
            Self::Missing => write!(f, "ReducerEntry::Missing"),
            Self::Value(value) => f.debug_tuple("ReducerEntry::Value").field(value).finish(),
        }
    }
}

/// Ordered mapping from slice key to the entry supplied for that key.
///
/// Keys are unique; inserting an existing key replaces the entry in place.
/// Insertion order is preserved for deterministic iteration but carries no
/// semantic weight.
///
/// # Example
///
/// ```
/// use recombine_core::{slice_reducer, ReducerMap};
/// use std::sync::Arc;
/// use serde_json::json;
///
/// let map = ReducerMap::new()
///     .with_reducer("stack", |state, _action| {
///         Some(state.cloned().unwrap_or_else(|| Arc::new(json!([]))))
///     });
/// assert_eq!(map.len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ReducerMap {
    entries: Vec<(SliceKey, ReducerEntry)>,
}

impl ReducerMap {
    /// Create an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert an entry under `key`, replacing any existing entry for it.
    #[must_use]
    pub fn with(mut self, key: impl Into<SliceKey>, entry: ReducerEntry) -> Self {
        let key = key.into();
        if let Some(existing) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            existing.1 = entry;
        } else {
            self.entries.push((key, entry));
        }
        self
    }

    /// Insert a callable reducer under `key`.
    #[must_use]
    pub fn with_reducer<F>(self, key: impl Into<SliceKey>, reducer: F) -> Self
    where
        F: Fn(Option<&SliceValue>, Option<&Action>) -> Option<SliceValue> + Send + Sync + 'static,
    {
        self.with(key, ReducerEntry::Reducer(slice_reducer(reducer)))
    }

    /// Number of entries, callable or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> Vec<(SliceKey, ReducerEntry)> {
        self.entries
    }
}

/// A dispatch-compatible reducer, the seam between the composer and its
/// store collaborator.
///
/// `reduce` takes `&mut self` because the composer mutates its per-instance
/// warning cache on the same call path that reads it; the store's serialized
/// dispatch discipline (at most one in-flight dispatch) is what makes this
/// sound, and the signature enforces it.
pub trait Reducer {
    /// Apply `action` to `state`, producing the next state.
    ///
    /// Both arguments are untrusted at the boundary: state may be absent or
    /// of the wrong shape, and the action may be absent entirely.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError`] when a slice reducer violates its contract,
    /// either during a real dispatch or, deferred, from construction-time
    /// shape assertions.
    fn reduce(
        &mut self,
        state: Option<&CompositeState>,
        action: Option<&Action>,
    ) -> Result<CompositeState, ComposeError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inserting_an_existing_key_replaces_in_place() {
        let map = ReducerMap::new()
            .with("a", ReducerEntry::Missing)
            .with("b", ReducerEntry::Value(json!(true)))
            .with("a", ReducerEntry::Value(json!("replaced")));

        assert_eq!(map.len(), 2);
        let entries = map.into_entries();
        assert_eq!(entries[0].0, "a");
        assert!(matches!(entries[0].1, ReducerEntry::Value(_)));
        assert_eq!(entries[1].0, "b");
    }

    #[test]
    fn insertion_order_is_preserved() {
        let map = ReducerMap::new()
            .with("z", ReducerEntry::Missing)
            .with("a", ReducerEntry::Missing)
            .with("m", ReducerEntry::Missing);

        let keys: Vec<_> = map.into_entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }
}
