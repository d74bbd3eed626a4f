//! The composite state-transition builder.
//!
//! [`Composer`] turns an ordered mapping of named slice reducers into a
//! single dispatch-compatible reducer over an aggregate state keyed by the
//! same names. Construction runs two one-time passes, sanitization and shape
//! assertion; every combine runs the shape warner and the hot-path loop.
//!
//! # Example
//!
//! ```
//! use recombine_core::{Action, ActionKind, Composer, Reducer, ReducerMap};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let map = ReducerMap::new()
//!     .with_reducer("counter", |state, action| {
//!         let current = state.map_or(0, |v| v.as_i64().unwrap_or(0));
//!         match action.map(|a| &a.kind) {
//!             Some(ActionKind::Named(kind)) if kind == "increment" => {
//!                 Some(Arc::new(json!(current + 1)))
//!             }
//!             _ => Some(state.cloned().unwrap_or_else(|| Arc::new(json!(0)))),
//!         }
//!     });
//!
//! let mut composer = Composer::new(map);
//! let increment = Action::named("increment");
//! let state = composer.reduce(None, Some(&increment))?;
//! let slices = state.slices().ok_or("expected an aggregate")?;
//! assert_eq!(slices.get("counter").map(|v| v.as_i64()), Some(Some(1)));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod assert;
mod sanitize;
mod warn;

use crate::action::Action;
use crate::diagnostics::ComposerConfig;
use crate::error::ComposeError;
use crate::reducer::{Reducer, ReducerMap, SliceReducer};
use crate::state::{AggregateState, CompositeState, SliceKey, SliceValue};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// A composite reducer over named slices of aggregate state.
///
/// Each instance is either shape-clean or shape-broken, decided exactly once
/// at construction: a shape-broken composer returns the same cached error
/// from every combine and never recovers.
///
/// Invocation is expected to be serialized (`reduce` takes `&mut self`); the
/// store collaborator's dispatch discipline guarantees at most one in-flight
/// combine.
pub struct Composer {
    reducers: Vec<(SliceKey, SliceReducer)>,
    shape_error: Option<ComposeError>,
    unexpected_keys: HashSet<SliceKey>,
    config: ComposerConfig,
}

impl Composer {
    /// Build a composer with the default configuration.
    #[must_use]
    pub fn new(map: ReducerMap) -> Self {
        Self::with_config(map, ComposerConfig::default())
    }

    /// Build a composer with an explicit configuration.
    ///
    /// Sanitization and shape assertion run here, once. A shape violation is
    /// not raised yet: it is cached and surfaces on the first combine, in the
    /// same control-flow context as real dispatch failures.
    ///
    /// # Panics
    ///
    /// A slice reducer that panics while being probed is not caught; the
    /// panic propagates to the caller.
    #[must_use]
    pub fn with_config(map: ReducerMap, config: ComposerConfig) -> Self {
        let reducers = sanitize::sanitize(map, &config);
        let probe_token = rand::random::<u64>();
        let shape_error = assert::assert_reducer_shape(&reducers, probe_token);

        Self {
            reducers,
            shape_error,
            unexpected_keys: HashSet::new(),
            config,
        }
    }

    /// Keys of the retained (callable) reducers, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &SliceKey> {
        self.reducers.iter().map(|(key, _)| key)
    }
}

impl Reducer for Composer {
    fn reduce(
        &mut self,
        state: Option<&CompositeState>,
        action: Option<&Action>,
    ) -> Result<CompositeState, ComposeError> {
        if let Some(error) = &self.shape_error {
            return Err(error.clone());
        }

        if self.config.diagnostics_enabled() {
            if let Some(message) = warn::unexpected_shape_message(
                state,
                &self.reducers,
                action,
                &mut self.unexpected_keys,
            ) {
                self.config.warn(&message);
            }
        }

        let previous_slices = state.and_then(CompositeState::slices);
        // Preloaded state may arrive as a bare JSON object rather than an
        // aggregate; its fields still seed the reducers.
        let foreign_slices: Option<BTreeMap<SliceKey, SliceValue>> = match state {
            Some(CompositeState::Other(value)) => value.as_object().map(|fields| {
                fields
                    .iter()
                    .map(|(key, value)| (key.clone(), Arc::new(value.clone())))
                    .collect()
            }),
            _ => None,
        };
        let mut next = BTreeMap::new();
        let mut changed = false;

        for (key, reducer) in &self.reducers {
            let previous = previous_slices
                .and_then(|slices| slices.get(key))
                .or_else(|| foreign_slices.as_ref().and_then(|fields| fields.get(key)));
            let Some(value) = reducer(previous, action) else {
                return Err(ComposeError::undefined_result(key, action));
            };
            changed = changed || previous.is_none_or(|prev| !Arc::ptr_eq(prev, &value));
            next.insert(key.clone(), value);
        }

        // Count heuristic: a reducer-map swap that adds or removes keys must
        // be observable even when every shared slice is reference-equal. A
        // swap that adds and removes in equal measure is only caught when a
        // slice reference changes; that coarseness is kept deliberately.
        changed = changed || next.len() != state.map_or(0, CompositeState::key_count);

        if changed {
            Ok(CompositeState::Slices(AggregateState::new(next)))
        } else {
            // Hand back the caller's own state so downstream consumers can
            // short-circuit on reference identity.
            Ok(state.map_or_else(
                || CompositeState::Slices(AggregateState::default()),
                Clone::clone,
            ))
        }
    }
}

impl fmt::Debug for Composer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composer")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .field("shape_error", &self.shape_error)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
