//! # Recombine Core
//!
//! Composite state-transition builder: turns a mapping of named slice
//! reducers into one reducer over an aggregate state keyed by the same names.
//!
//! ## Core Concepts
//!
//! - **Slice**: the portion of aggregate state owned by one named reducer
//! - **Slice reducer**: pure function `(slice state, action) → slice state`
//! - **Composer**: the composite reducer, dispatch-compatible with a store
//! - **Reserved action**: framework-owned action kind (initialization,
//!   reducer replacement, construction-time probe) that application reducers
//!   must not special-case
//! - **Referential equality preservation**: a combine that changes nothing
//!   returns the exact state value it received, so downstream consumers can
//!   short-circuit on identity
//!
//! ## Construction-time checks
//!
//! Building a [`Composer`] sanitizes the reducer map (non-callable entries
//! are dropped, explicitly absent ones diagnosed) and probes every retained
//! reducer with synthetic actions. A reducer that cannot initialize, or that
//! only answers action types it explicitly enumerates, breaks the composer:
//! the violation is cached and returned from every subsequent combine.
//!
//! ## Example
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
//!             Some(ActionKind::Named(k)) if k == "increment" => {
//!                 Some(Arc::new(json!(current + 1)))
//!             }
//!             _ => Some(state.cloned().unwrap_or_else(|| Arc::new(json!(0)))),
//!         }
//!     })
//!     .with_reducer("stack", |state, action| {
//!         let mut items = state
//!             .and_then(|v| v.as_array().cloned())
//!             .unwrap_or_default();
//!         match action.map(|a| &a.kind) {
//!             Some(ActionKind::Named(k)) if k == "push" => {
//!                 items.push(action.map(|a| a.payload.clone()).unwrap_or(json!(null)));
//!                 Some(Arc::new(json!(items)))
//!             }
//!             _ => Some(state.cloned().unwrap_or_else(|| Arc::new(json!([])))),
//!         }
//!     });
//!
//! let mut composer = Composer::new(map);
//! let increment = Action::named("increment");
//! let s1 = composer.reduce(None, Some(&increment))?;
//! let push = Action::named("push").with_payload(json!("a"));
//! let s2 = composer.reduce(Some(&s1), Some(&push))?;
//!
//! let slices = s2.slices().ok_or("expected an aggregate")?;
//! assert_eq!(slices.get("stack").map(|v| v.as_ref()), Some(&json!(["a"])));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export commonly used types
pub use serde::{Deserialize, Serialize};
pub use serde_json::Value;

/// Actions and reserved action kinds.
pub mod action;

/// The composite state-transition builder and its subsystems.
pub mod composer;

/// Diagnostic sink abstraction and composer configuration.
pub mod diagnostics;

/// Fatal error types.
pub mod error;

/// Slice reducers, the reducer-map boundary, and the composite reducer trait.
pub mod reducer;

/// State values: slices, aggregates, and the dispatch-boundary shape.
pub mod state;

pub use action::{Action, ActionKind};
pub use composer::Composer;
pub use diagnostics::{ComposerConfig, DiagnosticSink, TracingSink};
pub use error::ComposeError;
pub use reducer::{Reducer, ReducerEntry, ReducerMap, SliceReducer, slice_reducer};
pub use state::{AggregateState, CompositeState, SliceKey, SliceValue};
