//! # Recombine Testing
//!
//! Testing utilities and helpers for the recombine architecture.
//!
//! This crate provides:
//! - A recording diagnostic sink for asserting on composer warnings
//! - Stock slice reducers (counter, stack, identity) for building fixtures
//! - A fluent Given/When/Then harness for composer tests
//!
//! ## Example
//!
//! ```
//! use recombine_testing::{ComposerTest, reducers::counter_reducer};
//! use recombine_core::{Action, ReducerEntry, ReducerMap};
//! use serde_json::json;
//!
//! ComposerTest::new(ReducerMap::new().with("counter", ReducerEntry::Reducer(counter_reducer())))
//!     .when_action(Action::named("increment"))
//!     .then_state(|state| {
//!         let slices = state.slices().expect("aggregate state");
//!         assert_eq!(slices.get("counter").map(|v| v.as_ref()), Some(&json!(1)));
//!     })
//!     .run();
//! ```

/// Recording sink for composer diagnostics.
pub mod sinks {
    use recombine_core::DiagnosticSink;
    use std::sync::{Arc, Mutex, PoisonError};

    /// A diagnostic sink that records every message it receives.
    ///
    /// Clones share the same backing buffer, so a test can hand one clone to
    /// a [`ComposerConfig`](recombine_core::ComposerConfig) and keep another
    /// for assertions.
    #[derive(Clone, Debug, Default)]
    pub struct RecordingSink {
        messages: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingSink {
        /// Create an empty recording sink.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Every message received so far, in order.
        #[must_use]
        pub fn messages(&self) -> Vec<String> {
            self.messages
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Number of messages received so far.
        #[must_use]
        pub fn count(&self) -> usize {
            self.messages
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }

        /// Whether no message has been received.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.count() == 0
        }
    }

    impl DiagnosticSink for RecordingSink {
        fn warn(&self, message: &str) {
            self.messages
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(message.to_owned());
        }
    }
}

/// Stock slice reducers for fixtures.
pub mod reducers {
    use recombine_core::{ActionKind, SliceReducer, Value, slice_reducer};
    use serde_json::json;
    use std::sync::Arc;

    /// A counter slice: starts at 0, increments on `"increment"`, decrements
    /// on `"decrement"`, and returns its previous value (same reference) for
    /// anything else.
    #[must_use]
    pub fn counter_reducer() -> SliceReducer {
        slice_reducer(|state, action| {
            let current = state.map_or(0, |value| value.as_i64().unwrap_or(0));
            match action.map(|a| &a.kind) {
                Some(ActionKind::Named(kind)) if kind == "increment" => {
                    Some(Arc::new(json!(current + 1)))
                }
                Some(ActionKind::Named(kind)) if kind == "decrement" => {
                    Some(Arc::new(json!(current - 1)))
                }
                _ => Some(state.cloned().unwrap_or_else(|| Arc::new(json!(0)))),
            }
        })
    }

    /// A stack slice: starts empty and appends the action payload on
    /// `"push"`; everything else returns the previous value unchanged.
    #[must_use]
    pub fn push_reducer() -> SliceReducer {
        slice_reducer(|state, action| {
            match action.map(|a| &a.kind) {
                Some(ActionKind::Named(kind)) if kind == "push" => {
                    let mut items = state
                        .and_then(|value| value.as_array().cloned())
                        .unwrap_or_default();
                    items.push(action.map_or(Value::Null, |a| a.payload.clone()));
                    Some(Arc::new(json!(items)))
                }
                _ => Some(state.cloned().unwrap_or_else(|| Arc::new(json!([])))),
            }
        })
    }

    /// An identity slice: returns its previous value unchanged (same
    /// reference), falling back to `initial` when no state exists yet.
    #[must_use]
    pub fn identity_reducer(initial: Value) -> SliceReducer {
        slice_reducer(move |state, _action| {
            Some(
                state
                    .cloned()
                    .unwrap_or_else(|| Arc::new(initial.clone())),
            )
        })
    }
}

/// Fluent Given/When/Then harness for composer tests.
pub mod composer_test {
    use crate::sinks::RecordingSink;
    use recombine_core::{
        Action, ComposeError, Composer, ComposerConfig, CompositeState, DiagnosticSink, Reducer,
        ReducerMap,
    };
    use std::sync::Arc;

    /// Type alias for state assertion functions.
    type StateAssertion = Box<dyn FnOnce(&CompositeState)>;

    /// Type alias for error assertion functions.
    type ErrorAssertion = Box<dyn FnOnce(&ComposeError)>;

    /// Fluent API for testing composers with Given/When/Then syntax.
    ///
    /// # Example
    ///
    /// ```
    /// use recombine_testing::{ComposerTest, reducers::identity_reducer};
    /// use recombine_core::{Action, ReducerEntry, ReducerMap};
    /// use serde_json::json;
    ///
    /// ComposerTest::new(
    ///     ReducerMap::new().with("child", ReducerEntry::Reducer(identity_reducer(json!({})))),
    /// )
    /// .when_action(Action::named("unrelated"))
    /// .then_state(|state| assert!(state.slices().is_some()))
    /// .run();
    /// ```
    pub struct ComposerTest {
        map: ReducerMap,
        sink: RecordingSink,
        diagnostics: bool,
        state: Option<CompositeState>,
        action: Option<Action>,
        state_assertions: Vec<StateAssertion>,
        error_assertions: Vec<ErrorAssertion>,
        warning_assertions: Vec<Box<dyn FnOnce(&[String])>>,
    }

    impl ComposerTest {
        /// Create a test around the given reducer map.
        #[must_use]
        pub fn new(map: ReducerMap) -> Self {
            Self {
                map,
                sink: RecordingSink::new(),
                diagnostics: true,
                state: None,
                action: None,
                state_assertions: Vec::new(),
                error_assertions: Vec::new(),
                warning_assertions: Vec::new(),
            }
        }

        /// Set the incoming state (Given). Defaults to no state at all.
        #[must_use]
        pub fn given_state(mut self, state: CompositeState) -> Self {
            self.state = Some(state);
            self
        }

        /// Set the dispatched action (When). Defaults to an absent action.
        #[must_use]
        pub fn when_action(mut self, action: Action) -> Self {
            self.action = Some(action);
            self
        }

        /// Disable diagnostics for this run.
        #[must_use]
        pub const fn without_diagnostics(mut self) -> Self {
            self.diagnostics = false;
            self
        }

        /// Add an assertion about the resulting state (Then).
        #[must_use]
        pub fn then_state<F>(mut self, assertion: F) -> Self
        where
            F: FnOnce(&CompositeState) + 'static,
        {
            self.state_assertions.push(Box::new(assertion));
            self
        }

        /// Add an assertion about the resulting error (Then).
        #[must_use]
        pub fn then_error<F>(mut self, assertion: F) -> Self
        where
            F: FnOnce(&ComposeError) + 'static,
        {
            self.error_assertions.push(Box::new(assertion));
            self
        }

        /// Add an assertion about the recorded diagnostics (Then).
        #[must_use]
        pub fn then_warnings<F>(mut self, assertion: F) -> Self
        where
            F: FnOnce(&[String]) + 'static,
        {
            self.warning_assertions.push(Box::new(assertion));
            self
        }

        /// Run the test and execute all assertions.
        ///
        /// # Panics
        ///
        /// Panics if the combine outcome does not match the registered
        /// assertions (an error where state assertions were given, or vice
        /// versa), or if any assertion fails.
        #[allow(clippy::panic)] // Test code can panic
        pub fn run(self) {
            let config = ComposerConfig::new()
                .with_diagnostics(self.diagnostics)
                .with_sink(Arc::new(self.sink.clone()) as Arc<dyn DiagnosticSink>);
            let mut composer = Composer::with_config(self.map, config);

            let result = composer.reduce(self.state.as_ref(), self.action.as_ref());

            match result {
                Ok(state) => {
                    assert!(
                        self.error_assertions.is_empty(),
                        "expected the combine to fail, but it produced {state:?}"
                    );
                    for assertion in self.state_assertions {
                        assertion(&state);
                    }
                }
                Err(error) => {
                    assert!(
                        self.state_assertions.is_empty(),
                        "expected the combine to succeed, but it failed with {error}"
                    );
                    for assertion in self.error_assertions {
                        assertion(&error);
                    }
                }
            }

            let warnings = self.sink.messages();
            for assertion in self.warning_assertions {
                assertion(&warnings);
            }
        }
    }
}

pub use composer_test::ComposerTest;
pub use sinks::RecordingSink;

use recombine_core::{Composer, ComposerConfig, CompositeState, DiagnosticSink, ReducerMap};
use recombine_runtime::{Store, StoreError};
use std::sync::Arc;

/// Build a store whose composer reports diagnostics into a fresh
/// [`RecordingSink`], returned alongside it.
///
/// # Errors
///
/// Returns [`StoreError`] when the composer is shape-broken; see
/// [`Store::new`].
pub fn store_with_recording(
    map: ReducerMap,
    preloaded: Option<CompositeState>,
) -> Result<(Store<Composer>, RecordingSink), StoreError> {
    let sink = RecordingSink::new();
    let config =
        ComposerConfig::new().with_sink(Arc::new(sink.clone()) as Arc<dyn DiagnosticSink>);
    let composer = Composer::with_config(map, config);
    let store = match preloaded {
        Some(state) => Store::with_preloaded_state(composer, state)?,
        None => Store::new(composer)?,
    };
    Ok((store, sink))
}

/// Initialize a compact tracing subscriber for tests that exercise the
/// default [`TracingSink`](recombine_core::TracingSink). Safe to call more
/// than once; only the first call installs a subscriber.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
