//! # Recombine Runtime
//!
//! Synchronous store runtime driving a composed reducer.
//!
//! The store owns the current state and serializes dispatch: every method
//! takes `&mut self`, so at most one combine is in flight at a time, which is
//! the call discipline the composer's warning cache relies on.
//!
//! ## Core Components
//!
//! - **Store**: holds current state, dispatches actions, notifies subscribers
//! - **Reducer replacement**: swaps the active reducer and immediately
//!   dispatches the reserved replacement action so the new reducer can
//!   establish its own shape
//!
//! ## Example
//!
//! ```
//! use recombine_core::{Action, Composer, ReducerMap};
//! use recombine_runtime::Store;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let map = ReducerMap::new().with_reducer("counter", |state, _action| {
//!     Some(state.cloned().unwrap_or_else(|| Arc::new(json!(0))))
//! });
//!
//! let mut store = Store::new(Composer::new(map))?;
//! store.dispatch(Action::named("noop"))?;
//! assert!(store.state().slices().is_some());
//! # Ok::<(), recombine_runtime::StoreError>(())
//! ```

use recombine_core::{Action, CompositeState, Reducer};

/// Error types for store operations.
pub mod error {
    use thiserror::Error;

    /// Errors that can occur while driving a store.
    #[derive(Clone, Debug, Error, PartialEq, Eq)]
    pub enum StoreError {
        /// The reducer rejected a dispatch (or, deferred, its construction).
        #[error(transparent)]
        Reducer(#[from] recombine_core::ComposeError),
    }
}

pub use error::StoreError;

/// Handle identifying one subscriber, for later removal.
pub type SubscriptionId = u64;

type Subscriber = Box<dyn Fn(&CompositeState)>;

/// The store: owns current state and drives dispatch through a reducer.
///
/// # Type Parameters
///
/// - `R`: the reducer implementation, typically a
///   [`Composer`](recombine_core::Composer)
///
/// # Notification
///
/// Subscribers are notified only when a dispatch replaces the current state
/// by reference; a combine that returns the identical state object produces
/// no notification.
pub struct Store<R: Reducer> {
    reducer: R,
    state: CompositeState,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: SubscriptionId,
}

impl<R: Reducer> Store<R> {
    /// Create a store with no preloaded state.
    ///
    /// Dispatches the reserved initialization action once so every slice can
    /// establish its initial state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the reducer is shape-broken: the
    /// composer's deferred construction error surfaces here, on first use.
    pub fn new(reducer: R) -> Result<Self, StoreError> {
        Self::bootstrap(reducer, None)
    }

    /// Create a store seeded with `preloaded` state.
    ///
    /// The preloaded value is untrusted: a shape mismatch is reported through
    /// the composer's diagnostic sink, attributed to the preloaded state
    /// argument, and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the reducer is shape-broken.
    pub fn with_preloaded_state(
        reducer: R,
        preloaded: CompositeState,
    ) -> Result<Self, StoreError> {
        Self::bootstrap(reducer, Some(preloaded))
    }

    fn bootstrap(mut reducer: R, preloaded: Option<CompositeState>) -> Result<Self, StoreError> {
        let init = Action::init();
        let state = reducer.reduce(preloaded.as_ref(), Some(&init))?;
        Ok(Self {
            reducer,
            state,
            subscribers: Vec::new(),
            next_subscription: 0,
        })
    }

    /// Dispatch an action through the reducer.
    ///
    /// When the returned state differs by reference from the current state,
    /// the store replaces it and notifies subscribers; otherwise nothing is
    /// observable.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when a slice reducer returns no value for this
    /// action; the store's state is left untouched in that case.
    pub fn dispatch(&mut self, action: Action) -> Result<&CompositeState, StoreError> {
        tracing::debug!(target: "recombine", kind = %action.kind, "dispatch");
        let next = self.reducer.reduce(Some(&self.state), Some(&action))?;
        self.commit(next);
        Ok(&self.state)
    }

    /// Swap the active reducer and immediately dispatch the reserved
    /// replacement action so the new reducer can establish its own shape.
    ///
    /// The shape warner suppresses unexpected-key diagnostics for this
    /// specific dispatch: a reducer swap legitimately changes the expected
    /// key set.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the replacement reducer is shape-broken
    /// or rejects the replacement dispatch. The new reducer stays installed
    /// either way, matching the swap-then-dispatch contract.
    pub fn replace_reducer(&mut self, next: R) -> Result<&CompositeState, StoreError> {
        tracing::debug!(target: "recombine", "replace reducer");
        self.reducer = next;
        let replace = Action::replace();
        let state = self.reducer.reduce(Some(&self.state), Some(&replace))?;
        self.commit(state);
        Ok(&self.state)
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> &CompositeState {
        &self.state
    }

    /// Register a subscriber invoked after every reference-changing dispatch.
    pub fn subscribe(&mut self, subscriber: impl Fn(&CompositeState) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Remove a subscriber. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(known, _)| *known != id);
        self.subscribers.len() != before
    }

    fn commit(&mut self, next: CompositeState) {
        if next.ptr_eq(&self.state) {
            return;
        }
        self.state = next;
        for (_, subscriber) in &self.subscribers {
            subscriber(&self.state);
        }
    }
}

impl<R: Reducer + std::fmt::Debug> std::fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("reducer", &self.reducer)
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

/// Convenience constructor mirroring the classic store-creation entry point.
///
/// # Errors
///
/// Returns [`StoreError`] when the reducer is shape-broken; see
/// [`Store::new`].
pub fn create_store<R: Reducer>(
    reducer: R,
    preloaded: Option<CompositeState>,
) -> Result<Store<R>, StoreError> {
    match preloaded {
        Some(state) => Store::with_preloaded_state(reducer, state),
        None => Store::new(reducer),
    }
}
