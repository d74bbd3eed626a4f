//! Fatal error types for the composer.
//!
//! These are the thrown tier of the two-tier failure design: a slice reducer
//! returning no value, either under a construction-time probe (surfaced
//! lazily on first combine) or during a real dispatch (surfaced immediately).
//! Everything non-fatal goes through the diagnostic sink instead.

use crate::action::Action;
use crate::state::SliceKey;
use thiserror::Error;

/// A slice reducer violated its contract.
///
/// Errors are `Clone` because construction-time violations are cached and
/// re-returned on every subsequent combine: a shape-broken composer fails
/// identically for its whole lifetime.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    /// The reducer returned no value when asked to establish its initial
    /// state (probed with an absent slice value and the reserved
    /// initialization action).
    #[error(
        "slice reducer \"{key}\" returned no value during initialization. \
         When the incoming slice state is absent, a reducer must explicitly \
         return its initial state; the initial state may be a null value but \
         it may not be absent"
    )]
    UndefinedInitialState {
        /// Key of the offending reducer.
        key: SliceKey,
    },

    /// The reducer returned no value when probed with a randomly generated
    /// action type, which means its default branch does not return the
    /// current state.
    #[error(
        "slice reducer \"{key}\" returned no value when probed with a \
         randomly generated action type. Reserved action kinds are private \
         to the framework and must not be handled; return the current slice \
         state for any unknown action, or the initial state when the slice \
         state is absent"
    )]
    UndefinedOnProbe {
        /// Key of the offending reducer.
        key: SliceKey,
    },

    /// The reducer returned no value while handling a real dispatch.
    #[error(
        "given {action}, slice reducer \"{key}\" returned no value. To \
         ignore an action, explicitly return the previous slice state; \
         return a null value rather than nothing if the slice should hold \
         no value"
    )]
    UndefinedResult {
        /// Key of the offending reducer.
        key: SliceKey,

        /// Description of the dispatched action: `action "<type>"`, or
        /// `an action` when the action was absent at the boundary.
        action: String,
    },
}

impl ComposeError {
    pub(crate) fn undefined_result(key: &str, action: Option<&Action>) -> Self {
        let action = action.map_or_else(
            || "an action".to_owned(),
            |action| format!("action \"{}\"", action.kind),
        );
        Self::UndefinedResult {
            key: key.to_owned(),
            action,
        }
    }
}
