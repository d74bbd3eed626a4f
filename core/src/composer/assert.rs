//! Construction-time shape assertions.
//!
//! Every retained reducer is probed twice before the composer is ever
//! dispatched to: once with the reserved initialization action and an absent
//! slice value, and once with a freshly randomized probe type. The second
//! probe guarantees the reducer's default branch is exercised rather than a
//! branch coincidentally matching a fixed sentinel, which catches reducers
//! that only return state for action types they explicitly enumerate.

use crate::action::Action;
use crate::error::ComposeError;
use crate::reducer::SliceReducer;
use crate::state::SliceKey;

/// Probe every retained reducer, returning the first violation found.
///
/// Runs exactly once per composer construction. The returned error is not
/// raised here: the caller caches it and surfaces it on first combine, so the
/// failure appears in the same control-flow context as real dispatch
/// failures. A reducer that panics while being probed is not caught.
pub(super) fn assert_reducer_shape(
    reducers: &[(SliceKey, SliceReducer)],
    probe_token: u64,
) -> Option<ComposeError> {
    let init = Action::init();
    let probe = Action::probe(probe_token);

    for (key, reducer) in reducers {
        if reducer(None, Some(&init)).is_none() {
            return Some(ComposeError::UndefinedInitialState { key: key.clone() });
        }
        if reducer(None, Some(&probe)).is_none() {
            return Some(ComposeError::UndefinedOnProbe { key: key.clone() });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use crate::slice_reducer;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn well_behaved_reducers_pass() {
        let reducers = vec![(
            "counter".to_owned(),
            slice_reducer(|state, _| Some(state.cloned().unwrap_or_else(|| Arc::new(json!(0))))),
        )];
        assert_eq!(assert_reducer_shape(&reducers, 1), None);
    }

    #[test]
    fn missing_initial_state_is_a_violation() {
        // Mirrors a reducer with no default: it echoes whatever slice state
        // it received, including nothing at all.
        let reducers = vec![(
            "counter".to_owned(),
            slice_reducer(|state, _| state.cloned()),
        )];
        assert_eq!(
            assert_reducer_shape(&reducers, 1),
            Some(ComposeError::UndefinedInitialState {
                key: "counter".into()
            })
        );
    }

    #[test]
    fn handling_only_reserved_init_is_a_violation() {
        // Initializes fine, but its default branch returns nothing, so the
        // randomized probe catches it.
        let reducers = vec![(
            "counter".to_owned(),
            slice_reducer(|_, action| match action.map(|a| &a.kind) {
                Some(ActionKind::Init) => Some(Arc::new(json!(0))),
                _ => None,
            }),
        )];
        assert_eq!(
            assert_reducer_shape(&reducers, 1),
            Some(ComposeError::UndefinedOnProbe {
                key: "counter".into()
            })
        );
    }

    #[test]
    fn stops_at_the_first_violation() {
        let reducers = vec![
            (
                "first".to_owned(),
                slice_reducer(|state, _| state.cloned()),
            ),
            (
                "second".to_owned(),
                slice_reducer(|state, _| state.cloned()),
            ),
        ];
        assert_eq!(
            assert_reducer_shape(&reducers, 1),
            Some(ComposeError::UndefinedInitialState {
                key: "first".into()
            })
        );
    }
}
