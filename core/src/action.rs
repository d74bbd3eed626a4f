//! Actions dispatched through a composed reducer.
//!
//! An [`Action`] carries a discriminant ([`ActionKind`]) and an arbitrary
//! payload. Two kinds are reserved for the framework itself: the store
//! dispatches [`ActionKind::Init`] to compute initial state and
//! [`ActionKind::Replace`] after a reducer swap. Application reducers must
//! treat reserved kinds like any other unknown action: return the current
//! slice state.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Discriminant of an [`Action`].
///
/// The `Named` variant covers all application-defined action types. The
/// remaining variants are reserved: generated and dispatched by the framework,
/// never by application code.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Reserved initialization action, dispatched once when a store is
    /// created so every slice reducer can establish its initial state.
    Init,

    /// Reserved reducer-replacement action, dispatched after a reducer swap
    /// so the replacement can establish its own state shape.
    Replace,

    /// Reserved construction-time probe carrying an unguessable token.
    ///
    /// The token is freshly randomized per composer construction, so no real
    /// action type can coincidentally collide with it and the probe is
    /// guaranteed to exercise a reducer's default branch.
    Probe(u64),

    /// Application-defined action type.
    Named(String),
}

impl ActionKind {
    /// Whether this kind is owned by the framework rather than the
    /// application.
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        !matches!(self, Self::Named(_))
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "@@recombine/INIT"),
            Self::Replace => write!(f, "@@recombine/REPLACE"),
            Self::Probe(token) => write!(f, "@@recombine/PROBE_UNKNOWN_ACTION/{token}"),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}

/// An action: a discriminant plus an arbitrary payload.
///
/// Actions are treated as untrusted at the dispatch boundary: the composer
/// accepts `Option<&Action>` and tolerates an absent action without assuming
/// it is well formed.
///
/// # Example
///
/// ```
/// use recombine_core::Action;
/// use serde_json::json;
///
/// let action = Action::named("push").with_payload(json!("a"));
/// assert_eq!(action.kind.to_string(), "push");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// The action's discriminant.
    pub kind: ActionKind,

    /// Arbitrary payload carried alongside the discriminant.
    pub payload: Value,
}

impl Action {
    /// Create an application action with the given type name and no payload.
    #[must_use]
    pub fn named(kind: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Named(kind.into()),
            payload: Value::Null,
        }
    }

    /// Attach a payload to the action.
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    /// The reserved initialization action.
    ///
    /// Dispatched by the store when it is created. Application reducers must
    /// not special-case it.
    #[must_use]
    pub const fn init() -> Self {
        Self {
            kind: ActionKind::Init,
            payload: Value::Null,
        }
    }

    /// The reserved reducer-replacement action.
    ///
    /// Dispatched by the store immediately after a reducer swap. Application
    /// reducers must not special-case it.
    #[must_use]
    pub const fn replace() -> Self {
        Self {
            kind: ActionKind::Replace,
            payload: Value::Null,
        }
    }

    /// The reserved shape-assertion probe with the given token.
    pub(crate) const fn probe(token: u64) -> Self {
        Self {
            kind: ActionKind::Probe(token),
            payload: Value::Null,
        }
    }
}
