//! State values managed by a composed reducer.
//!
//! Slice values are dynamically typed ([`serde_json::Value`]) and shared
//! behind an [`Arc`], which gives downstream consumers cheap identity
//! comparison: a combine that changes nothing hands back the very same
//! allocation it received.

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Name of one slice of aggregate state.
pub type SliceKey = String;

/// A dynamically typed slice value with pointer identity.
///
/// Compare with [`Arc::ptr_eq`] to check whether two values are the same
/// object rather than merely structurally equal.
pub type SliceValue = Arc<Value>;

/// Aggregate state produced by a composed reducer: one value per slice key.
///
/// Cloning is cheap (the backing map is shared), and identity is preserved
/// across clones: [`AggregateState::ptr_eq`] distinguishes "the same state
/// object" from "an equal state object".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AggregateState {
    slices: Arc<BTreeMap<SliceKey, SliceValue>>,
}

impl AggregateState {
    /// Wrap a slice map as aggregate state.
    #[must_use]
    pub fn new(slices: BTreeMap<SliceKey, SliceValue>) -> Self {
        Self {
            slices: Arc::new(slices),
        }
    }

    /// Build aggregate state from `(key, value)` pairs.
    ///
    /// # Example
    ///
    /// ```
    /// use recombine_core::AggregateState;
    /// use serde_json::json;
    ///
    /// let state = AggregateState::from_pairs([("counter", json!(1)), ("stack", json!([]))]);
    /// assert_eq!(state.len(), 2);
    /// ```
    pub fn from_pairs<K>(pairs: impl IntoIterator<Item = (K, Value)>) -> Self
    where
        K: Into<SliceKey>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), Arc::new(value)))
                .collect(),
        )
    }

    /// The value of one slice, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SliceValue> {
        self.slices.get(key)
    }

    /// Number of slices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Whether the aggregate holds no slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Slice keys, in deterministic order.
    pub fn keys(&self) -> impl Iterator<Item = &SliceKey> {
        self.slices.keys()
    }

    /// Iterate over `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&SliceKey, &SliceValue)> {
        self.slices.iter()
    }

    /// Identity comparison: whether both values share the same backing map.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slices, &other.slices)
    }
}

/// State as seen at the dispatch boundary.
///
/// Dispatch normally hands the composer the aggregate produced by the
/// previous combine, but the boundary must tolerate arbitrary values: a
/// caller may preload state of the wrong shape entirely. Such values are
/// carried through as [`CompositeState::Other`] and never produced by a
/// combine that observed a change. A bare JSON object still seeds the
/// reducers from its fields; any other shape is reported by the shape
/// warner and contributes no slice values.
#[derive(Clone, Debug, PartialEq)]
pub enum CompositeState {
    /// A keyed aggregate, the steady-state shape.
    Slices(AggregateState),

    /// Anything that is not a keyed aggregate (scalar, array, bare object).
    Other(Arc<Value>),
}

impl CompositeState {
    /// The aggregate view, when the state has the expected shape.
    #[must_use]
    pub const fn slices(&self) -> Option<&AggregateState> {
        match self {
            Self::Slices(aggregate) => Some(aggregate),
            Self::Other(_) => None,
        }
    }

    /// Identity comparison across both shapes.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Slices(a), Self::Slices(b)) => a.ptr_eq(b),
            (Self::Other(a), Self::Other(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Runtime type name used in shape diagnostics.
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Self::Slices(_) => "object",
            Self::Other(value) => match value.as_ref() {
                Value::Null => "null",
                Value::Bool(_) => "boolean",
                Value::Number(_) => "number",
                Value::String(_) => "string",
                Value::Array(_) => "array",
                Value::Object(_) => "object",
            },
        }
    }

    /// Number of keys the incoming state carries.
    ///
    /// Non-keyed values count as zero, matching the combine change heuristic.
    pub(crate) fn key_count(&self) -> usize {
        match self {
            Self::Slices(aggregate) => aggregate.len(),
            Self::Other(value) => match value.as_ref() {
                Value::Object(map) => map.len(),
                Value::Array(items) => items.len(),
                _ => 0,
            },
        }
    }
}

impl From<AggregateState> for CompositeState {
    fn from(state: AggregateState) -> Self {
        Self::Slices(state)
    }
}

impl From<Value> for CompositeState {
    fn from(value: Value) -> Self {
        Self::Other(Arc::new(value))
    }
}
