//! Diagnostic channel for non-fatal composer findings.
//!
//! Missing reducer entries, empty reducer maps, and state/reducer shape
//! mismatches are reported here rather than failing dispatch. The sink is
//! injected at construction time, the same way the rest of the system injects
//! its dependencies, so the composer carries no ambient global state.

use std::fmt;
use std::sync::Arc;

/// Sink for non-fatal composer diagnostics.
///
/// Implementations must be cheap: the warner emits at most one message per
/// offending key over a composer's lifetime, but the sink is still on the
/// dispatch path.
pub trait DiagnosticSink: Send + Sync {
    /// Forward one diagnostic message.
    fn warn(&self, message: &str);
}

/// Default sink: forwards diagnostics to `tracing` at WARN level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warn(&self, message: &str) {
        tracing::warn!(target: "recombine", "{message}");
    }
}

/// Construction-time configuration for a composer.
///
/// Diagnostics default to enabled; performance-sensitive deployments can opt
/// out, which silences the sanitizer and the shape warner without changing
/// any returned state or fatal-error behavior.
///
/// # Example
///
/// ```
/// use recombine_core::ComposerConfig;
///
/// let config = ComposerConfig::new().with_diagnostics(false);
/// ```
#[derive(Clone)]
pub struct ComposerConfig {
    diagnostics: bool,
    sink: Arc<dyn DiagnosticSink>,
}

impl ComposerConfig {
    /// Default configuration: diagnostics enabled, [`TracingSink`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            diagnostics: true,
            sink: Arc::new(TracingSink),
        }
    }

    /// Enable or disable sanitizer and shape-warner diagnostics.
    #[must_use]
    pub const fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    /// Replace the diagnostic sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub(crate) const fn diagnostics_enabled(&self) -> bool {
        self.diagnostics
    }

    pub(crate) fn warn(&self, message: &str) {
        if self.diagnostics {
            self.sink.warn(message);
        }
    }
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ComposerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposerConfig")
            .field("diagnostics", &self.diagnostics)
            .finish_non_exhaustive()
    }
}
