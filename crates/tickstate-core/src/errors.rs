//! State cache error types.
//!
//! None of these cross the consumer boundary: pull accessors always return a
//! snapshot. They travel between the cache and its collaborators (price
//! source, session hooks) and are logged where they stop.

use thiserror::Error;

/// Errors raised while reading or enriching simulation state.
#[derive(Debug, Error)]
pub enum StateError {
    /// The simulation has no data for the request (not logged in, region not loaded).
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// A name/price/style lookup failed.
    #[error("lookup failed for {kind} {id}: {message}")]
    Lookup {
        /// What was being looked up.
        kind: &'static str,
        /// Id that was looked up.
        id: i32,
        /// Reason reported by the source.
        message: String,
    },

    /// The enrichment worker could not accept or process work.
    #[error("enrichment worker: {0}")]
    Worker(String),

    /// A session hook failed.
    #[error("hook '{name}' failed: {message}")]
    Hook {
        /// Hook name.
        name: String,
        /// Failure message.
        message: String,
    },

    /// A snapshot builder panicked.
    #[error("builder '{family}' panicked: {message}")]
    BuilderPanic {
        /// Family whose builder failed.
        family: String,
        /// Panic payload, if it was a string.
        message: String,
    },

    /// Generic internal error.
    #[error("{0}")]
    Internal(String),
}

impl StateError {
    /// Short machine-readable kind for structured logs.
    #[must_use]
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::Lookup { .. } => "lookup",
            Self::Worker(_) => "worker",
            Self::Hook { .. } => "hook",
            Self::BuilderPanic { .. } => "builder_panic",
            Self::Internal(_) => "internal",
        }
    }

    /// Whether retrying on a later tick may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Lookup { .. })
    }
}

/// Result type for state operations.
pub type Result<T> = std::result::Result<T, StateError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
