//! Error types for `ptanalysis`.
//!
//! Mirrors the taxonomy of §7: Configuration and Internal errors abort a
//! run; Adapter errors are collected per-function and do not; Resource
//! exhaustion (timeout/cancellation) is never an `Err` — it surfaces as the
//! `partial` flag on [`crate::engine::EngineResults`].

use thiserror::Error;

/// Errors that can abort analysis outright, or be recorded against a single
/// function without invalidating the rest of the run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid configuration: unknown field-sensitivity mode, a `k` or
    /// `obj_depth` that overflows, etc. Raised during `plan`/`initialize`.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An IR event referenced an undefined variable, or a malformed
    /// allocation/call site. Raised during event generation for a single
    /// function; that function is marked failed and skipped.
    #[error("adapter error in function {function}: {reason}")]
    Adapter { function: String, reason: String },

    /// A non-monotone store change or an interning equality violation.
    /// Always a programmer bug, never user-triggered; the run aborts.
    #[error("internal invariant violation: {0}")]
    Internal(String),
}

impl EngineError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        EngineError::Configuration(msg.into())
    }

    pub fn adapter(function: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::Adapter {
            function: function.into(),
            reason: reason.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        EngineError::Internal(msg.into())
    }
}

/// Crate-wide result alias.
pub type EngineOutcome<T> = std::result::Result<T, EngineError>;

/// A single per-function adapter failure, retained in
/// [`crate::engine::EngineResults::failed_functions`] rather than aborting
/// the run.
#[derive(Debug, Clone)]
pub struct FunctionFailure {
    pub function: String,
    pub reason: String,
}
