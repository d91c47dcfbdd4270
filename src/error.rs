//! Error types for the typeahead component.

use thiserror::Error;

/// Errors raised to callers of the typeahead API.
///
/// UI correction paths (blur cleanup, debouncing, filtering) never produce
/// these; they are reserved for invalid API usage.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypeaheadError {
    /// A complex-mode name or id has no candidate in the ready snapshot and
    /// free text is not accepted.
    #[error("Match ID could not be extracted: no candidate matches {0}")]
    UnresolvableIdentity(String),

    /// The value written does not fit the configured mode.
    #[error("Invalid value for {mode} mode: {value}")]
    InvalidValue {
        /// `"single"` or `"multi"`.
        mode: &'static str,
        /// The rejected value, rendered as JSON.
        value: String,
    },

    /// A candidate was sent after the control released the stream.
    #[error("Candidate source closed")]
    SourceClosed,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TypeaheadError>;
