//! Errors raised by the reactive host.

use thiserror::Error;

/// Misuse of a reactive computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReactiveError {
    /// A memo was read from inside its own computation.
    #[error("cycle detected: memo `{name}` read itself while computing")]
    Cycle { name: String },

    /// A computed was read before any run of it completed.
    #[error("computed `{name}` has no value: no run has completed")]
    Uninitialized { name: String },

    /// A computation was read after it was disposed.
    #[error("computation `{name}` was read after disposal")]
    Disposed { name: String },
}

pub type Result<T> = std::result::Result<T, ReactiveError>;
