//! Framework error type.
//!
//! Sub-crates define their own error enums and either convert into
//! `CoreError` via `From` impls or wrap it as one variant.  Both patterns are
//! acceptable; prefer whichever keeps error sites clean.

use thiserror::Error;

/// The top-level error type for `sl-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid damage scale: {0}")]
    InvalidScale(String),

    #[error("{what} length {got} does not match expected {expected}")]
    ShapeMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },
}

/// Shorthand result type for all `sl-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
