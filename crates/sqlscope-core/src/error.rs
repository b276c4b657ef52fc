//! Error types for statement construction.

use thiserror::Error;

/// Errors raised while assembling a [`Statement`](crate::Statement).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatementError {
    /// The text and the bound values disagree on the number of parameters.
    #[error("statement has {placeholders} placeholder(s) but {values} bound value(s)")]
    PlaceholderMismatch {
        /// Placeholders found in the text.
        placeholders: usize,
        /// Values supplied for binding.
        values: usize,
    },
}
