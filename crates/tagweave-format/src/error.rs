use tagweave_syntax::Dialect;
use thiserror::Error;

use crate::span::Span;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A contract between builder and tree was broken; aborts the build.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("no formatter registered for {0}")]
    NoFormatterRegistered(Dialect),

    /// A candidate region crosses a known sub-region or leaves its parent.
    #[error("candidate {candidate:?} conflicts with {with:?}")]
    OverlapConflict { candidate: Span, with: Span },

    #[error("{dialect} formatter failed: {message}")]
    Foreign { dialect: Dialect, message: String },
}

impl FormatError {
    /// Errors the builder absorbs by falling back to a same-tree block.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, FormatError::InvariantViolation(_))
    }
}

pub type Result<T, E = FormatError> = std::result::Result<T, E>;
