//! # Parser Events
//!
//! Events are the intermediate representation between parsing and tree building.
//! Instead of building the tree directly, the parser emits a **flat sequence**
//! of events that describe the tree structure.
//!
//! ```text
//! Start(TAG)               ← Begin a TAG node
//!   Token(START_TAG_START)
//!   Token(NAME)
//!   Token(TAG_END)
//!   Start(TEXT)
//!     Token(DATA_CHARACTERS)
//!   Finish
//!   Token(END_TAG_START)
//!   Token(NAME)
//!   Token(TAG_END)
//! Finish                   ← End the TAG node
//! ```
//!
//! The Sink processes these in order, maintaining a stack of open nodes.
//! Start pushes, Finish pops.
//!
//! ## Forward Parent Links
//!
//! The `forward_parent` field in `Start` handles cases where we need to wrap
//! an already-parsed node. The Sink resolves these links by following the
//! chain and opening nodes in outermost-first order.

use crate::syntax_kind::SyntaxKind;

/// An event emitted by the parser during tree construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Begin a new composite node.
    ///
    /// If `forward_parent` is set, it points to another `Start` event that
    /// should become this node's parent.
    Start {
        kind: SyntaxKind,
        forward_parent: Option<usize>,
    },

    /// Add a token to the current node.
    ///
    /// `n_raw_tokens` lexer tokens are glued into one tree token of `kind`.
    /// Raw-text bodies and template carriers routinely span hundreds of
    /// lexer tokens.
    Token { kind: SyntaxKind, n_raw_tokens: usize },

    /// Finish the current node.
    Finish,

    /// A placeholder left by `parser.start()`; ignored by the Sink unless
    /// a marker completes it.
    Placeholder,
}

impl Event {
    /// Create a start event with no forward parent.
    pub fn start(kind: SyntaxKind) -> Self {
        Event::Start {
            kind,
            forward_parent: None,
        }
    }

    /// Create a token event for a single raw token.
    pub fn token(kind: SyntaxKind) -> Self {
        Event::Token {
            kind,
            n_raw_tokens: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_start_creation() {
        let event = Event::start(SyntaxKind::TAG);
        assert_eq!(
            event,
            Event::Start {
                kind: SyntaxKind::TAG,
                forward_parent: None
            }
        );
    }

    #[test]
    fn event_token_creation() {
        let event = Event::token(SyntaxKind::NAME);
        assert_eq!(
            event,
            Event::Token {
                kind: SyntaxKind::NAME,
                n_raw_tokens: 1
            }
        );
    }
}
