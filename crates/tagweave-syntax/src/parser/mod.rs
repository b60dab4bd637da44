//! # Parser - Event-Based Tree Construction
//!
//! This module transforms a token stream into a syntax tree using the
//! **event-based** architecture from rust-analyzer.
//!
//! Markup nests arbitrarily and is frequently malformed (unclosed tags, stray
//! closing tags). Instead of building the tree directly, grammar rules emit a
//! flat list of **events** ([`Event`]) and the [`Sink`] builds the Rowan tree
//! afterwards. Recovery then only means choosing which events to emit.
//!
//! ## The Marker System
//!
//! `parser.start()` returns a [`Marker`] that **must** be either completed with
//! `marker.complete(parser, KIND)` or abandoned with `marker.abandon(parser)`.
//! Dropping it otherwise panics, which catches grammar bugs before they turn
//! into corrupt trees.
//!
//! ```ignore
//! let m = parser.start();
//! parser.bump();
//! m.complete(parser, SyntaxKind::TAG);
//! ```
//!
//! ## Parse Modes
//!
//! The same token stream is parsed differently depending on [`ParseMode`]:
//! a template file is parsed twice, once as a template tree and once as an
//! Html tree in which template constructs are opaque `OUTER_FRAGMENT` tokens.
//!
//! ```
//! use tagweave_syntax::parse;
//!
//! let tree = parse("<p>Hello</p>");
//! println!("{:#?}", tree);
//! ```

pub mod event;
pub mod sink;

mod grammar;

use rowan::GreenNode;

use crate::lexer::{Token, lex};
use crate::syntax_kind::{SyntaxKind, SyntaxNode};
use event::Event;
use sink::Sink;

/// Which grammar drives the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Html; with `islands` set, template tags and scriptlets become
    /// `OUTER_FRAGMENT` carriers.
    Html { islands: bool },
    Xml,
    Template,
}

impl ParseMode {
    /// Kind of the root node this mode produces.
    pub fn root_kind(self) -> SyntaxKind {
        match self {
            ParseMode::Html { .. } => SyntaxKind::HTML_DOCUMENT,
            ParseMode::Xml => SyntaxKind::XML_DOCUMENT,
            ParseMode::Template => SyntaxKind::TEMPLATE_DOCUMENT,
        }
    }
}

/// The parser state machine.
///
/// Holds the token stream, current position, and accumulated events.
/// Grammar functions receive `&mut Parser` and use its methods to:
///
/// - Inspect tokens: `current()`, `nth()`, `nth_text()`, `at()`, `at_end()`
/// - Consume tokens: `bump()`, `bump_as()`, `bump_n()`, `eat()`
/// - Build structure: `start()` → `Marker` → `complete()`/`abandon()`
pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    pos: usize,
    events: Vec<Event>,
    mode: ParseMode,
}

impl<'t, 'input> Parser<'t, 'input> {
    /// Create a new parser from a slice of tokens.
    pub fn new(tokens: &'t [Token<'input>], mode: ParseMode) -> Self {
        Self {
            tokens,
            pos: 0,
            events: Vec::new(),
            mode,
        }
    }

    /// Parse the tokens and return the green tree.
    pub fn parse(mut self) -> GreenNode {
        match self.mode {
            ParseMode::Template => grammar::template::document(&mut self),
            ParseMode::Html { .. } | ParseMode::Xml => grammar::markup::document(&mut self),
        }
        let sink = Sink::new(self.tokens, self.events);
        sink.finish()
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    /// Start a new node and return a marker.
    pub fn start(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Placeholder);
        Marker {
            pos,
            completed: false,
        }
    }

    /// Current token kind, or EOF if past end.
    pub fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Look ahead n tokens.
    pub fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    /// Text of the token n ahead, or "" if past end.
    pub fn nth_text(&self, n: usize) -> &'input str {
        self.tokens.get(self.pos + n).map(|t| t.text).unwrap_or("")
    }

    /// Check if at end of input.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Check if current token is of given kind.
    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume the current token unconditionally.
    pub fn bump(&mut self) {
        if !self.at_end() {
            let kind = self.current();
            self.bump_as(kind);
        }
    }

    /// Consume the current token, giving it a different kind in the tree.
    pub fn bump_as(&mut self, kind: SyntaxKind) {
        if !self.at_end() {
            self.events.push(Event::token(kind));
            self.pos += 1;
        }
    }

    /// Consume n tokens as a single composite token.
    pub fn bump_n(&mut self, n: usize, kind: SyntaxKind) {
        if n > 0 && self.pos + n <= self.tokens.len() {
            self.events.push(Event::Token {
                kind,
                n_raw_tokens: n,
            });
            self.pos += n;
        }
    }

    /// Get the text of the current token.
    pub fn current_text(&self) -> &'input str {
        self.nth_text(0)
    }
}

/// A marker for a node being constructed.
///
/// When you call `parser.start()`, a `Placeholder` event is pushed and you
/// get a `Marker` pointing to it. The `#[must_use]` attribute and the `Drop`
/// impl together enforce that every marker is either completed or abandoned.
#[must_use = "Markers must be completed or abandoned, dropping them is a bug"]
pub struct Marker {
    /// Position in the events vector where our Placeholder lives
    pos: usize,
    /// Tracks whether complete() or abandon() was called
    completed: bool,
}

impl Marker {
    /// Complete this marker, creating a node of the given kind.
    pub fn complete(mut self, p: &mut Parser<'_, '_>, kind: SyntaxKind) -> CompletedMarker {
        self.completed = true;
        let event_at_pos = &mut p.events[self.pos];
        assert!(matches!(event_at_pos, Event::Placeholder));
        *event_at_pos = Event::Start {
            kind,
            forward_parent: None,
        };
        p.events.push(Event::Finish);
        CompletedMarker { pos: self.pos }
    }

    /// Abandon this marker without creating a node.
    ///
    /// Only removes the placeholder if it's the last event; otherwise the
    /// placeholder becomes inert and is ignored by the Sink.
    pub fn abandon(mut self, p: &mut Parser<'_, '_>) {
        self.completed = true;
        if self.pos == p.events.len() - 1 {
            match p.events.pop() {
                Some(Event::Placeholder) => {}
                _ => unreachable!(),
            }
        }
    }
}

impl Drop for Marker {
    fn drop(&mut self) {
        if !self.completed && !std::thread::panicking() {
            panic!("Marker must be either completed or abandoned");
        }
    }
}

/// A marker for a node that has been completed.
///
/// `precede()` wraps the completed node in a new parent through a forward
/// parent link that the Sink resolves.
#[derive(Debug, Clone, Copy)]
pub struct CompletedMarker {
    /// Position of the Start event for this completed node
    pos: usize,
}

impl CompletedMarker {
    /// Create a new parent node that will contain this node.
    pub fn precede(self, p: &mut Parser<'_, '_>) -> Marker {
        let new_pos = p.events.len();
        p.events.push(Event::Placeholder);

        if let Event::Start { forward_parent, .. } = &mut p.events[self.pos] {
            *forward_parent = Some(new_pos);
        }

        Marker {
            pos: new_pos,
            completed: false,
        }
    }
}

/// Parse source into a green tree using the given mode.
pub fn parse_green(source: &str, mode: ParseMode) -> GreenNode {
    let tokens = lex(source);
    Parser::new(&tokens, mode).parse()
}

/// Parse source with the given mode and return the red root.
pub fn parse_as(source: &str, mode: ParseMode) -> SyntaxNode {
    SyntaxNode::new_root(parse_green(source, mode))
}

/// Parse Html source into a syntax tree.
pub fn parse(source: &str) -> SyntaxNode {
    parse_as(source, ParseMode::Html { islands: false })
}
