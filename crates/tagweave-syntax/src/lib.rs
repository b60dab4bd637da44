//! # tagweave-syntax
//!
//! Lossless markup syntax trees using [Rowan] + [Logos], following the
//! [rust-analyzer] architecture model.
//!
//! [Rowan]: https://docs.rs/rowan
//! [Logos]: https://docs.rs/logos
//! [rust-analyzer]: https://rust-analyzer.github.io/book/contributing/syntax.html
//!
//! ## What is a Lossless CST?
//!
//! A Concrete Syntax Tree preserves **every byte** of the original source:
//! whitespace, comments, malformed tags. The formatter relies on this: every
//! block it emits maps exactly to a source span, and the text between blocks
//! is exactly the whitespace it may rewrite.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → Sink → Rowan Tree
//!               (Logos)          (Grammar)        (GreenNodeBuilder)
//! ```
//!
//! The same tokens can be parsed in several [`ParseMode`]s. A template file
//! ([`FileKind::Template`]) is parsed twice: a template tree in which host
//! markup is opaque `TEMPLATE_TEXT`, and an Html tree in which template
//! constructs are opaque `OUTER_FRAGMENT` tokens. [`SourceFile`] keeps both.
//!
//! ## Dialects
//!
//! Every node belongs to a [`Dialect`]. Tree roots fix the dialect of their
//! tree; `<script>`/`<style>` elements and scriptlets switch to the Script
//! and Style dialects for their subtree.
//!
//! ## Module Structure
//!
//! ```text
//! tagweave-syntax/
//! ├── lib.rs           # This file - public API and tree snapshots
//! ├── syntax_kind.rs   # SyntaxKind enum (tokens + nodes) and Rowan integration
//! ├── dialect.rs       # Dialect enum and dialect lookup for nodes
//! ├── lexer.rs         # Logos-based tokenizer
//! ├── ast.rs           # Tag view over element nodes
//! ├── file.rs          # SourceFile: text plus one tree per dialect
//! └── parser/
//!     ├── mod.rs       # Parser struct, Marker system, ParseMode, parse()
//!     ├── event.rs     # Event enum (Start, Token, Finish, Placeholder)
//!     ├── sink.rs      # Converts events to a Rowan GreenNode
//!     └── grammar/
//!         ├── mod.rs      # Start and closing tag rules shared by both grammars
//!         ├── markup.rs   # Html and Xml documents
//!         └── template.rs # Template documents
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use tagweave_syntax::{parse, SyntaxKind, Tag};
//!
//! let tree = parse("<p>Hello</p>");
//!
//! assert_eq!(tree.text().to_string(), "<p>Hello</p>");
//! assert_eq!(tree.kind(), SyntaxKind::HTML_DOCUMENT);
//!
//! let p = tree.children().find_map(Tag::cast).unwrap();
//! assert_eq!(p.name(), "p");
//! ```

pub mod ast;
pub mod dialect;
pub mod file;
pub mod lexer;
pub mod parser;
pub mod syntax_kind;

pub use ast::Tag;
pub use dialect::{Dialect, TEMPLATE_TAG_PREFIX, has_template_prefix};
pub use file::{FileKind, SourceFile};
pub use parser::{ParseMode, parse, parse_as};
pub use syntax_kind::{MarkupLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
