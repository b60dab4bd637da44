//! # Lexer - Tokenizing Markup Source
//!
//! This module provides the first stage of parsing: breaking source text into
//! tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! **Every byte in the input appears in exactly one token**. Characters the
//! lexer has no rule for become `DATA_CHARACTERS`, never an error:
//!
//! ```
//! use tagweave_syntax::lexer::lex;
//!
//! let input = "<p class=\"x\">Hi & bye</p>\n";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Token Design
//!
//! Tokens are context-free. The lexer doesn't know whether `name` is a tag
//! name, an attribute name or a word of text, nor whether `"..."` is an
//! attribute value or quoted prose. The parser reclassifies tokens it finds in
//! text position (see `Parser::bump_n`).
//!
//! Comments and scriptlets are the exception: their bodies are opaque, so the
//! lexer swallows them whole with a callback.

use logos::{Lexer, Logos};

use crate::syntax_kind::SyntaxKind;

/// Token kinds produced by the Logos lexer.
///
/// Each variant maps to a corresponding `SyntaxKind` token.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Horizontal whitespace (spaces, tabs)
    #[regex(r"[ \t]+")]
    Whitespace,

    /// Line ending (LF or CRLF)
    #[regex(r"\r?\n")]
    Newline,

    /// `<!-- ... -->`, running to end of input when unterminated
    #[token("<!--", comment_body)]
    Comment,

    /// `<% ... %>`, running to end of input when unterminated
    #[token("<%", scriptlet_body)]
    Scriptlet,

    /// `<!`
    #[token("<!")]
    DoctypeStart,

    /// `</`
    #[token("</")]
    EndTagStart,

    /// `/>`
    #[token("/>")]
    EmptyTagEnd,

    /// `<`
    #[token("<")]
    StartTagStart,

    /// `>`
    #[token(">")]
    TagEnd,

    /// `=`
    #[token("=")]
    Eq,

    /// Single- or double-quoted string on one line
    #[regex(r#""[^"<\n]*""#)]
    #[regex(r#"'[^'<\n]*'"#)]
    Quoted,

    /// Any run of characters that is not whitespace or markup punctuation
    #[regex(r#"[^\s<>="'/]+"#)]
    Name,
}

fn comment_body(lex: &mut Lexer<TokenKind>) -> bool {
    bump_through(lex, "-->");
    true
}

fn scriptlet_body(lex: &mut Lexer<TokenKind>) -> bool {
    bump_through(lex, "%>");
    true
}

fn bump_through(lex: &mut Lexer<TokenKind>, terminator: &str) {
    let rest = lex.remainder();
    let len = rest
        .find(terminator)
        .map(|i| i + terminator.len())
        .unwrap_or(rest.len());
    lex.bump(len);
}

impl TokenKind {
    /// Convert to SyntaxKind.
    pub fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::Newline => SyntaxKind::NEWLINE,
            TokenKind::Comment => SyntaxKind::COMMENT,
            TokenKind::Scriptlet => SyntaxKind::SCRIPTLET_CODE,
            TokenKind::DoctypeStart => SyntaxKind::DOCTYPE_START,
            TokenKind::EndTagStart => SyntaxKind::END_TAG_START,
            TokenKind::EmptyTagEnd => SyntaxKind::EMPTY_TAG_END,
            TokenKind::StartTagStart => SyntaxKind::START_TAG_START,
            TokenKind::TagEnd => SyntaxKind::TAG_END,
            TokenKind::Eq => SyntaxKind::EQ,
            TokenKind::Quoted => SyntaxKind::ATTR_VALUE,
            TokenKind::Name => SyntaxKind::NAME,
        }
    }
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    lex_with_spans(input)
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}

/// Lex and return tokens along with their byte spans.
pub fn lex_with_spans(input: &str) -> Vec<(Token<'_>, std::ops::Range<usize>)> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        let kind = match result {
            Ok(token_kind) => token_kind.to_syntax_kind(),
            // Unrecognized characters (a lone `/`, an unpaired quote) are data
            Err(()) => SyntaxKind::DATA_CHARACTERS,
        };
        tokens.push((Token { kind, text }, span));
    }

    tokens
}
