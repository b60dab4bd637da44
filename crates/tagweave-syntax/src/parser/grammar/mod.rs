//! # Grammar Rules
//!
//! Each function takes a `&mut Parser` and uses its methods to:
//!
//! 1. Inspect the current token (`p.current()`, `p.at()`, `p.nth()`)
//! 2. Consume tokens (`p.bump()`, `p.eat()`, `p.bump_n()`)
//! 3. Build tree structure (`p.start()` → marker → `complete()`/`abandon()`)
//!
//! ## Module Structure
//!
//! - [`markup`] - Html and Xml documents (tags, attributes, text, doctype)
//! - [`template`] - Template documents (`t:` tags, scriptlets, opaque text)
//!
//! Both grammars share the start-tag and closing-tag rules in this module.
//!
//! ## Error Recovery
//!
//! Grammar functions are lenient: every input produces a tree holding every
//! byte. A closing tag that matches an enclosing open tag implicitly closes
//! the tags in between; one that matches nothing becomes an `ERROR` node.

pub mod markup;
pub mod template;

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// How a start tag ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartTag {
    /// `>`: content follows.
    Open,
    /// `/>`
    SelfClosed,
    /// Ran into another construct or the end of input.
    Unterminated,
}

/// Parse attributes up to (and including) the end of a start tag.
///
/// Assumes `<` and the tag name are already consumed.
fn start_tag_rest(p: &mut Parser<'_, '_>) -> StartTag {
    loop {
        match p.current() {
            SyntaxKind::TAG_END => {
                p.bump();
                return StartTag::Open;
            }
            SyntaxKind::EMPTY_TAG_END => {
                p.bump();
                return StartTag::SelfClosed;
            }
            // Unterminated start tag; leave the next tag for the caller
            SyntaxKind::EOF
            | SyntaxKind::START_TAG_START
            | SyntaxKind::END_TAG_START
            | SyntaxKind::COMMENT
            | SyntaxKind::DOCTYPE_START
            | SyntaxKind::SCRIPTLET_CODE => return StartTag::Unterminated,
            SyntaxKind::NAME => attribute(p),
            _ => p.bump(),
        }
    }
}

/// `name`, `name=value` or `name = "value"`.
fn attribute(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.bump();

    let eq_at = if p.at(SyntaxKind::EQ) {
        Some(0)
    } else if p.current().is_trivia() && p.nth(1) == SyntaxKind::EQ {
        Some(1)
    } else {
        None
    };

    if let Some(n) = eq_at {
        for _ in 0..=n {
            p.bump();
        }
        if p.current().is_trivia()
            && matches!(p.nth(1), SyntaxKind::ATTR_VALUE | SyntaxKind::NAME)
        {
            p.bump();
        }
        match p.current() {
            SyntaxKind::ATTR_VALUE => p.bump(),
            // Unquoted value
            SyntaxKind::NAME => p.bump_as(SyntaxKind::ATTR_VALUE),
            _ => {}
        }
    }

    m.complete(p, SyntaxKind::ATTRIBUTE);
}

/// Name of the closing tag at the current position, "" when nameless.
fn closing_name<'i>(p: &Parser<'_, 'i>) -> &'i str {
    if p.nth(1) == SyntaxKind::NAME {
        p.nth_text(1)
    } else {
        ""
    }
}

/// Consume `</name>` tokens into the current node.
fn closing_tag(p: &mut Parser<'_, '_>) {
    p.bump();
    p.eat(SyntaxKind::NAME);
    while p.current().is_trivia() {
        p.bump();
    }
    p.eat(SyntaxKind::TAG_END);
}

/// A closing tag that matches no open tag.
fn stray_closing_tag(p: &mut Parser<'_, '_>) {
    let m = p.start();
    closing_tag(p);
    m.complete(p, SyntaxKind::ERROR);
}

/// Outcome of meeting a closing tag inside an element.
enum Closing {
    /// It closes the current element.
    Own,
    /// It closes an enclosing element; the current one ends implicitly.
    Ancestor,
    /// It matches nothing.
    Stray,
}

fn classify_closing(name: &str, open: &[&str], same: impl Fn(&str, &str) -> bool) -> Closing {
    match open.split_last() {
        Some((own, _)) if same(*own, name) => Closing::Own,
        Some((_, outer)) if outer.iter().any(|o| same(*o, name)) => Closing::Ancestor,
        _ => Closing::Stray,
    }
}

/// Tokens up to and including the first `>`/`/>` of a tag at the current
/// position, stopping short of anything that opens another construct.
fn tag_extent(p: &Parser<'_, '_>) -> usize {
    let mut n = 1;
    loop {
        match p.nth(n) {
            SyntaxKind::TAG_END | SyntaxKind::EMPTY_TAG_END => return n + 1,
            SyntaxKind::EOF
            | SyntaxKind::START_TAG_START
            | SyntaxKind::END_TAG_START
            | SyntaxKind::COMMENT
            | SyntaxKind::DOCTYPE_START
            | SyntaxKind::SCRIPTLET_CODE => return n,
            _ => n += 1,
        }
    }
}
