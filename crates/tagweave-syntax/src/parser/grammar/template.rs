//! Template grammar rules.
//!
//! Only `t:` tags and `<% %>` scriptlets are structure here. Everything in
//! between, host markup included, is opaque `TEMPLATE_TEXT` that the Html
//! tree of the same file describes.

use crate::dialect::has_template_prefix;
use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

use super::{
    Closing, StartTag, classify_closing, closing_name, closing_tag, start_tag_rest,
    stray_closing_tag,
};

/// Parse a whole template document.
pub fn document(p: &mut Parser<'_, '_>) {
    let m = p.start();
    let mut open = Vec::new();

    while !p.at_end() {
        if at_template_closing(p) {
            stray_closing_tag(p);
        } else {
            item(p, &mut open);
        }
    }

    m.complete(p, SyntaxKind::TEMPLATE_DOCUMENT);
}

fn item<'i>(p: &mut Parser<'_, 'i>, open: &mut Vec<&'i str>) {
    match p.current() {
        SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE => p.bump(),
        SyntaxKind::SCRIPTLET_CODE => scriptlet(p),
        _ if at_template_start(p, 0) => template_tag(p, open),
        _ => template_text(p),
    }
}

fn at_template_start(p: &Parser<'_, '_>, n: usize) -> bool {
    p.nth(n) == SyntaxKind::START_TAG_START
        && p.nth(n + 1) == SyntaxKind::NAME
        && has_template_prefix(p.nth_text(n + 1))
}

fn at_template_end(p: &Parser<'_, '_>, n: usize) -> bool {
    p.nth(n) == SyntaxKind::END_TAG_START
        && p.nth(n + 1) == SyntaxKind::NAME
        && has_template_prefix(p.nth_text(n + 1))
}

fn at_template_closing(p: &Parser<'_, '_>) -> bool {
    at_template_end(p, 0)
}

fn scriptlet(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.bump();
    m.complete(p, SyntaxKind::SCRIPTLET);
}

/// `<t:name attrs>...</t:name>` or `<t:name/>`.
fn template_tag<'i>(p: &mut Parser<'_, 'i>, open: &mut Vec<&'i str>) {
    let m = p.start();
    p.bump();
    let name = p.current_text();
    p.bump();

    if start_tag_rest(p) != StartTag::Open {
        m.complete(p, SyntaxKind::TAG);
        return;
    }

    open.push(name);
    while !p.at_end() {
        if at_template_closing(p) {
            match classify_closing(closing_name(p), open, |a, b| a.eq_ignore_ascii_case(b)) {
                Closing::Own => {
                    closing_tag(p);
                    break;
                }
                Closing::Ancestor => break,
                Closing::Stray => stray_closing_tag(p),
            }
        } else {
            item(p, open);
        }
    }
    open.pop();

    m.complete(p, SyntaxKind::TAG);
}

/// Everything up to the next template construct, minus trailing trivia.
fn template_text(p: &mut Parser<'_, '_>) {
    let mut n = 0;
    let mut last_solid = 0;
    loop {
        let kind = p.nth(n);
        if kind == SyntaxKind::EOF
            || kind == SyntaxKind::SCRIPTLET_CODE
            || at_template_start(p, n)
            || at_template_end(p, n)
        {
            break;
        }
        n += 1;
        if !kind.is_trivia() {
            last_solid = n;
        }
    }
    p.bump_n(last_solid, SyntaxKind::TEMPLATE_TEXT);
}
