//! Html and Xml grammar rules.

use crate::dialect::has_template_prefix;
use crate::parser::{ParseMode, Parser};
use crate::syntax_kind::SyntaxKind;

use super::{
    Closing, StartTag, classify_closing, closing_name, closing_tag, start_tag_rest,
    stray_closing_tag, tag_extent,
};

/// Html elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

/// Parse a whole Html or Xml document.
pub fn document(p: &mut Parser<'_, '_>) {
    let m = p.start();
    let mut open = Vec::new();

    while !p.at_end() {
        if at_closing(p) {
            stray_closing_tag(p);
        } else {
            content(p, &mut open);
        }
    }

    let kind = p.mode().root_kind();
    m.complete(p, kind);
}

/// One content item: trivia, comment, doctype, element, carrier or text.
fn content<'i>(p: &mut Parser<'_, 'i>, open: &mut Vec<&'i str>) {
    match p.current() {
        SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE | SyntaxKind::COMMENT => p.bump(),
        SyntaxKind::DOCTYPE_START => doctype(p),
        SyntaxKind::SCRIPTLET_CODE if islands(p) => p.bump_as(SyntaxKind::OUTER_FRAGMENT),
        SyntaxKind::SCRIPTLET_CODE => p.bump(),
        SyntaxKind::START_TAG_START if p.nth(1) == SyntaxKind::NAME => {
            if islands(p) && has_template_prefix(p.nth_text(1)) {
                outer_fragment(p);
            } else {
                element(p, open);
            }
        }
        SyntaxKind::END_TAG_START => outer_fragment(p),
        _ => text(p),
    }
}

fn islands(p: &Parser<'_, '_>) -> bool {
    matches!(p.mode(), ParseMode::Html { islands: true })
}

/// At a closing tag this grammar owns (template closing tags are carriers).
fn at_closing(p: &Parser<'_, '_>) -> bool {
    p.at(SyntaxKind::END_TAG_START) && !(islands(p) && has_template_prefix(closing_name(p)))
}

/// A template construct seen from the Html tree.
fn outer_fragment(p: &mut Parser<'_, '_>) {
    let n = tag_extent(p);
    p.bump_n(n, SyntaxKind::OUTER_FRAGMENT);
}

fn same_name(mode: ParseMode) -> impl Fn(&str, &str) -> bool {
    move |a: &str, b: &str| match mode {
        ParseMode::Xml => a == b,
        _ => a.eq_ignore_ascii_case(b),
    }
}

/// `<name attrs>content</name>`, `<name/>`, void and raw-text elements.
fn element<'i>(p: &mut Parser<'_, 'i>, open: &mut Vec<&'i str>) {
    let m = p.start();
    p.bump();
    let name = p.current_text();
    p.bump();

    let html = matches!(p.mode(), ParseMode::Html { .. });
    let kind = if html && name.eq_ignore_ascii_case("script") {
        SyntaxKind::SCRIPT_ELEMENT
    } else if html && name.eq_ignore_ascii_case("style") {
        SyntaxKind::STYLE_ELEMENT
    } else {
        SyntaxKind::TAG
    };

    let head = start_tag_rest(p);
    let is_void = html && VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name));

    if head != StartTag::Open || is_void {
        m.complete(p, kind);
        return;
    }

    if kind != SyntaxKind::TAG {
        raw_text(p, name);
        m.complete(p, kind);
        return;
    }

    let same = same_name(p.mode());
    open.push(name);
    while !p.at_end() {
        if at_closing(p) {
            match classify_closing(closing_name(p), open, &same) {
                Closing::Own => {
                    closing_tag(p);
                    break;
                }
                Closing::Ancestor => break,
                Closing::Stray => stray_closing_tag(p),
            }
        } else {
            content(p, open);
        }
    }
    open.pop();

    m.complete(p, kind);
}

/// Body of `<script>`/`<style>` as one token, then its closing tag.
fn raw_text(p: &mut Parser<'_, '_>, name: &str) {
    let mut n = 0;
    while p.nth(n) != SyntaxKind::EOF
        && !(p.nth(n) == SyntaxKind::END_TAG_START
            && p.nth(n + 1) == SyntaxKind::NAME
            && p.nth_text(n + 1).eq_ignore_ascii_case(name))
    {
        n += 1;
    }
    p.bump_n(n, SyntaxKind::RAW_TEXT);
    if p.at(SyntaxKind::END_TAG_START) {
        closing_tag(p);
    }
}

/// `<!DOCTYPE html PUBLIC "..." "...">`
fn doctype(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.bump();
    while !p.at_end() && !p.at(SyntaxKind::TAG_END) && !p.at(SyntaxKind::START_TAG_START) {
        p.bump();
    }
    p.eat(SyntaxKind::TAG_END);
    m.complete(p, SyntaxKind::DOCTYPE);
}

/// Whether the token n ahead ends a text run.
fn ends_text(p: &Parser<'_, '_>, n: usize) -> bool {
    match p.nth(n) {
        SyntaxKind::EOF
        | SyntaxKind::END_TAG_START
        | SyntaxKind::COMMENT
        | SyntaxKind::DOCTYPE_START
        | SyntaxKind::SCRIPTLET_CODE => true,
        SyntaxKind::START_TAG_START => p.nth(n + 1) == SyntaxKind::NAME,
        _ => false,
    }
}

/// Character data between tags.
///
/// Words are glued into `DATA_CHARACTERS` tokens; inner whitespace stays as
/// trivia tokens and trailing whitespace is left to the parent.
fn text(p: &mut Parser<'_, '_>) {
    let m = p.start();
    loop {
        if ends_text(p, 0) {
            break;
        }
        if p.current().is_trivia() {
            let mut n = 0;
            while p.nth(n).is_trivia() {
                n += 1;
            }
            if ends_text(p, n) {
                break;
            }
            for _ in 0..n {
                p.bump();
            }
            continue;
        }
        let mut n = 0;
        while !p.nth(n).is_trivia() && !ends_text(p, n) {
            n += 1;
        }
        p.bump_n(n, SyntaxKind::DATA_CHARACTERS);
    }
    m.complete(p, SyntaxKind::TEXT);
}
