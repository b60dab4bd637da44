use std::fmt::Write;

use serde::Serialize;
use tagweave_syntax::SourceFile;
use xi_rope::Rope;

use crate::block::{FormatBlock, Indent};
use crate::lines::line_of;
use crate::span::Span;

const PREVIEW_BYTES: usize = 40;

#[derive(Debug, Serialize)]
pub struct Snap {
    pub kind: String,
    pub span: (usize, usize),
    /// One-based line of the block start.
    pub line: usize,
    pub indent: Option<String>,
    pub text: String,
    pub children: Vec<Snap>,
}

pub fn normalize(rope: &Rope, block: &dyn FormatBlock) -> Snap {
    let span = block.text_range();
    Snap {
        kind: block.describe(),
        span: (span.start, span.end),
        line: line_of(rope, span.start) + 1,
        indent: block.indent().and_then(indent_label),
        text: preview(rope, span, PREVIEW_BYTES),
        children: block
            .sub_blocks()
            .into_iter()
            .map(|child| normalize(rope, child))
            .collect(),
    }
}

/// One line per block, children indented under their parent:
///
/// ```text
/// Document(html) 0..8 L1 "<p>a</p>"
///   Tag(p) 0..8 L1 "<p>a</p>"
///     Text 3..4 L1 indent=normal "a"
/// ```
pub fn render(file: &SourceFile, block: &dyn FormatBlock) -> String {
    let rope = Rope::from(file.text());
    let mut out = String::new();
    write_snap(&mut out, &normalize(&rope, block), 0);
    out
}

fn write_snap(out: &mut String, snap: &Snap, depth: usize) {
    let indent = snap
        .indent
        .as_ref()
        .map(|label| format!(" indent={label}"))
        .unwrap_or_default();
    let _ = writeln!(
        out,
        "{:width$}{} {}..{} L{}{} {:?}",
        "",
        snap.kind,
        snap.span.0,
        snap.span.1,
        snap.line,
        indent,
        snap.text,
        width = depth * 2
    );
    for child in &snap.children {
        write_snap(out, child, depth + 1);
    }
}

fn indent_label(indent: Indent) -> Option<String> {
    match indent {
        Indent::None => None,
        Indent::Normal => Some("normal".to_string()),
        Indent::Continuation => Some("continuation".to_string()),
        Indent::Spaces(n) => Some(format!("{n}")),
    }
}

fn slice_to_string(rope: &Rope, sp: Span) -> String {
    let end = sp.end.min(rope.len());
    rope.slice_to_cow(sp.start.min(end)..end).into_owned()
}

/// Text of a span, cut at a char boundary within `max` bytes with a "..."
/// suffix.
fn preview(rope: &Rope, sp: Span, max: usize) -> String {
    let mut s = slice_to_string(rope, sp);
    if s.len() > max {
        let mut cut = max;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        s.truncate(cut);
        s.push_str("...");
    }
    s
}
