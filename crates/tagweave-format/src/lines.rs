use xi_rope::Rope;

use crate::span::Span;

/// A single line of a rope with its byte span.
#[derive(Debug, Clone)]
pub struct LineRef {
    /// Byte span of the line, newline included.
    pub span: Span,
    pub text: String,
}

impl LineRef {
    /// Span of the line without surrounding whitespace, `None` for a blank
    /// line.
    pub fn content_span(&self) -> Option<Span> {
        let content = self.text.trim();
        if content.is_empty() {
            return None;
        }
        let start = self.span.start + (self.text.len() - self.text.trim_start().len());
        Some(Span {
            start,
            end: start + content.len(),
        })
    }
}

/// Lines of `rope` with their spans, shifted by `base`.
///
/// `lines_raw` keeps newline characters so spans stay exact.
pub fn lines_with_spans(rope: &Rope, base: usize) -> impl Iterator<Item = LineRef> + '_ {
    let mut offset = base;
    rope.lines_raw(..).map(move |line| {
        let start = offset;
        offset += line.len();
        LineRef {
            span: Span { start, end: offset },
            text: line.into_owned(),
        }
    })
}

/// Zero-based line number of `offset`.
pub fn line_of(rope: &Rope, offset: usize) -> usize {
    lines_with_spans(rope, 0)
        .position(|line| offset < line.span.end)
        .unwrap_or_else(|| lines_with_spans(rope, 0).count().saturating_sub(1))
}
