use rowan::{TextRange, TextSize};

use crate::error::FormatError;

/// A byte range `[start, end)` into the document text.
///
/// Blocks, tags and tree elements are compared through spans only; nothing
/// here looks at the text itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    /// Checked constructor.
    pub fn try_new(start: usize, end: usize) -> Result<Span, FormatError> {
        if start > end {
            return Err(FormatError::InvariantViolation(format!(
                "span start {start} is after its end {end}"
            )));
        }
        Ok(Span { start, end })
    }

    /// Length in bytes; zero for an inverted span.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// No bytes covered.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// `other` lies within `self`; equal spans contain each other.
    #[must_use]
    pub fn contains(self, other: Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    #[must_use]
    pub fn contains_offset(self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// The spans share no offset. Adjacent spans (`a.end == b.start`) are
    /// disjoint.
    #[must_use]
    pub fn disjoint(self, other: Span) -> bool {
        self.end <= other.start || other.end <= self.start
    }

    /// Neither nests in the other, yet they intersect.
    #[must_use]
    pub fn overlaps_partially(self, other: Span) -> bool {
        !self.contains(other) && !other.contains(self) && !self.disjoint(other)
    }

    /// `self` ends at or before `other` starts.
    #[must_use]
    pub fn precedes(self, other: Span) -> bool {
        self.end <= other.start
    }

    pub fn to_text_range(self) -> TextRange {
        TextRange::new(to_size(self.start), to_size(self.end))
    }
}

fn to_size(offset: usize) -> TextSize {
    TextSize::try_from(offset).unwrap_or(TextSize::from(u32::MAX))
}

impl From<TextRange> for Span {
    fn from(range: TextRange) -> Self {
        Span {
            start: range.start().into(),
            end: range.end().into(),
        }
    }
}

impl From<Span> for TextRange {
    fn from(span: Span) -> Self {
        span.to_text_range()
    }
}
