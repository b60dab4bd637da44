use crate::block::{Block, BlockKind, FormatBlock};
use crate::error::{FormatError, Result};
use crate::span::Span;

/// Checks a host block tree against `text`.
///
/// Every block with children must hold them in order, pairwise disjoint and
/// inside itself. Blocks built from a whole node must also cover every
/// non-whitespace byte of their span.
pub fn check(text: &str, block: &Block) -> Result<()> {
    if block.span.end > text.len() || block.span.start > block.span.end {
        return Err(violation(format!(
            "{} span {:?} out of bounds (text len: {})",
            block.describe(),
            block.span,
            text.len()
        )));
    }
    check_children(block)?;
    if covers_node(&block.kind) {
        check_coverage(text, block)?;
    }
    match &block.kind {
        BlockKind::Foreign(foreign) => check_nested(foreign.root.as_ref()),
        _ => block.children.iter().try_for_each(|child| check(text, child)),
    }
}

fn violation(message: String) -> FormatError {
    FormatError::InvariantViolation(message)
}

fn covers_node(kind: &BlockKind) -> bool {
    matches!(
        kind,
        BlockKind::Document(_)
            | BlockKind::Tag { .. }
            | BlockKind::Text
            | BlockKind::Doctype
            | BlockKind::Node(_)
    )
}

fn check_children(block: &dyn FormatBlock) -> Result<()> {
    let parent = block.text_range();
    let mut previous: Option<Span> = None;
    for child in block.sub_blocks() {
        let span = child.text_range();
        if !parent.contains(span) {
            return Err(violation(format!(
                "{} {span:?} escapes {} {parent:?}",
                child.describe(),
                block.describe()
            )));
        }
        if let Some(prev) = previous.filter(|prev| !prev.precedes(span)) {
            return Err(violation(format!(
                "{} {span:?} overlaps or precedes sibling {prev:?}",
                child.describe()
            )));
        }
        previous = Some(span);
    }
    Ok(())
}

/// Foreign blocks are only held to ordering and containment.
fn check_nested(block: &dyn FormatBlock) -> Result<()> {
    check_children(block)?;
    block.sub_blocks().into_iter().try_for_each(check_nested)
}

fn check_coverage(text: &str, block: &Block) -> Result<()> {
    if block.children.is_empty() {
        return Ok(());
    }
    let mut cursor = block.span.start;
    let gaps = block
        .children
        .iter()
        .map(|child| {
            let gap = Span {
                start: cursor,
                end: child.span.start,
            };
            cursor = child.span.end;
            gap
        })
        .collect::<Vec<_>>();
    let tail = Span {
        start: cursor,
        end: block.span.end,
    };

    for gap in gaps.into_iter().chain(std::iter::once(tail)) {
        let uncovered = text.get(gap.start..gap.end).unwrap_or("");
        if !uncovered.trim().is_empty() {
            return Err(violation(format!(
                "{} leaves {gap:?} ({uncovered:?}) uncovered",
                block.describe()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagweave_syntax::SyntaxKind;

    fn leaf(start: usize, end: usize) -> Block {
        Block::new(Span { start, end }, BlockKind::Leaf(SyntaxKind::NAME))
    }

    fn parent(end: usize, children: Vec<Block>) -> Block {
        let mut block = Block::new(Span { start: 0, end }, BlockKind::Text);
        block.children = children;
        block
    }

    #[test]
    fn accepts_covering_children() {
        let text = "ab cd";
        check(text, &parent(5, vec![leaf(0, 2), leaf(3, 5)])).unwrap();
    }

    #[test]
    fn rejects_overlap() {
        let text = "abcde";
        let err = check(text, &parent(5, vec![leaf(0, 3), leaf(2, 5)])).unwrap_err();
        assert!(matches!(err, FormatError::InvariantViolation(_)));
    }

    #[test]
    fn rejects_escaping_child() {
        let text = "abcdefg";
        assert!(check(text, &parent(5, vec![leaf(0, 6)])).is_err());
    }

    #[test]
    fn rejects_uncovered_text() {
        let text = "ab cd";
        let err = check(text, &parent(5, vec![leaf(0, 2)])).unwrap_err();
        assert!(err.to_string().contains("\" cd\""));
    }

    #[test]
    fn residual_blocks_need_no_children() {
        let text = "tail";
        let block = Block::new(Span { start: 0, end: 4 }, BlockKind::Residual);
        check(text, &block).unwrap();
    }
}
