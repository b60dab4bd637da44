//! Cross-tree lookups by offset.
//!
//! A template file has more than one tree over the same text. While the
//! builder walks one of them, these functions look at the others: which tag
//! of another markup tree encloses an offset, and which fragment root of
//! another tree starts there.

use rowan::TextSize;
use tagweave_syntax::{Dialect, SyntaxNode, SyntaxToken, Tag};

use crate::context::{BuildContext, tree_root};
use crate::error::{FormatError, Result};

fn text_size(offset: usize) -> Option<TextSize> {
    u32::try_from(offset).ok().map(TextSize::from)
}

fn in_tree(root: &SyntaxNode, offset: TextSize) -> bool {
    let range = root.text_range();
    range.start() <= offset && offset <= range.end()
}

/// The innermost tag of another markup tree whose range contains `offset`.
///
/// Returns `None` when the offset only hits text or document-level tokens in
/// every other tree.
pub fn find_enclosing_tag_at(cx: &BuildContext<'_>, node: &SyntaxNode, offset: usize) -> Option<Tag> {
    let at = text_size(offset)?;
    cx.other_trees(node)
        .filter(|(dialect, _)| dialect.is_markup())
        .filter(|(_, root)| in_tree(root, at))
        .find_map(|(_, root)| {
            let token = root.token_at_offset(at).right_biased()?;
            token
                .parent()?
                .ancestors()
                .filter(|n| n.text_range().contains(at))
                .find_map(Tag::cast)
        })
}

/// The fragment root of another tree that starts at `offset`, with its
/// dialect.
///
/// The root is the outermost node starting at `offset` below the tree root.
/// Carrier and trivia tokens describe nothing, so an offset landing on one
/// has no root. Markup roots only count with `include_host_variant`.
pub fn find_foreign_root_at(
    cx: &BuildContext<'_>,
    node: &SyntaxNode,
    offset: usize,
    include_host_variant: bool,
) -> Option<(SyntaxNode, Dialect)> {
    let at = text_size(offset)?;
    cx.other_trees(node)
        .filter(|(_, root)| in_tree(root, at))
        .find_map(|(_, root)| {
            let token = root.token_at_offset(at).right_biased()?;
            if token.kind().is_trivia() || token.kind().is_island_carrier() {
                return None;
            }
            let mut found = token.parent()?;
            while let Some(parent) = found.parent() {
                if parent.parent().is_none() || parent.text_range().start() != at {
                    break;
                }
                found = parent;
            }
            if found.parent().is_none() {
                return None;
            }
            let dialect = Dialect::of(&found);
            (include_host_variant || !dialect.is_markup()).then_some((found, dialect))
        })
}

/// The token of `node`'s own tree at `offset`, preferring the one that ends
/// there over the one that starts there.
pub fn find_child_after(node: &SyntaxNode, offset: usize) -> Result<Option<SyntaxToken>> {
    let root = tree_root(node);
    let at = text_size(offset)
        .filter(|at| in_tree(&root, *at))
        .ok_or_else(|| {
            FormatError::InvariantViolation(format!(
                "offset {offset} outside tree {:?}",
                root.text_range()
            ))
        })?;
    Ok(root.token_at_offset(at).left_biased())
}
