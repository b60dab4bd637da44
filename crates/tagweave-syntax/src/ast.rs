//! Typed view over element nodes.

use crate::syntax_kind::{SyntaxKind, SyntaxNode, SyntaxToken};

/// An element: `TAG`, `SCRIPT_ELEMENT` or `STYLE_ELEMENT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag(SyntaxNode);

impl Tag {
    pub fn cast(node: SyntaxNode) -> Option<Tag> {
        node.kind().is_element().then_some(Tag(node))
    }

    pub fn syntax(&self) -> &SyntaxNode {
        &self.0
    }

    pub fn text_range(&self) -> rowan::TextRange {
        self.0.text_range()
    }

    /// Tag name as written in the start tag; empty for a nameless tag.
    pub fn name(&self) -> String {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind() == SyntaxKind::NAME)
            .map(|t| t.text().to_string())
            .unwrap_or_default()
    }

    /// Direct child elements.
    pub fn sub_tags(&self) -> Vec<Tag> {
        self.0.children().filter_map(Tag::cast).collect()
    }

    pub fn has_sub_tags(&self) -> bool {
        self.0.children().any(|n| n.kind().is_element())
    }

    /// Nearest enclosing element.
    pub fn parent_tag(&self) -> Option<Tag> {
        self.0.ancestors().skip(1).find_map(Tag::cast)
    }

    pub fn attributes(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.0
            .children()
            .filter(|n| n.kind() == SyntaxKind::ATTRIBUTE)
    }

    /// `<name/>`
    pub fn is_empty_element(&self) -> bool {
        self.0
            .children_with_tokens()
            .any(|e| e.kind() == SyntaxKind::EMPTY_TAG_END)
    }

    /// The `>` ending the start tag.
    pub fn start_tag_end(&self) -> Option<SyntaxToken> {
        start_tag_end(&self.0)
    }

    /// The `</` opening the closing tag.
    pub fn closing_tag_start(&self) -> Option<SyntaxToken> {
        closing_tag_start(&self.0)
    }
}

/// First `>` among the direct children of `node`.
pub fn start_tag_end(node: &SyntaxNode) -> Option<SyntaxToken> {
    direct_token(node, SyntaxKind::TAG_END)
}

/// The `</` among the direct children of `node`.
pub fn closing_tag_start(node: &SyntaxNode) -> Option<SyntaxToken> {
    direct_token(node, SyntaxKind::END_TAG_START)
}

fn direct_token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}
