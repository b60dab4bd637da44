//! # Block Tree Builder
//!
//! Walks one syntax tree depth-first and turns every node into a [`Block`].
//!
//! ## Routing a child
//!
//! Each non-blank child is classified first:
//!
//! - **Same tree**: the child's dialect is the node's own, a markup dialect,
//!   or one nobody formats. It becomes a leaf or a nested block, unless it is
//!   a carrier token that another markup tree of the file describes better.
//! - **Foreign**: the child's dialect has a registered formatter and its tree
//!   is enabled. The [`ForeignBlockAdapter`] builds it.
//!
//! ## Islands
//!
//! In a template file the template tree and the Html tree cover the same
//! text. When a carrier token of one tree starts where a tag of the other
//! tree starts, and that tag fits inside the current node without crossing
//! any of its sub-tags, the tag is built from the other tree instead. The
//! builder then keeps consuming tags of the other tree for as long as they
//! tile the carrier, emits the untiled tail as a residual block, and resumes
//! after the carrier in its own tree.
//!
//! ```text
//!   template tree:  [TEMPLATE_TEXT "<div>"][TAG t:if ...][TEMPLATE_TEXT "</div>"]
//!   html tree:      [TAG div [<div>][OUTER_FRAGMENT][TEXT][OUTER_FRAGMENT][</div>]]
//! ```
//!
//! Built from the template root, the first carrier hands the whole `div` to
//! the Html tree, and the `t:if` tag comes back through the Html tree's
//! first fragment.

use rowan::NodeOrToken;
use tagweave_syntax::{Dialect, SyntaxElement, SyntaxKind, SyntaxNode, Tag, ast};

use crate::block::{Alignment, Block, BlockKind, Indent, LineBreakHint, Wrap, WrapType};
use crate::context::BuildContext;
use crate::error::{FormatError, Result};
use crate::foreign::{ForeignBlockAdapter, FormatterRegistry};
use crate::locator::{find_child_after, find_enclosing_tag_at, find_foreign_root_at};
use crate::policy::{MarkupPolicy, WrapContext};
use crate::span::Span;

/// Wrap, alignment and indent handed to a block by its parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Layout {
    pub wrap: Option<Wrap>,
    pub alignment: Option<Alignment>,
    pub indent: Option<Indent>,
}

impl Layout {
    pub fn indented(indent: Option<Indent>) -> Layout {
        Layout {
            indent,
            ..Layout::default()
        }
    }
}

/// Builds the block for one node.
///
/// The host builder and the foreign adapter are the two implementations.
pub trait BuildBlock {
    fn build_block(&self, cx: &BuildContext<'_>, node: &SyntaxNode, layout: Layout) -> Result<Block>;
}

/// The host builder.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupBuilder;

impl BuildBlock for MarkupBuilder {
    fn build_block(&self, cx: &BuildContext<'_>, node: &SyntaxNode, layout: Layout) -> Result<Block> {
        build(cx, node, layout.wrap, layout.alignment, layout.indent)
    }
}

/// Builds the block tree for `node`.
///
/// A parentless node becomes the root of the build unless one is already
/// bound. Nesting past the context's depth limit is an
/// [`FormatError::InvariantViolation`].
pub fn build(
    cx: &BuildContext<'_>,
    node: &SyntaxNode,
    wrap: Option<Wrap>,
    alignment: Option<Alignment>,
    indent: Option<Indent>,
) -> Result<Block> {
    let _level = cx.enter()?;
    if node.parent().is_none() {
        cx.bind_root(node);
    }
    NodeBuilder::new(cx, node, alignment).build(Layout {
        wrap,
        alignment,
        indent,
    })
}

/// How a child is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SameTree,
    Foreign(Dialect),
}

pub fn classify(
    current: Dialect,
    child: Dialect,
    policy: &dyn MarkupPolicy,
    registry: &FormatterRegistry,
) -> Route {
    if child == current
        || child.is_markup()
        || !registry.has(child)
        || !policy.dialect_tree_enabled(child)
    {
        Route::SameTree
    } else {
        Route::Foreign(child)
    }
}

/// The wraps a node hands out to its children.
#[derive(Debug, Clone, Copy)]
pub struct ChildWraps {
    pub tag_begin: Wrap,
    pub attribute: Wrap,
    pub text: Wrap,
    /// Only for tags whose end may wrap.
    pub tag_end: Option<Wrap>,
}

pub fn choose_wrap(node_kind: SyntaxKind, child_kind: SyntaxKind, wraps: &ChildWraps) -> Option<Wrap> {
    if node_kind == SyntaxKind::TEXT {
        return Some(wraps.text);
    }
    match child_kind {
        SyntaxKind::ATTRIBUTE => Some(wraps.attribute),
        SyntaxKind::START_TAG_START => Some(wraps.tag_begin),
        SyntaxKind::END_TAG_START => wraps.tag_end,
        SyntaxKind::TEXT | SyntaxKind::DATA_CHARACTERS => Some(wraps.text),
        // Quoted doctype identifiers wrap like attributes
        SyntaxKind::ATTR_VALUE if node_kind == SyntaxKind::DOCTYPE => Some(wraps.attribute),
        _ => None,
    }
}

/// The alignments a node hands out. `attribute` and `text` are only set
/// when the policy aligns them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChildAlignments {
    pub own: Option<Alignment>,
    pub attribute: Option<Alignment>,
    pub text: Option<Alignment>,
}

pub fn choose_alignment(
    node_kind: SyntaxKind,
    child_kind: SyntaxKind,
    aligns: &ChildAlignments,
) -> Option<Alignment> {
    if node_kind == SyntaxKind::TEXT {
        return aligns.own;
    }
    match child_kind {
        SyntaxKind::ATTRIBUTE => aligns.attribute,
        SyntaxKind::TEXT => aligns.text,
        _ => None,
    }
}

/// The markers of a node that limit what it can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeBounds {
    pub span: Span,
    pub start_tag_end: Option<Span>,
    pub closing_tag_start: Option<Span>,
}

impl NodeBounds {
    pub fn of(node: &SyntaxNode) -> NodeBounds {
        NodeBounds {
            span: Span::from(node.text_range()),
            start_tag_end: ast::start_tag_end(node).map(|t| Span::from(t.text_range())),
            closing_tag_start: ast::closing_tag_start(node).map(|t| Span::from(t.text_range())),
        }
    }

    /// A tag may be mounted under this node.
    ///
    /// Without markers the tag must end inside the node. An open tag with no
    /// closing marker contains nothing. Otherwise the tag must end by the
    /// end of the closing marker.
    pub fn contains_tag(&self, tag: Span) -> bool {
        if tag.start < self.span.start {
            return false;
        }
        match (self.closing_tag_start, self.start_tag_end) {
            (None, None) => tag.end <= self.span.end,
            (None, Some(_)) => false,
            (Some(closing), _) => tag.end <= closing.end,
        }
    }

    /// Inside the start tag's `>` and before the closing tag.
    pub fn in_content(&self, span: Span) -> bool {
        let Some(head) = self.start_tag_end else {
            return false;
        };
        span.start >= head.end && self.closing_tag_start.is_none_or(|c| span.end <= c.start)
    }
}

/// Accepts `candidate` as a tag from another tree found for the element at
/// `from`.
///
/// The candidate may not start before `from`, must fit `bounds`, and may not
/// cross any of `sub_tags`.
pub fn check_island_candidate(
    bounds: &NodeBounds,
    sub_tags: &[Span],
    from: Span,
    candidate: Span,
) -> Result<()> {
    if candidate.start < from.start {
        return Err(FormatError::OverlapConflict {
            candidate,
            with: from,
        });
    }
    if !bounds.contains_tag(candidate) {
        return Err(FormatError::OverlapConflict {
            candidate,
            with: bounds.span,
        });
    }
    match sub_tags.iter().find(|sub| sub.overlaps_partially(candidate)) {
        Some(sub) => Err(FormatError::OverlapConflict {
            candidate,
            with: *sub,
        }),
        None => Ok(()),
    }
}

/// Spans of the tags a candidate must not cross: the direct sub-tags of a
/// tag, every tag below any other node.
pub fn sub_tag_spans(node: &SyntaxNode) -> Vec<Span> {
    match Tag::cast(node.clone()) {
        Some(tag) => tag
            .sub_tags()
            .iter()
            .map(|t| Span::from(t.text_range()))
            .collect(),
        None => node
            .descendants()
            .skip(1)
            .filter_map(Tag::cast)
            .map(|t| Span::from(t.text_range()))
            .collect(),
    }
}

fn element_span(element: &SyntaxElement) -> Span {
    Span::from(element.text_range())
}

fn tag_span(tag: &Tag) -> Span {
    Span::from(tag.text_range())
}

struct NodeBuilder<'c, 'a> {
    cx: &'c BuildContext<'a>,
    node: SyntaxNode,
    dialect: Dialect,
    tag: Option<Tag>,
    bounds: NodeBounds,
    sub_tags: Vec<Span>,
    wraps: ChildWraps,
    aligns: ChildAlignments,
}

impl<'c, 'a> NodeBuilder<'c, 'a> {
    fn new(cx: &'c BuildContext<'a>, node: &SyntaxNode, own: Option<Alignment>) -> Self {
        let policy = cx.policy();
        let tag = Tag::cast(node.clone());

        let tag_begin = match &tag {
            Some(tag) => policy.wrap_type_for(WrapContext::TagBegin(tag)),
            None => WrapType::None,
        };
        let tag_end = tag
            .as_ref()
            .filter(|tag| policy.can_wrap_tag_end(tag))
            .map(|tag| Wrap::new(policy.wrap_type_for(WrapContext::TagEnd(tag)), true));
        let wraps = ChildWraps {
            tag_begin: Wrap::new(tag_begin, true),
            attribute: Wrap::new(policy.wrap_type_for(WrapContext::Attribute), false),
            text: Wrap::new(policy.wrap_type_for(WrapContext::Text), false),
            tag_end,
        };
        let aligns = ChildAlignments {
            own,
            attribute: policy.should_align_attributes().then(Alignment::new),
            text: policy.should_align_text().then(Alignment::new),
        };

        NodeBuilder {
            cx,
            node: node.clone(),
            dialect: Dialect::of(node),
            bounds: NodeBounds::of(node),
            sub_tags: sub_tag_spans(node),
            tag,
            wraps,
            aligns,
        }
    }

    fn build(self, layout: Layout) -> Result<Block> {
        let kind = if self.node.kind().is_document() {
            BlockKind::Document(self.dialect)
        } else if let Some(tag) = &self.tag {
            BlockKind::Tag { name: tag.name() }
        } else {
            match self.node.kind() {
                SyntaxKind::TEXT => BlockKind::Text,
                SyntaxKind::DOCTYPE => BlockKind::Doctype,
                kind => BlockKind::Node(kind),
            }
        };

        let policy = self.cx.policy();
        let mut block = Block::new(self.bounds.span, kind).with_layout(
            layout.wrap,
            layout.alignment,
            layout.indent,
        );
        block.spacing = Some(policy.default_spacing(false, self.node.kind() == SyntaxKind::TEXT));
        if let Some(tag) = &self.tag {
            block.line_break = if policy.insert_line_break_before(tag) {
                LineBreakHint::Insert
            } else if policy.remove_line_break_before(tag) {
                LineBreakHint::Remove
            } else {
                LineBreakHint::Keep
            };
        }
        block.children = self.build_children()?;
        Ok(block)
    }

    fn build_children(&self) -> Result<Vec<Block>> {
        let mut out = Vec::new();
        let mut cursor = self.node.first_child_or_token();
        while let Some(child) = cursor {
            let resume = if self.is_blank(&child) {
                Some(child)
            } else {
                let layout = self.child_layout(&child);
                self.classify_and_emit(&mut out, child, layout)?
            };
            cursor = resume.and_then(|e| e.next_sibling_or_token());
        }
        Ok(out)
    }

    fn is_blank(&self, element: &SyntaxElement) -> bool {
        self.cx.slice(element_span(element)).trim().is_empty()
    }

    fn child_layout(&self, child: &SyntaxElement) -> Layout {
        Layout {
            wrap: choose_wrap(self.node.kind(), child.kind(), &self.wraps),
            alignment: choose_alignment(self.node.kind(), child.kind(), &self.aligns),
            indent: self.child_indent(child),
        }
    }

    fn child_indent(&self, child: &SyntaxElement) -> Option<Indent> {
        let tag = self.tag.as_ref()?;
        if child.kind() == SyntaxKind::ATTRIBUTE {
            Some(Indent::Continuation)
        } else if self.bounds.in_content(element_span(child)) && self.cx.policy().indent_children_of(tag) {
            Some(Indent::Normal)
        } else {
            Some(Indent::None)
        }
    }

    /// Emits the block(s) for `child` and returns the element to resume
    /// after, or `None` to stop walking this node.
    fn classify_and_emit(
        &self,
        out: &mut Vec<Block>,
        child: SyntaxElement,
        layout: Layout,
    ) -> Result<Option<SyntaxElement>> {
        log::trace!("Child {:?} at {:?}", child.kind(), child.text_range());
        let policy = self.cx.policy();
        let route = classify(
            self.dialect,
            Dialect::of_element(&child),
            policy,
            self.cx.registry(),
        );

        match route {
            Route::Foreign(dialect) => {
                if let NodeOrToken::Node(node) = &child {
                    match ForeignBlockAdapter::new(dialect).build_block(self.cx, node, layout) {
                        Ok(block) => {
                            out.push(block);
                            return Ok(Some(child));
                        }
                        Err(err) if err.is_recoverable() => {
                            log::warn!("{err}; keeping {:?} in the host tree", node.kind());
                        }
                        Err(err) => return Err(err),
                    }
                }
            }
            Route::SameTree => {
                if self.can_host_island(&child) {
                    let from = element_span(&child);
                    if let Some(tag) = find_enclosing_tag_at(self.cx, &self.node, from.start) {
                        match check_island_candidate(&self.bounds, &self.sub_tags, from, tag_span(&tag)) {
                            Ok(()) => {
                                log::debug!("Island tag {} accepted at {from:?}", tag.name());
                                return self.consume_foreign_tags(out, tag, layout);
                            }
                            Err(err) => log::debug!("Island tag {} rejected: {err}", tag.name()),
                        }
                    }
                }
            }
        }

        self.emit_simple(out, &child, layout)?;
        Ok(Some(child))
    }

    fn can_host_island(&self, child: &SyntaxElement) -> bool {
        self.cx.policy().processes_foreign_islands()
            && self.cx.file().dialect().supports_islands()
            && (self.tag.is_some() || self.node.kind().is_document())
            && child.as_token().is_some_and(|t| t.kind().is_island_carrier())
    }

    /// Mounts `first` and every following tag of the same tree that tiles
    /// the leaf it ends in, then finds where to resume in this tree.
    fn consume_foreign_tags(
        &self,
        out: &mut Vec<Block>,
        first: Tag,
        layout: Layout,
    ) -> Result<Option<SyntaxElement>> {
        let indent = self.remount_indent(&first, layout.indent);
        self.emit_other_tree_tag(out, &first, indent)?;

        let mut consumed = tag_span(&first);
        let mut current = find_child_after(&self.node, consumed.end)?;
        while let Some(leaf) = current {
            let leaf_span = Span::from(leaf.text_range());
            if leaf_span.end <= consumed.end {
                return self.resume_at_level(out, NodeOrToken::Token(leaf), layout);
            }

            // The next tag has to start where the last one ended, give or
            // take whitespace
            let gap = self.cx.slice(Span {
                start: consumed.end,
                end: leaf_span.end,
            });
            let from = Span {
                start: consumed.end + (gap.len() - gap.trim_start().len()),
                end: leaf_span.end,
            };
            let next = (!from.is_empty())
                .then(|| find_enclosing_tag_at(self.cx, &self.node, from.start))
                .flatten()
                .filter(|next| {
                    match check_island_candidate(&self.bounds, &self.sub_tags, from, tag_span(next)) {
                        Ok(()) => true,
                        Err(err) => {
                            log::debug!("Island tag {} rejected: {err}", next.name());
                            false
                        }
                    }
                });
            match next {
                Some(next) => {
                    self.emit_other_tree_tag(out, &next, indent)?;
                    consumed = tag_span(&next);
                    current = find_child_after(&self.node, consumed.end)?;
                }
                None => {
                    self.emit_residual(
                        out,
                        Span {
                            start: consumed.end,
                            end: leaf_span.end,
                        },
                        layout,
                    );
                    return self.resume_at_level(out, NodeOrToken::Token(leaf), layout);
                }
            }
        }
        Ok(None)
    }

    /// A tag taken from another tree directly under a document is indented
    /// like a child of its own parent tag.
    fn remount_indent(&self, tag: &Tag, indent: Option<Indent>) -> Option<Indent> {
        if self.node.kind().is_document()
            && tag
                .parent_tag()
                .is_some_and(|parent| self.cx.policy().indent_children_of(&parent))
        {
            return Some(Indent::Normal);
        }
        indent
    }

    fn emit_other_tree_tag(&self, out: &mut Vec<Block>, tag: &Tag, indent: Option<Indent>) -> Result<()> {
        let node = tag.syntax();
        let dialect = Dialect::of(node);
        let adapter = ForeignBlockAdapter::new(dialect);
        let builder: &dyn BuildBlock = if dialect.is_markup() {
            &MarkupBuilder
        } else {
            &adapter
        };

        let block = match builder.build_block(self.cx, node, Layout::indented(indent)) {
            Ok(block) => block,
            Err(err) if err.is_recoverable() => {
                log::warn!("{err}; building {} as markup", tag.name());
                MarkupBuilder.build_block(self.cx, node, Layout::indented(indent))?
            }
            Err(err) => return Err(err),
        };
        out.push(block);
        Ok(())
    }

    /// The part of a host leaf after the last tag mounted from another tree.
    fn emit_residual(&self, out: &mut Vec<Block>, span: Span, layout: Layout) {
        if span.is_empty() {
            return;
        }
        out.push(Block::new(span, BlockKind::Residual).with_layout(
            layout.wrap,
            layout.alignment,
            layout.indent,
        ));
    }

    /// Climbs from `current` back to a child of this node, building the
    /// remaining siblings on each level passed.
    fn resume_at_level(
        &self,
        out: &mut Vec<Block>,
        mut current: SyntaxElement,
        layout: Layout,
    ) -> Result<Option<SyntaxElement>> {
        loop {
            let Some(parent) = current.parent() else {
                return Ok(Some(current));
            };
            if parent == self.node {
                return Ok(Some(current));
            }
            let Some(last) = self.process_all_children_from(out, current, layout)? else {
                return Ok(None);
            };
            match last.parent() {
                Some(parent) if parent == self.node => return Ok(Some(last)),
                Some(parent) => current = NodeOrToken::Node(parent),
                None => return Ok(Some(last)),
            }
        }
    }

    /// Builds the siblings after `from` up to a closing tag.
    fn process_all_children_from(
        &self,
        out: &mut Vec<Block>,
        from: SyntaxElement,
        layout: Layout,
    ) -> Result<Option<SyntaxElement>> {
        let mut last = from.clone();
        let mut cursor = from.next_sibling_or_token();
        while let Some(child) = cursor {
            if child.kind() == SyntaxKind::END_TAG_START {
                break;
            }
            let resume = if self.is_blank(&child) {
                Some(child)
            } else {
                let resumed = self.classify_and_emit(out, child, layout)?;
                match &resumed {
                    Some(element) => last = element.clone(),
                    None => return Ok(None),
                }
                resumed
            };
            cursor = resume.and_then(|e| e.next_sibling_or_token());
        }
        Ok(Some(last))
    }

    fn emit_simple(&self, out: &mut Vec<Block>, child: &SyntaxElement, layout: Layout) -> Result<()> {
        let span = element_span(child);
        if let Some(island) = self.island_block(child, layout)? {
            out.push(island);
            return Ok(());
        }

        let block = match child {
            NodeOrToken::Node(node)
                if node.kind().is_element()
                    || matches!(node.kind(), SyntaxKind::TEXT | SyntaxKind::DOCTYPE) =>
            {
                let indent = layout.indent.or(Some(Indent::None));
                build(self.cx, node, layout.wrap, layout.alignment, indent)?
            }
            NodeOrToken::Node(node) => Block::new(span, BlockKind::Leaf(node.kind())).with_layout(
                layout.wrap,
                layout.alignment,
                layout.indent,
            ),
            NodeOrToken::Token(token) => Block::new(span, BlockKind::Leaf(token.kind()))
                .with_layout(layout.wrap, layout.alignment, layout.indent),
        };
        out.push(block);
        Ok(())
    }

    /// A template carrier whose start another tree describes as a fragment
    /// lying inside it.
    fn island_block(&self, child: &SyntaxElement, layout: Layout) -> Result<Option<Block>> {
        let policy = self.cx.policy();
        if !policy.processes_foreign_islands()
            || !matches!(
                child.kind(),
                SyntaxKind::TEMPLATE_TEXT | SyntaxKind::OUTER_FRAGMENT
            )
        {
            return Ok(None);
        }

        let span = element_span(child);
        let Some((root, dialect)) =
            find_foreign_root_at(self.cx, &self.node, span.start, policy.includes_host_variant_trees())
        else {
            return Ok(None);
        };
        if !span.contains(Span::from(root.text_range())) {
            return Ok(None);
        }

        let adapter = ForeignBlockAdapter::new(dialect);
        let builder: &dyn BuildBlock = if dialect.is_markup() {
            &MarkupBuilder
        } else {
            &adapter
        };
        let inner = match builder.build_block(self.cx, &root, Layout::indented(Some(Indent::None))) {
            Ok(block) => block,
            Err(err) if err.is_recoverable() => {
                log::warn!("{err}; keeping {:?} as a leaf", child.kind());
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        log::debug!("Island of {dialect} over {span:?}");
        let mut block = Block::new(span, BlockKind::Island { dialect }).with_layout(
            layout.wrap,
            layout.alignment,
            layout.indent,
        );
        block.children.push(inner);
        Ok(Some(block))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::FormatBlock;
    use crate::policy::SettingsPolicy;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;
    use tagweave_config::FormatterSettings;
    use tagweave_syntax::{FileKind, SourceFile};

    fn sp(start: usize, end: usize) -> Span {
        Span { start, end }
    }

    fn wraps() -> ChildWraps {
        ChildWraps {
            tag_begin: Wrap::new(WrapType::None, true),
            attribute: Wrap::new(WrapType::Normal, false),
            text: Wrap::new(WrapType::Normal, false),
            tag_end: None,
        }
    }

    fn build_html(text: &str, settings: FormatterSettings, registry: &FormatterRegistry) -> Block {
        let file = SourceFile::parse(text, FileKind::Html);
        let policy = SettingsPolicy::new(settings);
        let cx = BuildContext::new(&file, &policy, registry);
        build(&cx, &file.syntax(), None, None, None).unwrap()
    }

    #[rstest]
    #[case(Dialect::Html, Dialect::Html, Route::SameTree)]
    #[case(Dialect::Template, Dialect::Html, Route::SameTree)]
    #[case(Dialect::Html, Dialect::Script, Route::Foreign(Dialect::Script))]
    #[case(Dialect::Script, Dialect::Script, Route::SameTree)]
    fn classification(#[case] current: Dialect, #[case] child: Dialect, #[case] expected: Route) {
        let policy = SettingsPolicy::default();
        let registry = FormatterRegistry::with_builtin();
        let first = classify(current, child, &policy, &registry);
        let second = classify(current, child, &policy, &registry);

        assert_eq!(first, expected);
        assert_eq!(first, second);
    }

    #[test]
    fn classification_needs_formatter_and_enabled_tree() {
        let empty = FormatterRegistry::new();
        let policy = SettingsPolicy::default();
        assert_eq!(classify(Dialect::Html, Dialect::Script, &policy, &empty), Route::SameTree);

        let mut settings = FormatterSettings::default();
        settings.islands.trees = vec!["style".into()];
        let policy = SettingsPolicy::new(settings);
        let registry = FormatterRegistry::with_builtin();
        assert_eq!(classify(Dialect::Html, Dialect::Script, &policy, &registry), Route::SameTree);
        assert_eq!(
            classify(Dialect::Html, Dialect::Style, &policy, &registry),
            Route::Foreign(Dialect::Style)
        );
    }

    #[rstest]
    #[case(SyntaxKind::TAG, SyntaxKind::ATTRIBUTE, Some("attribute"))]
    #[case(SyntaxKind::TAG, SyntaxKind::START_TAG_START, Some("tag_begin"))]
    #[case(SyntaxKind::TAG, SyntaxKind::END_TAG_START, None)]
    #[case(SyntaxKind::TAG, SyntaxKind::TEXT, Some("text"))]
    #[case(SyntaxKind::TAG, SyntaxKind::NAME, None)]
    #[case(SyntaxKind::TEXT, SyntaxKind::WHITESPACE, Some("text"))]
    #[case(SyntaxKind::DOCTYPE, SyntaxKind::ATTR_VALUE, Some("attribute"))]
    #[case(SyntaxKind::TAG, SyntaxKind::ATTR_VALUE, None)]
    fn wrap_choice(
        #[case] node: SyntaxKind,
        #[case] child: SyntaxKind,
        #[case] expected: Option<&str>,
    ) {
        let w = wraps();
        let expected = expected.map(|name| match name {
            "attribute" => w.attribute,
            "tag_begin" => w.tag_begin,
            _ => w.text,
        });
        assert_eq!(choose_wrap(node, child, &w), expected);
    }

    #[test]
    fn tag_end_wrap_only_when_offered() {
        let mut w = wraps();
        let end = Wrap::new(WrapType::Always, true);
        w.tag_end = Some(end);
        assert_eq!(choose_wrap(SyntaxKind::TAG, SyntaxKind::END_TAG_START, &w), Some(end));
    }

    #[test]
    fn alignment_choice_is_deterministic() {
        let own = Alignment::new();
        let attr = Alignment::new();
        let aligns = ChildAlignments {
            own: Some(own),
            attribute: Some(attr),
            text: None,
        };

        for _ in 0..2 {
            assert_eq!(choose_alignment(SyntaxKind::TEXT, SyntaxKind::DATA_CHARACTERS, &aligns), Some(own));
            assert_eq!(choose_alignment(SyntaxKind::TEXT, SyntaxKind::WHITESPACE, &aligns), Some(own));
            assert_eq!(choose_alignment(SyntaxKind::TAG, SyntaxKind::ATTRIBUTE, &aligns), Some(attr));
            assert_eq!(choose_alignment(SyntaxKind::TAG, SyntaxKind::TEXT, &aligns), None);
            assert_eq!(choose_alignment(SyntaxKind::TAG, SyntaxKind::NAME, &aligns), None);
        }
    }

    #[rstest]
    // no markers: end inside the node
    #[case(NodeBounds { span: sp(0, 20), start_tag_end: None, closing_tag_start: None }, sp(3, 20), true)]
    #[case(NodeBounds { span: sp(0, 20), start_tag_end: None, closing_tag_start: None }, sp(3, 21), false)]
    // open tag without closing marker
    #[case(NodeBounds { span: sp(0, 20), start_tag_end: Some(sp(4, 5)), closing_tag_start: None }, sp(5, 8), false)]
    // up to the end of the closing marker
    #[case(NodeBounds { span: sp(0, 20), start_tag_end: Some(sp(4, 5)), closing_tag_start: Some(sp(14, 16)) }, sp(5, 16), true)]
    #[case(NodeBounds { span: sp(0, 20), start_tag_end: Some(sp(4, 5)), closing_tag_start: Some(sp(14, 16)) }, sp(5, 17), false)]
    #[case(NodeBounds { span: sp(2, 20), start_tag_end: None, closing_tag_start: None }, sp(1, 5), false)]
    fn contains_tag_rules(#[case] bounds: NodeBounds, #[case] tag: Span, #[case] expected: bool) {
        assert_eq!(bounds.contains_tag(tag), expected);
    }

    #[test]
    fn crossing_candidate_is_an_overlap_conflict() {
        let bounds = NodeBounds {
            span: sp(0, 40),
            start_tag_end: None,
            closing_tag_start: None,
        };
        let subs = [sp(0, 15), sp(20, 30)];

        assert_eq!(
            check_island_candidate(&bounds, &subs, sp(10, 12), sp(10, 22)),
            Err(FormatError::OverlapConflict {
                candidate: sp(10, 22),
                with: sp(0, 15),
            })
        );
        assert_eq!(check_island_candidate(&bounds, &subs, sp(16, 18), sp(16, 35)), Ok(()));
        assert!(check_island_candidate(&bounds, &subs, sp(16, 18), sp(12, 18)).is_err());
    }

    proptest! {
        #[test]
        fn accepted_candidates_are_contained(
            start in 0usize..30, len in 0usize..30,
            closing in proptest::option::of(0usize..60),
            a in 0usize..60, b in 0usize..60,
        ) {
            let span = sp(start, start + len);
            let bounds = NodeBounds {
                span,
                start_tag_end: closing.map(|_| sp(start, start)),
                closing_tag_start: closing
                    .map(|c| c.clamp(span.start, span.end))
                    .map(|c| sp(c, c.max(span.end.min(c + 2)))),
            };
            let candidate = sp(a.min(b), a.max(b));
            if check_island_candidate(&bounds, &[], candidate, candidate).is_ok() {
                prop_assert!(span.contains(candidate));
            }
        }

        #[test]
        fn crossing_sub_tags_always_reject(a in 0usize..50, b in 0usize..50, c in 0usize..50, d in 0usize..50) {
            let sub = sp(a.min(b), a.max(b));
            let candidate = sp(c.min(d), c.max(d));
            let bounds = NodeBounds { span: sp(0, 50), start_tag_end: None, closing_tag_start: None };
            if sub.overlaps_partially(candidate) {
                prop_assert!(check_island_candidate(&bounds, &[sub], candidate, candidate).is_err());
            }
        }
    }

    #[test]
    fn node_bounds_content() {
        let file = SourceFile::parse("<p a=\"1\">x</p>", FileKind::Html);
        let p = file.syntax().first_child().unwrap();
        let bounds = NodeBounds::of(&p);

        assert_eq!(bounds.span, sp(0, 14));
        assert_eq!(bounds.start_tag_end, Some(sp(8, 9)));
        assert_eq!(bounds.closing_tag_start, Some(sp(10, 12)));
        assert!(bounds.in_content(sp(9, 10)));
        assert!(!bounds.in_content(sp(3, 8)));
        assert!(!bounds.in_content(sp(10, 14)));
    }

    #[test]
    fn sub_tags_of_tags_and_documents() {
        let file = SourceFile::parse("<ul><li><b>a</b></li></ul>", FileKind::Html);
        let root = file.syntax();
        let ul = root.first_child().unwrap();

        assert_eq!(sub_tag_spans(&ul), vec![sp(4, 21)]);
        assert_eq!(sub_tag_spans(&root), vec![sp(0, 26), sp(4, 21), sp(8, 16)]);
    }

    #[test]
    fn build_binds_the_root_once() {
        let file = SourceFile::parse("<p>a</p>", FileKind::Html);
        let policy = SettingsPolicy::default();
        let registry = FormatterRegistry::new();
        let cx = BuildContext::new(&file, &policy, &registry);
        let root = file.syntax();

        build(&cx, &root, None, None, None).unwrap();
        build(&cx, &root, None, None, None).unwrap();
        assert_eq!(cx.root().unwrap().node, root);
    }

    #[test]
    fn tag_children_layout() {
        let block = build_html(
            "<div class=\"a\" id=\"b\">text</div>",
            FormatterSettings::default(),
            &FormatterRegistry::new(),
        );
        let div = &block.children[0];
        let kinds: Vec<_> = div.children.iter().map(|b| b.describe()).collect();

        assert_eq!(
            kinds,
            vec![
                "Leaf(START_TAG_START)",
                "Leaf(NAME)",
                "Leaf(ATTRIBUTE)",
                "Leaf(ATTRIBUTE)",
                "Leaf(TAG_END)",
                "Text",
                "Leaf(END_TAG_START)",
                "Leaf(NAME)",
                "Leaf(TAG_END)",
            ]
        );
        let (class, id) = (&div.children[2], &div.children[3]);
        assert_eq!(class.indent, Some(Indent::Continuation));
        assert!(class.alignment.is_some());
        assert_eq!(class.alignment, id.alignment);
        assert_eq!(class.wrap, id.wrap);
        assert_eq!(div.children[5].indent, Some(Indent::Normal));
        assert_eq!(div.children[5].alignment, None);
        // no child tags, so the closing tag does not wrap
        assert_eq!(div.children[6].wrap, None);
        assert!(div.children[0].wrap.is_some());
    }

    #[test]
    fn attribute_alignment_disabled() {
        let mut settings = FormatterSettings::default();
        settings.align.attributes = false;
        let block = build_html("<p a=\"1\" b=\"2\"></p>", settings, &FormatterRegistry::new());
        let p = &block.children[0];

        for attr in p.children.iter().filter(|b| b.describe() == "Leaf(ATTRIBUTE)") {
            assert_eq!(attr.alignment, None);
        }
    }

    #[test]
    fn text_children_share_the_text_alignment() {
        let mut settings = FormatterSettings::default();
        settings.align.text = true;
        let block = build_html("<p>one two</p>", settings, &FormatterRegistry::new());
        let text = &block.children[0].children[3];

        assert_eq!(text.describe(), "Text");
        let own = text.alignment;
        assert!(own.is_some());
        assert_eq!(text.children.len(), 2);
        for word in &text.children {
            assert_eq!(word.alignment, own);
            assert!(word.wrap.is_some());
        }
    }

    #[test]
    fn skipped_tags_do_not_indent_children() {
        let block = build_html("<body><p>a</p></body>", FormatterSettings::default(), &FormatterRegistry::new());
        let body = &block.children[0];
        let p = body.children.iter().find(|b| b.tag_name() == Some("p")).unwrap();

        assert_eq!(p.indent, Some(Indent::None));
    }

    #[test]
    fn tag_end_wraps_when_tag_has_children() {
        let block = build_html("<ul><li>a</li></ul>", FormatterSettings::default(), &FormatterRegistry::new());
        let ul = &block.children[0];
        let end = ul.children.iter().find(|b| b.describe() == "Leaf(END_TAG_START)").unwrap();

        assert_eq!(end.wrap.map(Wrap::wrap_type), Some(WrapType::None));
    }

    #[test]
    fn line_break_hints_follow_policy() {
        let mut settings = FormatterSettings::default();
        settings.line_breaks.insert_before = vec!["li".into()];
        settings.line_breaks.remove_before = vec!["b".into()];
        let block = build_html("<ul><li><b>a</b></li></ul>", settings, &FormatterRegistry::new());
        let li = block.children[0].children.iter().find(|b| b.tag_name() == Some("li")).unwrap();
        let b = li.children.iter().find(|b| b.tag_name() == Some("b")).unwrap();

        assert!(li.insert_line_break_before());
        assert!(b.remove_line_break_before());
        assert_eq!(block.children[0].line_break, LineBreakHint::Keep);
    }

    #[test]
    fn doctype_values_take_the_attribute_wrap() {
        let block = build_html(
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD\">",
            FormatterSettings::default(),
            &FormatterRegistry::new(),
        );
        let doctype = &block.children[0];
        let value = doctype.children.iter().find(|b| b.describe() == "Leaf(ATTR_VALUE)").unwrap();

        assert_eq!(doctype.describe(), "Doctype");
        assert_eq!(value.wrap.map(Wrap::wrap_type), Some(WrapType::Normal));
    }
}
