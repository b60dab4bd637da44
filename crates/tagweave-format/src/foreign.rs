//! Formatters for embedded dialects and the adapter that mounts their
//! blocks in the host tree.
//!
//! A [`ForeignFormatter`] builds a [`ForeignModel`] for one node of its
//! dialect. [`ForeignBlockAdapter`] asks the [`FormatterRegistry`] for the
//! formatter and wraps the model's root block as a [`BlockKind::Foreign`]
//! block, keeping the indent the host chose for that position.
//!
//! Formatters can hand parts of their node back to the host builder through
//! [`ForeignContext::build_host_block`].

use std::collections::HashMap;

use tagweave_syntax::ast::{closing_tag_start, start_tag_end};
use tagweave_syntax::{Dialect, SyntaxKind, SyntaxNode};
use xi_rope::Rope;

use crate::block::{Block, BlockKind, ForeignBlock, FormatBlock, Indent};
use crate::builder::{self, BuildBlock, Layout};
use crate::context::{BuildContext, RootBinding};
use crate::error::{FormatError, Result};
use crate::lines::lines_with_spans;
use crate::policy::MarkupPolicy;
use crate::span::Span;

/// Builds blocks for nodes of one embedded dialect.
pub trait ForeignFormatter: Send + Sync {
    fn dialect(&self) -> Dialect;

    fn create_model(&self, element: &SyntaxNode, cx: &ForeignContext<'_, '_>) -> Result<ForeignModel>;
}

/// What a foreign formatter produced for one node.
#[derive(Debug)]
pub struct ForeignModel {
    root: Box<dyn FormatBlock>,
}

impl ForeignModel {
    pub fn new(root: impl FormatBlock + 'static) -> Self {
        Self {
            root: Box::new(root),
        }
    }

    pub fn root_block(&self) -> &dyn FormatBlock {
        self.root.as_ref()
    }

    pub fn into_root_block(self) -> Box<dyn FormatBlock> {
        self.root
    }
}

/// The part of a build a foreign formatter may see.
pub struct ForeignContext<'c, 'a> {
    cx: &'c BuildContext<'a>,
}

impl<'c, 'a> ForeignContext<'c, 'a> {
    pub(crate) fn new(cx: &'c BuildContext<'a>) -> Self {
        Self { cx }
    }

    pub fn text(&self) -> &'a str {
        self.cx.text()
    }

    pub fn slice(&self, span: Span) -> &'a str {
        self.cx.slice(span)
    }

    pub fn policy(&self) -> &'a dyn MarkupPolicy {
        self.cx.policy()
    }

    pub fn root(&self) -> Option<&RootBinding> {
        self.cx.root()
    }

    /// Builds a host block for a markup node nested in a foreign one.
    ///
    /// Only valid inside a build that has bound its root.
    pub fn build_host_block(&self, node: &SyntaxNode, indent: Option<Indent>) -> Result<Block> {
        if self.cx.root().is_none() {
            return Err(FormatError::InvariantViolation(format!(
                "host block for {:?} requested before the build root was bound",
                node.kind()
            )));
        }
        builder::build(self.cx, node, None, None, indent)
    }
}

/// Formatters by dialect.
pub struct FormatterRegistry {
    formatters: HashMap<Dialect, Box<dyn ForeignFormatter>>,
}

impl FormatterRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatterRegistry {
            formatters: HashMap::new(),
        }
    }

    /// Register a formatter, replacing any earlier one for its dialect.
    pub fn register<F: ForeignFormatter + 'static>(&mut self, formatter: F) {
        self.formatters
            .insert(formatter.dialect(), Box::new(formatter));
    }

    pub fn lookup(&self, dialect: Dialect) -> Option<&dyn ForeignFormatter> {
        self.formatters.get(&dialect).map(|f| f.as_ref())
    }

    pub fn has(&self, dialect: Dialect) -> bool {
        self.formatters.contains_key(&dialect)
    }

    /// Registered dialects (sorted)
    pub fn dialects(&self) -> Vec<Dialect> {
        let mut dialects: Vec<_> = self.formatters.keys().copied().collect();
        dialects.sort();
        dialects
    }

    /// Registry with the line formatter for script and style.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(LinesFormatter::new(Dialect::Script));
        registry.register(LinesFormatter::new(Dialect::Style));
        registry
    }
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

/// Formats a fragment body one line at a time.
///
/// The start and end markers of the fragment become leaves of their own and
/// every non-blank body line becomes a leaf with normal indent.
#[derive(Debug, Clone, Copy)]
pub struct LinesFormatter {
    dialect: Dialect,
}

impl LinesFormatter {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }
}

/// Start marker, body and end marker of a fragment node.
#[derive(Debug, PartialEq, Eq)]
struct FragmentParts {
    open: Option<Span>,
    body: Span,
    close: Option<Span>,
}

impl FragmentParts {
    fn of(node: &SyntaxNode, text: &str) -> FragmentParts {
        let span = Span::from(node.text_range());
        if node.kind() == SyntaxKind::SCRIPTLET {
            return Self::delimited(span, text, "<%", "%>");
        }

        let Some(head_end) = start_tag_end(node).map(|t| Span::from(t.text_range()).end) else {
            return FragmentParts {
                open: None,
                body: span,
                close: None,
            };
        };
        let close = closing_tag_start(node).map(|t| Span {
            start: Span::from(t.text_range()).start,
            end: span.end,
        });
        FragmentParts {
            open: Some(Span {
                start: span.start,
                end: head_end,
            }),
            body: Span {
                start: head_end,
                end: close.map_or(span.end, |c| c.start),
            },
            close,
        }
    }

    fn delimited(span: Span, text: &str, open: &str, close: &str) -> FragmentParts {
        let source = text.get(span.start..span.end).unwrap_or("");
        let body_start = if source.starts_with(open) {
            span.start + open.len()
        } else {
            span.start
        };
        let body_end = if source.len() >= open.len() + close.len() && source.ends_with(close) {
            span.end - close.len()
        } else {
            span.end
        };
        FragmentParts {
            open: (body_start > span.start).then_some(Span {
                start: span.start,
                end: body_start,
            }),
            body: Span {
                start: body_start,
                end: body_end.max(body_start),
            },
            close: (body_end < span.end).then_some(Span {
                start: body_end,
                end: span.end,
            }),
        }
    }
}

impl ForeignFormatter for LinesFormatter {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn create_model(&self, element: &SyntaxNode, cx: &ForeignContext<'_, '_>) -> Result<ForeignModel> {
        let span = Span::from(element.text_range());
        let parts = FragmentParts::of(element, cx.text());

        let mut root = Block::new(span, BlockKind::Node(element.kind()));
        root.spacing = Some(cx.policy().default_spacing(true, false));

        if let Some(open) = parts.open {
            root.children
                .push(Block::new(open, BlockKind::Leaf(SyntaxKind::START_TAG_START)));
        }
        let rope = Rope::from(cx.slice(parts.body));
        for line in lines_with_spans(&rope, parts.body.start) {
            if let Some(content) = line.content_span() {
                root.children.push(
                    Block::new(content, BlockKind::Leaf(SyntaxKind::RAW_TEXT))
                        .with_layout(None, None, Some(Indent::Normal)),
                );
            }
        }
        if let Some(close) = parts.close {
            root.children
                .push(Block::new(close, BlockKind::Leaf(SyntaxKind::END_TAG_START)));
        }

        Ok(ForeignModel::new(root))
    }
}

/// Mounts a foreign formatter's blocks in the host tree.
#[derive(Debug, Clone, Copy)]
pub struct ForeignBlockAdapter {
    pub dialect: Dialect,
}

impl ForeignBlockAdapter {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Builds `element` with the formatter registered for this dialect.
    pub fn wrap(&self, cx: &BuildContext<'_>, element: &SyntaxNode, indent: Option<Indent>) -> Result<Block> {
        let formatter = cx
            .registry()
            .lookup(self.dialect)
            .ok_or(FormatError::NoFormatterRegistered(self.dialect))?;
        let model = formatter.create_model(element, &ForeignContext::new(cx))?;

        let span = Span::from(element.text_range());
        let root_span = model.root_block().text_range();
        if !span.contains(root_span) {
            return Err(FormatError::Foreign {
                dialect: self.dialect,
                message: format!("root block {root_span:?} lies outside its element {span:?}"),
            });
        }
        let root = model.into_root_block();

        log::debug!("Mounted {} block over {span:?}", self.dialect);
        Ok(Block::new(
            span,
            BlockKind::Foreign(ForeignBlock {
                dialect: self.dialect,
                root,
            }),
        )
        .with_layout(None, None, indent))
    }
}

impl BuildBlock for ForeignBlockAdapter {
    fn build_block(&self, cx: &BuildContext<'_>, node: &SyntaxNode, layout: Layout) -> Result<Block> {
        self.wrap(cx, node, layout.indent)
    }
}
