//! # Formatting Blocks
//!
//! The output of the builder: a tree of spans over the document, each carrying
//! the wrap, alignment and indent decisions the layout engine applies to it.
//!
//! Blocks never cover whitespace-only regions; the whitespace between two
//! sibling blocks is what the layout engine rewrites, under the parent's
//! [`Spacing`].
//!
//! Blocks built by foreign formatters only need to implement [`FormatBlock`].
//! They are mounted into the host tree through [`BlockKind::Foreign`].

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use tagweave_syntax::{Dialect, SyntaxKind};

use crate::span::Span;

static NEXT_WRAP_ID: AtomicU32 = AtomicU32::new(1);
static NEXT_ALIGNMENT_ID: AtomicU32 = AtomicU32::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapType {
    None,
    Always,
    /// Wrap when the line would be too long.
    Normal,
    /// If any element of the group wraps, all of them do.
    ChopDownIfLong,
}

/// A wrap directive shared by every block it is attached to.
///
/// Blocks holding the same `Wrap` wrap together; identity is the id, not the
/// wrap type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Wrap {
    id: u32,
    wrap_type: WrapType,
    wrap_first_element: bool,
}

impl Wrap {
    pub fn new(wrap_type: WrapType, wrap_first_element: bool) -> Wrap {
        Wrap {
            id: NEXT_WRAP_ID.fetch_add(1, Ordering::Relaxed),
            wrap_type,
            wrap_first_element,
        }
    }

    pub fn id(self) -> u32 {
        self.id
    }

    pub fn wrap_type(self) -> WrapType {
        self.wrap_type
    }

    pub fn wrap_first_element(self) -> bool {
        self.wrap_first_element
    }
}

/// Blocks sharing an alignment start in the same column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Alignment {
    id: u32,
}

impl Alignment {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Alignment {
        Alignment {
            id: NEXT_ALIGNMENT_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn id(self) -> u32 {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indent {
    None,
    Normal,
    Continuation,
    Spaces(u32),
}

/// Constraints on the whitespace between a block's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Spacing {
    pub min_spaces: u32,
    pub max_spaces: u32,
    pub min_line_feeds: u32,
    pub keep_line_breaks: bool,
    pub keep_blank_lines: u32,
}

/// What the policy asks for in front of a tag block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LineBreakHint {
    #[default]
    Keep,
    Insert,
    Remove,
}

/// The capability the layout engine consumes.
///
/// Implemented by host [`Block`]s and by whatever foreign formatters produce.
pub trait FormatBlock: fmt::Debug + Send + Sync {
    fn text_range(&self) -> Span;
    fn sub_blocks(&self) -> Vec<&dyn FormatBlock>;
    fn wrap(&self) -> Option<Wrap>;
    fn alignment(&self) -> Option<Alignment>;
    fn indent(&self) -> Option<Indent>;

    fn spacing(&self) -> Option<Spacing> {
        None
    }

    fn is_leaf(&self) -> bool {
        self.sub_blocks().is_empty()
    }

    /// Short label used in debug output.
    fn describe(&self) -> String;
}

/// A foreign formatter's root block mounted in the host tree.
#[derive(Debug)]
pub struct ForeignBlock {
    pub dialect: Dialect,
    pub root: Box<dyn FormatBlock>,
}

#[derive(Debug)]
pub enum BlockKind {
    Document(Dialect),
    Tag { name: String },
    Text,
    Doctype,
    /// Any other composite node, built as a whole.
    Node(SyntaxKind),
    Leaf(SyntaxKind),
    /// The tail of a host leaf left over after islands were cut out of it.
    Residual,
    /// A carrier token whose content another tree of the file describes.
    Island { dialect: Dialect },
    Foreign(ForeignBlock),
}

#[derive(Debug)]
pub struct Block {
    pub span: Span,
    pub kind: BlockKind,
    pub wrap: Option<Wrap>,
    pub alignment: Option<Alignment>,
    pub indent: Option<Indent>,
    pub spacing: Option<Spacing>,
    pub children: Vec<Block>,
    pub line_break: LineBreakHint,
}

impl Block {
    pub fn new(span: Span, kind: BlockKind) -> Block {
        Block {
            span,
            kind,
            wrap: None,
            alignment: None,
            indent: None,
            spacing: None,
            children: Vec::new(),
            line_break: LineBreakHint::Keep,
        }
    }

    pub fn with_layout(
        mut self,
        wrap: Option<Wrap>,
        alignment: Option<Alignment>,
        indent: Option<Indent>,
    ) -> Block {
        self.wrap = wrap;
        self.alignment = alignment;
        self.indent = indent;
        self
    }

    /// Children lying entirely inside `range`.
    pub fn sub_blocks_in(&self, range: Span) -> Vec<&Block> {
        self.children
            .iter()
            .filter(|child| range.contains(child.span))
            .collect()
    }

    pub fn tag_name(&self) -> Option<&str> {
        match &self.kind {
            BlockKind::Tag { name } => Some(name),
            _ => None,
        }
    }

    pub fn foreign(&self) -> Option<&ForeignBlock> {
        match &self.kind {
            BlockKind::Foreign(foreign) => Some(foreign),
            _ => None,
        }
    }

    pub fn insert_line_break_before(&self) -> bool {
        self.line_break == LineBreakHint::Insert
    }

    pub fn remove_line_break_before(&self) -> bool {
        self.line_break == LineBreakHint::Remove
    }

    /// Depth-first walk over this block and its host descendants.
    pub fn walk(&self) -> Vec<&Block> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }
}

impl FormatBlock for Block {
    fn text_range(&self) -> Span {
        self.span
    }

    fn sub_blocks(&self) -> Vec<&dyn FormatBlock> {
        match &self.kind {
            BlockKind::Foreign(foreign) => vec![foreign.root.as_ref()],
            _ => self
                .children
                .iter()
                .map(|child| child as &dyn FormatBlock)
                .collect(),
        }
    }

    fn wrap(&self) -> Option<Wrap> {
        self.wrap
    }

    fn alignment(&self) -> Option<Alignment> {
        self.alignment
    }

    fn indent(&self) -> Option<Indent> {
        self.indent
    }

    fn spacing(&self) -> Option<Spacing> {
        self.spacing
    }

    fn describe(&self) -> String {
        match &self.kind {
            BlockKind::Document(dialect) => format!("Document({dialect})"),
            BlockKind::Tag { name } => format!("Tag({name})"),
            BlockKind::Text => "Text".to_string(),
            BlockKind::Doctype => "Doctype".to_string(),
            BlockKind::Node(kind) => format!("Node({kind:?})"),
            BlockKind::Leaf(kind) => format!("Leaf({kind:?})"),
            BlockKind::Residual => "Residual".to_string(),
            BlockKind::Island { dialect } => format!("Island({dialect})"),
            BlockKind::Foreign(foreign) => format!("Foreign({})", foreign.dialect),
        }
    }
}
