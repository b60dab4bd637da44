//! State shared by every builder call of one build.

use std::cell::{Cell, OnceCell};

use tagweave_syntax::{Dialect, SourceFile, SyntaxNode};

use crate::error::{FormatError, Result};
use crate::foreign::FormatterRegistry;
use crate::policy::MarkupPolicy;
use crate::span::Span;

/// The parentless node a build started from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootBinding {
    pub node: SyntaxNode,
    pub dialect: Dialect,
}

/// Nesting depth at which a build gives up instead of exhausting the stack.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// One build over one file.
///
/// Holds the file's trees as red roots so that nodes handed out by the
/// locator compare equal to the ones the builder walks. The root binding is
/// written once, by the first parentless node the builder sees.
pub struct BuildContext<'a> {
    file: &'a SourceFile,
    policy: &'a dyn MarkupPolicy,
    registry: &'a FormatterRegistry,
    trees: Vec<(Dialect, SyntaxNode)>,
    root: OnceCell<RootBinding>,
    depth: Cell<usize>,
    max_depth: usize,
}

/// One level of block nesting; leaving it pops the level.
pub(crate) struct DepthGuard<'c> {
    depth: &'c Cell<usize>,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

impl<'a> BuildContext<'a> {
    pub fn new(
        file: &'a SourceFile,
        policy: &'a dyn MarkupPolicy,
        registry: &'a FormatterRegistry,
    ) -> Self {
        Self {
            file,
            policy,
            registry,
            trees: file.trees().collect(),
            root: OnceCell::new(),
            depth: Cell::new(0),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enters one more level of nested blocks.
    pub(crate) fn enter(&self) -> Result<DepthGuard<'_>> {
        let depth = self.depth.get() + 1;
        if depth > self.max_depth {
            return Err(FormatError::InvariantViolation(format!(
                "blocks nest deeper than {}",
                self.max_depth
            )));
        }
        self.depth.set(depth);
        Ok(DepthGuard { depth: &self.depth })
    }

    pub fn file(&self) -> &'a SourceFile {
        self.file
    }

    pub fn text(&self) -> &'a str {
        self.file.text()
    }

    pub fn policy(&self) -> &'a dyn MarkupPolicy {
        self.policy
    }

    pub fn registry(&self) -> &'a FormatterRegistry {
        self.registry
    }

    /// The primary tree of the file.
    pub fn primary(&self) -> Option<&SyntaxNode> {
        self.trees.first().map(|(_, root)| root)
    }

    pub fn trees(&self) -> &[(Dialect, SyntaxNode)] {
        &self.trees
    }

    /// Trees of the file other than the one `node` belongs to.
    pub fn other_trees<'s>(
        &'s self,
        node: &SyntaxNode,
    ) -> impl Iterator<Item = &'s (Dialect, SyntaxNode)> + 's {
        let own = tree_root(node).kind();
        self.trees.iter().filter(move |(_, root)| root.kind() != own)
    }

    /// Binds `node` as the root of this build. Returns false when a root was
    /// already bound; the first binding stays.
    pub fn bind_root(&self, node: &SyntaxNode) -> bool {
        let binding = RootBinding {
            node: node.clone(),
            dialect: Dialect::of(node),
        };
        match self.root.set(binding) {
            Ok(()) => {
                log::debug!("Bound build root {:?}", node.kind());
                true
            }
            Err(_) => {
                log::debug!("Build root already bound, keeping it over {:?}", node.kind());
                false
            }
        }
    }

    pub fn root(&self) -> Option<&RootBinding> {
        self.root.get()
    }

    /// The source text under `span`, empty when out of bounds.
    pub fn slice(&self, span: Span) -> &'a str {
        self.file.text().get(span.start..span.end).unwrap_or("")
    }
}

pub(crate) fn tree_root(node: &SyntaxNode) -> SyntaxNode {
    node.ancestors().last().unwrap_or_else(|| node.clone())
}
