//! Dialects: the language a piece of the tree belongs to.
//!
//! A file is parsed into one tree per markup dialect it contains. Inside a
//! tree, embedded elements (`<script>`, `<style>`, scriptlets) switch to a
//! foreign dialect; everything else inherits the dialect of the tree root.

use std::fmt;

use crate::syntax_kind::{SyntaxElement, SyntaxNode};

/// Reserved name prefix of template tags (`<t:if>`), matched ignoring ASCII case.
pub const TEMPLATE_TAG_PREFIX: &str = "t:";

/// Whether a tag name carries the template prefix.
pub fn has_template_prefix(name: &str) -> bool {
    name.get(..TEMPLATE_TAG_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(TEMPLATE_TAG_PREFIX))
}

/// The language/grammar a syntax node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dialect {
    Html,
    Xml,
    /// Markup with `t:`-prefixed template tags and `<% %>` scriptlets.
    Template,
    Script,
    Style,
}

impl Dialect {
    pub const ALL: [Dialect; 5] = [
        Dialect::Html,
        Dialect::Xml,
        Dialect::Template,
        Dialect::Script,
        Dialect::Style,
    ];

    /// Lower-case name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Dialect::Html => "html",
            Dialect::Xml => "xml",
            Dialect::Template => "template",
            Dialect::Script => "script",
            Dialect::Style => "style",
        }
    }

    /// Parses a configuration name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Markup dialects can be formatted by the host builder itself.
    pub fn is_markup(self) -> bool {
        matches!(self, Dialect::Html | Dialect::Xml | Dialect::Template)
    }

    /// Whether files of this dialect carry islands owned by a second tree.
    pub fn supports_islands(self) -> bool {
        matches!(self, Dialect::Template)
    }

    /// Dialect of a node: the nearest ancestor (or the node itself) that
    /// switches dialect.
    pub fn of(node: &SyntaxNode) -> Dialect {
        node.ancestors()
            .find_map(|n| n.kind().dialect())
            .unwrap_or(Dialect::Html)
    }

    /// Dialect of a node or token; tokens take their parent's dialect.
    pub fn of_element(element: &SyntaxElement) -> Dialect {
        match element {
            rowan::NodeOrToken::Node(node) => Self::of(node),
            rowan::NodeOrToken::Token(token) => token
                .parent()
                .map(|parent| Self::of(&parent))
                .unwrap_or(Dialect::Html),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
