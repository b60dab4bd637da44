//! SyntaxKind enum for all tokens and nodes in the markup CST.
//!
//! Following the rust-analyzer model, all tokens and nodes share a single enum.
//! Every byte in the source must appear as a token in the tree.

use crate::dialect::Dialect;

/// All syntax kinds for the markup CST.
///
/// This enum represents both tokens (lexer output) and composite nodes (parser output).
/// The `repr(u16)` ensures efficient storage in rowan's green tree.
///
/// We use SCREAMING_CASE following the rust-analyzer convention for SyntaxKind.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Tokens (lexer output) ===
    /// Horizontal whitespace (spaces, tabs)
    WHITESPACE,
    /// Line ending
    NEWLINE,
    /// `<` opening a start tag
    START_TAG_START,
    /// `</` opening a closing tag
    END_TAG_START,
    /// `>` closing a start or end tag
    TAG_END,
    /// `/>` closing a self-closing tag
    EMPTY_TAG_END,
    /// `=` between attribute name and value
    EQ,
    /// Tag or attribute name (also any bare word before the parser reclassifies it)
    NAME,
    /// Quoted or bare attribute value
    ATTR_VALUE,
    /// A run of non-whitespace character data inside text
    DATA_CHARACTERS,
    /// `<!-- ... -->`
    COMMENT,
    /// `<!` opening a doctype or other declaration
    DOCTYPE_START,
    /// `<% ... %>` scriptlet, code included
    SCRIPTLET_CODE,
    /// Body of a raw-text element (`<script>`, `<style>`)
    RAW_TEXT,
    /// Template-tree carrier for everything that is not template syntax
    TEMPLATE_TEXT,
    /// Host-tree carrier for a template construct
    OUTER_FRAGMENT,
    /// End of file marker
    EOF,

    // === Composite Nodes (parser output) ===
    /// Root of an HTML tree
    HTML_DOCUMENT,
    /// Root of an XML tree
    XML_DOCUMENT,
    /// Root of a template tree
    TEMPLATE_DOCUMENT,
    /// Markup element: start tag, content, closing tag
    TAG,
    /// `name="value"` inside a start tag
    ATTRIBUTE,
    /// Character data between tags
    TEXT,
    /// `<!DOCTYPE ...>` declaration
    DOCTYPE,
    /// `<script>` element; its body belongs to the script dialect
    SCRIPT_ELEMENT,
    /// `<style>` element; its body belongs to the style dialect
    STYLE_ELEMENT,
    /// Scriptlet node in a template tree
    SCRIPTLET,

    /// Error recovery node
    ERROR,
}

impl SyntaxKind {
    /// Returns true if this kind represents a token (lexer output).
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::EOF as u16)
    }

    /// Returns true if this kind represents a composite node.
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Returns true if this kind is trivia (whitespace/newlines).
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::NEWLINE)
    }

    /// Returns true for the root kind of any tree.
    pub fn is_document(self) -> bool {
        matches!(
            self,
            Self::HTML_DOCUMENT | Self::XML_DOCUMENT | Self::TEMPLATE_DOCUMENT
        )
    }

    /// Element nodes: plain tags and the raw-text elements.
    pub fn is_element(self) -> bool {
        matches!(
            self,
            Self::TAG | Self::SCRIPT_ELEMENT | Self::STYLE_ELEMENT
        )
    }

    /// Tokens that stand in for text owned by another tree of the same file.
    pub fn is_island_carrier(self) -> bool {
        matches!(
            self,
            Self::DATA_CHARACTERS | Self::TEMPLATE_TEXT | Self::OUTER_FRAGMENT
        )
    }

    /// The dialect a node of this kind introduces, if it switches dialect.
    ///
    /// Kinds without their own dialect inherit the dialect of their parent.
    pub fn dialect(self) -> Option<Dialect> {
        match self {
            Self::HTML_DOCUMENT => Some(Dialect::Html),
            Self::XML_DOCUMENT => Some(Dialect::Xml),
            Self::TEMPLATE_DOCUMENT => Some(Dialect::Template),
            Self::SCRIPT_ELEMENT | Self::SCRIPTLET => Some(Dialect::Script),
            Self::STYLE_ELEMENT => Some(Dialect::Style),
            _ => None,
        }
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language definition for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkupLang {}

impl rowan::Language for MarkupLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::ERROR as u16);
        // SAFETY: We check bounds above and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type alias for our syntax nodes.
pub type SyntaxNode = rowan::SyntaxNode<MarkupLang>;
/// Type alias for our syntax tokens.
pub type SyntaxToken = rowan::SyntaxToken<MarkupLang>;
/// Type alias for syntax elements (node or token).
pub type SyntaxElement = rowan::SyntaxElement<MarkupLang>;
