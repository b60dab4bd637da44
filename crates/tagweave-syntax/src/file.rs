//! Source files and the trees parsed from them.
//!
//! A file has one primary tree and, for template files, a second Html tree
//! over the same text. Green trees are stored so a `SourceFile` can be shared
//! across threads; red roots are created on demand.

use std::path::Path;

use rowan::GreenNode;

use crate::dialect::Dialect;
use crate::parser::{ParseMode, parse_green};
use crate::syntax_kind::SyntaxNode;

/// What kind of document a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Html,
    Xml,
    Template,
}

impl FileKind {
    /// Guess from a file extension (`.html`, `.xml`, `.tpl`, ...).
    pub fn from_path(path: &Path) -> Option<FileKind> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "html" | "htm" => Some(FileKind::Html),
            "xml" | "xhtml" | "svg" => Some(FileKind::Xml),
            "tpl" | "tmpl" => Some(FileKind::Template),
            _ => None,
        }
    }

    /// Dialect of the primary tree.
    pub fn dialect(self) -> Dialect {
        match self {
            FileKind::Html => Dialect::Html,
            FileKind::Xml => Dialect::Xml,
            FileKind::Template => Dialect::Template,
        }
    }
}

/// Parsed document text with one tree per markup dialect it contains.
#[derive(Debug, Clone)]
pub struct SourceFile {
    text: String,
    kind: FileKind,
    /// Primary tree first.
    trees: Vec<(Dialect, GreenNode)>,
}

impl SourceFile {
    pub fn parse(text: impl Into<String>, kind: FileKind) -> SourceFile {
        let text = text.into();
        let trees = match kind {
            FileKind::Html => vec![(
                Dialect::Html,
                parse_green(&text, ParseMode::Html { islands: false }),
            )],
            FileKind::Xml => vec![(Dialect::Xml, parse_green(&text, ParseMode::Xml))],
            FileKind::Template => vec![
                (Dialect::Template, parse_green(&text, ParseMode::Template)),
                (
                    Dialect::Html,
                    parse_green(&text, ParseMode::Html { islands: true }),
                ),
            ],
        };
        SourceFile { text, kind, trees }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// Dialect of the primary tree.
    pub fn dialect(&self) -> Dialect {
        self.kind.dialect()
    }

    /// Root of the primary tree.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.trees[0].1.clone())
    }

    /// Every tree of the file, primary first.
    pub fn trees(&self) -> impl Iterator<Item = (Dialect, SyntaxNode)> + '_ {
        self.trees
            .iter()
            .map(|(dialect, green)| (*dialect, SyntaxNode::new_root(green.clone())))
    }

    /// The tree whose root has the given dialect.
    pub fn tree(&self, dialect: Dialect) -> Option<SyntaxNode> {
        self.trees().find(|(d, _)| *d == dialect).map(|(_, root)| root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax_kind::SyntaxKind;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("index.html", Some(FileKind::Html))]
    #[case("feed.XML", Some(FileKind::Xml))]
    #[case("page.tpl", Some(FileKind::Template))]
    #[case("notes.md", None)]
    #[case("Makefile", None)]
    fn kind_from_extension(#[case] path: &str, #[case] expected: Option<FileKind>) {
        assert_eq!(FileKind::from_path(Path::new(path)), expected);
    }

    #[test]
    fn html_file_has_one_tree() {
        let file = SourceFile::parse("<p>a</p>", FileKind::Html);
        assert_eq!(file.trees().count(), 1);
        assert_eq!(file.syntax().kind(), SyntaxKind::HTML_DOCUMENT);
        assert_eq!(file.dialect(), Dialect::Html);
    }

    #[test]
    fn template_file_has_template_and_html_trees() {
        let text = "<div><t:if>x</t:if></div>";
        let file = SourceFile::parse(text, FileKind::Template);
        let dialects: Vec<_> = file.trees().map(|(d, _)| d).collect();

        assert_eq!(dialects, vec![Dialect::Template, Dialect::Html]);
        assert_eq!(file.syntax().kind(), SyntaxKind::TEMPLATE_DOCUMENT);
        for (_, root) in file.trees() {
            assert_eq!(root.text().to_string(), text);
        }
    }

    #[test]
    fn roots_of_same_tree_compare_equal() {
        let file = SourceFile::parse("<p>a</p>", FileKind::Html);
        assert_eq!(file.syntax(), file.tree(Dialect::Html).unwrap());
        assert_eq!(file.tree(Dialect::Xml), None);
    }
}
