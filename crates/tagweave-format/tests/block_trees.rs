//! Block trees for whole files, rendered one block per line.

use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use tagweave_config::FormatterSettings;
use tagweave_format::{Block, FormatterRegistry, format_file, snapshot};
use tagweave_syntax::{FileKind, SourceFile};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn build(text: &str, kind: FileKind, registry: &FormatterRegistry) -> (SourceFile, Block) {
    init_logging();
    let file = SourceFile::parse(text, kind);
    let block = format_file(&file, &FormatterSettings::default(), registry).unwrap();
    snapshot::invariants(file.text(), &block).unwrap();
    (file, block)
}

fn render(text: &str, kind: FileKind) -> String {
    let (file, block) = build(text, kind, &FormatterRegistry::default());
    snapshot::render(&file, &block)
}

#[test]
fn script_element_is_mounted_as_foreign_block() {
    assert_snapshot!(render("<div><script>var x=1;</script></div>", FileKind::Html), @r#"
    Document(html) 0..36 L1 "<div><script>var x=1;</script></div>"
      Tag(div) 0..36 L1 "<div><script>var x=1;</script></div>"
        Leaf(START_TAG_START) 0..1 L1 "<"
        Leaf(NAME) 1..4 L1 "div"
        Leaf(TAG_END) 4..5 L1 ">"
        Foreign(script) 5..30 L1 indent=normal "<script>var x=1;</script>"
          Node(SCRIPT_ELEMENT) 5..30 L1 "<script>var x=1;</script>"
            Leaf(START_TAG_START) 5..13 L1 "<script>"
            Leaf(RAW_TEXT) 13..21 L1 indent=normal "var x=1;"
            Leaf(END_TAG_START) 21..30 L1 "</script>"
        Leaf(END_TAG_START) 30..32 L1 "</"
        Leaf(NAME) 32..35 L1 "div"
        Leaf(TAG_END) 35..36 L1 ">"
    "#);
}

#[test]
fn template_tag_inside_host_tag_is_remounted() {
    assert_snapshot!(render("<div><t:if>x</t:if></div>", FileKind::Template), @r#"
    Document(template) 0..25 L1 "<div><t:if>x</t:if></div>"
      Tag(div) 0..25 L1 "<div><t:if>x</t:if></div>"
        Leaf(START_TAG_START) 0..1 L1 "<"
        Leaf(NAME) 1..4 L1 "div"
        Leaf(TAG_END) 4..5 L1 ">"
        Tag(t:if) 5..19 L1 indent=normal "<t:if>x</t:if>"
          Leaf(START_TAG_START) 5..6 L1 "<"
          Leaf(NAME) 6..10 L1 "t:if"
          Leaf(TAG_END) 10..11 L1 ">"
          Leaf(TEMPLATE_TEXT) 11..12 L1 indent=normal "x"
          Leaf(END_TAG_START) 12..14 L1 "</"
          Leaf(NAME) 14..18 L1 "t:if"
          Leaf(TAG_END) 18..19 L1 ">"
        Leaf(END_TAG_START) 19..21 L1 "</"
        Leaf(NAME) 21..24 L1 "div"
        Leaf(TAG_END) 24..25 L1 ">"
    "#);
}

#[test]
fn text_after_the_last_host_tag_is_a_residual() {
    assert_snapshot!(render("<div></div>rest <t:x/>", FileKind::Template), @r#"
    Document(template) 0..22 L1 "<div></div>rest <t:x/>"
      Tag(div) 0..11 L1 "<div></div>"
        Leaf(START_TAG_START) 0..1 L1 "<"
        Leaf(NAME) 1..4 L1 "div"
        Leaf(TAG_END) 4..5 L1 ">"
        Leaf(END_TAG_START) 5..7 L1 "</"
        Leaf(NAME) 7..10 L1 "div"
        Leaf(TAG_END) 10..11 L1 ">"
      Residual 11..15 L1 "rest"
      Tag(t:x) 16..22 L1 "<t:x/>"
        Leaf(START_TAG_START) 16..17 L1 "<"
        Leaf(NAME) 17..20 L1 "t:x"
        Leaf(EMPTY_TAG_END) 20..22 L1 "/>"
    "#);
}

#[test]
fn scriptlet_inside_host_tag_becomes_an_island() {
    assert_snapshot!(render("<t:if><p><%x%></p></t:if>", FileKind::Template), @r#"
    Document(template) 0..25 L1 "<t:if><p><%x%></p></t:if>"
      Tag(t:if) 0..25 L1 "<t:if><p><%x%></p></t:if>"
        Leaf(START_TAG_START) 0..1 L1 "<"
        Leaf(NAME) 1..5 L1 "t:if"
        Leaf(TAG_END) 5..6 L1 ">"
        Tag(p) 6..18 L1 indent=normal "<p><%x%></p>"
          Leaf(START_TAG_START) 6..7 L1 "<"
          Leaf(NAME) 7..8 L1 "p"
          Leaf(TAG_END) 8..9 L1 ">"
          Island(script) 9..14 L1 indent=normal "<%x%>"
            Foreign(script) 9..14 L1 "<%x%>"
              Node(SCRIPTLET) 9..14 L1 "<%x%>"
                Leaf(START_TAG_START) 9..11 L1 "<%"
                Leaf(RAW_TEXT) 11..12 L1 indent=normal "x"
                Leaf(END_TAG_START) 12..14 L1 "%>"
          Leaf(END_TAG_START) 14..16 L1 "</"
          Leaf(NAME) 16..17 L1 "p"
          Leaf(TAG_END) 17..18 L1 ">"
        Leaf(END_TAG_START) 18..20 L1 "</"
        Leaf(NAME) 20..24 L1 "t:if"
        Leaf(TAG_END) 24..25 L1 ">"
    "#);
}

#[test]
fn empty_file_is_an_empty_document() {
    let (_, block) = build("", FileKind::Html, &FormatterRegistry::default());
    assert_eq!(block.span.start, 0);
    assert_eq!(block.span.end, 0);
    assert!(block.children.is_empty());
}
