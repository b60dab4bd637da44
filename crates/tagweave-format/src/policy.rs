//! Read-only layout decisions the builder asks for.
//!
//! [`MarkupPolicy`] is the seam between the builder and configuration. The
//! builder never reads settings directly; [`SettingsPolicy`] answers from a
//! [`FormatterSettings`].

use tagweave_config::{FormatterSettings, WrapOption};
use tagweave_syntax::{Dialect, Tag, has_template_prefix};

use crate::block::{Spacing, WrapType};

/// Where a wrap is being decided.
#[derive(Debug, Clone, Copy)]
pub enum WrapContext<'a> {
    TagBegin(&'a Tag),
    TagEnd(&'a Tag),
    Attribute,
    Text,
    Other,
}

pub trait MarkupPolicy: Send + Sync {
    fn wrap_type_for(&self, context: WrapContext<'_>) -> WrapType;

    fn should_align_attributes(&self) -> bool;
    fn should_align_text(&self) -> bool;

    fn should_keep_line_breaks(&self) -> bool;
    fn should_keep_line_breaks_in_text(&self) -> bool;
    fn max_blank_lines(&self) -> u32;

    /// Format template islands against the host tree at all.
    fn processes_foreign_islands(&self) -> bool;
    /// Hand nodes of `dialect` to that dialect's own formatter.
    fn dialect_tree_enabled(&self, dialect: Dialect) -> bool;
    /// Let a sibling markup tree govern an island, not only foreign ones.
    fn includes_host_variant_trees(&self) -> bool;

    fn indent_children_of(&self, tag: &Tag) -> bool;
    fn insert_line_break_before(&self, tag: &Tag) -> bool;
    fn remove_line_break_before(&self, tag: &Tag) -> bool;

    /// A closing tag may move to its own line only when the tag has child
    /// tags or is a template tag.
    fn can_wrap_tag_end(&self, tag: &Tag) -> bool {
        tag.has_sub_tags() || has_template_prefix(&tag.name())
    }

    fn keeps_line_breaks(&self, in_text: bool, forced: bool) -> bool {
        forced
            || if in_text {
                self.should_keep_line_breaks_in_text()
            } else {
                self.should_keep_line_breaks()
            }
    }

    /// Spacing between the children of a block: any number of spaces, no
    /// forced line feeds.
    fn default_spacing(&self, force_keep_line_breaks: bool, in_text: bool) -> Spacing {
        Spacing {
            min_spaces: 0,
            max_spaces: u32::MAX,
            min_line_feeds: 0,
            keep_line_breaks: self.keeps_line_breaks(in_text, force_keep_line_breaks),
            keep_blank_lines: self.max_blank_lines(),
        }
    }
}

/// Maps a configured wrap option onto the layout engine's wrap type.
pub fn wrap_type(option: WrapOption) -> WrapType {
    match option {
        WrapOption::DoNotWrap => WrapType::None,
        WrapOption::WrapAlways => WrapType::Always,
        WrapOption::WrapAsNeeded => WrapType::Normal,
        WrapOption::ChopDownIfLong => WrapType::ChopDownIfLong,
    }
}

/// Policy backed by [`FormatterSettings`].
#[derive(Debug, Clone)]
pub struct SettingsPolicy {
    settings: FormatterSettings,
    trees: Vec<Dialect>,
}

impl SettingsPolicy {
    pub fn new(settings: FormatterSettings) -> Self {
        let trees = settings
            .islands
            .trees
            .iter()
            .filter_map(|name| {
                let dialect = Dialect::from_name(name);
                if dialect.is_none() {
                    log::warn!("Ignoring unknown dialect in [islands] trees: {name:?}");
                }
                dialect
            })
            .collect();
        Self { settings, trees }
    }

    pub fn settings(&self) -> &FormatterSettings {
        &self.settings
    }
}

impl Default for SettingsPolicy {
    fn default() -> Self {
        Self::new(FormatterSettings::default())
    }
}

fn listed(names: &[String], tag: &Tag) -> bool {
    let name = tag.name();
    names.iter().any(|n| n.eq_ignore_ascii_case(&name))
}

impl MarkupPolicy for SettingsPolicy {
    fn wrap_type_for(&self, context: WrapContext<'_>) -> WrapType {
        let wrap = &self.settings.wrap;
        match context {
            WrapContext::TagBegin(_) => wrap_type(wrap.tag_begin),
            WrapContext::TagEnd(_) => wrap_type(wrap.tag_end),
            WrapContext::Attribute => wrap_type(wrap.attributes),
            WrapContext::Text => wrap_type(wrap.text),
            WrapContext::Other => WrapType::None,
        }
    }

    fn should_align_attributes(&self) -> bool {
        self.settings.align.attributes
    }

    fn should_align_text(&self) -> bool {
        self.settings.align.text
    }

    fn should_keep_line_breaks(&self) -> bool {
        self.settings.line_breaks.keep
    }

    fn should_keep_line_breaks_in_text(&self) -> bool {
        self.settings.line_breaks.keep_in_text
    }

    fn max_blank_lines(&self) -> u32 {
        self.settings.line_breaks.max_blank_lines
    }

    fn processes_foreign_islands(&self) -> bool {
        self.settings.islands.process
    }

    fn dialect_tree_enabled(&self, dialect: Dialect) -> bool {
        self.trees.contains(&dialect)
    }

    fn includes_host_variant_trees(&self) -> bool {
        self.settings.islands.host_variants
    }

    fn indent_children_of(&self, tag: &Tag) -> bool {
        !listed(&self.settings.indent.skip_children_of, tag)
    }

    fn insert_line_break_before(&self, tag: &Tag) -> bool {
        listed(&self.settings.line_breaks.insert_before, tag)
    }

    fn remove_line_break_before(&self, tag: &Tag) -> bool {
        listed(&self.settings.line_breaks.remove_before, tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tagweave_syntax::parse;

    fn first_tag(source: &str) -> Tag {
        parse(source).descendants().find_map(Tag::cast).unwrap()
    }

    #[rstest]
    #[case(WrapOption::DoNotWrap, WrapType::None)]
    #[case(WrapOption::WrapAlways, WrapType::Always)]
    #[case(WrapOption::WrapAsNeeded, WrapType::Normal)]
    #[case(WrapOption::ChopDownIfLong, WrapType::ChopDownIfLong)]
    fn wrap_option_mapping(#[case] option: WrapOption, #[case] expected: WrapType) {
        assert_eq!(wrap_type(option), expected);
    }

    #[test]
    fn wrap_contexts_follow_settings() {
        let mut settings = FormatterSettings::default();
        settings.wrap.tag_begin = WrapOption::WrapAlways;
        settings.wrap.attributes = WrapOption::ChopDownIfLong;
        let policy = SettingsPolicy::new(settings);
        let tag = first_tag("<p></p>");

        assert_eq!(policy.wrap_type_for(WrapContext::TagBegin(&tag)), WrapType::Always);
        assert_eq!(policy.wrap_type_for(WrapContext::TagEnd(&tag)), WrapType::None);
        assert_eq!(
            policy.wrap_type_for(WrapContext::Attribute),
            WrapType::ChopDownIfLong
        );
        assert_eq!(policy.wrap_type_for(WrapContext::Other), WrapType::None);
    }

    #[rstest]
    #[case("<ul><li>a</li></ul>", true)]
    #[case("<p>text only</p>", false)]
    #[case("<t:if>text only</t:if>", true)]
    #[case("<T:Each>text only</T:Each>", true)]
    #[case("<tr>text</tr>", false)]
    fn tag_end_wrap_eligibility(#[case] source: &str, #[case] expected: bool) {
        let policy = SettingsPolicy::default();
        assert_eq!(policy.can_wrap_tag_end(&first_tag(source)), expected);
    }

    #[rstest]
    #[case(false, false, false, false)]
    #[case(false, false, true, true)]
    #[case(true, false, false, true)]
    #[case(false, true, false, false)]
    #[case(false, true, true, true)]
    fn keep_line_breaks(
        #[case] keep: bool,
        #[case] in_text: bool,
        #[case] forced: bool,
        #[case] expected: bool,
    ) {
        let mut settings = FormatterSettings::default();
        settings.line_breaks.keep = keep;
        settings.line_breaks.keep_in_text = false;
        let policy = SettingsPolicy::new(settings);

        assert_eq!(policy.keeps_line_breaks(in_text, forced), expected);
    }

    #[test]
    fn default_spacing_shape() {
        let policy = SettingsPolicy::default();
        let spacing = policy.default_spacing(false, true);

        assert_eq!(
            spacing,
            Spacing {
                min_spaces: 0,
                max_spaces: u32::MAX,
                min_line_feeds: 0,
                keep_line_breaks: true,
                keep_blank_lines: 2,
            }
        );
    }

    #[test]
    fn unknown_tree_names_are_ignored() {
        let mut settings = FormatterSettings::default();
        settings.islands.trees = vec!["Script".into(), "cobol".into()];
        let policy = SettingsPolicy::new(settings);

        assert!(policy.dialect_tree_enabled(Dialect::Script));
        assert!(!policy.dialect_tree_enabled(Dialect::Style));
    }

    #[test]
    fn indent_and_line_break_lists_ignore_case() {
        let mut settings = FormatterSettings::default();
        settings.line_breaks.insert_before = vec!["LI".into()];
        let policy = SettingsPolicy::new(settings);

        assert!(!policy.indent_children_of(&first_tag("<BODY></BODY>")));
        assert!(policy.indent_children_of(&first_tag("<div></div>")));
        assert!(policy.insert_line_break_before(&first_tag("<li></li>")));
        assert!(!policy.remove_line_break_before(&first_tag("<li></li>")));
    }
}
