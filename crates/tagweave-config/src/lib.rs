use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// How a kind of element may be wrapped onto a new line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WrapOption {
    DoNotWrap,
    WrapAlways,
    #[default]
    WrapAsNeeded,
    ChopDownIfLong,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WrapSettings {
    /// Before a start tag (`<name`).
    pub tag_begin: WrapOption,
    /// Before a closing tag (`</name`).
    pub tag_end: WrapOption,
    pub attributes: WrapOption,
    pub text: WrapOption,
}

impl Default for WrapSettings {
    fn default() -> Self {
        Self {
            tag_begin: WrapOption::DoNotWrap,
            tag_end: WrapOption::DoNotWrap,
            attributes: WrapOption::WrapAsNeeded,
            text: WrapOption::WrapAsNeeded,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignSettings {
    pub attributes: bool,
    pub text: bool,
}

impl Default for AlignSettings {
    fn default() -> Self {
        Self {
            attributes: true,
            text: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineBreakSettings {
    pub keep: bool,
    pub keep_in_text: bool,
    pub max_blank_lines: u32,
    /// Tags that always start on a new line.
    pub insert_before: Vec<String>,
    /// Tags whose preceding line break is removed.
    pub remove_before: Vec<String>,
}

impl Default for LineBreakSettings {
    fn default() -> Self {
        Self {
            keep: true,
            keep_in_text: true,
            max_blank_lines: 2,
            insert_before: Vec::new(),
            remove_before: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IslandSettings {
    /// Format embedded template islands against the host tree.
    pub process: bool,
    /// Dialects (`script`, `style`, ...) handed to their own formatter.
    pub trees: Vec<String>,
    /// Let a sibling markup tree govern islands too.
    pub host_variants: bool,
}

impl Default for IslandSettings {
    fn default() -> Self {
        Self {
            process: true,
            trees: vec!["script".to_string(), "style".to_string()],
            host_variants: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndentSettings {
    /// Tags whose children are not indented.
    pub skip_children_of: Vec<String>,
}

impl Default for IndentSettings {
    fn default() -> Self {
        Self {
            skip_children_of: ["html", "body", "thead", "tbody", "tfoot"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterSettings {
    pub wrap: WrapSettings,
    pub align: AlignSettings,
    pub line_breaks: LineBreakSettings,
    pub islands: IslandSettings,
    pub indent: IndentSettings,
}

impl FormatterSettings {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let settings: FormatterSettings =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(settings))
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// Default location of the settings file.
    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/tagweave");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = FormatterSettings::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/tagweave/config.toml"));
    }

    #[test]
    fn test_defaults() {
        let settings = FormatterSettings::default();

        assert_eq!(settings.wrap.attributes, WrapOption::WrapAsNeeded);
        assert_eq!(settings.wrap.tag_end, WrapOption::DoNotWrap);
        assert!(settings.align.attributes);
        assert!(!settings.align.text);
        assert_eq!(settings.line_breaks.max_blank_lines, 2);
        assert!(settings.islands.process);
        assert_eq!(settings.islands.trees, vec!["script", "style"]);
        assert!(settings.indent.skip_children_of.contains(&"body".to_string()));
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings: FormatterSettings = toml::from_str("").unwrap();
        assert_eq!(settings, FormatterSettings::default());
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config_content = r#"
[wrap]
attributes = "chop-down-if-long"

[align]
attributes = false

[islands]
trees = ["script"]
"#;

        let settings: FormatterSettings = toml::from_str(config_content).unwrap();

        assert_eq!(settings.wrap.attributes, WrapOption::ChopDownIfLong);
        assert_eq!(settings.wrap.text, WrapOption::WrapAsNeeded);
        assert!(!settings.align.attributes);
        assert!(!settings.align.text);
        assert_eq!(settings.islands.trees, vec!["script"]);
        assert!(settings.islands.process);
    }

    #[test]
    fn test_unknown_wrap_option_is_rejected() {
        let result: Result<FormatterSettings, _> = toml::from_str("[wrap]\ntext = \"sometimes\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut original = FormatterSettings::default();
        original.wrap.tag_begin = WrapOption::WrapAlways;
        original.line_breaks.insert_before = vec!["li".to_string()];

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: FormatterSettings = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = FormatterSettings::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_reports_parse_errors_with_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[wrap\n").unwrap();

        let err = FormatterSettings::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let mut test_config = FormatterSettings::default();
        test_config.line_breaks.max_blank_lines = 0;
        test_config.indent.skip_children_of.clear();

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = FormatterSettings::load_from_path(&config_file)
            .unwrap()
            .unwrap();

        assert_eq!(loaded_config, test_config);
    }
}
