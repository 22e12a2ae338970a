use std::path::Path;

use serde::Deserialize;

use crate::classify::Classifier;
use crate::error::ExtractError;
use crate::labels::{ColorTestNames, DEFAULT_COLOR_TESTS};
use crate::layout::LayoutPolicy;

/// Spreadsheet extensions picked up from the source directory.
pub const DEFAULT_EXTENSIONS: &[&str] = &["xls", "xlsx"];

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Everything that varies between instruments. Loaded from TOML; every key
/// is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    /// Recognized color test labels.
    pub color_tests: Vec<String>,
    /// File extensions (without the dot) treated as input spreadsheets.
    pub extensions: Vec<String>,
    pub layout: LayoutPolicy,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            color_tests: DEFAULT_COLOR_TESTS.iter().map(|s| s.to_string()).collect(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            layout: LayoutPolicy::default(),
        }
    }
}

impl ExtractConfig {
    pub fn from_toml(input: &str) -> Result<Self, ExtractError> {
        let config: ExtractConfig =
            toml::from_str(input).map_err(|e| ExtractError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ExtractError> {
        if ColorTestNames::new(&self.color_tests).is_empty() {
            return Err(ExtractError::Config("color_tests must name at least one label".into()));
        }

        if self.extensions.iter().all(|e| e.trim_start_matches('.').is_empty()) {
            return Err(ExtractError::Config("extensions must not be empty".into()));
        }

        self.layout.validate()
    }

    pub fn names(&self) -> ColorTestNames {
        ColorTestNames::new(&self.color_tests)
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.names(), self.layout.clone())
    }

    /// Case-insensitive extension check. A leading dot in the configured
    /// extension is ignored.
    pub fn accepts(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = ExtractConfig::from_toml("").unwrap();
        assert_eq!(config, ExtractConfig::default());
    }

    #[test]
    fn partial_layout_override() {
        let config = ExtractConfig::from_toml(
            r#"
color_tests = ["de", "dl"]

[layout]
header_rows = 6
label_positions = [0, 1]
part_number_cell = [1, 2]
"#,
        )
        .unwrap();

        assert_eq!(config.layout.header_rows, 6);
        assert_eq!(config.layout.row_stride, 2);
        assert_eq!(config.layout.label_positions, vec![0, 1]);
        assert_eq!(config.layout.part_number_cell, (1, 2));
        assert_eq!(config.names().iter().collect::<Vec<_>>(), vec!["DE", "DL"]);
        assert_eq!(config.extensions, vec!["xls", "xlsx"]);
    }

    #[test]
    fn unknown_key_rejected() {
        let err = ExtractConfig::from_toml("colour_tests = [\"DE\"]").unwrap_err();
        assert!(matches!(err, ExtractError::Config(_)));
    }

    #[test]
    fn blank_label_set_rejected() {
        let err = ExtractConfig::from_toml("color_tests = [\" \"]").unwrap_err();
        assert!(err.to_string().contains("color_tests"));
    }

    #[test]
    fn invalid_layout_rejected() {
        let err = ExtractConfig::from_toml("[layout]\nrow_stride = 0").unwrap_err();
        assert!(err.to_string().contains("row_stride"));
    }

    #[test]
    fn extension_matching() {
        let config = ExtractConfig::default();
        assert!(config.accepts(Path::new("cards/QC-001.xls")));
        assert!(config.accepts(Path::new("QC-002.XLSX")));
        assert!(!config.accepts(Path::new("notes.txt")));
        assert!(!config.accepts(Path::new("README")));

        let dotted = ExtractConfig { extensions: vec![".ods".into()], ..Default::default() };
        assert!(dotted.accepts(Path::new("card.ods")));
    }
}
