use crate::error::ConfigError;
use glob::{MatchOptions, Pattern};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// File name patterns the drop zone and the picker accept.
#[derive(Debug, Clone)]
pub struct FileFilter {
    patterns: Vec<Pattern>,
}

impl FileFilter {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        if patterns.is_empty() {
            return Err(ConfigError::NoPatterns);
        }

        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p.as_ref()).map_err(|source| ConfigError::InvalidPattern {
                    pattern: p.as_ref().to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    pub fn accepts(&self, file_name: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_with(file_name, MATCH_OPTIONS))
    }

    /// Extensions for native file dialogs, taken from `*.ext` patterns.
    pub fn dialog_extensions(&self) -> Vec<String> {
        self.patterns
            .iter()
            .filter_map(|p| p.as_str().strip_prefix("*."))
            .filter(|ext| !ext.is_empty() && !ext.contains(['*', '?', '[', '.']))
            .map(str::to_lowercase)
            .collect()
    }

    pub fn describe(&self) -> String {
        self.patterns
            .iter()
            .map(Pattern::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
