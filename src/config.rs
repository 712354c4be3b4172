//! Top-level configuration file.
//!
//! ```json
//! {
//!   "matcher": { "max_length": 12, "compound_min_length": 3 },
//!   "ruby": { "base_font_size": 22, "reading_font_size": 12 }
//! }
//! ```
//!
//! Every section and field is optional and falls back to its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FuriganaError, Result};
use crate::matcher::MatcherConfig;
use crate::splice::RubyStyle;

/// Settings for an annotation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FuriganaConfig {
    pub matcher: MatcherConfig,
    pub ruby: RubyStyle,
}

impl FuriganaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matcher(mut self, matcher: MatcherConfig) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn ruby(mut self, ruby: RubyStyle) -> Self {
        self.ruby = ruby;
        self
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: FuriganaConfig = serde_json::from_str(json)
            .map_err(|e| FuriganaError::config(format!("Invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            FuriganaError::config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config = Self::from_json_str(&content)?;
        debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.matcher.max_length == 0 {
            return Err(FuriganaError::config("matcher.max_length must be at least 1"));
        }
        if self.ruby.base_font_size == 0 || self.ruby.reading_font_size == 0 {
            return Err(FuriganaError::config("ruby font sizes must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FuriganaConfig::default();
        assert_eq!(config.matcher.max_length, 12);
        assert_eq!(config.matcher.compound_min_length, 3);
        assert!(config.matcher.keep_punctuation);
        assert!(config.matcher.skip_choice_markers);
        assert_eq!(config.ruby.base_font_size, 22);
        assert_eq!(config.ruby.reading_font_size, 12);
        assert!(config.ruby.strip_highlight);
    }

    #[test]
    fn test_partial_json() {
        let config =
            FuriganaConfig::from_json_str(r#"{"matcher":{"max_length":8},"ruby":{"strip_highlight":false}}"#)
                .unwrap();
        assert_eq!(config.matcher.max_length, 8);
        assert_eq!(config.matcher.compound_min_length, 3);
        assert!(!config.ruby.strip_highlight);
        assert_eq!(config.ruby.base_font_size, 22);
    }

    #[test]
    fn test_invalid_config() {
        let err = FuriganaConfig::from_json_str(r#"{"matcher":{"max_length":0}}"#).unwrap_err();
        assert!(matches!(err, FuriganaError::Config(_)));

        let err = FuriganaConfig::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, FuriganaError::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = FuriganaConfig::from_path("/nonexistent/furigana.json").unwrap_err();
        assert!(matches!(err, FuriganaError::Config(_)));
    }
}
