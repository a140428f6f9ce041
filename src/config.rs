//! Search tuning loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) yields the stock
//! weighting: title 5, category 3, text 1, phrase bonuses 2 and 1.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-field match weights and whole-query phrase bonuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldWeights {
    pub title: u32,
    pub category: u32,
    pub text: u32,
    /// Added when the whole query is a substring of the title.
    pub title_phrase: u32,
    /// Added when the whole query is a substring of the text.
    pub text_phrase: u32,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title: 5,
            category: 3,
            text: 1,
            title_phrase: 2,
            text_phrase: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub weights: FieldWeights,
    /// Characters of context kept on each side of the first text match.
    pub snippet_radius: usize,
    /// Limit applied when a caller does not supply one.
    pub default_limit: usize,
    /// Tokens with fewer characters than this are not indexed.
    pub min_token_len: usize,
    /// Extra tokens to drop during tokenization, matched case-insensitively.
    pub stop_words: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            weights: FieldWeights::default(),
            snippet_radius: 40,
            default_limit: 20,
            min_token_len: 2,
            stop_words: Vec::new(),
        }
    }
}

impl SearchConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(source)?;
        config.validate()?;
        for word in &mut config.stop_words {
            *word = word.to_lowercase();
        }
        Ok(config)
    }

    /// Read a TOML config file from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!("Loaded search config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_token_len == 0 {
            return Err(ConfigError::Invalid(
                "min_token_len must be at least 1".to_string(),
            ));
        }
        if self.default_limit == 0 {
            return Err(ConfigError::Invalid(
                "default_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
