//! Lookup tables driving classification.
//!
//! The lexicon is plain data: keyword→tag rules (each tag also lists the
//! categories it votes for), the category priority order and the weighted
//! importance signals. It is deserialized from TOML, either the table embedded
//! in the binary or a file named by configuration, and validated once at load
//! time so classification itself can never fail.

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::classifier::category::Category;

const EMBEDDED_LEXICON: &str = include_str!("lexicon.toml");

#[derive(Error, Debug)]
pub enum LexiconError {
    #[error("failed to read lexicon {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse lexicon: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid pattern {pattern:?} in rule '{rule}': {source}")]
    InvalidPattern {
        rule: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("rule '{0}' has no keywords or patterns")]
    EmptyTrigger(String),

    #[error("tag rule with an empty tag name")]
    EmptyTag,
}

#[derive(Debug, Deserialize)]
struct RawLexicon {
    #[serde(default = "default_category")]
    default_category: Category,
    #[serde(default)]
    category_priority: Vec<Category>,
    #[serde(default)]
    tags: Vec<RawTagRule>,
    #[serde(default)]
    signals: Vec<RawSignalRule>,
}

#[derive(Debug, Deserialize)]
struct RawTagRule {
    tag: String,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    patterns: Vec<String>,
    #[serde(default)]
    categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
struct RawSignalRule {
    name: String,
    weight: i32,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    patterns: Vec<String>,
}

fn default_category() -> Category {
    Category::Other
}

/// Lexical trigger: fires when any keyword occurs as a case-insensitive
/// substring, or any pattern matches.
#[derive(Debug, Clone)]
pub struct Trigger {
    keywords: Vec<String>,
    patterns: Vec<Regex>,
}

impl Trigger {
    pub fn compile(
        rule: &str,
        keywords: &[String],
        patterns: &[String],
    ) -> Result<Self, LexiconError> {
        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        let patterns = patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| LexiconError::InvalidPattern {
                        rule: rule.to_string(),
                        pattern: pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if keywords.is_empty() && patterns.is_empty() {
            return Err(LexiconError::EmptyTrigger(rule.to_string()));
        }

        Ok(Self { keywords, patterns })
    }

    /// `lowered` must be `text.to_lowercase()`; callers compute it once per pass.
    pub fn fires(&self, text: &str, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
            || self.patterns.iter().any(|p| p.is_match(text))
    }
}

#[derive(Debug, Clone)]
pub struct TagRule {
    pub tag: String,
    pub categories: Vec<Category>,
    pub trigger: Trigger,
}

#[derive(Debug, Clone)]
pub struct SignalRule {
    pub name: String,
    pub weight: i32,
    pub trigger: Trigger,
}

#[derive(Debug, Clone)]
pub struct Lexicon {
    pub default_category: Category,
    pub category_priority: Vec<Category>,
    pub tags: Vec<TagRule>,
    pub signals: Vec<SignalRule>,
}

impl Lexicon {
    /// The table compiled into the binary.
    pub fn embedded() -> Result<Self, LexiconError> {
        Self::from_toml_str(EMBEDDED_LEXICON)
    }

    pub fn from_path(path: &Path) -> Result<Self, LexiconError> {
        let content = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from `path` when given, otherwise fall back to the embedded table.
    pub fn load(path: Option<&Path>) -> Result<Self, LexiconError> {
        let lexicon = match path {
            Some(path) => Self::from_path(path)?,
            None => Self::embedded()?,
        };
        info!(
            source = %path.map(|p| p.display().to_string()).unwrap_or_else(|| "embedded".to_string()),
            tags = lexicon.tags.len(),
            signals = lexicon.signals.len(),
            "Lexicon loaded"
        );
        Ok(lexicon)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, LexiconError> {
        let raw: RawLexicon = toml::from_str(content)?;

        let tags = raw
            .tags
            .into_iter()
            .map(|rule| {
                let tag = rule.tag.trim().to_string();
                if tag.is_empty() {
                    return Err(LexiconError::EmptyTag);
                }
                let trigger = Trigger::compile(&tag, &rule.keywords, &rule.patterns)?;
                Ok(TagRule {
                    tag,
                    categories: rule.categories,
                    trigger,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let signals = raw
            .signals
            .into_iter()
            .map(|rule| {
                let trigger = Trigger::compile(&rule.name, &rule.keywords, &rule.patterns)?;
                Ok(SignalRule {
                    name: rule.name,
                    weight: rule.weight,
                    trigger,
                })
            })
            .collect::<Result<Vec<_>, LexiconError>>()?;

        Ok(Self {
            default_category: raw.default_category,
            category_priority: raw.category_priority,
            tags,
            signals,
        })
    }
}
