use std::collections::BTreeSet;

use crate::classifier::lexicon::{Lexicon, TagRule};

/// Maps free text to the set of tags whose trigger fires on it.
#[derive(Debug, Clone)]
pub struct TagMatcher {
    rules: Vec<TagRule>,
}

impl TagMatcher {
    pub fn new(lexicon: &Lexicon) -> Self {
        Self {
            rules: lexicon.tags.clone(),
        }
    }

    /// Empty or unmatched text yields an empty set.
    pub fn extract_tags(&self, text: &str) -> BTreeSet<String> {
        if text.trim().is_empty() {
            return BTreeSet::new();
        }

        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .filter(|rule| rule.trigger.fires(text, &lowered))
            .map(|rule| rule.tag.clone())
            .collect()
    }
}
