use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::classifier::lexicon::Lexicon;

/// Closed vocabulary of event categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Study,
    Health,
    Finance,
    Relationship,
    Life,
    Achievement,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Work,
        Category::Study,
        Category::Health,
        Category::Finance,
        Category::Relationship,
        Category::Life,
        Category::Achievement,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Study => "study",
            Self::Health => "health",
            Self::Finance => "finance",
            Self::Relationship => "relationship",
            Self::Life => "life",
            Self::Achievement => "achievement",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == needle)
            .ok_or_else(|| format!("unknown category: {}", s.trim()))
    }
}

/// Picks one category for a tag set by majority vote.
///
/// Each tag votes for the categories listed against it in the lexicon. The
/// category with the most votes wins; ties go to whichever leader comes first
/// in the priority order. No votes at all yields the default category.
#[derive(Debug, Clone)]
pub struct CategoryInferrer {
    votes: HashMap<String, Vec<Category>>,
    rank: HashMap<Category, usize>,
    default: Category,
}

impl CategoryInferrer {
    pub fn new(lexicon: &Lexicon) -> Self {
        let mut votes: HashMap<String, Vec<Category>> = HashMap::new();
        for rule in &lexicon.tags {
            let entry = votes.entry(tag_key(&rule.tag)).or_default();
            for category in &rule.categories {
                if !entry.contains(category) {
                    entry.push(*category);
                }
            }
        }

        // Listed categories first, the rest after them in declaration order.
        let mut rank = HashMap::new();
        for category in lexicon
            .category_priority
            .iter()
            .copied()
            .chain(Category::ALL)
        {
            let next = rank.len();
            rank.entry(category).or_insert(next);
        }

        Self {
            votes,
            rank,
            default: lexicon.default_category,
        }
    }

    pub fn infer<'a, I>(&self, tags: I) -> Category
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = std::collections::HashSet::new();
        let mut tally: HashMap<Category, usize> = HashMap::new();

        for tag in tags {
            let key = tag_key(tag);
            if !seen.insert(key.clone()) {
                continue;
            }
            if let Some(categories) = self.votes.get(&key) {
                for category in categories {
                    *tally.entry(*category).or_insert(0) += 1;
                }
            }
        }

        tally
            .into_iter()
            .min_by_key(|(category, count)| {
                (std::cmp::Reverse(*count), self.rank.get(category).copied())
            })
            .map(|(category, _)| category)
            .unwrap_or(self.default)
    }
}

pub(crate) fn tag_key(tag: &str) -> String {
    tag.trim().to_lowercase()
}
