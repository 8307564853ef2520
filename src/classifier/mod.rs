pub mod category;
pub mod lexicon;
pub mod matcher;
pub mod normalizer;
pub mod scorer;

pub use category::{Category, CategoryInferrer};
pub use lexicon::{Lexicon, LexiconError};
pub use matcher::TagMatcher;
pub use normalizer::TagNormalizer;
pub use scorer::{ImpactLevel, ImportanceScorer};

use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Classification {
    pub tags: Vec<String>,
    /// The override when one was given, otherwise the inferred category.
    pub category: Category,
    pub inferred_category: Category,
    pub importance: u8,
    pub impact_level: ImpactLevel,
}

/// Deterministic keyword classifier for event text.
///
/// All tables are fixed at construction, so one instance can be shared across
/// threads and every call depends only on its arguments.
#[derive(Debug, Clone)]
pub struct Classifier {
    matcher: TagMatcher,
    inferrer: CategoryInferrer,
    scorer: ImportanceScorer,
    normalizer: TagNormalizer,
}

impl Classifier {
    pub fn new(lexicon: &Lexicon) -> Self {
        Self {
            matcher: TagMatcher::new(lexicon),
            inferrer: CategoryInferrer::new(lexicon),
            scorer: ImportanceScorer::new(lexicon),
            normalizer: TagNormalizer::default(),
        }
    }

    pub fn normalizer(&self) -> &TagNormalizer {
        &self.normalizer
    }

    pub fn classify(
        &self,
        title: &str,
        description: Option<&str>,
        user_tags: Option<&str>,
        category_override: Option<Category>,
    ) -> Classification {
        let text = format!("{} {}", title, description.unwrap_or_default());

        let machine_tags = self.matcher.extract_tags(&text);
        let tags = self
            .normalizer
            .normalize(user_tags, machine_tags.iter().map(String::as_str));
        let inferred_category = self.inferrer.infer(tags.iter().map(String::as_str));
        let importance = self.scorer.score_importance(&text);

        debug!(
            machine_tags = machine_tags.len(),
            tags = tags.len(),
            %inferred_category,
            importance,
            "Classified event text"
        );

        Classification {
            tags,
            category: category_override.unwrap_or(inferred_category),
            inferred_category,
            importance,
            impact_level: ImpactLevel::from_score(importance),
        }
    }
}
