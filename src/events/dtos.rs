use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::classifier::{Category, Classification, ImpactLevel, TagNormalizer, scorer::clamp_score};
use crate::extractor::ExtractedArticle;

pub const MAX_TITLE_LEN: usize = 200;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ClassifyRequest {
    pub title: String,
    pub description: Option<String>,
    /// Comma/semicolon separated, ASCII or full-width.
    pub tags: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub tags: Option<String>,
    pub category: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ExtractRequest {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExtractResponse {
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
}

impl From<ExtractedArticle> for ExtractResponse {
    fn from(article: ExtractedArticle) -> Self {
        Self {
            title: article.title,
            content: article.body,
            images: article.images,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub tags: Vec<String>,
    pub category: Category,
    pub impact_score: u8,
    pub impact_level: ImpactLevel,
}

/// Blank strings count as absent; anything else must name a known category.
pub fn parse_category(raw: Option<&str>) -> Result<Option<Category>, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some),
    }
}

fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title cannot be empty".to_string());
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err("Title too long".to_string());
    }
    Ok(())
}

impl ClassifyRequest {
    pub fn validate(&self) -> Result<Option<Category>, String> {
        validate_title(&self.title)?;
        parse_category(self.category.as_deref())
    }
}

impl CreateEventRequest {
    pub fn validate(&self) -> Result<Option<Category>, String> {
        validate_title(&self.title)?;
        parse_category(self.category.as_deref())
    }
}

impl ExtractRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err("URL cannot be empty".to_string());
        }
        if self.url.len() > 2048 {
            return Err("URL too long".to_string());
        }
        Ok(())
    }
}

/// A classified event ready to hand to persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub tags: Vec<String>,
    pub category: Category,
    pub impact_score: u8,
}

impl NewEvent {
    pub fn from_request(
        request: &CreateEventRequest,
        classification: &Classification,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            title: request.title.trim().to_string(),
            description: request.description.clone(),
            event_date: request.event_date.unwrap_or(now),
            tags: classification.tags.clone(),
            category: classification.category,
            impact_score: classification.importance,
        }
    }
}

/// Catalogue entry recorded for each tag the first time it is seen. The
/// category is the inferred one, even when the event itself was overridden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    pub name: String,
    pub category: Category,
}

impl TagEntry {
    pub fn from_classification(classification: &Classification) -> Vec<Self> {
        classification
            .tags
            .iter()
            .map(|name| Self {
                name: name.clone(),
                category: classification.inferred_category,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub tags: Vec<String>,
    pub category: Category,
    pub impact_score: u8,
}

impl From<EventRecord> for EventResponse {
    fn from(record: EventRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            event_date: record.event_date,
            tags: record.tags,
            category: record.category,
            impact_level: ImpactLevel::from_score(record.impact_score),
            impact_score: record.impact_score,
        }
    }
}

/// Sparse update: only fields that are `Some` are applied.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub tags: Option<String>,
    pub category: Option<String>,
    pub impact_score: Option<i64>,
}

impl EventPatch {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(category) = &self.category {
            category.parse::<Category>()?;
        }
        Ok(())
    }
}

impl EventRecord {
    /// Merge a validated patch field by field. Tags are re-split and
    /// deduplicated; the impact score is clamped into range.
    pub fn apply(&mut self, patch: &EventPatch, normalizer: &TagNormalizer) -> Result<(), String> {
        patch.validate()?;

        if let Some(title) = &patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(event_date) = patch.event_date {
            self.event_date = event_date;
        }
        if let Some(tags) = &patch.tags {
            self.tags = normalizer.normalize(Some(tags.as_str()), Vec::<&str>::new());
        }
        if let Some(category) = &patch.category {
            self.category = category.parse()?;
        }
        if let Some(score) = patch.impact_score {
            self.impact_score = clamp_score(score);
        }
        Ok(())
    }
}
