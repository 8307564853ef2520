use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

use crate::classifier::lexicon::{Lexicon, SignalRule};

pub const MIN_SCORE: u8 = 0;
pub const MAX_SCORE: u8 = 10;

/// Sums the weights of every signal present in the text and clamps the total
/// to `MIN_SCORE..=MAX_SCORE`. Each signal counts once however often it fires.
#[derive(Debug, Clone)]
pub struct ImportanceScorer {
    signals: Vec<SignalRule>,
}

impl ImportanceScorer {
    pub fn new(lexicon: &Lexicon) -> Self {
        Self {
            signals: lexicon.signals.clone(),
        }
    }

    pub fn score_importance(&self, text: &str) -> u8 {
        if text.trim().is_empty() {
            return MIN_SCORE;
        }

        let lowered = text.to_lowercase();
        let total: i64 = self
            .signals
            .iter()
            .filter(|signal| signal.trigger.fires(text, &lowered))
            .map(|signal| i64::from(signal.weight))
            .sum();

        clamp_score(total)
    }
}

pub fn clamp_score(raw: i64) -> u8 {
    raw.clamp(i64::from(MIN_SCORE), i64::from(MAX_SCORE)) as u8
}

/// Coarse bucket over the importance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    High,
    Medium,
    Low,
}

impl ImpactLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            7.. => Self::High,
            4..=6 => Self::Medium,
            _ => Self::Low,
        }
    }
}

impl FromStr for ImpactLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(format!("unknown impact level: {}", other)),
        }
    }
}
