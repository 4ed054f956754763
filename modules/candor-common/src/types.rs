use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

// --- Moderation ---

/// Reason a piece of review text was held back from publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Profanity,
    PersonalInfo,
    Spam,
    Threat,
    Discrimination,
    Empty,
}

impl Category {
    /// Human-readable keyword used when composing rejection reasons.
    pub fn keyword(&self) -> &'static str {
        match self {
            Category::Profanity => "profanity",
            Category::PersonalInfo => "personal information",
            Category::Spam => "spam",
            Category::Threat => "threatening",
            Category::Discrimination => "discriminatory",
            Category::Empty => "empty",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Profanity => write!(f, "Profanity"),
            Category::PersonalInfo => write!(f, "PersonalInfo"),
            Category::Spam => write!(f, "Spam"),
            Category::Threat => write!(f, "Threat"),
            Category::Discrimination => write!(f, "Discrimination"),
            Category::Empty => write!(f, "Empty"),
        }
    }
}

/// Outcome of one moderation call. Built fresh per call and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationVerdict {
    /// True iff no category was triggered.
    pub is_approved: bool,
    /// Empty when approved, otherwise names every triggered category.
    pub reason: String,
    pub categories: BTreeSet<Category>,
    /// Canonical profanity roots, in submission order. Duplicates kept.
    pub flagged_words: Vec<String>,
    /// 0.0-1.0, never 0 for non-empty input.
    pub confidence: f32,
    /// Character count of the input as submitted (not the normalized copy).
    pub content_length: usize,
    pub processing_time: Duration,
    pub moderated_at: DateTime<Utc>,
}

impl ModerationVerdict {
    pub fn has(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }
}

// --- Reputation ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub upvotes: u32,
    pub downvotes: u32,
}

impl VoteTally {
    pub fn new(upvotes: u32, downvotes: u32) -> Self {
        Self { upvotes, downvotes }
    }

    pub fn total(&self) -> u64 {
        self.upvotes as u64 + self.downvotes as u64
    }
}

/// One review's contribution to a company's rating aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
pub struct RatedContribution {
    /// 0.5-5.0 in half-star steps.
    pub rating: f64,
    pub submitted_at: DateTime<Utc>,
    #[builder(default = true)]
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[builder(default = true)]
    #[serde(default = "default_true")]
    pub is_published: bool,
}

fn default_true() -> bool {
    true
}

impl RatedContribution {
    /// Only active, published reviews count toward aggregates.
    pub fn participates(&self) -> bool {
        self.is_active && self.is_published
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompanyTrustInputs {
    /// 0.0-5.0
    pub average_rating: f64,
    /// 0.0-100.0, share of reviews with verifying evidence.
    pub verified_percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustTier {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

/// Trust score thresholds, checked top-down.
pub const TRUST_VERY_HIGH: f64 = 90.0;
pub const TRUST_HIGH: f64 = 75.0;
pub const TRUST_MEDIUM: f64 = 60.0;
pub const TRUST_LOW: f64 = 40.0;

impl TrustTier {
    pub fn from_score(score: f64) -> Self {
        if score >= TRUST_VERY_HIGH {
            TrustTier::VeryHigh
        } else if score >= TRUST_HIGH {
            TrustTier::High
        } else if score >= TRUST_MEDIUM {
            TrustTier::Medium
        } else if score >= TRUST_LOW {
            TrustTier::Low
        } else {
            TrustTier::VeryLow
        }
    }
}

impl std::fmt::Display for TrustTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrustTier::VeryHigh => write!(f, "VeryHigh"),
            TrustTier::High => write!(f, "High"),
            TrustTier::Medium => write!(f, "Medium"),
            TrustTier::Low => write!(f, "Low"),
            TrustTier::VeryLow => write!(f, "VeryLow"),
        }
    }
}
