use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use candor_common::{RatedContribution, TrustTier};

use crate::engine::{trust_score, verified_percentage, weighted_average_rating, PostingStats};

/// Company-level aggregates written back by the recalculation workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyScorecard {
    pub average_rating: f64,
    /// Active, published reviews that fed the average.
    pub review_count: u32,
    pub verified_percentage: f64,
    pub trust_score: f64,
    pub trust_tier: TrustTier,
    pub hiring_rate: f64,
    pub computed_at: DateTime<Utc>,
}

impl CompanyScorecard {
    /// `verified_count` is the number of participating reviews with
    /// verifying evidence.
    pub fn compute(
        contributions: &[RatedContribution],
        verified_count: u32,
        postings: PostingStats,
        now: DateTime<Utc>,
    ) -> Self {
        let review_count = contributions.iter().filter(|c| c.participates()).count() as u32;
        let average_rating = weighted_average_rating(contributions, now);
        let verified_percentage = verified_percentage(verified_count, review_count);
        let trust_score = trust_score(average_rating, verified_percentage);

        Self {
            average_rating,
            review_count,
            verified_percentage,
            trust_score,
            trust_tier: TrustTier::from_score(trust_score),
            hiring_rate: postings.hiring_rate(),
            computed_at: now,
        }
    }
}
