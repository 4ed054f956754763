use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use candor_common::{CompanyTrustInputs, RatedContribution, TrustTier, VoteTally};

/// Days over which a review's weight decays to the floor.
pub const RECENCY_HORIZON_DAYS: i64 = 365;

/// Confidence-weighted share of upvotes, 0.0-100.0 (never reaches 100).
///
/// `ratio * (1 - 1/(T+1)) * 100` with `T` total votes, so equal ratios score
/// higher with more votes behind them. No votes scores 0.
pub fn popularity_score(upvotes: u32, downvotes: u32) -> f64 {
    let total = upvotes as f64 + downvotes as f64;
    if total == 0.0 {
        return 0.0;
    }
    let positive_ratio = upvotes as f64 / total;
    let confidence = 1.0 - 1.0 / (total + 1.0);
    positive_ratio * confidence * 100.0
}

/// Weight of a review submitted at `submitted_at`: 1.0 today, falling
/// linearly by 1/365 per whole day, floored at 1/365. Future timestamps
/// count as today.
pub fn recency_weight(submitted_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let days = (now - submitted_at).num_days().max(0);
    (RECENCY_HORIZON_DAYS - days).max(1) as f64 / RECENCY_HORIZON_DAYS as f64
}

/// Recency-weighted mean rating over active, published contributions.
/// 0 when none participate.
pub fn weighted_average_rating(contributions: &[RatedContribution], now: DateTime<Utc>) -> f64 {
    let (weighted_sum, weight_sum) = contributions
        .iter()
        .filter(|c| c.participates())
        .fold((0.0_f64, 0.0_f64), |(sum, weights), c| {
            let w = recency_weight(c.submitted_at, now);
            (sum + c.rating * w, weights + w)
        });

    if weight_sum == 0.0 {
        return 0.0;
    }
    weighted_sum / weight_sum
}

/// `rating * 20 + verified% * 0.3`, range 0-130.
pub fn trust_score(average_rating: f64, verified_percentage: f64) -> f64 {
    // 3/10 rather than 0.3 keeps round inputs on exact tier boundaries
    average_rating * 20.0 + verified_percentage * 3.0 / 10.0
}

pub fn trust_tier(average_rating: f64, verified_percentage: f64) -> TrustTier {
    TrustTier::from_score(trust_score(average_rating, verified_percentage))
}

/// Share of postings that ended in a hire. 0 when nothing was posted.
pub fn hiring_rate(successful_hires: u32, total_postings: u32) -> f64 {
    if total_postings == 0 {
        return 0.0;
    }
    successful_hires as f64 / total_postings as f64
}

/// Verified reviews as a percentage of all reviews, 0.0-100.0.
pub fn verified_percentage(verified: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (verified.min(total) as f64 * 100.0) / total as f64
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingStats {
    pub successful_hires: u32,
    pub total_postings: u32,
}

impl PostingStats {
    pub fn hiring_rate(&self) -> f64 {
        hiring_rate(self.successful_hires, self.total_postings)
    }
}

/// The scoring contract handed to recalculation callers. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReputationScoringEngine;

impl ReputationScoringEngine {
    pub fn score_review(&self, upvotes: u32, downvotes: u32) -> f64 {
        popularity_score(upvotes, downvotes)
    }

    pub fn score_tally(&self, tally: &VoteTally) -> f64 {
        popularity_score(tally.upvotes, tally.downvotes)
    }

    pub fn score_company(&self, contributions: &[RatedContribution], now: DateTime<Utc>) -> f64 {
        weighted_average_rating(contributions, now)
    }

    pub fn trust_tier(&self, average_rating: f64, verified_percentage: f64) -> TrustTier {
        trust_tier(average_rating, verified_percentage)
    }

    pub fn trust_tier_for(&self, inputs: &CompanyTrustInputs) -> TrustTier {
        trust_tier(inputs.average_rating, inputs.verified_percentage)
    }

    pub fn hiring_rate(&self, successful_hires: u32, total_postings: u32) -> f64 {
        hiring_rate(successful_hires, total_postings)
    }
}
