// Recalculation workflow around the pure engine.
//
// ReputationStore is the seam to whatever persists reviews and companies.
// The engine never sees it; Recalculator loads inputs, scores, writes back.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use candor_common::{RatedContribution, VoteTally};

use crate::engine::{PostingStats, ReputationScoringEngine};
use crate::scorecard::CompanyScorecard;

#[async_trait]
pub trait ReputationStore: Send + Sync {
    /// Current vote tally for a review.
    async fn vote_tally(&self, review_id: Uuid) -> Result<VoteTally>;

    /// Persist a review's helpfulness score.
    async fn save_helpfulness(&self, review_id: Uuid, score: f64) -> Result<()>;

    /// Every review of a company, including inactive/unpublished ones.
    async fn contributions(&self, company_id: Uuid) -> Result<Vec<RatedContribution>>;

    /// Active, published reviews of a company that carry verifying evidence.
    async fn verified_review_count(&self, company_id: Uuid) -> Result<u32>;

    async fn posting_stats(&self, company_id: Uuid) -> Result<PostingStats>;

    async fn save_scorecard(&self, company_id: Uuid, scorecard: &CompanyScorecard) -> Result<()>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepStats {
    pub refreshed: u32,
    pub failed: u32,
}

pub struct Recalculator<S> {
    store: S,
    engine: ReputationScoringEngine,
}

impl<S: ReputationStore> Recalculator<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            engine: ReputationScoringEngine,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Refresh one review's helpfulness after a vote is cast or withdrawn.
    pub async fn on_vote_cast(&self, review_id: Uuid) -> Result<f64> {
        let tally = self.store.vote_tally(review_id).await?;
        let score = self.engine.score_review(tally.upvotes, tally.downvotes);
        self.store.save_helpfulness(review_id, score).await?;
        Ok(score)
    }

    /// Recompute and store a company's scorecard as of `now`.
    pub async fn refresh_company(
        &self,
        company_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<CompanyScorecard> {
        let contributions = self.store.contributions(company_id).await?;
        let verified = self.store.verified_review_count(company_id).await?;
        let postings = self.store.posting_stats(company_id).await?;

        let scorecard = CompanyScorecard::compute(&contributions, verified, postings, now);
        self.store.save_scorecard(company_id, &scorecard).await?;

        info!(
            company_id = %company_id,
            reviews = scorecard.review_count,
            average_rating = scorecard.average_rating,
            trust_tier = %scorecard.trust_tier,
            "Company scorecard refreshed"
        );
        Ok(scorecard)
    }

    /// Scheduled pass so recency weights keep decaying without new reviews.
    /// A failing company is logged and counted; the sweep carries on.
    pub async fn horizon_sweep(&self, company_ids: &[Uuid], now: DateTime<Utc>) -> SweepStats {
        let mut stats = SweepStats::default();
        for &company_id in company_ids {
            match self.refresh_company(company_id, now).await {
                Ok(_) => stats.refreshed += 1,
                Err(e) => {
                    warn!(company_id = %company_id, error = %e, "Scorecard refresh failed");
                    stats.failed += 1;
                }
            }
        }
        info!(
            refreshed = stats.refreshed,
            failed = stats.failed,
            "Horizon sweep complete"
        );
        stats
    }
}
