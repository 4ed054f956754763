// In-memory ReputationStore for tests. Thread-safe via interior Mutex.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use candor_common::{RatedContribution, VoteTally};

use crate::engine::PostingStats;
use crate::recalc::ReputationStore;
use crate::scorecard::CompanyScorecard;

#[derive(Default)]
struct MockStoreInner {
    votes: HashMap<Uuid, VoteTally>,
    helpfulness: HashMap<Uuid, f64>,
    reviews: HashMap<Uuid, Vec<(RatedContribution, bool)>>,
    postings: HashMap<Uuid, PostingStats>,
    scorecards: HashMap<Uuid, CompanyScorecard>,
    failing: HashSet<Uuid>,
}

#[derive(Default)]
pub struct MockReputationStore {
    inner: Mutex<MockStoreInner>,
}

impl MockReputationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_votes(&self, review_id: Uuid, tally: VoteTally) {
        self.inner.lock().unwrap().votes.insert(review_id, tally);
    }

    /// Add an active, published review.
    pub fn add_review(&self, company_id: Uuid, rating: f64, submitted_at: DateTime<Utc>, verified: bool) {
        let contribution = RatedContribution::builder()
            .rating(rating)
            .submitted_at(submitted_at)
            .build();
        self.add_contribution(company_id, contribution, verified);
    }

    pub fn add_contribution(&self, company_id: Uuid, contribution: RatedContribution, verified: bool) {
        self.inner
            .lock()
            .unwrap()
            .reviews
            .entry(company_id)
            .or_default()
            .push((contribution, verified));
    }

    pub fn set_postings(&self, company_id: Uuid, stats: PostingStats) {
        self.inner.lock().unwrap().postings.insert(company_id, stats);
    }

    /// Make every read for this company fail.
    pub fn fail_company(&self, company_id: Uuid) {
        self.inner.lock().unwrap().failing.insert(company_id);
    }

    pub fn helpfulness(&self, review_id: Uuid) -> Option<f64> {
        self.inner.lock().unwrap().helpfulness.get(&review_id).copied()
    }

    pub fn scorecard(&self, company_id: Uuid) -> Option<CompanyScorecard> {
        self.inner.lock().unwrap().scorecards.get(&company_id).cloned()
    }

    fn check(&self, company_id: Uuid) -> Result<()> {
        if self.inner.lock().unwrap().failing.contains(&company_id) {
            return Err(anyhow!("store unavailable for company {company_id}"));
        }
        Ok(())
    }
}

#[async_trait]
impl ReputationStore for MockReputationStore {
    async fn vote_tally(&self, review_id: Uuid) -> Result<VoteTally> {
        self.inner
            .lock()
            .unwrap()
            .votes
            .get(&review_id)
            .copied()
            .ok_or_else(|| anyhow!("review {review_id} not found"))
    }

    async fn save_helpfulness(&self, review_id: Uuid, score: f64) -> Result<()> {
        self.inner.lock().unwrap().helpfulness.insert(review_id, score);
        Ok(())
    }

    async fn contributions(&self, company_id: Uuid) -> Result<Vec<RatedContribution>> {
        self.check(company_id)?;
        Ok(self
            .inner
            .lock()
            .unwrap()
            .reviews
            .get(&company_id)
            .map(|rs| rs.iter().map(|(c, _)| c.clone()).collect())
            .unwrap_or_default())
    }

    async fn verified_review_count(&self, company_id: Uuid) -> Result<u32> {
        self.check(company_id)?;
        Ok(self
            .inner
            .lock()
            .unwrap()
            .reviews
            .get(&company_id)
            .map(|rs| {
                rs.iter()
                    .filter(|(c, verified)| *verified && c.participates())
                    .count() as u32
            })
            .unwrap_or(0))
    }

    async fn posting_stats(&self, company_id: Uuid) -> Result<PostingStats> {
        self.check(company_id)?;
        Ok(self
            .inner
            .lock()
            .unwrap()
            .postings
            .get(&company_id)
            .copied()
            .unwrap_or_default())
    }

    async fn save_scorecard(&self, company_id: Uuid, scorecard: &CompanyScorecard) -> Result<()> {
        self.inner
            .lock()
            .unwrap()
            .scorecards
            .insert(company_id, scorecard.clone());
        Ok(())
    }
}
