//! Scoring scenarios and properties.
//!
//! Layer 1 is pure: the four engine formulas against hand-computed values and
//! proptest properties. Layer 2 runs the recalculation workflow against the
//! in-memory store from the `test-support` feature.
//!
//! Run with: cargo test -p candor-scoring --test scoring_scenarios_test

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use uuid::Uuid;

use candor_common::{RatedContribution, TrustTier, VoteTally};
use candor_scoring::testing::MockReputationStore;
use candor_scoring::{
    hiring_rate, popularity_score, trust_tier, weighted_average_rating, PostingStats,
    Recalculator, ReputationScoringEngine,
};

// ---------------------------------------------------------------------------
// Layer 1: formulas
// ---------------------------------------------------------------------------

#[test]
fn zero_votes_is_zero() {
    assert_eq!(popularity_score(0, 0), 0.0);
}

#[test]
fn recent_review_outweighs_old_one_but_both_count() {
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let today = RatedContribution::builder().rating(5.0).submitted_at(now).build();
    let old = RatedContribution::builder()
        .rating(2.0)
        .submitted_at(now - Duration::days(300))
        .build();

    let avg = weighted_average_rating(&[today.clone(), old.clone()], now);
    // Plain mean would be 3.5
    assert!(avg > 3.5, "recent review should dominate, got {avg}");
    assert!(avg < 5.0, "old review should still count, got {avg}");

    // Swap ratings: now the old review is the 5-star one
    let swapped = weighted_average_rating(
        &[
            RatedContribution { rating: 2.0, ..today },
            RatedContribution { rating: 5.0, ..old },
        ],
        now,
    );
    assert!(swapped < 3.5 && swapped > 2.0);
}

#[test]
fn trust_tier_documented_boundaries() {
    // 4.5*20 + 100*0.3 = 120
    assert_eq!(trust_tier(4.5, 100.0), TrustTier::VeryHigh);
    assert_eq!(trust_tier(4.0, 33.4), TrustTier::VeryHigh); // 90.02
    assert_eq!(trust_tier(3.0, 50.0), TrustTier::High); // 75
    assert_eq!(trust_tier(2.0, 66.7), TrustTier::Medium); // 60.01
    assert_eq!(trust_tier(2.0, 0.0), TrustTier::Low); // 40
    assert_eq!(trust_tier(1.0, 10.0), TrustTier::VeryLow); // 23
}

#[test]
fn hiring_rate_examples() {
    assert_eq!(hiring_rate(3, 10), 0.3);
    assert_eq!(hiring_rate(0, 0), 0.0);
}

proptest! {
    #[test]
    fn popularity_is_in_range(up in 0u32..100_000, down in 0u32..100_000) {
        let score = popularity_score(up, down);
        prop_assert!((0.0..100.0).contains(&score));
    }

    #[test]
    fn popularity_never_drops_with_more_upvotes(up in 0u32..10_000, down in 0u32..10_000) {
        prop_assert!(popularity_score(up + 1, down) >= popularity_score(up, down));
    }

    #[test]
    fn same_ratio_with_more_votes_scores_higher(up in 1u32..1_000, down in 0u32..1_000, k in 2u32..10) {
        prop_assert!(popularity_score(up * k, down * k) > popularity_score(up, down));
    }

    #[test]
    fn weighted_average_stays_within_rating_bounds(
        ratings in prop::collection::vec((1u32..=10, 0i64..2_000), 1..20)
    ) {
        let now = Utc::now();
        let contributions: Vec<RatedContribution> = ratings
            .iter()
            .map(|(half_stars, days)| {
                RatedContribution::builder()
                    .rating(*half_stars as f64 / 2.0)
                    .submitted_at(now - Duration::days(*days))
                    .build()
            })
            .collect();
        let min = contributions.iter().map(|c| c.rating).fold(f64::INFINITY, f64::min);
        let max = contributions.iter().map(|c| c.rating).fold(f64::NEG_INFINITY, f64::max);

        let avg = weighted_average_rating(&contributions, now);
        prop_assert!(avg >= min - 1e-9 && avg <= max + 1e-9);
    }

    #[test]
    fn hiring_rate_is_a_fraction(postings in 1u32..10_000, hires_pct in 0u32..=100) {
        let hires = postings * hires_pct / 100;
        let rate = hiring_rate(hires, postings);
        prop_assert!((0.0..=1.0).contains(&rate));
    }
}

// ---------------------------------------------------------------------------
// Layer 2: recalculation workflow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn vote_cast_updates_review_score() {
    let store = MockReputationStore::new();
    let review = Uuid::new_v4();
    store.set_votes(review, VoteTally::new(9, 1));

    let recalc = Recalculator::new(store);
    let score = recalc.on_vote_cast(review).await.unwrap();

    assert_eq!(score, ReputationScoringEngine.score_review(9, 1));
    assert_eq!(recalc.store().helpfulness(review), Some(score));
}

#[tokio::test]
async fn unpublishing_a_review_changes_the_company_average() {
    let store = MockReputationStore::new();
    let company = Uuid::new_v4();
    let now = Utc::now();
    store.add_review(company, 5.0, now, true);
    store.add_contribution(
        company,
        RatedContribution::builder()
            .rating(1.0)
            .submitted_at(now)
            .is_published(false)
            .build(),
        true,
    );

    let recalc = Recalculator::new(store);
    let card = recalc.refresh_company(company, now).await.unwrap();

    assert_eq!(card.review_count, 1);
    assert_eq!(card.average_rating, 5.0);
    assert_eq!(card.verified_percentage, 100.0);
}

#[tokio::test]
async fn horizon_sweep_continues_past_failures() {
    let store = MockReputationStore::new();
    let healthy = Uuid::new_v4();
    let broken = Uuid::new_v4();
    let now = Utc::now();
    store.add_review(healthy, 3.0, now, false);
    store.set_postings(healthy, PostingStats { successful_hires: 3, total_postings: 10 });
    store.fail_company(broken);

    let recalc = Recalculator::new(store);
    let stats = recalc.horizon_sweep(&[broken, healthy], now).await;

    assert_eq!(stats.refreshed, 1);
    assert_eq!(stats.failed, 1);
    let card = recalc.store().scorecard(healthy).unwrap();
    assert_eq!(card.average_rating, 3.0);
    assert_eq!(card.trust_tier, TrustTier::Medium);
    assert_eq!(card.hiring_rate, 0.3);
    assert!(recalc.store().scorecard(broken).is_none());
}

#[test]
fn scorecard_serializes_tier_snake_case() {
    let card = candor_scoring::CompanyScorecard::compute(&[], 0, PostingStats::default(), Utc::now());
    let json = serde_json::to_value(&card).unwrap();
    assert_eq!(json["trust_tier"], "very_low");
}
