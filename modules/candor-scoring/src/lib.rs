//! Helpfulness, rating and trust signals for reviews and companies.
//!
//! `engine` holds the closed-form formulas (pure, no I/O). `recalc` drives them
//! against a `ReputationStore` whenever votes, reviews or time change.

pub mod engine;
pub mod scorecard;
pub mod recalc;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use engine::{
    hiring_rate, popularity_score, recency_weight, trust_score, trust_tier, verified_percentage,
    weighted_average_rating, PostingStats, ReputationScoringEngine,
};
pub use recalc::{Recalculator, ReputationStore, SweepStats};
pub use scorecard::CompanyScorecard;
