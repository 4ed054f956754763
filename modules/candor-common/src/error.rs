use std::collections::BTreeSet;

use thiserror::Error;

use crate::types::Category;

#[derive(Error, Debug)]
pub enum CandorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Lexicon error: {0}")]
    Lexicon(String),

    #[error("{category} detector failed: {message}")]
    Detector { category: Category, message: String },

    #[error("Content rejected: {reason}")]
    Rejected {
        reason: String,
        categories: BTreeSet<Category>,
    },

    #[error("Store error: {0}")]
    Store(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
