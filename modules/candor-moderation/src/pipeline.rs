use std::collections::BTreeSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::LazyLock;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, warn};

use candor_common::{CandorError, Category, Lexicon, ModerationVerdict};

use crate::detectors::{DetectorInput, Finding, Tables, DETECTORS};
use crate::normalize::normalize;

/// Certainty reported for a check that could not run.
const DEGRADED_CERTAINTY: f32 = 0.5;
/// Word count at which input length stops adding confidence.
const CONFIDENT_WORD_COUNT: usize = 20;

static BUILTIN: LazyLock<ModerationPipeline> = LazyLock::new(|| {
    ModerationPipeline::new(Lexicon::builtin()).expect("built-in lexicon compiles")
});

/// Moderate with the built-in lexicon.
pub fn moderate(text: &str) -> ModerationVerdict {
    ModerationPipeline::builtin().moderate(text)
}

/// Runs every detector over a piece of text and folds the findings into a
/// verdict. Holds only compiled, read-only tables; share it freely.
#[derive(Debug, Clone)]
pub struct ModerationPipeline {
    tables: Tables,
}

impl ModerationPipeline {
    pub fn new(lexicon: &Lexicon) -> Result<Self, CandorError> {
        Ok(Self {
            tables: Tables::compile(lexicon)?,
        })
    }

    /// Process-wide pipeline over the built-in lexicon.
    pub fn builtin() -> &'static ModerationPipeline {
        &BUILTIN
    }

    /// `None` is treated the same as empty text.
    pub fn moderate_optional(&self, text: Option<&str>) -> ModerationVerdict {
        self.moderate(text.unwrap_or_default())
    }

    pub fn moderate(&self, text: &str) -> ModerationVerdict {
        let started = Instant::now();
        let content_length = text.chars().count();

        if text.trim().is_empty() {
            return ModerationVerdict {
                is_approved: false,
                reason: "Content is empty".to_string(),
                categories: BTreeSet::from([Category::Empty]),
                flagged_words: Vec::new(),
                confidence: 0.0,
                content_length,
                processing_time: elapsed_since(started),
                moderated_at: Utc::now(),
            };
        }

        let normalized = normalize(text, &self.tables.profanity);
        let input = DetectorInput {
            raw: text,
            normalized: &normalized,
        };

        let findings: Vec<Finding> = DETECTORS
            .iter()
            .filter_map(|(category, detector)| {
                run_guarded(*category, || detector(&self.tables, &input))
            })
            .collect();

        let word_count = text.split_whitespace().count();
        let verdict = fold_findings(findings, word_count, content_length, started);

        debug!(
            approved = verdict.is_approved,
            categories = verdict.categories.len(),
            flagged = verdict.flagged_words.len(),
            confidence = verdict.confidence,
            elapsed_us = verdict.processing_time.as_micros() as u64,
            "Moderated content"
        );

        verdict
    }
}

/// Run one detector. A panic becomes a finding for that detector's category,
/// so a check that did not complete can never let content through.
fn run_guarded<F>(category: Category, detector: F) -> Option<Finding>
where
    F: FnOnce() -> Option<Finding>,
{
    match catch_unwind(AssertUnwindSafe(detector)) {
        Ok(finding) => finding,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            let err = CandorError::Detector { category, message };
            warn!(category = %category, error = %err, "Detector failed, holding content back");
            Some(Finding {
                category,
                flagged: Vec::new(),
                clause: format!("{} check could not run", category.keyword()),
                certainty: DEGRADED_CERTAINTY,
            })
        }
    }
}

fn fold_findings(
    findings: Vec<Finding>,
    word_count: usize,
    content_length: usize,
    started: Instant,
) -> ModerationVerdict {
    let confidence = confidence(word_count, &findings);

    let mut categories = BTreeSet::new();
    let mut flagged_words = Vec::new();
    let mut clauses = Vec::new();
    for finding in findings {
        categories.insert(finding.category);
        flagged_words.extend(finding.flagged);
        clauses.push(finding.clause);
    }

    let is_approved = categories.is_empty();
    let reason = if is_approved {
        String::new()
    } else {
        format!("Content rejected: {}", clauses.join("; "))
    };

    ModerationVerdict {
        is_approved,
        reason,
        categories,
        flagged_words,
        confidence,
        content_length,
        processing_time: elapsed_since(started),
        moderated_at: Utc::now(),
    }
}

/// Length factor scaled by the least certain finding. Short texts and
/// near-threshold heuristics lower it; never 0 for non-empty input.
fn confidence(word_count: usize, findings: &[Finding]) -> f32 {
    let length_factor = word_count.min(CONFIDENT_WORD_COUNT) as f32 / CONFIDENT_WORD_COUNT as f32;
    let certainty = findings
        .iter()
        .map(|f| f.certainty)
        .fold(1.0_f32, f32::min);
    (certainty * (0.5 + 0.5 * length_factor)).clamp(0.05, 1.0)
}

/// Wall-clock time since `started`, never zero.
fn elapsed_since(started: Instant) -> Duration {
    started.elapsed().max(Duration::from_nanos(1))
}
