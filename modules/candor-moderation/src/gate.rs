use candor_common::{CandorError, ModerationVerdict};

/// Called by submit/edit workflows before a review is marked publishable.
/// A rejected verdict comes back as `CandorError::Rejected` with the reason
/// and categories to show the submitter.
pub fn ensure_publishable(verdict: &ModerationVerdict) -> Result<(), CandorError> {
    if verdict.is_approved {
        return Ok(());
    }
    Err(CandorError::Rejected {
        reason: verdict.reason.clone(),
        categories: verdict.categories.clone(),
    })
}
