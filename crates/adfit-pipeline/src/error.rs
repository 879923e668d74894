use thiserror::Error;
use uuid::Uuid;

/// Errors that abort an entire pipeline operation.
///
/// Per-item failures (one keyword's search, one video's scoring) never show
/// up here — they are collected into the operation's report and the
/// operation still succeeds. This taxonomy covers requests rejected before
/// any external call and infrastructure failures that make the whole
/// operation meaningless.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Malformed request, rejected before any external call.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("campaign {0} not found")]
    CampaignNotFound(Uuid),

    #[error(transparent)]
    Db(#[from] adfit_db::DbError),
}
