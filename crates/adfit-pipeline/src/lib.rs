pub mod batch;
pub mod discovery;
pub mod error;
pub mod providers;
pub mod rotation;

pub use batch::{run_batch, score_pending, BatchReport, BatchRequest, VideoFailure, VideoScoreSummary};
pub use discovery::{fetch_for_campaign, FetchFailure, FetchOutcome, FetchRequest};
pub use error::PipelineError;
pub use providers::{MetadataProvider, SearchProvider, TranscriptProvider};
pub use rotation::{plan_rotation, select_keywords, RotationWeights};
