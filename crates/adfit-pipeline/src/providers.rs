//! Capability traits at the external-provider seams.
//!
//! The orchestration code is generic over these so tests can substitute
//! deterministic fakes; production wires in the concrete clients. The
//! scoring-model seam lives in `adfit-scoring` ([`adfit_scoring::ScoringModel`]).

use async_trait::async_trait;

use adfit_core::{NormalizedChannel, NormalizedVideo};
use adfit_transcript::{Transcript, TranscriptClient};
use adfit_youtube::{SearchFilters, SearchHits, YoutubeClient, YoutubeError};

/// Cost-metered keyword search.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(
        &self,
        keyword: &str,
        filters: &SearchFilters,
    ) -> Result<SearchHits, YoutubeError>;
}

#[async_trait]
impl SearchProvider for YoutubeClient {
    async fn search(
        &self,
        keyword: &str,
        filters: &SearchFilters,
    ) -> Result<SearchHits, YoutubeError> {
        YoutubeClient::search(self, keyword, filters).await
    }
}

/// Batched metadata resolution. Implementations return the number of
/// physical batch calls issued so the caller can charge quota per call.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn fetch_videos(
        &self,
        ids: &[String],
    ) -> Result<(Vec<NormalizedVideo>, u64), YoutubeError>;

    async fn fetch_channels(
        &self,
        ids: &[String],
    ) -> Result<(Vec<NormalizedChannel>, u64), YoutubeError>;
}

#[async_trait]
impl MetadataProvider for YoutubeClient {
    async fn fetch_videos(
        &self,
        ids: &[String],
    ) -> Result<(Vec<NormalizedVideo>, u64), YoutubeError> {
        self.list_videos(ids).await
    }

    async fn fetch_channels(
        &self,
        ids: &[String],
    ) -> Result<(Vec<NormalizedChannel>, u64), YoutubeError> {
        self.list_channels(ids).await
    }
}

/// Best-effort transcript retrieval; never fails at the interface level.
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    async fn acquire(&self, video_id: &str, languages: &[String]) -> Transcript;
}

#[async_trait]
impl TranscriptProvider for TranscriptClient {
    async fn acquire(&self, video_id: &str, languages: &[String]) -> Transcript {
        TranscriptClient::acquire(self, video_id, languages).await
    }
}
