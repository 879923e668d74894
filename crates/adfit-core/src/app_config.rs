use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub youtube_api_key: Option<String>,
    pub youtube_request_timeout_secs: u64,
    pub youtube_max_retries: u32,
    pub youtube_retry_backoff_base_ms: u64,
    pub quota_search_units: u64,
    pub quota_video_list_units: u64,
    pub quota_channel_list_units: u64,
    pub transcript_base_url: Option<String>,
    pub transcript_request_timeout_secs: u64,
    pub scoring_config_path: Option<PathBuf>,
    pub fetch_keyword_slots: usize,
    pub fetch_max_concurrent_searches: usize,
    pub fetch_channel_discovery: bool,
    pub score_max_concurrent_videos: usize,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field(
                "youtube_api_key",
                &self.youtube_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "youtube_request_timeout_secs",
                &self.youtube_request_timeout_secs,
            )
            .field("youtube_max_retries", &self.youtube_max_retries)
            .field(
                "youtube_retry_backoff_base_ms",
                &self.youtube_retry_backoff_base_ms,
            )
            .field("quota_search_units", &self.quota_search_units)
            .field("quota_video_list_units", &self.quota_video_list_units)
            .field("quota_channel_list_units", &self.quota_channel_list_units)
            .field("transcript_base_url", &self.transcript_base_url)
            .field(
                "transcript_request_timeout_secs",
                &self.transcript_request_timeout_secs,
            )
            .field("scoring_config_path", &self.scoring_config_path)
            .field("fetch_keyword_slots", &self.fetch_keyword_slots)
            .field(
                "fetch_max_concurrent_searches",
                &self.fetch_max_concurrent_searches,
            )
            .field("fetch_channel_discovery", &self.fetch_channel_discovery)
            .field(
                "score_max_concurrent_videos",
                &self.score_max_concurrent_videos,
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
