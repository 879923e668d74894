use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use adfit_core::AppConfig;
use adfit_pipeline::{BatchRequest, FetchRequest, RotationWeights};
use adfit_scoring::{load_scoring_config, HeuristicModel};
use adfit_transcript::TranscriptClient;
use adfit_youtube::{CostTable, QuotaLedger, SearchFilters, YoutubeClient};

#[derive(Debug, Parser)]
#[command(name = "adfit")]
#[command(about = "Campaign video discovery and contextual scoring pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations.
    Migrate,
    /// Run one keyword-rotated discovery cycle for a campaign.
    Fetch {
        /// Campaign public id.
        #[arg(long)]
        campaign: Uuid,
        /// Total videos to aim for across all keywords.
        #[arg(long, default_value_t = 50)]
        max_results: u32,
        #[arg(long, default_value = "en")]
        language: String,
        #[arg(long, default_value = "US")]
        region: String,
        /// Sort order: relevance, date, rating, viewCount, title.
        #[arg(long, default_value = "relevance")]
        order: String,
        /// Skip channel resolution and denormalized channel metrics.
        #[arg(long)]
        no_channels: bool,
    },
    /// Score specific videos (one --video per id).
    Score {
        #[arg(long)]
        campaign: Uuid,
        #[arg(long = "video", required = true)]
        videos: Vec<String>,
        /// Score from metadata only, without transcript enrichment.
        #[arg(long)]
        no_transcript: bool,
    },
    /// Score stored videos that have no score yet.
    ScorePending {
        #[arg(long)]
        campaign: Uuid,
        #[arg(long, default_value_t = 100)]
        limit: i64,
        #[arg(long)]
        no_transcript: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = adfit_core::load_app_config().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let cli = Cli::parse();

    let pool = adfit_db::connect_pool(&config.database_url, adfit_db::PoolConfig::from_app_config(&config))
        .await
        .context("connecting to database")?;

    match cli.command {
        Commands::Migrate => {
            let applied = adfit_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        Commands::Fetch {
            campaign,
            max_results,
            language,
            region,
            order,
            no_channels,
        } => {
            let client = youtube_client(&config)?;
            let ledger = QuotaLedger::new();
            let costs = CostTable::from_app_config(&config);

            let request = FetchRequest {
                campaign_id: campaign,
                max_results,
                filters: SearchFilters {
                    language,
                    region,
                    order,
                    ..SearchFilters::default()
                },
                keyword_slots: config.fetch_keyword_slots,
                rotation_weights: RotationWeights::default(),
                channel_discovery: config.fetch_channel_discovery && !no_channels,
                max_concurrent_searches: config.fetch_max_concurrent_searches,
            };

            let outcome =
                adfit_pipeline::fetch_for_campaign(&pool, &client, &client, &ledger, &costs, &request)
                    .await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Commands::Score {
            campaign,
            videos,
            no_transcript,
        } => {
            let transcript = transcript_client(&config)?;
            let scoring = load_scoring_config(config.scoring_config_path.as_deref())?;

            let request = BatchRequest {
                campaign_id: campaign,
                video_ids: videos,
                use_transcript: !no_transcript,
                max_concurrent: config.score_max_concurrent_videos,
            };
            let report =
                adfit_pipeline::run_batch(&pool, &transcript, &HeuristicModel, &scoring, &request)
                    .await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::ScorePending {
            campaign,
            limit,
            no_transcript,
        } => {
            let transcript = transcript_client(&config)?;
            let scoring = load_scoring_config(config.scoring_config_path.as_deref())?;

            let report = adfit_pipeline::score_pending(
                &pool,
                &transcript,
                &HeuristicModel,
                &scoring,
                campaign,
                limit,
                !no_transcript,
                config.score_max_concurrent_videos,
            )
            .await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn youtube_client(config: &AppConfig) -> anyhow::Result<YoutubeClient> {
    let api_key = config
        .youtube_api_key
        .as_deref()
        .context("YOUTUBE_API_KEY is required for fetch commands")?;
    Ok(YoutubeClient::new(
        api_key,
        config.youtube_request_timeout_secs,
        config.youtube_max_retries,
        config.youtube_retry_backoff_base_ms,
    )?)
}

fn transcript_client(config: &AppConfig) -> anyhow::Result<TranscriptClient> {
    if config.transcript_base_url.is_none() {
        tracing::info!("no transcript provider configured — scoring from metadata only");
    }
    Ok(TranscriptClient::new(
        config.transcript_base_url.as_deref(),
        config.transcript_request_timeout_secs,
    )?)
}
