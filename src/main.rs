use anyhow::Result;
use chrono::Local;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use channel_reconciler::{
    config::Config,
    pipeline::ReconcilePipeline,
    playlist::PlaylistGenerator,
    services::StreamProber,
    sources::{self, SourceHandlerFactory},
    utils::StandardHttpClient,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "channel-reconciler")]
#[command(version)]
#[command(about = "Merge, verify and order live TV channel lists into one M3U playlist")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Playlist output path (overrides config file)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,

    /// Skip liveness probing; every untrusted entry is kept unchecked
    #[arg(long)]
    no_probe: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!("channel_reconciler={}", cli.log_level);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| log_filter.into());
    match cli.log_format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }

    info!("Starting channel reconciler v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    if let Some(output) = cli.output {
        config.output.path = output;
    }
    if cli.no_probe {
        config.probe.enabled = false;
    }

    let client = StandardHttpClient::new(&config.fetch)?;
    let handlers = SourceHandlerFactory::create_handlers(&config, &client);
    info!("Fetching {} enabled sources", handlers.len());
    let raw_entries = sources::ingest_all(&handlers).await;

    let prober = Arc::new(StreamProber::new(&config.probe)?);
    let pipeline = ReconcilePipeline::from_config(&config, prober);
    let output = pipeline.run(raw_entries).await;

    let generator = PlaylistGenerator::new(config.output.epg_url.clone());
    let content = generator.render(&output.entries, Local::now());
    if let Err(e) = generator.write(&config.output.path, &content).await {
        error!("Failed to write playlist: {}", e);
        return Err(e.into());
    }

    if config.output.create_nojekyll {
        match PlaylistGenerator::ensure_nojekyll(&PathBuf::from(".")).await {
            Ok(true) => info!("Created .nojekyll marker"),
            Ok(false) => {}
            Err(e) => warn!("Could not create .nojekyll marker: {}", e),
        }
    }

    info!(
        "Playlist generated: {} entries ({} raw, {} invalid, {} foreign, {} unreachable, {} duplicates)",
        output.stats.emitted,
        output.stats.raw_entries,
        output.stats.invalid_addresses,
        output.stats.foreign_dropped,
        output.stats.unreachable_dropped,
        output.stats.duplicates_dropped
    );
    Ok(())
}
