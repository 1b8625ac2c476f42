use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use pgsharp_monitor::config::{self, LOG_BACKUP_COUNT, LOG_MAX_BYTES, MonitorConfig};
use pgsharp_monitor::logging;
use pgsharp_monitor::monitor::extractor::VersionExtractor;
use pgsharp_monitor::monitor::fetcher::HttpPageFetcher;
use pgsharp_monitor::monitor::notifier::LineNotifier;
use pgsharp_monitor::monitor::runner::Monitor;
use pgsharp_monitor::monitor::store::FileVersionStore;

#[derive(Parser)]
#[command(name = "pgsharp-monitor")]
#[command(version, about = "Push a LINE message when the published PGSharp version changes")]
struct Cli {
    /// Directory for the version file and log file (overrides SCRIPT_BASE_DIR)
    #[arg(long, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Env file to load instead of searching for .env
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Also write log output to stderr
    #[arg(long)]
    console: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    config::load_env_file(cli.env_file.as_deref())?;
    let config = MonitorConfig::from_env(cli.base_dir)?;

    let log_path = config.log_file();
    let _guard = logging::init(&log_path, LOG_MAX_BYTES, LOG_BACKUP_COUNT, cli.console)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    info!("Using base directory {:?}", config.base_dir);

    let monitor = build_monitor(&config).inspect_err(|e| error!("{:#}", e))?;

    let outcome = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(monitor.run());

    info!("Exiting after {:?}", outcome);
    Ok(())
}

fn build_monitor(config: &MonitorConfig) -> anyhow::Result<Monitor> {
    let fetcher = HttpPageFetcher::new(&config.page_url, &config.user_agent, config.request_timeout)
        .context("Failed to create page fetcher")?;
    let notifier = LineNotifier::new(
        &config.push_api_url,
        &config.channel_access_token,
        &config.target_user_id,
        config.request_timeout,
    )
    .context("Failed to create push client")?;

    Ok(Monitor::new(
        Box::new(fetcher),
        VersionExtractor::default(),
        Box::new(FileVersionStore::new(config.version_file())),
        Box::new(notifier),
    ))
}
