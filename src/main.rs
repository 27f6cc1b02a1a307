use anyhow::Result;
use clap::Parser;
use pihole_statsd_exporter::{agent, config::Config};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults to config.ini next to the executable)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pi-hole host (overrides config)
    #[arg(long, env = "PIHOLE_HOST")]
    pihole_host: Option<String>,

    /// StatsD host (overrides config)
    #[arg(long, env = "STATSD_HOST")]
    statsd_host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let path = match args.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let mut config = Config::load(&path)?;

    // Override with CLI arguments if provided
    if let Some(host) = args.pihole_host {
        config.pihole.host = host;
    }
    if let Some(host) = args.statsd_host {
        config.datadog.statsd_host = host;
    }
    config.validate()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Pi-hole StatsD Exporter v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!("Configuration loaded from {}", path.display());
    info!("Pi-hole host: {}", config.pihole.host);
    info!(
        "StatsD target: {}:{}",
        config.datadog.statsd_host, config.datadog.statsd_port
    );

    if let Err(e) = agent::start(config).await {
        error!("Agent error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
