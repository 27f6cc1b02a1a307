//! Polling Agent
//!
//! Wires the pieces together and runs the collection loop.
//!
//! # Startup
//!
//! 1. Negotiate a [`Session`] with the Pi-hole (fatal on failure)
//! 2. Open the StatsD socket
//! 3. Run the poll loop until Ctrl-C
//!
//! # Collection Loop
//!
//! Each cycle fetches `stats/summary`, flattens it under the `pihole`
//! prefix and sends every leaf as a gauge, then sleeps for the configured
//! interval. The sleep starts after the cycle finishes, so cycles never
//! overlap. A failed fetch only skips that cycle.

use crate::config::Config;
use crate::flatten::{dispatch, DispatchReport};
use crate::metrics::{GaugeSink, StatsdSink};
use crate::pihole::{PiholeClient, Session};
use std::time::Duration;
use tracing::{info, warn};

/// Root of every gauge name
pub const PREFIX: &str = "pihole";

/// What a single poll cycle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Summary fetched and pushed to the sink
    Emitted(DispatchReport),
    /// No summary this cycle (already logged)
    Skipped,
}

pub async fn start(config: Config) -> anyhow::Result<()> {
    let session = Session::connect(&config.pihole).await?;
    if !session.has_session() {
        info!("Polling without a session id");
    }
    let client = PiholeClient::new(session);
    let sink = StatsdSink::from_config(&config.datadog).await?;
    let interval = Duration::from_secs(config.agent.interval_seconds);

    info!(
        "Polling {} every {}s",
        client.session().base_url(),
        interval.as_secs()
    );

    tokio::select! {
        _ = run(&client, &sink, interval) => {}
        res = tokio::signal::ctrl_c() => {
            res?;
            info!("Received Ctrl-C, shutting down");
        }
    }

    Ok(())
}

/// Polls forever, sleeping `interval` after each cycle
pub async fn run<S: GaugeSink>(client: &PiholeClient, sink: &S, interval: Duration) {
    loop {
        poll_once(client, sink).await;
        tokio::time::sleep(interval).await;
    }
}

/// One fetch-flatten-emit cycle
pub async fn poll_once<S: GaugeSink>(client: &PiholeClient, sink: &S) -> CycleOutcome {
    let Some(snapshot) = client.fetch_summary().await else {
        warn!("No metrics this cycle");
        return CycleOutcome::Skipped;
    };

    let report = dispatch(&snapshot, PREFIX, sink).await;
    info!("Sent {} gauges", report.emitted);
    CycleOutcome::Emitted(report)
}
