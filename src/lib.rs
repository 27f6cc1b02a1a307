//! Pi-hole StatsD Exporter
//!
//! A polling agent that reads Pi-hole summary statistics and forwards them
//! as StatsD gauges.
//!
//! # Overview
//!
//! The agent negotiates a connection with the Pi-hole HTTP API (HTTPS first,
//! then HTTP, optionally authenticating with a password), then fetches
//! `/api/stats/summary` on a fixed interval. The nested summary is flattened
//! into dot-joined names such as `pihole.queries.total` and each leaf is
//! sent to a DogStatsD collector as a gauge.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     HTTP(S) JSON     ┌──────────────┐
//! │   Pi-hole   │ ◄─────────────────►  │    Agent     │
//! │  /api/...   │   X-FTL-SID header   │              │
//! └─────────────┘                      │  ┌────────┐  │      UDP       ┌────────────┐
//!                                      │  │Session │  │ ─────────────► │  DogStatsD │
//!                                      │  └────────┘  │  name:val|g    └────────────┘
//!                                      │  ┌────────┐  │
//!                                      │  │Flatten │  │
//!                                      │  └────────┘  │
//!                                      └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`pihole`] - Session negotiation, API client and response types
//! - [`flatten`] - Nested summary to gauge names
//! - [`metrics`] - Gauge sink trait and StatsD implementation
//! - [`agent`] - Startup and the poll loop
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use pihole_statsd_exporter::{agent, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(&Config::default_path()?)?;
//!     agent::start(config).await?;
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod flatten;
pub mod metrics;
pub mod pihole;
