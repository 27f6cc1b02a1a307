//! Gauge Emission
//!
//! [`GaugeSink`] is the seam between the flattener and the metrics backend.
//! [`StatsdSink`] implements it over UDP using the DogStatsD line format:
//!
//! ```text
//! pihole.queries.total:1234|g|#env:home
//! ```
//!
//! Numbers are written verbatim and booleans as `1`/`0`. Any other JSON
//! value is refused with [`ExporterError::Metric`].

use crate::config::DatadogConfig;
use crate::error::{ExporterError, Result};
use serde_json::Value;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tracing::{debug, info};

/// Receives one gauge sample per call
pub trait GaugeSink {
    fn gauge(&self, name: &str, value: &Value) -> impl Future<Output = Result<()>> + Send;
}

/// DogStatsD client sending one datagram per gauge
pub struct StatsdSink {
    socket: UdpSocket,
    tags: Vec<String>,
}

impl StatsdSink {
    pub async fn connect(host: &str, port: u16, tags: Vec<String>) -> Result<Self> {
        let target = tokio::net::lookup_host((host, port))
            .await?
            .next()
            .ok_or_else(|| ExporterError::Config(format!("could not resolve {host}:{port}")))?;

        let local: SocketAddr = if target.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };

        let socket = UdpSocket::bind(local).await?;
        socket.connect(target).await?;
        info!("Sending gauges to StatsD at {}", target);

        Ok(Self { socket, tags })
    }

    pub async fn from_config(config: &DatadogConfig) -> Result<Self> {
        Self::connect(&config.statsd_host, config.statsd_port, config.tag_list()).await
    }
}

impl GaugeSink for StatsdSink {
    async fn gauge(&self, name: &str, value: &Value) -> Result<()> {
        let line = encode_gauge(name, value, &self.tags)?;
        debug!("statsd: {}", line);
        self.socket.send(line.as_bytes()).await?;
        Ok(())
    }
}

/// Encodes one DogStatsD gauge datagram
pub fn encode_gauge(name: &str, value: &Value, tags: &[String]) -> Result<String> {
    let value = match value {
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => u8::from(*b).to_string(),
        other => {
            return Err(ExporterError::Metric(format!(
                "{name} has non-numeric value {other}"
            )))
        }
    };

    let mut line = format!("{}:{}|g", sanitize_name(name), value);
    if !tags.is_empty() {
        line.push_str("|#");
        line.push_str(&tags.join(","));
    }
    Ok(line)
}

/// Replaces characters that would break the line protocol
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ':' | '|' | '@' | '#' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect()
}
