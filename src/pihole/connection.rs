//! Transport Negotiation
//!
//! Candidate (scheme, port) generation and the per-scheme HTTP transport.
//! HTTPS candidates verify the server certificate and, when a client
//! certificate file is configured and present, present it for mutual TLS.
//! HTTP candidates carry no TLS parameters at all.

use crate::config::PiholeConfig;
use crate::error::{ExporterError, Result};
use reqwest::StatusCode;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Https,
    Http,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Https => "https",
            Scheme::Http => "http",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Https => 443,
            Scheme::Http => 80,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (scheme, port) combination tried during negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub scheme: Scheme,
    pub port: u16,
}

impl Candidate {
    pub fn new(scheme: Scheme) -> Self {
        Self {
            scheme,
            port: scheme.default_port(),
        }
    }

    /// `scheme://host:port/api/`
    pub fn base_url(&self, host: &str) -> Result<Url> {
        let host = host.trim();
        // Bare IPv6 literals need brackets inside a URL
        let host = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]")
        } else {
            host.to_string()
        };
        Ok(Url::parse(&format!(
            "{}://{}:{}/api/",
            self.scheme, host, self.port
        ))?)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scheme, self.port)
    }
}

/// Ordered candidates for a `protocol` setting and optional port override
///
/// `auto` tries HTTPS before HTTP. Unrecognised values fall back to `auto`.
pub fn candidates(protocol: &str, port: Option<u16>) -> Vec<Candidate> {
    let schemes: &[Scheme] = match protocol.trim().to_ascii_lowercase().as_str() {
        "auto" | "" => &[Scheme::Https, Scheme::Http],
        "https" => &[Scheme::Https],
        "http" => &[Scheme::Http],
        other => {
            warn!(
                "Unknown protocol '{}', falling back to auto (https then http)",
                other
            );
            &[Scheme::Https, Scheme::Http]
        }
    };

    schemes
        .iter()
        .map(|&scheme| {
            let mut candidate = Candidate::new(scheme);
            if let Some(port) = port {
                candidate.port = port;
            }
            candidate
        })
        .collect()
}

/// Builds the HTTP client used for every request on `scheme`
pub fn build_http_client(scheme: Scheme, config: &PiholeConfig) -> Result<reqwest::Client> {
    let builder = reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_seconds));

    let builder = match scheme {
        Scheme::Http => builder,
        Scheme::Https => {
            let builder = builder.use_rustls_tls();
            match config.client_cert_path() {
                Some(path) if path.is_file() => {
                    info!("Using client certificate {}", path.display());
                    let pem = std::fs::read(path)?;
                    let identity = reqwest::Identity::from_pem(&pem)?;
                    builder.identity(identity)
                }
                Some(path) => {
                    warn!(
                        "Client certificate {} not found, using server verification only",
                        path.display()
                    );
                    builder
                }
                None => {
                    debug!("No client certificate configured, using server verification only");
                    builder
                }
            }
        }
    };

    builder.build().map_err(ExporterError::Http)
}

/// Why a single negotiation candidate failed
#[derive(Debug, Error)]
pub enum AttemptFailure {
    #[error("HTTP status {0}")]
    Status(StatusCode),

    #[error("TLS failure: {0}")]
    Tls(String),

    #[error("connection failure: {0}")]
    Connect(String),

    #[error("timed out")]
    Timeout,

    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl AttemptFailure {
    /// Transport-level failures are routine while probing candidates
    pub fn is_transport(&self) -> bool {
        !matches!(self, AttemptFailure::Unexpected(_))
    }
}

impl From<reqwest::Error> for AttemptFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return AttemptFailure::Timeout;
        }
        if let Some(status) = err.status() {
            return AttemptFailure::Status(status);
        }
        let detail = error_chain(&err);
        if err.is_connect() {
            if looks_like_tls(&detail) {
                AttemptFailure::Tls(detail)
            } else {
                AttemptFailure::Connect(detail)
            }
        } else {
            AttemptFailure::Unexpected(detail)
        }
    }
}

impl From<ExporterError> for AttemptFailure {
    fn from(err: ExporterError) -> Self {
        match err {
            ExporterError::Http(e) => e.into(),
            other => AttemptFailure::Unexpected(other.to_string()),
        }
    }
}

/// Joins an error and its sources into one line
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(e) = source {
        parts.push(e.to_string());
        source = e.source();
    }
    parts.join(": ")
}

fn looks_like_tls(detail: &str) -> bool {
    let detail = detail.to_ascii_lowercase();
    ["tls", "ssl", "certificate", "handshake", "corrupt message"]
        .iter()
        .any(|needle| detail.contains(needle))
}
