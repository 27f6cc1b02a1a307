use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection failure: no protocol/port combination worked for Pi-hole host {host}")]
    Connection { host: String },

    #[error("Pi-hole API error: {0}")]
    PiholeApi(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Metric rejected: {0}")]
    Metric(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExporterError>;
