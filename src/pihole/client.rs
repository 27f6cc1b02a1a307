//! Pi-hole Metrics Client
//!
//! Fetches `GET {base}stats/summary` over a negotiated [`Session`]. The
//! `X-FTL-SID` header is only attached when the session holds a session id,
//! so unauthenticated appliances are queried anonymously.

use crate::error::{ExporterError, Result};
use crate::pihole::session::Session;
use crate::pihole::types::MetricsSnapshot;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

/// Header carrying the session id on authenticated requests
pub const SID_HEADER: &str = "X-FTL-SID";

pub struct PiholeClient {
    session: Session,
}

impl PiholeClient {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Fetch the summary, reporting every failure as an error
    pub async fn try_fetch_summary(&self) -> Result<MetricsSnapshot> {
        let url = self.session.endpoint("stats/summary")?;
        debug!("Fetching {}", url);

        let mut request = self.session.http().get(url);
        if let Some(sid) = self.session.token().sid() {
            request = request.header(SID_HEADER, sid);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ExporterError::PiholeApi(
                "summary request rejected (HTTP 401), the session may have expired; restart to re-authenticate"
                    .to_string(),
            ));
        }
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(ExporterError::PiholeApi(format!(
                "summary request failed (HTTP {status}): {body}"
            )));
        }

        match resp.json::<Value>().await? {
            Value::Object(snapshot) => Ok(snapshot),
            other => Err(ExporterError::PiholeApi(format!(
                "summary is not a JSON object: {other}"
            ))),
        }
    }

    /// Fetch the summary, or `None` when this cycle has no data
    pub async fn fetch_summary(&self) -> Option<MetricsSnapshot> {
        match self.try_fetch_summary().await {
            Ok(snapshot) => {
                debug!("metrics: {:?}", snapshot);
                Some(snapshot)
            }
            Err(e) => {
                warn!("Failed to fetch Pi-hole summary: {}", e);
                None
            }
        }
    }
}
