//! Pi-hole API Session
//!
//! A [`Session`] is negotiated once at startup. Candidates from
//! [`candidates`] are tried in order and the first one that works wins:
//!
//! 1. Without a configured password the candidate is accepted as-is with an
//!    empty token (unauthenticated mode, no request is made).
//! 2. Otherwise `POST {base}auth` is sent with `{"password": ...}` and the
//!    `session` object of a 200 response becomes the token.
//!
//! Transport failures (bad status, TLS, connect, timeout) are logged as
//! warnings and anything else as errors; either way the next candidate is
//! tried. When every candidate fails the whole negotiation fails with
//! [`ExporterError::Connection`].

use crate::config::PiholeConfig;
use crate::error::{ExporterError, Result};
use crate::pihole::connection::{build_http_client, candidates, AttemptFailure, Candidate};
use crate::pihole::types::{AuthRequest, AuthResponse, SessionToken};
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use std::future::Future;
use tracing::{debug, error, info, warn};
use url::Url;

/// Negotiated connection to the Pi-hole API
///
/// Immutable after construction. The HTTP client already carries the TLS
/// settings of the negotiated scheme, so requests never re-resolve them.
#[derive(Debug, Clone)]
pub struct Session {
    base_url: Url,
    token: SessionToken,
    http: reqwest::Client,
}

impl Session {
    /// Wraps an already configured client. `base_url` must end in `/`.
    pub fn new(base_url: Url, token: SessionToken, http: reqwest::Client) -> Self {
        Self {
            base_url,
            token,
            http,
        }
    }

    /// Negotiates a session with the configured Pi-hole
    pub async fn connect(config: &PiholeConfig) -> Result<Self> {
        let candidates = candidates(&config.protocol, config.port);
        Self::negotiate(&config.host, &candidates, |candidate| {
            Self::attempt(config, candidate)
        })
        .await
    }

    /// Tries `candidates` in order, stopping at the first success
    pub async fn negotiate<F, Fut>(
        host: &str,
        candidates: &[Candidate],
        mut attempt: F,
    ) -> Result<Self>
    where
        F: FnMut(Candidate) -> Fut,
        Fut: Future<Output = std::result::Result<Session, AttemptFailure>>,
    {
        for &candidate in candidates {
            debug!("Trying {} on {}", host, candidate);
            match attempt(candidate).await {
                Ok(session) => {
                    info!("Connected to Pi-hole at {}", session.base_url);
                    return Ok(session);
                }
                Err(failure) if failure.is_transport() => {
                    warn!("Candidate {} for {} failed: {}", candidate, host, failure);
                }
                Err(failure) => {
                    error!("Candidate {} for {} failed: {}", candidate, host, failure);
                }
            }
        }

        Err(ExporterError::Connection {
            host: host.to_string(),
        })
    }

    /// One candidate: build the transport, then authenticate if a secret is set
    async fn attempt(
        config: &PiholeConfig,
        candidate: Candidate,
    ) -> std::result::Result<Session, AttemptFailure> {
        let base_url = candidate.base_url(&config.host)?;
        let http = build_http_client(candidate.scheme, config)?;

        let Some(secret) = config.secret() else {
            info!("No password configured, using unauthenticated mode");
            return Ok(Session::new(base_url, SessionToken::new(), http));
        };

        let auth_url = base_url
            .join("auth")
            .map_err(|e| AttemptFailure::Unexpected(e.to_string()))?;
        debug!("Authenticating at {}", auth_url);

        let resp = http
            .post(auth_url)
            .json(&AuthRequest {
                password: secret.expose_secret(),
            })
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(AttemptFailure::Status(status));
        }

        let auth: AuthResponse = resp
            .json()
            .await
            .map_err(|e| AttemptFailure::Unexpected(format!("invalid auth response: {e}")))?;

        if !auth.session.is_valid() {
            return Err(AttemptFailure::Unexpected(format!(
                "password rejected: {}",
                auth.session.message().unwrap_or("no message")
            )));
        }

        match auth.session.validity() {
            Some(secs) => info!("Authenticated, session valid for {}s", secs),
            None => info!("Authenticated"),
        }

        Ok(Session::new(base_url, auth.session, http))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub fn has_session(&self) -> bool {
        self.token.has_session()
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Resolves an API path relative to the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }
}
