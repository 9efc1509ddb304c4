//! Outbound page fetching.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use snowdash_core::{AppConfig, SourceId};
use thiserror::Error;

use crate::error::SourceError;
use crate::sources::extractor_for;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_MBNR_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(12);

/// Why a page could not be fetched. Diagnostic only: every variant is
/// handled the same way downstream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("timed out")]
    Timeout,

    #[error("HTTP {0}")]
    HttpStatus(u16),

    #[error("network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
}

#[async_trait]
pub trait MarkupFetcher: Send + Sync {
    /// Fetches one page body. Never panics; every failure is a
    /// [`FetchFailure`].
    async fn fetch_markup(&self, request: &FetchRequest) -> Result<String, FetchFailure>;
}

/// [`MarkupFetcher`] backed by a shared `reqwest` client.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// # Errors
    ///
    /// Returns [`SourceError::Client`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(user_agent: &str) -> Result<Self, SourceError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl MarkupFetcher for HttpFetcher {
    async fn fetch_markup(&self, request: &FetchRequest) -> Result<String, FetchFailure> {
        let mut builder = self.client.get(&request.url).timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(failure_from)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::HttpStatus(status.as_u16()));
        }

        response.text().await.map_err(failure_from)
    }
}

fn failure_from(err: reqwest::Error) -> FetchFailure {
    if err.is_timeout() {
        FetchFailure::Timeout
    } else {
        FetchFailure::Network(err.to_string())
    }
}

/// Hard per-source fetch deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPlan {
    pub mbnr_timeout: Duration,
    pub source_timeout: Duration,
}

impl Default for FetchPlan {
    fn default() -> Self {
        Self {
            mbnr_timeout: DEFAULT_MBNR_TIMEOUT,
            source_timeout: DEFAULT_SOURCE_TIMEOUT,
        }
    }
}

impl FetchPlan {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            mbnr_timeout: config.mbnr_timeout(),
            source_timeout: config.source_timeout(),
        }
    }

    #[must_use]
    pub fn timeout_for(&self, source: SourceId) -> Duration {
        match source {
            SourceId::Mbnr => self.mbnr_timeout,
            SourceId::Skiinfo | SourceId::LesContaminesMeteo | SourceId::LesContaminesOuverture => {
                self.source_timeout
            }
        }
    }

    /// The request the extractor for `source` expects.
    #[must_use]
    pub fn request_for(&self, source: SourceId) -> FetchRequest {
        let extractor = extractor_for(source);
        FetchRequest {
            url: extractor.url().to_string(),
            headers: extractor
                .headers()
                .iter()
                .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
                .collect(),
            timeout: self.timeout_for(source),
        }
    }
}
