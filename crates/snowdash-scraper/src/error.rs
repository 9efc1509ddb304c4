use snowdash_core::{SourceId, SourceOutcome};
use thiserror::Error;

use crate::fetch::FetchFailure;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{source_id} unavailable: {failure}")]
    SourceUnavailable {
        source_id: SourceId,
        failure: FetchFailure,
    },

    #[error("{source_id} returned {length} bytes of markup, expected at least {minimum}")]
    MalformedMarkup {
        source_id: SourceId,
        length: usize,
        minimum: usize,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl SourceError {
    /// Per-source status entry for a failed source. `None` for client
    /// construction errors, which are not tied to a source.
    #[must_use]
    pub fn outcome(&self) -> Option<SourceOutcome> {
        match self {
            SourceError::SourceUnavailable { failure, .. } => Some(SourceOutcome::Unavailable {
                reason: failure.to_string(),
            }),
            SourceError::MalformedMarkup {
                length, minimum, ..
            } => Some(SourceOutcome::Malformed {
                length: *length,
                minimum: *minimum,
            }),
            SourceError::Client(_) => None,
        }
    }
}
