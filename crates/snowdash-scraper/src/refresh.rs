//! The refresh cycle: fetch every source in parallel, then produce one
//! snapshot.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use snowdash_core::{AggregateResult, Baseline, SourceId};

use crate::fetch::{FetchFailure, FetchPlan, MarkupFetcher};
use crate::pipeline::{SnapshotPipeline, SourceInput};

/// Presentation-facing refresh state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshStatus {
    Idle,
    Fetching,
    Live,
    Failed { error: String },
}

/// Owns the baseline and the last published snapshot across refreshes.
pub struct Dashboard {
    baseline: Baseline,
    current: AggregateResult,
    status: RefreshStatus,
    pipeline: SnapshotPipeline,
    plan: FetchPlan,
    sources: Vec<SourceId>,
}

impl Dashboard {
    /// Starts idle, showing the baseline.
    #[must_use]
    pub fn new(baseline: Baseline, pipeline: SnapshotPipeline, plan: FetchPlan) -> Self {
        let current = baseline.result().clone();
        Self {
            baseline,
            current,
            status: RefreshStatus::Idle,
            pipeline,
            plan,
            sources: SourceId::ALL.to_vec(),
        }
    }

    /// Restricts refreshes to `sources`.
    #[must_use]
    pub fn with_sources(mut self, sources: &[SourceId]) -> Self {
        self.sources = sources.to_vec();
        self
    }

    #[must_use]
    pub fn status(&self) -> &RefreshStatus {
        &self.status
    }

    #[must_use]
    pub fn current(&self) -> &AggregateResult {
        &self.current
    }

    /// Runs one cycle. On failure the previously shown snapshot stays
    /// current and only its error message is replaced.
    pub async fn refresh<F: MarkupFetcher>(
        &mut self,
        fetcher: &F,
        now: DateTime<Utc>,
    ) -> &AggregateResult {
        self.status = RefreshStatus::Fetching;
        tracing::info!(sources = self.sources.len(), "refresh started");

        let inputs = fetch_sources(fetcher, &self.plan, &self.sources).await;
        let result = self.pipeline.produce_snapshot(&inputs, &self.baseline, now);

        if result.is_live {
            self.status = RefreshStatus::Live;
            self.current = result;
        } else {
            let error = result
                .error
                .clone()
                .unwrap_or_else(|| "refresh failed".to_string());
            tracing::warn!(error = %error, "refresh failed, keeping last snapshot");
            self.current.error = Some(error.clone());
            self.current.sources = result.sources;
            self.status = RefreshStatus::Failed { error };
        }
        &self.current
    }
}

/// Fetches every source concurrently, each under its own hard deadline. A
/// stalled source yields [`FetchFailure::Timeout`] without holding back the
/// others.
pub async fn fetch_sources<F: MarkupFetcher>(
    fetcher: &F,
    plan: &FetchPlan,
    sources: &[SourceId],
) -> Vec<SourceInput> {
    let fetches = sources.iter().map(|&source| async move {
        let request = plan.request_for(source);
        let outcome = match tokio::time::timeout(request.timeout, fetcher.fetch_markup(&request)).await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(FetchFailure::Timeout),
        };
        SourceInput { source, outcome }
    });
    join_all(fetches).await
}
