//! Fetching and extraction for the resort condition pages.
//!
//! Raw markup goes through [`normalize`], is cut into per-area windows by
//! [`segment`], read by one [`sources`] strategy per page and classified by
//! [`classify`]. [`pipeline`] merges the reports over the baseline and
//! [`refresh`] drives a full fetch cycle.

pub mod classify;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod normalize;
pub mod pipeline;
pub mod refresh;
pub mod segment;
pub mod sources;

pub use classify::AreaClassifier;
pub use error::SourceError;
pub use fetch::{FetchFailure, FetchPlan, FetchRequest, HttpFetcher, MarkupFetcher};
pub use normalize::{normalize_markup, NormalizedText};
pub use pipeline::{SnapshotPipeline, SourceInput};
pub use refresh::{fetch_sources, Dashboard, RefreshStatus};
pub use sources::{extractor_for, SourceExtractor, SourceReport};
