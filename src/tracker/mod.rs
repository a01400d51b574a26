//! The fetch pipeline: discover bars, fetch them all, and collect the results.

pub mod aggregator;
pub mod error;
pub mod extract;
pub mod fetcher;

use crate::config::Config;
use crate::ontap::models::{Target, VenueSet};
use crate::ontap::parser;
use crate::ontap::PageSource;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub use aggregator::Aggregator;
pub use error::{ExtractionError, TrackerError, VenueError};
pub use extract::{extract_price, PriceExtractor};
pub use fetcher::VenueFetcher;

/// Runs discovery and the fan-out against one page source.
pub struct Tracker {
    source: Arc<dyn PageSource>,
    aggregator: Aggregator,
}

impl Tracker {
    pub fn new(source: Arc<dyn PageSource>, aggregator: Aggregator) -> Self {
        Self { source, aggregator }
    }

    /// Builds a tracker using the unit, currency, and limits from `config`.
    pub fn from_config(source: Arc<dyn PageSource>, config: &Config) -> Self {
        let fetcher = VenueFetcher::new(
            PriceExtractor::new(&config.unit, &config.currency),
            Duration::from_secs(config.fetch_timeout_secs),
        );
        let aggregator = Aggregator::new(
            fetcher,
            config.max_concurrency,
            Duration::from_secs(config.deadline_secs),
        );
        Self::new(source, aggregator)
    }

    /// Fetches the directory listing and returns the bars on it.
    pub async fn discover(&self) -> Result<Vec<Target>, TrackerError> {
        let html = self.source.directory().await.map_err(TrackerError::Discovery)?;
        let targets = parser::parse_directory(&html, self.source.directory_url())
            .map_err(TrackerError::Discovery)?;

        if targets.is_empty() {
            warn!("Directory at {} lists no bars", self.source.directory_url());
        } else {
            info!("Discovered {} bars", targets.len());
        }

        Ok(targets)
    }

    /// Discovers all bars and fetches each of them.
    ///
    /// Fails only when discovery fails; per-bar failures are recorded on the venues.
    pub async fn collect(&self) -> Result<VenueSet, TrackerError> {
        let targets = self.discover().await?;
        Ok(self.aggregator.aggregate(Arc::clone(&self.source), &targets).await)
    }
}
