//! Beers-under-a-limit command implementation.

use crate::config::Config;
use crate::filters::{filter_venues, FilterChainBuilder};
use crate::format::Formatter;
use crate::ontap::{OnTapClient, PageSource};
use crate::tracker::Tracker;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// Lists bars pouring beers at or under a price limit.
pub struct BeersCommand {
    config: Config,
}

impl BeersCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the query against ontap.pl and returns formatted output.
    pub async fn execute(&self, limit: i64) -> Result<String> {
        let client = OnTapClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_source(Arc::new(client), limit).await
    }

    /// Runs the query with a provided page source (for testing).
    pub async fn execute_with_source(
        &self,
        source: Arc<dyn PageSource>,
        limit: i64,
    ) -> Result<String> {
        info!("Looking for {} beers at or under {} {}", self.config.unit, limit, self.config.currency);

        let filters = FilterChainBuilder::new()
            .price_limit(Some(limit))
            .keywords(self.config.keywords.clone())
            .exclude_keywords(self.config.exclude_keywords.clone())
            .build();

        debug!("Active filters: {}", filters.descriptions().join(", "));

        let tracker = Tracker::from_config(source, &self.config);
        let set = tracker.collect().await?;
        let matching = filter_venues(&set, &filters);

        info!("{} of {} bars have matching beers or errors", matching.len(), set.len());

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_venues(&matching))
    }
}
