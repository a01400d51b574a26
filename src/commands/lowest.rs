//! Cheapest-beer command implementation.

use crate::config::Config;
use crate::filters::{filter_venues, find_global_minimum, FilterChainBuilder};
use crate::format::Formatter;
use crate::ontap::{OnTapClient, PageSource};
use crate::tracker::Tracker;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// Finds the cheapest beers across all bars.
pub struct LowestCommand {
    config: Config,
}

impl LowestCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn execute(&self) -> Result<String> {
        let client = OnTapClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_source(Arc::new(client)).await
    }

    /// Runs the query with a provided page source (for testing).
    pub async fn execute_with_source(&self, source: Arc<dyn PageSource>) -> Result<String> {
        let tracker = Tracker::from_config(source, &self.config);
        let mut set = tracker.collect().await?;

        let keywords = FilterChainBuilder::new()
            .keywords(self.config.keywords.clone())
            .exclude_keywords(self.config.exclude_keywords.clone())
            .build();
        if !keywords.is_empty() {
            set = filter_venues(&set, &keywords);
        }

        let offers = find_global_minimum(&set)?;

        if let Some(first) = offers.first() {
            info!("Cheapest {} beer costs {} {}", self.config.unit, first.item.price, self.config.currency);
        }

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_offers(&offers))
    }
}
