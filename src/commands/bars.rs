//! Directory listing command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::ontap::{OnTapClient, PageSource};
use crate::tracker::Tracker;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Lists the bars on the multitap directory without fetching their taps.
pub struct BarsCommand {
    config: Config,
}

impl BarsCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn execute(&self) -> Result<String> {
        let client = OnTapClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_source(Arc::new(client)).await
    }

    pub async fn execute_with_source(&self, source: Arc<dyn PageSource>) -> Result<String> {
        let targets = Tracker::from_config(source, &self.config).discover().await?;

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_targets(&targets))
    }
}
