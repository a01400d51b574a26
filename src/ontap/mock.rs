//! In-memory page source for tests.

use super::client::PageSource;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

const DIRECTORY_URL: &str = "https://ontap.pl/warszawa/multitaps";

/// Serves a generated directory and tap lists from memory.
///
/// Bars added without a page fail with a network error when fetched.
pub struct StaticSource {
    reachable: bool,
    bars: Vec<(String, String)>,
    pages: HashMap<String, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self { reachable: true, bars: Vec::new(), pages: HashMap::new() }
    }

    /// A source whose directory cannot be fetched.
    pub fn unreachable() -> Self {
        Self { reachable: false, ..Self::new() }
    }

    /// Adds a bar with taps given as `(beer, raw prices)`.
    pub fn with_bar(mut self, slug: &str, name: &str, taps: &[(&str, &str)]) -> Self {
        let mut html = String::new();
        for (beer, prices) in taps {
            html.push_str(&format!(
                r#"<div class="panel panel-default">
                    <h4 class="cml_shadow">{}</h4>
                    <div class="col-xs-7">{}</div>
                </div>"#,
                beer, prices
            ));
        }
        self.pages.insert(Self::url(slug), html);
        self.bars.push((slug.to_string(), name.to_string()));
        self
    }

    /// Adds a bar whose tap list cannot be fetched.
    pub fn with_broken_bar(mut self, slug: &str, name: &str) -> Self {
        self.bars.push((slug.to_string(), name.to_string()));
        self
    }

    fn url(slug: &str) -> String {
        format!("https://ontap.pl/{}", slug)
    }
}

impl Default for StaticSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageSource for StaticSource {
    async fn directory(&self) -> Result<String> {
        if !self.reachable {
            anyhow::bail!("Request to {} failed with status: 503", DIRECTORY_URL);
        }

        Ok(self
            .bars
            .iter()
            .map(|(slug, name)| {
                format!(
                    "<div class=\"panel panel-default text-center\">\n<h3>{}</h3>\n<a href=\"/{}\">taps</a>\n</div>\n",
                    name, slug
                )
            })
            .collect())
    }

    async fn venue(&self, url: &str) -> Result<String> {
        match self.pages.get(url) {
            Some(html) => Ok(html.clone()),
            None => anyhow::bail!("Failed to send request to {}: connection refused", url),
        }
    }

    fn directory_url(&self) -> &str {
        DIRECTORY_URL
    }
}
