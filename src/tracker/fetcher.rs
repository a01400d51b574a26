//! Fetches and parses a single bar's tap list.

use super::error::VenueError;
use super::extract::PriceExtractor;
use crate::ontap::models::{PricedItem, Target, Venue};
use crate::ontap::parser;
use crate::ontap::PageSource;
use std::time::Duration;
use tracing::{debug, warn};

/// Turns one target into one venue.
///
/// Never fails: transport, timeout, and price errors are recorded on the venue.
#[derive(Debug, Clone)]
pub struct VenueFetcher {
    extractor: PriceExtractor,
    timeout: Duration,
}

impl VenueFetcher {
    pub fn new(extractor: PriceExtractor, timeout: Duration) -> Self {
        Self { extractor, timeout }
    }

    pub async fn fetch(&self, source: &dyn PageSource, target: &Target) -> Venue {
        let mut venue = Venue::new(target);

        let html = match tokio::time::timeout(self.timeout, source.venue(&target.url)).await {
            Ok(Ok(html)) => html,
            Ok(Err(e)) => {
                warn!("Failed to fetch {}: {:#}", target.display_name(), e);
                venue.errors.push(VenueError::Fetch(format!("{:#}", e)));
                return venue;
            }
            Err(_) => {
                warn!("Timed out fetching {} after {:?}", target.display_name(), self.timeout);
                venue.errors.push(VenueError::Timeout(self.timeout));
                return venue;
            }
        };

        let page = parser::parse_venue(&html);

        if let Some(name) = page.name {
            venue.name = name;
        }
        venue.address = page.address;

        for quote in page.quotes {
            match self.extractor.extract(&quote.prices) {
                Ok(price) => venue.items.push(PricedItem::new(quote.name, quote.prices, price)),
                Err(source) => {
                    debug!("{}: no usable price for {}: {}", venue.name, quote.name, source);
                    venue.errors.push(VenueError::Extraction { item: quote.name, source });
                }
            }
        }

        debug!(
            "{}: {} priced beers, {} errors",
            venue.name,
            venue.items.len(),
            venue.errors.len()
        );

        venue
    }
}

impl Default for VenueFetcher {
    fn default() -> Self {
        Self::new(PriceExtractor::default(), Duration::from_secs(30))
    }
}
