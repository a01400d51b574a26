//! Beer filtering and the read-only queries over a collected venue set.

pub mod keyword;
pub mod price;
pub mod select;

use crate::ontap::PricedItem;

pub use keyword::KeywordFilter;
pub use price::PriceFilter;
pub use select::{filter_by_threshold, filter_venues, find_global_minimum};

/// Trait for filtering beers.
pub trait Filter: Send + Sync {
    /// Returns true if the beer passes the filter.
    fn matches(&self, item: &PricedItem) -> bool;

    /// Returns a description of this filter.
    fn description(&self) -> String;
}

/// A chain of filters that must all pass.
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self { filters: Vec::new() }
    }

    /// Adds a filter to the chain.
    pub fn add(&mut self, filter: impl Filter + 'static) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Checks if a beer passes all filters.
    pub fn matches(&self, item: &PricedItem) -> bool {
        self.filters.iter().all(|f| f.matches(item))
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns descriptions of all filters.
    pub fn descriptions(&self) -> Vec<String> {
        self.filters.iter().map(|f| f.description()).collect()
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing a FilterChain from configuration.
pub struct FilterChainBuilder {
    chain: FilterChain,
}

impl FilterChainBuilder {
    pub fn new() -> Self {
        Self { chain: FilterChain::new() }
    }

    /// Adds an inclusive upper price bound.
    pub fn price_limit(mut self, limit: Option<i64>) -> Self {
        if let Some(limit) = limit {
            self.chain.add(PriceFilter::max(limit));
        }
        self
    }

    /// Adds required keywords filter.
    pub fn keywords(mut self, keywords: Vec<String>) -> Self {
        if !keywords.is_empty() {
            self.chain.add(KeywordFilter::required(keywords));
        }
        self
    }

    /// Adds excluded keywords filter.
    pub fn exclude_keywords(mut self, keywords: Vec<String>) -> Self {
        if !keywords.is_empty() {
            self.chain.add(KeywordFilter::excluded(keywords));
        }
        self
    }

    pub fn build(self) -> FilterChain {
        self.chain
    }
}

impl Default for FilterChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}
