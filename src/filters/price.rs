//! Price range filter.

use super::Filter;
use crate::ontap::PricedItem;

/// Filters beers by price range, bounds inclusive.
///
/// Beers without a positive price never match.
pub struct PriceFilter {
    min: Option<i64>,
    max: Option<i64>,
}

impl PriceFilter {
    /// Creates a new price filter with optional min/max bounds.
    pub fn new(min: Option<i64>, max: Option<i64>) -> Self {
        Self { min, max }
    }

    /// Creates a filter with only minimum price.
    pub fn min(price: i64) -> Self {
        Self { min: Some(price), max: None }
    }

    /// Creates a filter with only maximum price.
    pub fn max(price: i64) -> Self {
        Self { min: None, max: Some(price) }
    }

    /// Creates a filter with both min and max.
    pub fn range(min: i64, max: i64) -> Self {
        Self { min: Some(min), max: Some(max) }
    }
}

impl Filter for PriceFilter {
    fn matches(&self, item: &PricedItem) -> bool {
        if !item.is_comparable() {
            return false;
        }

        if let Some(min) = self.min {
            if item.price < min {
                return false;
            }
        }

        if let Some(max) = self.max {
            if item.price > max {
                return false;
            }
        }

        true
    }

    fn description(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("Price: {} - {} zł", min, max),
            (Some(min), None) => format!("Price: >= {} zł", min),
            (None, Some(max)) => format!("Price: <= {} zł", max),
            (None, None) => "Price: any".to_string(),
        }
    }
}
