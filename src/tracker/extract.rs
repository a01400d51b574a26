//! Turns raw tap-list price text into a price for one serving size.
//!
//! Price text looks like `0.5l: 18zł · 0.3l: 12zł`: serving segments joined by
//! ` · `, each split into size and amount by `: `.

use super::error::ExtractionError;

/// Separates serving segments.
pub const SEGMENT_DELIMITER: &str = " · ";

/// Separates the serving size from its amount.
pub const PAIR_DELIMITER: &str = ": ";

pub const DEFAULT_UNIT: &str = "0.5l";
pub const DEFAULT_CURRENCY: &str = "zł";

/// Extracts the price of one serving size from raw price text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceExtractor {
    unit: String,
    currency: String,
}

impl PriceExtractor {
    pub fn new(unit: impl Into<String>, currency: impl Into<String>) -> Self {
        Self { unit: unit.into(), currency: currency.into() }
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Returns the integer amount listed for the configured unit.
    ///
    /// When the unit appears more than once the last segment wins.
    pub fn extract(&self, raw: &str) -> Result<i64, ExtractionError> {
        let amount = raw
            .split(SEGMENT_DELIMITER)
            .filter_map(|segment| segment.split_once(PAIR_DELIMITER))
            .filter(|(label, _)| label.trim() == self.unit)
            .map(|(_, amount)| amount)
            .last()
            .ok_or_else(|| ExtractionError::UnitNotListed {
                unit: self.unit.clone(),
                raw: raw.trim().to_string(),
            })?;

        let cleaned = amount.replacen(&self.currency, "", 1);
        let cleaned = cleaned.trim();

        cleaned.parse().map_err(|_| ExtractionError::InvalidAmount {
            unit: self.unit.clone(),
            amount: amount.trim().to_string(),
        })
    }
}

impl Default for PriceExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_UNIT, DEFAULT_CURRENCY)
    }
}

/// Extracts the price for `unit`, stripping the default currency suffix.
pub fn extract_price(raw: &str, unit: &str) -> Result<i64, ExtractionError> {
    PriceExtractor::new(unit, DEFAULT_CURRENCY).extract(raw)
}
