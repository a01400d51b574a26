//! Error taxonomy for the tracker pipeline.
//!
//! Only [`TrackerError`] is returned to callers. [`VenueError`] and
//! [`ExtractionError`] are recorded on the venue they belong to.

use serde::{Serialize, Serializer};
use std::time::Duration;
use thiserror::Error;

/// Failures that abort a whole query.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The directory listing could not be fetched or parsed.
    #[error("venue discovery failed: {0:#}")]
    Discovery(anyhow::Error),

    /// The minimum query found no comparable prices.
    #[error("no comparable prices found")]
    EmptyInput,
}

/// A recoverable failure recorded on a single venue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VenueError {
    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("deadline exceeded before the fetch finished")]
    DeadlineExceeded,

    #[error("fetch task failed: {0}")]
    TaskFailed(String),

    #[error("price of '{item}': {source}")]
    Extraction {
        item: String,
        #[source]
        source: ExtractionError,
    },
}

impl Serialize for VenueError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Why a raw price string did not yield a price.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("no {unit} price in '{raw}'")]
    UnitNotListed { unit: String, raw: String },

    #[error("invalid {unit} amount '{amount}'")]
    InvalidAmount { unit: String, amount: String },
}
