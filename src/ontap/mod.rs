//! ontap.pl-specific modules for HTTP client, parsing, and data models.

pub mod client;
pub mod models;
pub mod parser;
pub mod selectors;

#[cfg(test)]
pub(crate) mod mock;

pub use client::{OnTapClient, PageSource};
pub use models::{Offer, PriceQuote, PricedItem, Target, Venue, VenuePage, VenueSet};
