//! Threshold and cheapest-beer queries over a collected venue set.
//!
//! All queries borrow the set and return new values; the set itself is never changed.

use super::{FilterChain, FilterChainBuilder};
use crate::ontap::models::{Offer, Venue, VenueSet};
use crate::tracker::error::TrackerError;
use tracing::debug;

/// Keeps beers that pass `chain` and have a positive price.
///
/// A venue survives if it keeps at least one beer or carries an error.
pub fn filter_venues(set: &VenueSet, chain: &FilterChain) -> VenueSet {
    let venues: Vec<Venue> = set
        .iter()
        .filter_map(|venue| {
            let items: Vec<_> = venue
                .comparable_items()
                .filter(|item| chain.matches(item))
                .cloned()
                .collect();

            if items.is_empty() && !venue.has_errors() {
                return None;
            }

            Some(Venue { items, ..venue.clone() })
        })
        .collect();

    debug!("{} of {} bars left after filtering", venues.len(), set.len());
    VenueSet::new(venues)
}

/// Keeps beers priced `0 < price <= limit`.
pub fn filter_by_threshold(set: &VenueSet, limit: i64) -> VenueSet {
    let chain = FilterChainBuilder::new().price_limit(Some(limit)).build();
    filter_venues(set, &chain)
}

/// Returns every beer sharing the lowest positive price.
///
/// Fails with [`TrackerError::EmptyInput`] when no venue has a comparable price.
pub fn find_global_minimum(set: &VenueSet) -> Result<Vec<Offer>, TrackerError> {
    let lowest = set
        .iter()
        .flat_map(|venue| venue.comparable_items())
        .map(|item| item.price)
        .min()
        .ok_or(TrackerError::EmptyInput)?;

    let offers: Vec<Offer> = set
        .iter()
        .flat_map(|venue| {
            venue
                .comparable_items()
                .filter(move |item| item.price == lowest)
                .map(move |item| Offer::new(venue, item))
        })
        .collect();

    debug!("Lowest price {} shared by {} beers", lowest, offers.len());
    Ok(offers)
}
