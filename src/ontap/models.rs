//! Data models for bars, beers, and their prices.

use crate::tracker::error::VenueError;
use serde::{Deserialize, Serialize};

/// A bar page discovered on the multitap directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Absolute URL of the bar's tap list
    pub url: String,
    /// Bar name as shown on the directory card
    pub name: Option<String>,
}

impl Target {
    /// Creates a target without a display name.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), name: None }
    }

    /// Creates a target with a display name.
    pub fn named(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self { url: url.into(), name: Some(name.into()) }
    }

    /// Returns the display name, falling back to the URL.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.url)
    }
}

/// One beer on tap with its raw, unparsed price list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Beer name
    pub name: String,
    /// Raw price text, e.g. `0.5l: 18zł · 0.3l: 12zł`
    pub prices: String,
}

impl PriceQuote {
    pub fn new(name: impl Into<String>, prices: impl Into<String>) -> Self {
        Self { name: name.into(), prices: prices.into() }
    }
}

/// A beer resolved to a single price for the reference unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedItem {
    /// Beer name
    pub name: String,
    /// Raw price text the price was taken from
    pub prices: String,
    /// Price for the reference unit, in whole currency units
    pub price: i64,
}

impl PricedItem {
    pub fn new(name: impl Into<String>, prices: impl Into<String>, price: i64) -> Self {
        Self { name: name.into(), prices: prices.into(), price }
    }

    /// Returns true if the price may take part in threshold and minimum queries.
    pub fn is_comparable(&self) -> bool {
        self.price > 0
    }
}

/// Everything collected for one bar: identity, beers, and the errors met on the way.
///
/// Errors and items are independent; a bar with one unparsable price still keeps
/// its other beers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Venue {
    #[serde(rename = "bar")]
    pub name: String,
    #[serde(rename = "adres")]
    pub address: Option<String>,
    #[serde(skip)]
    pub url: String,
    #[serde(rename = "piwa")]
    pub items: Vec<PricedItem>,
    pub errors: Vec<VenueError>,
}

impl Venue {
    /// Creates an empty venue for a target.
    pub fn new(target: &Target) -> Self {
        Self {
            name: target.display_name().to_string(),
            address: None,
            url: target.url.clone(),
            items: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Creates a venue that carries only an error.
    pub fn failed(target: &Target, error: VenueError) -> Self {
        let mut venue = Self::new(target);
        venue.errors.push(error);
        venue
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Items that may take part in numeric comparisons.
    pub fn comparable_items(&self) -> impl Iterator<Item = &PricedItem> {
        self.items.iter().filter(|item| item.is_comparable())
    }
}

/// The frozen result of one fan-out round, one venue per target.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct VenueSet {
    venues: Vec<Venue>,
}

impl VenueSet {
    pub fn new(venues: Vec<Venue>) -> Self {
        Self { venues }
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Venue> {
        self.venues.iter()
    }

    pub fn venues(&self) -> &[Venue] {
        &self.venues
    }

    pub fn into_venues(self) -> Vec<Venue> {
        self.venues
    }

    /// Returns the total number of errors across all venues.
    pub fn error_count(&self) -> usize {
        self.venues.iter().map(|v| v.errors.len()).sum()
    }
}

impl<'a> IntoIterator for &'a VenueSet {
    type Item = &'a Venue;
    type IntoIter = std::slice::Iter<'a, Venue>;

    fn into_iter(self) -> Self::IntoIter {
        self.venues.iter()
    }
}

/// A beer together with the bar that pours it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    #[serde(rename = "bar")]
    pub venue: String,
    #[serde(rename = "adres")]
    pub address: Option<String>,
    #[serde(flatten)]
    pub item: PricedItem,
}

impl Offer {
    pub fn new(venue: &Venue, item: &PricedItem) -> Self {
        Self { venue: venue.name.clone(), address: venue.address.clone(), item: item.clone() }
    }
}

/// Fields the page parser pulls out of a bar page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenuePage {
    /// Bar name from the page heading
    pub name: Option<String>,
    /// Street address next to the map marker
    pub address: Option<String>,
    /// Beers on tap
    pub quotes: Vec<PriceQuote>,
}
