//! CSS selectors for ontap.pl HTML parsing.
//!
//! Update this file when the site changes its markup, and refresh the
//! fixtures under `tests/fixtures/` alongside.

use scraper::Selector;
use std::sync::LazyLock;

/// Selectors for the multitap directory page.
pub mod directory {
    use super::*;

    /// One bar card on the listing.
    pub static CARD: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div.panel.panel-default.text-center").unwrap());

    /// Links inside a bar card.
    pub static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
}

/// Selectors for a single bar's tap list.
pub mod venue {
    use super::*;

    /// Bar name heading.
    pub static NAME: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            ".page-header h1, \
             h1",
        )
        .unwrap()
    });

    /// Map marker icon sitting next to the street address.
    pub static MAP_MARKER: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "i.fa-map-marker, \
             span.glyphicon-map-marker, \
             i.glyphicon-map-marker",
        )
        .unwrap()
    });

    /// One tap on the list.
    pub static TAP: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div.panel.panel-default").unwrap());

    /// Beer name inside a tap panel.
    pub static BEER_NAME: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("h4.cml_shadow").unwrap());

    /// Price list inside a tap panel.
    pub static BEER_PRICES: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div.col-xs-7").unwrap());
}
