//! HTML parser for the multitap directory and bar tap lists.

use crate::ontap::models::{PriceQuote, Target, VenuePage};
use crate::ontap::selectors::{directory, venue};
use anyhow::{Context, Result};
use scraper::{ElementRef, Html};
use tracing::{debug, trace, warn};
use url::Url;

/// Parses the directory listing into bar targets.
///
/// Relative links are resolved against `base_url`. Cards without a link are skipped.
pub fn parse_directory(html: &str, base_url: &str) -> Result<Vec<Target>> {
    let base = Url::parse(base_url).with_context(|| format!("Invalid base URL: {}", base_url))?;
    let document = Html::parse_document(html);

    let mut targets = Vec::new();

    for card in document.select(&directory::CARD) {
        let name = first_line(&card.text().collect::<String>());

        // The last link on a card points at the tap list
        let Some(href) = card.select(&directory::LINK).filter_map(|a| a.value().attr("href")).last()
        else {
            warn!("Skipping bar card without a link: {:?}", name);
            continue;
        };

        let url = match base.join(href) {
            Ok(url) => url.to_string(),
            Err(e) => {
                warn!("Skipping bar card with bad link {}: {}", href, e);
                continue;
            }
        };

        trace!("Found bar: {:?} at {}", name, url);
        targets.push(Target { url, name });
    }

    debug!("Parsed {} bars from directory", targets.len());

    Ok(targets)
}

/// Parses a bar's tap list.
///
/// Missing name or address is not an error; the caller decides on fallbacks.
pub fn parse_venue(html: &str) -> VenuePage {
    let document = Html::parse_document(html);

    let name = document
        .select(&venue::NAME)
        .next()
        .map(|e| clean_text(&e.text().collect::<String>()))
        .filter(|name| !name.is_empty());

    let address = parse_address(&document);

    let mut quotes = Vec::new();
    for tap in document.select(&venue::TAP) {
        let beer = last_text(tap, &venue::BEER_NAME);
        let prices = last_text(tap, &venue::BEER_PRICES);

        match (beer, prices) {
            (Some(beer), prices) => quotes.push(PriceQuote::new(beer, prices.unwrap_or_default())),
            (None, Some(prices)) => trace!("Skipping tap without a name: {}", prices),
            (None, None) => {}
        }
    }

    debug!("Parsed {} taps (name: {:?}, address: {:?})", quotes.len(), name, address);

    VenuePage { name, address, quotes }
}

/// Walks from the map marker icon up to the element holding the address text.
fn parse_address(document: &Html) -> Option<String> {
    document.select(&venue::MAP_MARKER).find_map(|icon| {
        let holder = icon.parent().and_then(ElementRef::wrap)?;
        let text = clean_text(&holder.text().collect::<String>());
        (!text.is_empty()).then_some(text)
    })
}

/// Text of the last element matching `selector` under `element`, if non-empty.
fn last_text(element: ElementRef, selector: &scraper::Selector) -> Option<String> {
    element
        .select(selector)
        .last()
        .map(|e| clean_text(&e.text().collect::<String>()))
        .filter(|text| !text.is_empty())
}

/// Collapses newlines, tabs, and runs of spaces into single spaces.
fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First non-blank line of a text block.
fn first_line(text: &str) -> Option<String> {
    text.lines().map(clean_text).find(|line| !line.is_empty())
}
