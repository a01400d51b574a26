//! Output formatting for bars and beers (table, JSON, markdown, CSV).

use crate::config::OutputFormat;
use crate::ontap::{Offer, Target, Venue, VenueSet};
use serde::Serialize;

const NAME_WIDTH: usize = 48;

/// Formats query results for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats bars with their beers and errors.
    pub fn format_venues(&self, set: &VenueSet) -> String {
        if set.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => self.csv_venue_header(),
                _ => "No matching bars found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => Self::json(set, "[]"),
            OutputFormat::Table => self.table_venues(set),
            OutputFormat::Markdown => self.markdown_venues(set),
            OutputFormat::Csv => self.csv_venues(set),
        }
    }

    /// Formats the cheapest beers.
    pub fn format_offers(&self, offers: &[Offer]) -> String {
        if offers.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => self.csv_offer_header(),
                _ => "No beers found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => Self::json(offers, "[]"),
            OutputFormat::Table => self.table_offers(offers),
            OutputFormat::Markdown => self.markdown_offers(offers),
            OutputFormat::Csv => self.csv_offers(offers),
        }
    }

    /// Formats the bars found on the directory.
    pub fn format_targets(&self, targets: &[Target]) -> String {
        if targets.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => "name,url".to_string(),
                _ => "No bars found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => Self::json(targets, "[]"),
            OutputFormat::Table => {
                let mut lines = vec![
                    format!("{:<NAME_WIDTH$}  URL", "Bar"),
                    format!("{:-<NAME_WIDTH$}  {:-<40}", "", ""),
                ];
                for target in targets {
                    lines.push(format!(
                        "{:<NAME_WIDTH$}  {}",
                        truncate(target.display_name(), NAME_WIDTH),
                        target.url
                    ));
                }
                lines.push(String::new());
                lines.push(format!("Total: {} bars", targets.len()));
                lines.join("\n")
            }
            OutputFormat::Markdown => {
                let mut lines =
                    vec!["| Bar | URL |".to_string(), "|-----|-----|".to_string()];
                for target in targets {
                    lines.push(format!(
                        "| {} | {} |",
                        Self::md_escape(target.display_name()),
                        Self::md_escape(&target.url)
                    ));
                }
                lines.join("\n")
            }
            OutputFormat::Csv => {
                let mut lines = vec!["name,url".to_string()];
                for target in targets {
                    lines.push(format!(
                        "{},{}",
                        Self::csv_escape(target.display_name()),
                        Self::csv_escape(&target.url)
                    ));
                }
                lines.join("\n")
            }
        }
    }

    // JSON formatting

    fn json<T: Serialize + ?Sized>(value: &T, fallback: &str) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| fallback.to_string())
    }

    // Table formatting

    fn table_venues(&self, set: &VenueSet) -> String {
        let mut lines = Vec::new();

        for venue in set {
            lines.push(Self::venue_heading(venue));

            for item in &venue.items {
                lines.push(format!(
                    "  {:>4} zł  {}",
                    item.price,
                    truncate(&item.name, NAME_WIDTH)
                ));
            }

            for error in &venue.errors {
                lines.push(format!("  ! {}", error));
            }

            lines.push(String::new());
        }

        let beers: usize = set.iter().map(|v| v.items.len()).sum();
        lines.push(format!("Total: {} beers in {} bars", beers, set.len()));

        lines.join("\n")
    }

    fn table_offers(&self, offers: &[Offer]) -> String {
        let mut lines = Vec::new();

        lines.push(format!("{:>7}  {:<NAME_WIDTH$}  Bar", "Price", "Beer"));
        lines.push(format!("{:->7}  {:-<NAME_WIDTH$}  {:-<30}", "", "", ""));

        for offer in offers {
            lines.push(format!(
                "{:>4} zł  {:<NAME_WIDTH$}  {}",
                offer.item.price,
                truncate(&offer.item.name, NAME_WIDTH),
                offer.venue
            ));
        }

        lines.join("\n")
    }

    fn venue_heading(venue: &Venue) -> String {
        match &venue.address {
            Some(address) => format!("{} ({})", venue.name, address),
            None => venue.name.clone(),
        }
    }

    // Markdown formatting

    fn markdown_venues(&self, set: &VenueSet) -> String {
        let mut lines = Vec::new();

        for venue in set {
            lines.push(format!("## {}", venue.name));
            if let Some(address) = &venue.address {
                lines.push(format!("*{}*", address));
            }
            lines.push(String::new());

            if !venue.items.is_empty() {
                lines.push("| Beer | Price |".to_string());
                lines.push("|------|-------|".to_string());
                for item in &venue.items {
                    lines.push(format!("| {} | {} zł |", Self::md_escape(&item.name), item.price));
                }
                lines.push(String::new());
            }

            for error in &venue.errors {
                lines.push(format!("- ⚠️ {}", error));
            }
            if venue.has_errors() {
                lines.push(String::new());
            }
        }

        lines.push(format!("*{} bars found*", set.len()));

        lines.join("\n")
    }

    fn markdown_offers(&self, offers: &[Offer]) -> String {
        let mut lines = Vec::new();

        lines.push("| Beer | Price | Bar |".to_string());
        lines.push("|------|-------|-----|".to_string());

        for offer in offers {
            lines.push(format!(
                "| {} | {} zł | {} |",
                Self::md_escape(&offer.item.name),
                offer.item.price,
                Self::md_escape(&offer.venue)
            ));
        }

        lines.join("\n")
    }

    /// Escapes pipes so a name cannot split a table cell.
    fn md_escape(s: &str) -> String {
        s.replace('|', "\\|")
    }

    // CSV formatting

    fn csv_venue_header(&self) -> String {
        "bar,address,beer,price,prices,errors".to_string()
    }

    fn csv_venues(&self, set: &VenueSet) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_venue_header());

        for venue in set {
            let bar = Self::csv_escape(&venue.name);
            let address = venue.address.as_deref().map(Self::csv_escape).unwrap_or_default();
            let errors = Self::csv_escape(
                &venue.errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "),
            );

            if venue.items.is_empty() {
                lines.push(format!("{},{},,,,{}", bar, address, errors));
                continue;
            }

            for item in &venue.items {
                lines.push(format!(
                    "{},{},{},{},{},{}",
                    bar,
                    address,
                    Self::csv_escape(&item.name),
                    item.price,
                    Self::csv_escape(&item.prices),
                    errors
                ));
            }
        }

        lines.join("\n")
    }

    fn csv_offer_header(&self) -> String {
        "bar,address,beer,price".to_string()
    }

    fn csv_offers(&self, offers: &[Offer]) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_offer_header());

        for offer in offers {
            lines.push(format!(
                "{},{},{},{}",
                Self::csv_escape(&offer.venue),
                offer.address.as_deref().map(Self::csv_escape).unwrap_or_default(),
                Self::csv_escape(&offer.item.name),
                offer.item.price
            ));
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

/// Shortens `s` to at most `width` characters, marking the cut with "...".
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let kept: String = s.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}
