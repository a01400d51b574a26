//! Keyword-based beer name filtering.

use super::Filter;
use crate::ontap::PricedItem;

/// Filters beers by keywords in their name, case-insensitively.
pub struct KeywordFilter {
    /// Keywords that must all appear in the name.
    required: Vec<String>,
    /// Keywords that must not appear in the name.
    excluded: Vec<String>,
}

impl KeywordFilter {
    pub fn new(required: Vec<String>, excluded: Vec<String>) -> Self {
        Self {
            required: required.into_iter().map(|k| k.to_lowercase()).collect(),
            excluded: excluded.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn required(keywords: Vec<String>) -> Self {
        Self::new(keywords, Vec::new())
    }

    pub fn excluded(keywords: Vec<String>) -> Self {
        Self::new(Vec::new(), keywords)
    }
}

impl Filter for KeywordFilter {
    fn matches(&self, item: &PricedItem) -> bool {
        let name = item.name.to_lowercase();

        self.required.iter().all(|k| name.contains(k.as_str()))
            && !self.excluded.iter().any(|k| name.contains(k.as_str()))
    }

    fn description(&self) -> String {
        let mut parts = Vec::new();

        if !self.required.is_empty() {
            parts.push(format!("Must contain: {}", self.required.join(", ")));
        }

        if !self.excluded.is_empty() {
            parts.push(format!("Must not contain: {}", self.excluded.join(", ")));
        }

        if parts.is_empty() {
            "Keywords: any".to_string()
        } else {
            parts.join("; ")
        }
    }
}
