use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::listings::domain::PropertyType;

/// Price presets offered by the min/max selectors, in base currency units.
pub const PRICE_PRESETS: [(&str, f64); 7] = [
    ("10L", 1_000_000.0),
    ("25L", 2_500_000.0),
    ("50L", 5_000_000.0),
    ("75L", 7_500_000.0),
    ("1Cr", 10_000_000.0),
    ("2Cr", 20_000_000.0),
    ("5Cr", 50_000_000.0),
];

/// Browse-view filter state. Empty sets and unset bounds impose no restriction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub search: String,
    pub property_types: BTreeSet<PropertyType>,
    pub bhk: BTreeSet<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub locations: BTreeSet<String>,
}

impl FilterCriteria {
    /// Lower-cased, trimmed search text, or `None` when there is nothing to match.
    pub fn search_query(&self) -> Option<String> {
        let trimmed = self.search.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
    }

    pub fn has_price_bounds(&self) -> bool {
        self.min_price.is_some() || self.max_price.is_some()
    }

    /// Badge count for the filter toggle. Free-text search is not counted.
    pub fn active_filter_count(&self) -> usize {
        self.property_types.len()
            + self.bhk.len()
            + self.locations.len()
            + usize::from(self.min_price.is_some())
            + usize::from(self.max_price.is_some())
    }

    pub fn toggle_property_type(&mut self, kind: PropertyType) {
        if !self.property_types.remove(&kind) {
            self.property_types.insert(kind);
        }
    }

    pub fn toggle_bhk(&mut self, bucket: &str) {
        toggle(&mut self.bhk, bucket);
    }

    pub fn toggle_location(&mut self, location: &str) {
        toggle(&mut self.locations, location);
    }

    pub fn clear(&mut self) {
        *self = FilterCriteria::default();
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Keep the store's order.
    #[default]
    Default,
    PriceLow,
    PriceHigh,
    Newest,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Default => "default",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
            SortKey::Newest => "newest",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key '{0}' (expected default, price-low, price-high, or newest)")]
pub struct SortKeyError(pub String);

impl FromStr for SortKey {
    type Err = SortKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "default" => Ok(SortKey::Default),
            "price-low" => Ok(SortKey::PriceLow),
            "price-high" => Ok(SortKey::PriceHigh),
            "newest" => Ok(SortKey::Newest),
            other => Err(SortKeyError(other.to_string())),
        }
    }
}
