use std::collections::BTreeSet;

use crate::listings::domain::Listing;

/// Distinct non-empty neighborhoods in ascending order, for the location filter.
pub fn distinct_neighborhoods(listings: &[Listing]) -> Vec<String> {
    listings
        .iter()
        .filter_map(|listing| listing.neighborhood.as_deref())
        .filter(|neighborhood| !neighborhood.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
