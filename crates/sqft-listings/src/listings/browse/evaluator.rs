use std::cmp::Ordering;

use super::criteria::{FilterCriteria, SortKey};
use crate::listings::domain::{Listing, OPEN_ENDED_BHK};

/// Select and order the listings visible under `criteria`.
///
/// The returned references point into `listings`; the batch itself is never
/// reordered or mutated. Filter stages are applied as a conjunction (search,
/// property type, bedrooms, price range, location) and the survivors are then
/// stable-sorted by `sort`. Listings whose price cannot be parsed fail any
/// active price range and sort after every priced listing.
pub fn evaluate<'a>(
    listings: &'a [Listing],
    criteria: &FilterCriteria,
    sort: SortKey,
) -> Vec<&'a Listing> {
    let query = criteria.search_query();

    let mut visible: Vec<&Listing> = listings
        .iter()
        .filter(|listing| match query.as_deref() {
            Some(query) => matches_search(listing, query),
            None => true,
        })
        .filter(|listing| matches_property_type(listing, criteria))
        .filter(|listing| matches_bhk(listing, criteria))
        .filter(|listing| matches_price(listing, criteria))
        .filter(|listing| matches_location(listing, criteria))
        .collect();

    sort_visible(&mut visible, sort);
    visible
}

fn contains_query(value: &str, query: &str) -> bool {
    value.to_lowercase().contains(query)
}

fn matches_search(listing: &Listing, query: &str) -> bool {
    contains_query(&listing.title, query)
        || contains_query(&listing.location, query)
        || listing
            .neighborhood
            .as_deref()
            .is_some_and(|neighborhood| contains_query(neighborhood, query))
        || listing
            .highlights
            .iter()
            .any(|highlight| contains_query(highlight, query))
        || listing
            .amenities
            .iter()
            .any(|amenity| contains_query(amenity, query))
}

fn matches_property_type(listing: &Listing, criteria: &FilterCriteria) -> bool {
    criteria.property_types.is_empty() || criteria.property_types.contains(&listing.property_type)
}

fn matches_bhk(listing: &Listing, criteria: &FilterCriteria) -> bool {
    if criteria.bhk.is_empty() || criteria.bhk.contains(&listing.bhk) {
        return true;
    }

    criteria.bhk.contains(OPEN_ENDED_BHK)
        && leading_integer(&listing.bhk).is_some_and(|bedrooms| bedrooms >= 5)
}

fn matches_price(listing: &Listing, criteria: &FilterCriteria) -> bool {
    if !criteria.has_price_bounds() {
        return true;
    }

    let price = listing.normalized_price();
    let min = criteria.min_price.unwrap_or(0.0);
    let max = criteria.max_price.unwrap_or(f64::INFINITY);
    // NaN compares false on both sides, so unparseable prices drop out here.
    price >= min && price <= max
}

fn matches_location(listing: &Listing, criteria: &FilterCriteria) -> bool {
    if criteria.locations.is_empty() {
        return true;
    }

    listing
        .neighborhood
        .as_ref()
        .is_some_and(|neighborhood| criteria.locations.contains(neighborhood))
}

/// Integer formed by the leading digits ("7", "5 BHK"), ignoring surrounding space.
fn leading_integer(value: &str) -> Option<u32> {
    let trimmed = value.trim_start();
    let digits_end = trimmed
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..digits_end].parse().ok()
}

fn sort_visible(visible: &mut Vec<&Listing>, sort: SortKey) {
    match sort {
        SortKey::Default => {}
        SortKey::PriceLow => sort_by_price(visible, false),
        SortKey::PriceHigh => sort_by_price(visible, true),
        SortKey::Newest => visible.sort_by(|a, b| b.id.cmp(&a.id)),
    }
}

fn sort_by_price(visible: &mut Vec<&Listing>, descending: bool) {
    let mut keyed: Vec<_> = visible
        .drain(..)
        .map(|listing| (listing.normalized_price(), listing))
        .collect();

    // `sort_by` is stable, so equal prices keep their input order.
    keyed.sort_by(|(left, _), (right, _)| compare_prices(*left, *right, descending));
    visible.extend(keyed.into_iter().map(|(_, listing)| listing));
}

fn compare_prices(left: f64, right: f64, descending: bool) -> Ordering {
    match (left.is_nan(), right.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ordering = left.total_cmp(&right);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        }
    }
}
