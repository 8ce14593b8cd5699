use std::collections::BTreeSet;

use super::common::*;
use crate::listings::browse::{evaluate, FilterCriteria, SortKey};
use crate::listings::domain::{Listing, PropertyType};

fn criteria() -> FilterCriteria {
    FilterCriteria::default()
}

fn search(query: &str) -> FilterCriteria {
    FilterCriteria {
        search: query.to_string(),
        ..criteria()
    }
}

fn visible_ids(batch: &[Listing], criteria: &FilterCriteria, sort: SortKey) -> Vec<u64> {
    ids(&evaluate(batch, criteria, sort))
}

#[test]
fn empty_criteria_with_default_sort_is_identity() {
    let batch = catalog();
    let visible = evaluate(&batch, &criteria(), SortKey::Default);

    assert_eq!(visible.len(), batch.len());
    for (shown, original) in visible.iter().zip(batch.iter()) {
        assert!(std::ptr::eq(*shown, original));
    }
}

#[test]
fn search_matches_any_text_field() {
    let batch = catalog();

    assert_eq!(visible_ids(&batch, &search("parking"), SortKey::Default), vec![2]);
    assert_eq!(visible_ids(&batch, &search("beach"), SortKey::Default), vec![1]);
    assert_eq!(visible_ids(&batch, &search("ADYAR"), SortKey::Default), vec![2, 4]);
    assert_eq!(visible_ids(&batch, &search("nagar"), SortKey::Default), vec![3]);
    assert_eq!(visible_ids(&batch, &search("penthouse"), SortKey::Default), vec![5]);
    assert_eq!(
        visible_ids(&batch, &search("chennai"), SortKey::Default),
        vec![1, 2, 3, 4, 5]
    );
    assert!(visible_ids(&batch, &search("bungalow"), SortKey::Default).is_empty());
}

#[test]
fn blank_search_imposes_no_restriction() {
    let batch = catalog();
    assert_eq!(
        visible_ids(&batch, &search("   "), SortKey::Default),
        vec![1, 2, 3, 4, 5]
    );
}

#[test]
fn property_type_filter_uses_set_membership() {
    let batch = catalog();
    let mut filters = criteria();
    filters.toggle_property_type(PropertyType::Purchase);
    assert_eq!(visible_ids(&batch, &filters, SortKey::Default), vec![1, 4, 5]);

    filters.toggle_property_type(PropertyType::CommercialRental);
    assert_eq!(visible_ids(&batch, &filters, SortKey::Default), vec![1, 3, 4, 5]);
}

#[test]
fn open_ended_bucket_includes_five_or_more_bedrooms() {
    let batch = catalog();
    let mut filters = criteria();
    filters.toggle_bhk("5+");

    let visible = visible_ids(&batch, &filters, SortKey::Default);
    assert!(visible.contains(&5), "7 bedrooms falls in the 5+ bucket");
    assert!(visible.contains(&1), "5 bedrooms falls in the 5+ bucket");
    assert!(!visible.contains(&4), "4 bedrooms stays out of the 5+ bucket");
    assert_eq!(visible, vec![1, 5]);

    filters.toggle_bhk("2");
    assert_eq!(visible_ids(&batch, &filters, SortKey::Default), vec![1, 2, 5]);
}

#[test]
fn literal_bucket_does_not_match_larger_units() {
    let batch = catalog();
    let mut filters = criteria();
    filters.toggle_bhk("4");
    assert_eq!(visible_ids(&batch, &filters, SortKey::Default), vec![4]);
}

#[test]
fn price_range_is_inclusive_and_excludes_unparseable_prices() {
    let batch = catalog();
    let bounded = FilterCriteria {
        min_price: Some(7_500_000.0),
        max_price: Some(25_000_000.0),
        ..criteria()
    };
    assert_eq!(visible_ids(&batch, &bounded, SortKey::Default), vec![3, 4]);

    let max_only = FilterCriteria {
        max_price: Some(10_000_000.0),
        ..criteria()
    };
    assert_eq!(visible_ids(&batch, &max_only, SortKey::Default), vec![2, 4]);

    let min_only = FilterCriteria {
        min_price: Some(20_000_000.0),
        ..criteria()
    };
    assert_eq!(visible_ids(&batch, &min_only, SortKey::Default), vec![1, 3]);
}

#[test]
fn location_filter_excludes_listings_without_neighborhood() {
    let batch = catalog();
    let mut filters = criteria();
    filters.toggle_location("Adyar");
    assert_eq!(visible_ids(&batch, &filters, SortKey::Default), vec![2, 4]);

    filters.toggle_location("ECR");
    let visible = visible_ids(&batch, &filters, SortKey::Default);
    assert_eq!(visible, vec![1, 2, 4]);
    assert!(!visible.contains(&5));
}

#[test]
fn combined_filters_equal_intersection_of_each_filter() {
    let batch = catalog();

    let mut by_type = criteria();
    by_type.toggle_property_type(PropertyType::Purchase);
    let mut by_location = criteria();
    by_location.toggle_location("Adyar");
    let mut combined = by_type.clone();
    combined.toggle_location("Adyar");

    let type_ids: BTreeSet<u64> = visible_ids(&batch, &by_type, SortKey::Default)
        .into_iter()
        .collect();
    let location_ids: BTreeSet<u64> = visible_ids(&batch, &by_location, SortKey::Default)
        .into_iter()
        .collect();
    let expected: Vec<u64> = type_ids.intersection(&location_ids).copied().collect();

    assert_eq!(visible_ids(&batch, &combined, SortKey::Default), expected);
    assert_eq!(expected, vec![4]);
}

#[test]
fn type_and_bhk_together_keep_only_listings_passing_both() {
    let mut batch = catalog();
    batch.push(listing(6, "Lake Flat", "90 L"));

    let mut by_type = criteria();
    by_type.toggle_property_type(PropertyType::Purchase);
    let mut by_bhk = criteria();
    by_bhk.toggle_bhk("3");
    let mut combined = by_type.clone();
    combined.toggle_bhk("3");

    let type_ids: BTreeSet<u64> = visible_ids(&batch, &by_type, SortKey::Default)
        .into_iter()
        .collect();
    let bhk_ids: BTreeSet<u64> = visible_ids(&batch, &by_bhk, SortKey::Default)
        .into_iter()
        .collect();
    assert_eq!(bhk_ids, BTreeSet::from([3, 6]));
    let expected: Vec<u64> = type_ids.intersection(&bhk_ids).copied().collect();

    assert_eq!(visible_ids(&batch, &combined, SortKey::Default), expected);
    assert_eq!(expected, vec![6]);
}

#[test]
fn output_is_always_drawn_from_the_input_batch() {
    let batch = catalog();
    let mut filters = search("a");
    filters.toggle_bhk("5+");
    filters.max_price = Some(50_000_000.0);

    for sort in [
        SortKey::Default,
        SortKey::PriceLow,
        SortKey::PriceHigh,
        SortKey::Newest,
    ] {
        for shown in evaluate(&batch, &filters, sort) {
            assert!(batch.iter().any(|original| std::ptr::eq(shown, original)));
        }
    }
}

#[test]
fn price_sorts_place_unparseable_prices_last() {
    let batch = catalog();
    assert_eq!(
        visible_ids(&batch, &criteria(), SortKey::PriceLow),
        vec![2, 4, 3, 1, 5]
    );
    assert_eq!(
        visible_ids(&batch, &criteria(), SortKey::PriceHigh),
        vec![1, 3, 4, 2, 5]
    );
}

#[test]
fn newest_sorts_by_descending_id() {
    let batch = catalog();
    assert_eq!(
        visible_ids(&batch, &criteria(), SortKey::Newest),
        vec![5, 4, 3, 2, 1]
    );
}

#[test]
fn price_sorts_are_stable_for_equal_prices() {
    let batch = vec![
        listing(1, "One crore", "1 Cr"),
        listing(2, "Hundred lakh", "100 L"),
        listing(3, "Fifty lakh", "50 L"),
        listing(4, "Bare crore", "10000000"),
        listing(5, "Unknown A", "TBD"),
        listing(6, "Unknown B", "on request"),
    ];

    assert_eq!(
        visible_ids(&batch, &criteria(), SortKey::PriceLow),
        vec![3, 1, 2, 4, 5, 6]
    );
    assert_eq!(
        visible_ids(&batch, &criteria(), SortKey::PriceHigh),
        vec![1, 2, 4, 3, 5, 6]
    );
}

#[test]
fn evaluation_is_idempotent_and_leaves_batch_untouched() {
    let batch = catalog();
    let snapshot = batch.clone();
    let mut filters = criteria();
    filters.toggle_property_type(PropertyType::Purchase);

    let first = visible_ids(&batch, &filters, SortKey::PriceHigh);
    let second = visible_ids(&batch, &filters, SortKey::PriceHigh);

    assert_eq!(first, second);
    assert_eq!(batch, snapshot);
}
