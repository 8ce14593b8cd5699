use chrono::{TimeZone, Utc};

use crate::listings::domain::{Listing, ListingId, ListingStatus, PropertyType};

pub(super) fn listing(id: u64, title: &str, price: &str) -> Listing {
    let stamp = Utc
        .with_ymd_and_hms(2025, 9, 1, 10, 0, 0)
        .single()
        .expect("valid timestamp");
    Listing {
        id: ListingId(id),
        title: title.to_string(),
        price: price.to_string(),
        location: "Chennai".to_string(),
        size: "1450".to_string(),
        bhk: "3".to_string(),
        highlights: Vec::new(),
        amenities: Vec::new(),
        images: Vec::new(),
        status: ListingStatus::Available,
        property_type: PropertyType::Purchase,
        sort_order: id as i32,
        neighborhood: None,
        featured: false,
        created_at: stamp,
        updated_at: stamp,
    }
}

pub(super) fn with_neighborhood(mut listing: Listing, neighborhood: Option<&str>) -> Listing {
    listing.neighborhood = neighborhood.map(str::to_string);
    listing
}

pub(super) fn with_bhk(mut listing: Listing, bhk: &str) -> Listing {
    listing.bhk = bhk.to_string();
    listing
}

pub(super) fn with_type(mut listing: Listing, kind: PropertyType) -> Listing {
    listing.property_type = kind;
    listing
}

/// Mixed batch covering every filter dimension.
pub(super) fn catalog() -> Vec<Listing> {
    let mut sea_view = with_neighborhood(listing(1, "Sea View Villa", "₹3.8 Cr"), Some("ECR"));
    sea_view.bhk = "5".to_string();
    sea_view.highlights = vec!["Private beach access".to_string()];

    let mut rental = with_type(
        with_neighborhood(listing(2, "Garden Apartment", "45k"), Some("Adyar")),
        PropertyType::Rental,
    );
    rental.bhk = "2".to_string();
    rental.amenities = vec!["Covered Parking".to_string(), "Gym".to_string()];

    let office = with_type(
        with_neighborhood(listing(3, "Anna Salai Office Floor", "2.2 Cr"), Some("T Nagar")),
        PropertyType::CommercialRental,
    );

    let family_home = with_bhk(
        with_neighborhood(listing(4, "Family Home", "₹75 L"), Some("Adyar")),
        "4",
    );

    let penthouse = with_bhk(listing(5, "Skyline Penthouse", "Price on request"), "7");

    vec![sea_view, rental, office, family_home, penthouse]
}

pub(super) fn ids(listings: &[&Listing]) -> Vec<u64> {
    listings.iter().map(|listing| listing.id.0).collect()
}
