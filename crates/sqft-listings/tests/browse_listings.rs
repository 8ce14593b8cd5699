use std::sync::Arc;

use sqft_listings::listings::{
    evaluate, parse_drafts, FilterCriteria, InMemoryListingStore, InMemoryMediaStore,
    ListingCatalog, ListingDraft, PropertyType, SortKey,
};

fn catalog() -> ListingCatalog<InMemoryListingStore, InMemoryMediaStore> {
    ListingCatalog::new(
        Arc::new(InMemoryListingStore::new()),
        Arc::new(InMemoryMediaStore::new("https://media.test")),
    )
}

fn draft(title: &str, price: &str) -> ListingDraft {
    ListingDraft {
        title: title.to_string(),
        price: price.to_string(),
        location: "Chennai".to_string(),
        ..ListingDraft::default()
    }
}

#[test]
fn price_low_orders_mixed_unit_prices() {
    let catalog = catalog();
    for (title, price) in [
        ("Fifty lakh", "₹50 L"),
        ("One point two crore", "₹1.2 Cr"),
        ("Seventy five lakh", "₹75 L"),
        ("Three crore", "₹3 Cr"),
        ("Twenty five lakh", "₹25 L"),
    ] {
        catalog.create(draft(title, price)).expect("create listing");
    }

    let result = catalog
        .browse(&FilterCriteria::default(), SortKey::PriceLow)
        .expect("browse");
    let prices: Vec<&str> = result
        .listings
        .iter()
        .map(|listing| listing.price.as_str())
        .collect();

    assert_eq!(prices, vec!["₹25 L", "₹50 L", "₹75 L", "₹1.2 Cr", "₹3 Cr"]);
    assert_eq!(result.total, 5);
    assert_eq!(result.matched, 5);
}

#[test]
fn browse_reports_facets_and_filter_badge() {
    let catalog = catalog();
    let mut adyar = draft("Adyar flat", "90 L");
    adyar.neighborhood = Some("Adyar".to_string());
    adyar.property_type = Some(PropertyType::Purchase);
    let mut nagar = draft("T Nagar office", "1.5 L");
    nagar.neighborhood = Some("T Nagar".to_string());
    nagar.property_type = Some(PropertyType::CommercialRental);
    let mut adyar_rental = draft("Adyar rental", "45k");
    adyar_rental.neighborhood = Some("Adyar".to_string());
    adyar_rental.property_type = Some(PropertyType::Rental);
    let mut blank = draft("Blank neighborhood", "1 Cr");
    blank.neighborhood = Some("   ".to_string());
    for listing in [adyar, nagar, adyar_rental, blank, draft("No neighborhood", "2 Cr")] {
        catalog.create(listing).expect("create listing");
    }

    let mut criteria = FilterCriteria::default();
    criteria.toggle_location("Adyar");
    criteria.toggle_property_type(PropertyType::Rental);
    let result = catalog.browse(&criteria, SortKey::Default).expect("browse");

    assert_eq!(result.locations, vec!["Adyar", "T Nagar"]);
    assert_eq!(result.active_filters, 2);
    assert_eq!(result.matched, 1);
    assert_eq!(result.listings[0].title, "Adyar rental");
}

#[test]
fn csv_seed_flows_through_evaluator() {
    let csv = "Title,Price,Location,Neighborhood,Size,BHK,Property Type,Status,Highlights,Amenities,Images,Featured,Sort Order\n\
Villa,₹3.8 Cr,ECR,ECR,4200,7,Purchase,Available,Beach access,,,yes,2\n\
Flat,₹75 L,Adyar,Adyar,1400,4,Purchase,Available,,Gym,,,1\n\
Sold house,₹2 Cr,Besant Nagar,Besant Nagar,2200,3,Purchase,Closed,,,,,3\n";
    let drafts = parse_drafts(csv.as_bytes()).expect("parse csv");
    let catalog = catalog();
    let stored = catalog.import(drafts).expect("import");
    assert_eq!(stored.len(), 3);

    let available = catalog
        .browse(&FilterCriteria::default(), SortKey::Default)
        .expect("browse");
    let titles: Vec<&str> = available
        .listings
        .iter()
        .map(|listing| listing.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Flat", "Villa"]);

    let mut five_plus = FilterCriteria::default();
    five_plus.toggle_bhk("5+");
    let batch = available.listings;
    let visible = evaluate(&batch, &five_plus, SortKey::Default);
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].title, "Villa");

    let featured = catalog.featured().expect("featured").expect("flagged listing");
    assert_eq!(featured.title, "Villa");
    assert_eq!(catalog.closed().expect("closed")[0].title, "Sold house");
}
