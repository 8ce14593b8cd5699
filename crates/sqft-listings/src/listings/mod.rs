//! Property listings: the browse evaluator, catalog service, admin console API,
//! and the link-preview and sitemap surfaces built on top of the listing store.

pub mod admin;
pub mod browse;
pub mod catalog;
pub mod domain;
pub mod import;
pub mod price;
pub mod router;
pub mod seo;
pub mod share;
pub mod store;

pub use admin::{AdminGate, AdminSession, AuthError};
pub use browse::{
    distinct_neighborhoods, evaluate, FilterCriteria, SortKey, SortKeyError, PRICE_PRESETS,
};
pub use catalog::{BrowseResult, CatalogError, ListingCatalog};
pub use domain::{
    DomainError, DraftError, DraftList, Listing, ListingDraft, ListingId, ListingStatus,
    PropertyType, BHK_OPTIONS, OPEN_ENDED_BHK,
};
pub use import::{drafts_from_path, parse_drafts, ImportError};
pub use price::normalize_price;
pub use router::{bearer_token, listing_router, BrowseQuery, ListingApi, QueryError};
pub use seo::MetaTags;
pub use share::{encode_component, ShareLinks};
pub use store::{
    InMemoryListingStore, InMemoryMediaStore, ListingOrder, ListingStore, MediaStore, StoreError,
};
