mod memory;

pub use memory::{InMemoryListingStore, InMemoryMediaStore};

use super::domain::{Listing, ListingDraft, ListingId, ListingStatus};

/// Ordering requested from the store when fetching a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingOrder {
    /// Agent-controlled display order, ascending.
    SortOrder,
    /// Most recently updated first.
    RecentlyUpdated,
}

/// Structured-record backend holding listings.
pub trait ListingStore: Send + Sync {
    fn fetch(
        &self,
        status: Option<ListingStatus>,
        order: ListingOrder,
    ) -> Result<Vec<Listing>, StoreError>;
    fn get(&self, id: ListingId) -> Result<Option<Listing>, StoreError>;
    fn insert(&self, draft: ListingDraft) -> Result<Listing, StoreError>;
    fn update(&self, id: ListingId, draft: ListingDraft) -> Result<Listing, StoreError>;
    fn delete(&self, id: ListingId) -> Result<(), StoreError>;
}

/// Binary object storage issuing public URLs for uploaded listing images.
pub trait MediaStore: Send + Sync {
    fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("object '{0}' already exists")]
    Conflict(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
