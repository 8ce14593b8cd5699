use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use super::{ListingOrder, ListingStore, MediaStore, StoreError};
use crate::listings::domain::{Listing, ListingDraft, ListingId, ListingStatus};

#[derive(Debug, Default)]
struct ListingTable {
    rows: BTreeMap<ListingId, Listing>,
    last_id: u64,
}

/// Process-local listing store for development, the CLI, and tests.
#[derive(Debug, Default)]
pub struct InMemoryListingStore {
    table: Mutex<ListingTable>,
}

impl InMemoryListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with fully-formed listings, keeping their ids and timestamps.
    pub fn with_listings(listings: Vec<Listing>) -> Self {
        let last_id = listings.iter().map(|listing| listing.id.0).max().unwrap_or(0);
        let rows = listings
            .into_iter()
            .map(|listing| (listing.id, listing))
            .collect();
        Self {
            table: Mutex::new(ListingTable { rows, last_id }),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().map(|table| table.rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, ListingTable>, StoreError> {
        self.table
            .lock()
            .map_err(|_| StoreError::Unavailable("listing table lock poisoned".to_string()))
    }
}

impl ListingStore for InMemoryListingStore {
    fn fetch(
        &self,
        status: Option<ListingStatus>,
        order: ListingOrder,
    ) -> Result<Vec<Listing>, StoreError> {
        let table = self.lock()?;
        let mut listings: Vec<Listing> = table
            .rows
            .values()
            .filter(|listing| status.map_or(true, |status| listing.status == status))
            .cloned()
            .collect();

        match order {
            ListingOrder::SortOrder => {
                listings.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.id.cmp(&b.id)))
            }
            ListingOrder::RecentlyUpdated => {
                listings.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)))
            }
        }

        Ok(listings)
    }

    fn get(&self, id: ListingId) -> Result<Option<Listing>, StoreError> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    fn insert(&self, draft: ListingDraft) -> Result<Listing, StoreError> {
        let mut table = self.lock()?;
        table.last_id += 1;
        let id = ListingId(table.last_id);
        let listing = Listing::from_draft(id, draft, Utc::now());
        table.rows.insert(id, listing.clone());
        Ok(listing)
    }

    fn update(&self, id: ListingId, draft: ListingDraft) -> Result<Listing, StoreError> {
        let mut table = self.lock()?;
        let listing = table.rows.get_mut(&id).ok_or(StoreError::NotFound)?;
        listing.apply_draft(draft, Utc::now());
        Ok(listing.clone())
    }

    fn delete(&self, id: ListingId) -> Result<(), StoreError> {
        self.lock()?
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

/// Process-local object storage. Uploaded names never overwrite existing objects.
#[derive(Debug)]
pub struct InMemoryMediaStore {
    public_base: String,
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryMediaStore {
    pub fn new(public_base: impl Into<String>) -> Self {
        Self {
            public_base: public_base.into().trim_end_matches('/').to_string(),
            objects: Mutex::new(HashMap::new()),
        }
    }

    pub fn object(&self, file_name: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .ok()
            .and_then(|objects| objects.get(file_name).cloned())
    }
}

impl MediaStore for InMemoryMediaStore {
    fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, StoreError> {
        let mut objects = self
            .objects
            .lock()
            .map_err(|_| StoreError::Unavailable("media lock poisoned".to_string()))?;
        if objects.contains_key(file_name) {
            return Err(StoreError::Conflict(file_name.to_string()));
        }
        objects.insert(file_name.to_string(), bytes);
        Ok(format!("{}/{}", self.public_base, file_name))
    }
}
