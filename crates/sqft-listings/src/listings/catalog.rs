use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use super::browse::{distinct_neighborhoods, evaluate, FilterCriteria, SortKey};
use super::domain::{DraftError, Listing, ListingDraft, ListingId, ListingStatus};
use super::seo::MetaTags;
use super::store::{ListingOrder, ListingStore, MediaStore, StoreError};
use crate::config::SiteConfig;

/// Ordered browse-view payload with the facet options for the full batch.
#[derive(Debug, Clone, Serialize)]
pub struct BrowseResult {
    pub listings: Vec<Listing>,
    /// Available listings before filtering.
    pub total: usize,
    pub matched: usize,
    pub locations: Vec<String>,
    pub active_filters: usize,
    pub sort: SortKey,
}

/// Service composing the listing store, media store, and browse evaluator.
pub struct ListingCatalog<S, M> {
    store: Arc<S>,
    media: Arc<M>,
}

impl<S, M> ListingCatalog<S, M>
where
    S: ListingStore + 'static,
    M: MediaStore + 'static,
{
    pub fn new(store: Arc<S>, media: Arc<M>) -> Self {
        Self { store, media }
    }

    /// Fetch the available batch and evaluate the browse filters over it.
    pub fn browse(
        &self,
        criteria: &FilterCriteria,
        sort: SortKey,
    ) -> Result<BrowseResult, CatalogError> {
        let batch = self
            .store
            .fetch(Some(ListingStatus::Available), ListingOrder::SortOrder)
            .map_err(|err| {
                warn!(error = %err, "unable to fetch available listings");
                err
            })?;

        let visible: Vec<Listing> = evaluate(&batch, criteria, sort)
            .into_iter()
            .cloned()
            .collect();

        Ok(BrowseResult {
            matched: visible.len(),
            total: batch.len(),
            locations: distinct_neighborhoods(&batch),
            active_filters: criteria.active_filter_count(),
            sort,
            listings: visible,
        })
    }

    /// Archived deals, in display order.
    pub fn closed(&self) -> Result<Vec<Listing>, CatalogError> {
        Ok(self
            .store
            .fetch(Some(ListingStatus::Closed), ListingOrder::SortOrder)?)
    }

    pub fn featured(&self) -> Result<Option<Listing>, CatalogError> {
        let available = self
            .store
            .fetch(Some(ListingStatus::Available), ListingOrder::SortOrder)?;
        Ok(available
            .into_iter()
            .find(|listing| listing.featured))
    }

    pub fn get(&self, id: ListingId) -> Result<Listing, CatalogError> {
        self.store
            .get(id)?
            .ok_or(CatalogError::Store(StoreError::NotFound))
    }

    /// Every listing regardless of status, for the admin table.
    pub fn all(&self) -> Result<Vec<Listing>, CatalogError> {
        Ok(self.store.fetch(None, ListingOrder::SortOrder)?)
    }

    /// Available listings, most recently updated first.
    pub fn recently_updated(&self) -> Result<Vec<Listing>, CatalogError> {
        Ok(self
            .store
            .fetch(Some(ListingStatus::Available), ListingOrder::RecentlyUpdated)?)
    }

    pub fn create(&self, draft: ListingDraft) -> Result<Listing, CatalogError> {
        let mut draft = draft.validated()?;
        if draft.sort_order.is_none() {
            let count = self.store.fetch(None, ListingOrder::SortOrder)?.len();
            draft.sort_order = Some(i32::try_from(count).unwrap_or(i32::MAX - 1) + 1);
        }

        let listing = self.store.insert(draft).map_err(|err| {
            warn!(error = %err, "listing insert failed");
            err
        })?;
        info!(listing_id = %listing.id, title = %listing.title, "listing created");
        Ok(listing)
    }

    pub fn update(&self, id: ListingId, draft: ListingDraft) -> Result<Listing, CatalogError> {
        let draft = draft.validated()?;
        let listing = self.store.update(id, draft).map_err(|err| {
            warn!(listing_id = %id, error = %err, "listing update failed");
            err
        })?;
        info!(listing_id = %listing.id, "listing updated");
        Ok(listing)
    }

    pub fn delete(&self, id: ListingId) -> Result<(), CatalogError> {
        self.store.delete(id).map_err(|err| {
            warn!(listing_id = %id, error = %err, "listing delete failed");
            err
        })?;
        info!(listing_id = %id, "listing deleted");
        Ok(())
    }

    /// Store each draft in turn, stopping at the first failure.
    pub fn import(&self, drafts: Vec<ListingDraft>) -> Result<Vec<Listing>, CatalogError> {
        drafts.into_iter().map(|draft| self.create(draft)).collect()
    }

    /// Upload an image under a collision-resistant name and return its public URL.
    pub fn upload_image(
        &self,
        bytes: Vec<u8>,
        original_name: &str,
    ) -> Result<String, CatalogError> {
        if bytes.is_empty() {
            return Err(CatalogError::InvalidMedia("empty upload".to_string()));
        }

        let is_image = mime_guess::from_path(original_name)
            .first()
            .is_some_and(|guess| guess.type_() == mime::IMAGE);
        if !is_image {
            return Err(CatalogError::InvalidMedia(format!(
                "'{original_name}' is not an image"
            )));
        }

        let extension = original_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        let file_name = stored_file_name(
            &mut rand::thread_rng(),
            Utc::now().timestamp_millis(),
            &extension,
        );

        let url = self.media.upload(&file_name, bytes).map_err(|err| {
            warn!(file_name = %file_name, error = %err, "image upload failed");
            err
        })?;
        info!(file_name = %file_name, "image uploaded");
        Ok(url)
    }

    /// Link-preview tags for a listing, falling back to the site defaults.
    pub fn meta_tags(&self, id: Option<ListingId>, site: &SiteConfig) -> MetaTags {
        let Some(id) = id else {
            return MetaTags::site_defaults(site);
        };

        match self.store.get(id) {
            Ok(Some(listing)) => MetaTags::for_listing(&listing, site),
            Ok(None) => MetaTags::site_defaults(site),
            Err(err) => {
                warn!(listing_id = %id, error = %err, "meta tag lookup failed");
                MetaTags::site_defaults(site)
            }
        }
    }
}

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub(crate) fn stored_file_name<R: Rng>(rng: &mut R, timestamp_millis: i64, extension: &str) -> String {
    let prefix: String = (0..11)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{prefix}_{timestamp_millis}.{extension}")
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("unsupported upload: {0}")]
    InvalidMedia(String),
}
