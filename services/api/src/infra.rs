use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use sqft_listings::error::AppError;
use sqft_listings::listings::{
    drafts_from_path, InMemoryListingStore, InMemoryMediaStore, ListingCatalog,
};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

/// Path prefix under which uploaded images are served by this process.
pub(crate) const MEDIA_ROUTE_PREFIX: &str = "/media";

pub(crate) type MemoryCatalog = ListingCatalog<InMemoryListingStore, InMemoryMediaStore>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) media: Arc<InMemoryMediaStore>,
}

pub(crate) fn media_store() -> Arc<InMemoryMediaStore> {
    Arc::new(InMemoryMediaStore::new(MEDIA_ROUTE_PREFIX))
}

/// Build an in-memory catalog, importing the CSV export at `seed` when given.
pub(crate) fn seeded_catalog(
    seed: Option<&Path>,
    media: Arc<InMemoryMediaStore>,
) -> Result<MemoryCatalog, AppError> {
    let catalog = ListingCatalog::new(Arc::new(InMemoryListingStore::new()), media);

    if let Some(path) = seed {
        let drafts = drafts_from_path(path)?;
        let imported = catalog.import(drafts)?;
        info!(path = %path.display(), listings = imported.len(), "seeded listing store");
    }

    Ok(catalog)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
