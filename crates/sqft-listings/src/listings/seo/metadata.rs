use serde::{Deserialize, Serialize};

use crate::config::SiteConfig;
use crate::listings::domain::Listing;

const PREVIEW_IMAGE_LIMIT: usize = 2;

/// Open Graph style tags for a shared page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaTags {
    pub title: String,
    pub description: String,
    pub image: String,
    pub images: Vec<String>,
}

impl MetaTags {
    pub fn site_defaults(site: &SiteConfig) -> Self {
        Self {
            title: site.default_title.clone(),
            description: site.default_description.clone(),
            image: site.default_image.clone(),
            images: Vec::new(),
        }
    }

    pub fn for_listing(listing: &Listing, site: &SiteConfig) -> Self {
        let images: Vec<String> = if listing.images.is_empty() {
            vec![site.default_image.clone()]
        } else {
            listing
                .images
                .iter()
                .take(PREVIEW_IMAGE_LIMIT)
                .cloned()
                .collect()
        };

        Self {
            title: format!("{} | {}", listing.title, site.brand),
            description: format!(
                "₹{} • {} BHK • {} sqft • {}",
                listing.price, listing.bhk, listing.size, listing.location
            ),
            image: images[0].clone(),
            images,
        }
    }
}
