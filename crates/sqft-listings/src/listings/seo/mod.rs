//! Search-engine and link-preview surfaces derived from the listing store.

mod metadata;
mod sitemap;

pub use metadata::MetaTags;
pub use sitemap::{fallback_sitemap, render_sitemap};
