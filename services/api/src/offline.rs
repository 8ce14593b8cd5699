use crate::infra::{media_store, seeded_catalog};
use chrono::{NaiveDate, Utc};
use clap::Args;
use sqft_listings::config::AppConfig;
use sqft_listings::error::AppError;
use sqft_listings::listings::seo::render_sitemap;
use sqft_listings::listings::{BrowseQuery, BrowseResult};
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct BrowseArgs {
    /// Listings CSV export to evaluate
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Free-text search across title, location, neighborhood, highlights, and amenities
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Property type (Rental, Purchase, Commercial Rental); repeat for several
    #[arg(long = "type")]
    pub(crate) property_types: Vec<String>,
    /// Bedroom bucket (1, 2, 3, 4, 5+); repeat for several
    #[arg(long)]
    pub(crate) bhk: Vec<String>,
    /// Minimum price, e.g. 2500000 or 25L
    #[arg(long)]
    pub(crate) min_price: Option<String>,
    /// Maximum price, e.g. 20000000 or 2Cr
    #[arg(long)]
    pub(crate) max_price: Option<String>,
    /// Neighborhood, matched exactly; repeat for several
    #[arg(long = "location")]
    pub(crate) locations: Vec<String>,
    /// default, price-low, price-high, or newest
    #[arg(long)]
    pub(crate) sort: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct SitemapArgs {
    /// Listings CSV export to include
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Site origin (defaults to SITE_BASE_URL)
    #[arg(long)]
    pub(crate) base_url: Option<String>,
    /// Date used for the static entries (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

impl BrowseArgs {
    fn into_query(self) -> (PathBuf, BrowseQuery) {
        let BrowseArgs {
            csv,
            search,
            property_types,
            bhk,
            min_price,
            max_price,
            locations,
            sort,
        } = self;

        let query = BrowseQuery {
            search,
            property_types,
            bhk,
            min_price,
            max_price,
            locations,
            sort,
        };
        (csv, query)
    }
}

pub(crate) fn run_browse(args: BrowseArgs) -> Result<(), AppError> {
    let (csv, query) = args.into_query();
    let (criteria, sort) = query.into_criteria()?;

    let catalog = seeded_catalog(Some(csv.as_path()), media_store())?;
    let result = catalog.browse(&criteria, sort)?;
    print!("{}", render_browse(&result));
    Ok(())
}

pub(crate) fn run_sitemap(args: SitemapArgs) -> Result<(), AppError> {
    let SitemapArgs {
        csv,
        base_url,
        today,
    } = args;

    let base_url = match base_url {
        Some(url) => url,
        None => AppConfig::load()?.site.base_url,
    };
    let today = sitemap_date(today);

    let catalog = seeded_catalog(Some(csv.as_path()), media_store())?;
    let listings = catalog.recently_updated()?;
    println!("{}", render_sitemap(&base_url, &listings, today));
    Ok(())
}

/// Sitemap dates are UTC calendar days, matching the HTTP route.
fn sitemap_date(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Utc::now().date_naive())
}

fn render_browse(result: &BrowseResult) -> String {
    let mut out = String::new();
    writeln!(
        &mut out,
        "Showing {} of {} available listings (sort: {}, {} filters active)",
        result.matched,
        result.total,
        result.sort.as_str(),
        result.active_filters
    )
    .expect("write summary");
    if !result.locations.is_empty() {
        writeln!(&mut out, "Locations: {}", result.locations.join(", ")).expect("write locations");
    }

    if result.listings.is_empty() {
        writeln!(&mut out, "No listings match the current filters.").expect("write empty");
        return out;
    }

    for (index, listing) in result.listings.iter().enumerate() {
        writeln!(
            &mut out,
            "{}. #{} {} | {} | {} BHK | {} sqft | {} | {}",
            index + 1,
            listing.id,
            listing.title,
            listing.price,
            listing.bhk,
            listing.size,
            listing.neighborhood.as_deref().unwrap_or(&listing.location),
            listing.property_type.label()
        )
        .expect("write listing");
    }
    out
}
