use std::fmt::Write;

use chrono::NaiveDate;

use crate::listings::domain::Listing;

const URLSET_OPEN: &str =
    r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#;
const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

struct SitemapEntry {
    loc: String,
    lastmod: Option<NaiveDate>,
    changefreq: &'static str,
    priority: f32,
}

/// Render the sitemap for the site root, its static sections, and each listing.
///
/// `listings` are emitted in the order given; callers pass available listings
/// most recently updated first.
pub fn render_sitemap(base_url: &str, listings: &[Listing], today: NaiveDate) -> String {
    let base = base_url.trim_end_matches('/');
    let mut entries = vec![
        SitemapEntry {
            loc: base.to_string(),
            lastmod: Some(today),
            changefreq: "daily",
            priority: 1.0,
        },
        SitemapEntry {
            loc: format!("{base}/#about"),
            lastmod: Some(today),
            changefreq: "monthly",
            priority: 0.8,
        },
        SitemapEntry {
            loc: format!("{base}/#contact"),
            lastmod: Some(today),
            changefreq: "monthly",
            priority: 0.8,
        },
    ];

    entries.extend(listings.iter().map(|listing| SitemapEntry {
        loc: format!("{base}?listing={}", listing.id),
        lastmod: Some(listing.updated_at.date_naive()),
        changefreq: "weekly",
        priority: 0.9,
    }));

    render_entries(&entries)
}

/// Root-only sitemap served when the listing store cannot be read.
pub fn fallback_sitemap(base_url: &str) -> String {
    render_entries(&[SitemapEntry {
        loc: base_url.trim_end_matches('/').to_string(),
        lastmod: None,
        changefreq: "daily",
        priority: 1.0,
    }])
}

fn render_entries(entries: &[SitemapEntry]) -> String {
    let mut xml = String::new();
    writeln!(&mut xml, "{XML_DECLARATION}").expect("write declaration");
    writeln!(&mut xml, "{URLSET_OPEN}").expect("write urlset");
    for entry in entries {
        writeln!(&mut xml, "  <url>").expect("write url");
        writeln!(&mut xml, "    <loc>{}</loc>", escape_xml(&entry.loc)).expect("write loc");
        if let Some(lastmod) = entry.lastmod {
            writeln!(&mut xml, "    <lastmod>{}</lastmod>", lastmod.format("%Y-%m-%d"))
                .expect("write lastmod");
        }
        writeln!(&mut xml, "    <changefreq>{}</changefreq>", entry.changefreq)
            .expect("write changefreq");
        writeln!(&mut xml, "    <priority>{:.1}</priority>", entry.priority)
            .expect("write priority");
        writeln!(&mut xml, "  </url>").expect("write url");
    }
    xml.push_str("</urlset>");
    xml
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
