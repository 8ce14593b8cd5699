use serde::Serialize;
use url::form_urlencoded;

use crate::config::SiteConfig;
use crate::listings::domain::Listing;

/// Outbound links offered on a listing card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLinks {
    pub listing_url: String,
    pub share_text: String,
    pub whatsapp_share: String,
    pub email_share: String,
    pub whatsapp_contact: String,
    pub call: String,
}

impl ShareLinks {
    pub fn for_listing(listing: &Listing, site: &SiteConfig) -> Self {
        let listing_url = format!(
            "{}?listing={}",
            site.base_url.trim_end_matches('/'),
            listing.id
        );
        let share_text = format!(
            "{}\n\nListed by {}\n{}",
            listing.title, site.brand, listing_url
        );
        let enquiry = format!(
            "Hi {}, I'm interested in {}. Can we get in touch?",
            site.agent_name, listing.title
        );

        Self {
            whatsapp_share: format!("https://wa.me/?text={}", encode_component(&share_text)),
            email_share: format!(
                "mailto:?subject={}&body={}",
                encode_component(&listing.title),
                encode_component(&share_text)
            ),
            whatsapp_contact: format!(
                "https://wa.me/{}?text={}",
                site.agent_phone,
                encode_component(&enquiry)
            ),
            call: format!("tel:+{}", site.agent_phone),
            listing_url,
            share_text,
        }
    }
}

/// Percent-encode a URI component, spaces as `%20`.
pub fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::domain::{ListingDraft, ListingId};
    use chrono::Utc;

    fn listing() -> Listing {
        let draft = ListingDraft {
            title: "Garden Villa".to_string(),
            ..ListingDraft::default()
        };
        Listing::from_draft(ListingId(42), draft, Utc::now())
    }

    #[test]
    fn links_point_at_listing_and_agent() {
        let links = ShareLinks::for_listing(&listing(), &SiteConfig::default());

        assert_eq!(links.listing_url, "https://sqftbypd.com?listing=42");
        assert_eq!(
            links.share_text,
            "Garden Villa\n\nListed by sqft by PD\nhttps://sqftbypd.com?listing=42"
        );
        assert_eq!(
            links.whatsapp_share,
            "https://wa.me/?text=Garden%20Villa%0A%0AListed%20by%20sqft%20by%20PD%0Ahttps%3A%2F%2Fsqftbypd.com%3Flisting%3D42"
        );
        assert_eq!(
            links.whatsapp_contact,
            "https://wa.me/918939929919?text=Hi%20PD%2C%20I%27m%20interested%20in%20Garden%20Villa.%20Can%20we%20get%20in%20touch%3F"
        );
        assert_eq!(links.call, "tel:+918939929919");
        assert!(links
            .email_share
            .starts_with("mailto:?subject=Garden%20Villa&body=Garden%20Villa%0A"));
    }

    #[test]
    fn literal_plus_signs_survive_encoding() {
        assert_eq!(encode_component("5+ BHK"), "5%2B%20BHK");
    }
}
