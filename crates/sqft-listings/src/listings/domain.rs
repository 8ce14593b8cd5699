use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::price::normalize_price;

/// Store-assigned identifier. Higher values were inserted later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub u64);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ListingId {
    type Err = ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.trim().parse::<u64>().map(ListingId)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    Rental,
    Purchase,
    #[serde(rename = "Commercial Rental")]
    CommercialRental,
}

impl PropertyType {
    pub const ALL: [PropertyType; 3] = [
        PropertyType::Rental,
        PropertyType::Purchase,
        PropertyType::CommercialRental,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Rental => "Rental",
            PropertyType::Purchase => "Purchase",
            PropertyType::CommercialRental => "Commercial Rental",
        }
    }

    /// Badge text shown to visitors.
    pub fn label(&self) -> &'static str {
        match self {
            PropertyType::Rental => "To Rent",
            PropertyType::Purchase => "For Sale",
            PropertyType::CommercialRental => "Commercial Rental",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        PropertyType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DomainError::UnknownPropertyType(trimmed.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingStatus {
    Available,
    Closed,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Available => "Available",
            ListingStatus::Closed => "Closed",
        }
    }
}

impl FromStr for ListingStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(ListingStatus::Available),
            "closed" => Ok(ListingStatus::Closed),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("unknown property type '{0}'")]
    UnknownPropertyType(String),
    #[error("unknown listing status '{0}'")]
    UnknownStatus(String),
}

/// Bedroom bucket label covering five or more bedrooms.
pub const OPEN_ENDED_BHK: &str = "5+";

/// Bedroom buckets offered by the browse filters.
pub const BHK_OPTIONS: [&str; 5] = ["1", "2", "3", "4", OPEN_ENDED_BHK];

/// A single property record as held by the listing store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub price: String,
    pub location: String,
    pub size: String,
    pub bhk: String,
    pub highlights: Vec<String>,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub status: ListingStatus,
    pub property_type: PropertyType,
    pub sort_order: i32,
    pub neighborhood: Option<String>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Materialize a validated draft. Defaults are applied for missing fields.
    pub fn from_draft(id: ListingId, draft: ListingDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            price: draft.price,
            location: draft.location,
            size: draft.size,
            bhk: draft.bhk,
            highlights: draft.highlights,
            amenities: draft.amenities,
            images: draft.images,
            status: draft.status.unwrap_or(ListingStatus::Available),
            property_type: draft.property_type.unwrap_or(PropertyType::Purchase),
            sort_order: draft.sort_order.unwrap_or(0),
            neighborhood: draft.neighborhood,
            featured: draft.featured,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every writable field, keeping identity and creation time.
    pub fn apply_draft(&mut self, draft: ListingDraft, now: DateTime<Utc>) {
        let created_at = self.created_at;
        *self = Listing::from_draft(self.id, draft, now);
        self.created_at = created_at;
    }

    pub fn normalized_price(&self) -> f64 {
        normalize_price(&self.price)
    }

    pub fn to_draft(&self) -> ListingDraft {
        ListingDraft {
            title: self.title.clone(),
            price: self.price.clone(),
            location: self.location.clone(),
            size: self.size.clone(),
            bhk: self.bhk.clone(),
            highlights: self.highlights.clone(),
            amenities: self.amenities.clone(),
            images: self.images.clone(),
            status: Some(self.status),
            property_type: Some(self.property_type),
            sort_order: Some(self.sort_order),
            neighborhood: self.neighborhood.clone(),
            featured: self.featured,
        }
    }
}

/// Admin edit payload for creating or replacing a listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingDraft {
    pub title: String,
    pub price: String,
    pub location: String,
    pub size: String,
    pub bhk: String,
    pub highlights: Vec<String>,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub status: Option<ListingStatus>,
    pub property_type: Option<PropertyType>,
    pub sort_order: Option<i32>,
    pub neighborhood: Option<String>,
    pub featured: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftList {
    Highlights,
    Amenities,
    Images,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("Title is required")]
    MissingTitle,
}

impl ListingDraft {
    /// Check the draft can be saved and normalize blank optional fields.
    pub fn validated(mut self) -> Result<Self, DraftError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DraftError::MissingTitle);
        }
        self.title = title.to_string();
        self.neighborhood = self
            .neighborhood
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        Ok(self)
    }

    fn list_mut(&mut self, list: DraftList) -> &mut Vec<String> {
        match list {
            DraftList::Highlights => &mut self.highlights,
            DraftList::Amenities => &mut self.amenities,
            DraftList::Images => &mut self.images,
        }
    }

    /// Append a trimmed entry; blank input is ignored.
    pub fn add_entry(&mut self, list: DraftList, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        self.list_mut(list).push(value.to_string());
        true
    }

    pub fn remove_entry(&mut self, list: DraftList, index: usize) -> Option<String> {
        let entries = self.list_mut(list);
        (index < entries.len()).then(|| entries.remove(index))
    }

    /// Reorder the image gallery. Out-of-range indices leave it untouched.
    pub fn move_image(&mut self, from: usize, to: usize) -> bool {
        if from >= self.images.len() || to >= self.images.len() {
            return false;
        }
        let image = self.images.remove(from);
        self.images.insert(to, image);
        true
    }
}
