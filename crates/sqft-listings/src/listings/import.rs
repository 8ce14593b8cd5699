use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{DomainError, ListingDraft, ListingStatus, PropertyType};

const LIST_SEPARATOR: char = ';';

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { row: usize, message: String },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read listings export: {}", err),
            ImportError::Csv(err) => write!(f, "invalid listings CSV data: {}", err),
            ImportError::InvalidRow { row, message } => write!(f, "row {}: {}", row, message),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::Csv(err)
    }
}

pub fn drafts_from_path(path: impl AsRef<Path>) -> Result<Vec<ListingDraft>, ImportError> {
    let file = File::open(path)?;
    parse_drafts(file)
}

/// Parse a spreadsheet export into validated drafts, in file order.
pub fn parse_drafts<R: Read>(reader: R) -> Result<Vec<ListingDraft>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut drafts = Vec::new();

    for (index, record) in csv_reader.deserialize::<ListingRow>().enumerate() {
        // Header occupies line 1.
        let row = index + 2;
        let draft = record?
            .into_draft()
            .map_err(|message| ImportError::InvalidRow { row, message })?;
        drafts.push(draft);
    }

    Ok(drafts)
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Price", default)]
    price: String,
    #[serde(rename = "Location", default)]
    location: String,
    #[serde(
        rename = "Neighborhood",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    neighborhood: Option<String>,
    #[serde(rename = "Size", default)]
    size: String,
    #[serde(rename = "BHK", default)]
    bhk: String,
    #[serde(
        rename = "Property Type",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    property_type: Option<String>,
    #[serde(rename = "Status", default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(rename = "Highlights", default)]
    highlights: String,
    #[serde(rename = "Amenities", default)]
    amenities: String,
    #[serde(rename = "Images", default)]
    images: String,
    #[serde(rename = "Featured", default, deserialize_with = "empty_string_as_none")]
    featured: Option<String>,
    #[serde(
        rename = "Sort Order",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    sort_order: Option<String>,
}

impl ListingRow {
    fn into_draft(self) -> Result<ListingDraft, String> {
        let property_type = self
            .property_type
            .as_deref()
            .map(str::parse::<PropertyType>)
            .transpose()
            .map_err(|err: DomainError| err.to_string())?;
        let status = self
            .status
            .as_deref()
            .map(str::parse::<ListingStatus>)
            .transpose()
            .map_err(|err: DomainError| err.to_string())?;
        let sort_order = self
            .sort_order
            .as_deref()
            .map(|value| {
                value
                    .parse::<i32>()
                    .map_err(|_| format!("invalid sort order '{value}'"))
            })
            .transpose()?;

        let draft = ListingDraft {
            title: self.title,
            price: self.price,
            location: self.location,
            size: self.size,
            bhk: self.bhk,
            highlights: split_list(&self.highlights),
            amenities: split_list(&self.amenities),
            images: split_list(&self.images),
            status,
            property_type,
            sort_order,
            neighborhood: self.neighborhood,
            featured: self.featured.as_deref().is_some_and(is_truthy),
        };

        draft.validated().map_err(|err| err.to_string())
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
