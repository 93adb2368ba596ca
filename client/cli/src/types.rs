//! Catalog data model
//!
//! Request and response types for the `/api/list` endpoint. All values are
//! ephemeral: one response is held per render and replaced by the next.

use crate::error::CatalogError;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::num::NonZeroU32;

// ============================================================================
// REQUEST
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    pub page: NonZeroU32,
    pub query: String,
    pub in_stock: bool,
}

impl ListingRequest {
    pub fn new(page: u64, query: impl Into<String>, in_stock: bool) -> Result<Self, CatalogError> {
        let page = u32::try_from(page)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or(CatalogError::InvalidPage(page))?;
        Ok(Self {
            page,
            query: query.into(),
            in_stock,
        })
    }
}

// ============================================================================
// RESPONSE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingResponse {
    pub files: Vec<FileEntry>,
    pub current_page: u32,
    /// Never below 1, even when the server reports 0 pages for an empty set.
    #[serde(deserialize_with = "at_least_one")]
    pub total_pages: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_files: Option<u64>,
}

impl ListingResponse {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn find(&self, name: &str) -> Option<&FileEntry> {
        self.files.iter().find(|f| f.name == name)
    }
}

fn at_least_one<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(u32::deserialize(deserializer)?.max(1))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    /// Empty when the server omits it or sends `null`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub display_name: String,
    /// Server-relative path, e.g. `/api/preview/IMG_0001.jpg`
    pub preview_url: String,
    pub https_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    /// `None` means the count is unknown.
    #[serde(
        default,
        deserialize_with = "stock_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub stock: Option<u64>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Stock counts arrive as any JSON number; `3.0` is a count, `2.5` and `-1`
/// are not.
fn stock_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(n) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Some(count) = n.as_u64() {
        return Ok(Some(count));
    }
    match n.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(Some(f as u64)),
        _ => Err(de::Error::custom(format!(
            "invalid stock count {}: expected a non-negative integer",
            n
        ))),
    }
}

impl FileEntry {
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }
}

/// Price as sent by the server: either already currency-formatted text or a
/// bare number. Numbers keep their JSON representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Number(n) => write!(f, "{}", n),
            Price::Text(s) => f.write_str(s),
        }
    }
}
