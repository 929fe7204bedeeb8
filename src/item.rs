//! Content item model and the item catalog loaded from CSV.
//!
//! A content item is a post or advertisement record owned by a user.
//! Item lifecycle transitions are driven by external processing pipelines;
//! this crate only reads status and payment fields.

use crate::amount::Amount;
use csv::{ReaderBuilder, Trim};
use log::warn;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::str::FromStr;

/// Lifecycle status of a content item.
///
/// Only `Completed` items accept view recording without a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    Pending,
    Processing,
    Completed,
    Error,
    Archived,
    Deleting,
}

impl ItemStatus {
    /// Parses a status string (case-insensitive). Returns `None` for
    /// unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(ItemStatus::Pending),
            "processing" => Some(ItemStatus::Processing),
            "completed" => Some(ItemStatus::Completed),
            "error" => Some(ItemStatus::Error),
            "archived" => Some(ItemStatus::Archived),
            "deleting" => Some(ItemStatus::Deleting),
            _ => None,
        }
    }
}

/// How a viewer saw a content item.
///
/// Only `Focus` ("full attention") views are payment-eligible;
/// `Thumbnail` views are recorded without payment consideration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewType {
    Thumbnail,
    #[default]
    Focus,
}

impl ViewType {
    /// Parses a view-type string (case-insensitive). An empty string
    /// yields the default (`Focus`); unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "" => Some(ViewType::default()),
            "thumbnail" => Some(ViewType::Thumbnail),
            "focus" => Some(ViewType::Focus),
            _ => None,
        }
    }
}

/// A post or advertisement record.
///
/// # Invariants
///
/// - `ad_payment` is set if and only if `is_ad` is true and the ad has
///   been approved for monetization. An ad without a payment amount is a
///   data-integrity fault surfaced at payment gating.
/// - `original_item_id`, when set, references the canonical item this one
///   duplicates; views recorded here are also recorded on the original.
#[derive(Debug, Clone)]
pub struct ContentItem {
    /// Opaque unique identifier.
    pub id: String,

    /// Identifier of the user who owns the item.
    pub owner_id: String,

    /// Lifecycle status.
    pub status: ItemStatus,

    /// Whether this item is an advertisement.
    pub is_ad: bool,

    /// Amount owed to the owner per qualifying view; ads only.
    pub ad_payment: Option<Amount>,

    /// The canonical item this one duplicates, if any.
    pub original_item_id: Option<String>,
}

impl ContentItem {
    /// Creates a completed, non-ad content item.
    pub fn new(id: impl Into<String>, owner_id: impl Into<String>) -> Self {
        ContentItem {
            id: id.into(),
            owner_id: owner_id.into(),
            status: ItemStatus::Completed,
            is_ad: false,
            ad_payment: None,
            original_item_id: None,
        }
    }
}

/// Raw item record as read from the catalog CSV.
#[derive(Debug, Deserialize)]
pub struct ItemRecord {
    /// Item ID
    pub id: String,

    /// Owner user ID
    pub owner: String,

    /// Lifecycle status: pending, processing, completed, error, archived, deleting
    pub status: String,

    /// Whether the item is an advertisement
    pub is_ad: bool,

    /// Per-view payout amount (ads only, absent otherwise)
    pub ad_payment: Option<String>,

    /// ID of the original item this one duplicates (absent for originals)
    pub original: Option<String>,
}

impl ItemRecord {
    /// Parses the raw CSV record into a typed content item.
    ///
    /// Returns `None` if the record is invalid (empty IDs, unknown status,
    /// unparseable payment amount).
    pub fn parse(&self) -> Option<ContentItem> {
        let id = self.id.trim();
        let owner = self.owner.trim();
        if id.is_empty() || owner.is_empty() {
            return None;
        }

        let status = ItemStatus::parse(&self.status)?;

        let ad_payment = match self.ad_payment.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => Some(Amount::from_str(s).ok()?),
            _ => None,
        };

        let original_item_id = self
            .original
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Some(ContentItem {
            id: id.to_string(),
            owner_id: owner.to_string(),
            status,
            is_ad: self.is_ad,
            ad_payment,
            original_item_id,
        })
    }
}

/// In-memory catalog of content items, keyed by item ID.
///
/// Stands in for the item lookups the surrounding system performs against
/// its persistent store before handing an already-loaded item to the engine.
#[derive(Debug, Default)]
pub struct ItemCatalog {
    items: HashMap<String, ContentItem>,
}

impl ItemCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        ItemCatalog {
            items: HashMap::new(),
        }
    }

    /// Loads items from a CSV reader in streaming fashion.
    ///
    /// Invalid records are logged at warn level and skipped.
    pub fn load_csv<R: Read>(reader: R) -> crate::error::Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut catalog = ItemCatalog::new();

        for (row_idx, result) in csv_reader.deserialize::<ItemRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(record) => {
                    if let Some(item) = record.parse() {
                        catalog.insert(item);
                    } else {
                        warn!("Row {}: Failed to parse item record", row_num);
                    }
                }
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                }
            }
        }

        Ok(catalog)
    }

    /// Inserts an item, replacing any previous entry with the same ID.
    pub fn insert(&mut self, item: ContentItem) {
        self.items.insert(item.id.clone(), item);
    }

    /// Looks up an item by ID.
    pub fn get(&self, item_id: &str) -> Option<&ContentItem> {
        self.items.get(item_id)
    }

    /// Number of items in the catalog.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the catalog holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
