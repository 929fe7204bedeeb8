//! View records and the store that persists them.
//!
//! A view record is durable evidence that a specific viewer has viewed a
//! specific content item at least once. At most one record exists per
//! `(item_id, viewer_id)` pair; its creation is the "first view" signal
//! that gates payment triggering.

use crate::error::{EngineError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashMap;
use std::io::Write;

/// Per-viewer view evidence for a single content item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRecord {
    /// Item ID
    pub item_id: String,

    /// Viewer user ID
    pub viewer_id: String,

    /// When this viewer first viewed the item.
    pub first_viewed_at: DateTime<Utc>,

    /// Cumulative view count across all recorded views.
    pub view_count: u64,
}

/// Persistence interface for view records.
///
/// Implementations must behave as if the read-modify-write for a given
/// `(item_id, viewer_id)` key is serialized: concurrent calls for the same
/// key must not both observe "absent" and both create a record. Calls for
/// different keys are independent.
pub trait ViewStore {
    /// Returns the view record for the given key, if one exists.
    fn get_view(&self, item_id: &str, viewer_id: &str) -> Option<ViewRecord>;

    /// Creates a view record. The key must not already have one.
    fn create_view(
        &mut self,
        item_id: &str,
        viewer_id: &str,
        view_count: u64,
        first_viewed_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Increments the view count of an existing record.
    fn increment_view(&mut self, item_id: &str, viewer_id: &str, view_count: u64) -> Result<()>;
}

/// In-memory view store backed by a hash map.
///
/// Taking `&mut self` for all writes trivially satisfies the per-key
/// serialization the [`ViewStore`] contract requires.
#[derive(Debug, Default)]
pub struct MemoryViewStore {
    /// View records indexed by `(item_id, viewer_id)`.
    records: HashMap<(String, String), ViewRecord>,
}

impl MemoryViewStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        MemoryViewStore {
            records: HashMap::new(),
        }
    }

    /// Number of view records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Writes all view records to CSV.
    ///
    /// Output is sorted by `(item, viewer)` for deterministic results.
    /// Timestamps are RFC 3339 in UTC.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["item", "viewer", "first_viewed_at", "views"])?;

        let mut records: Vec<_> = self.records.values().collect();
        records.sort_by(|a, b| {
            (a.item_id.as_str(), a.viewer_id.as_str())
                .cmp(&(b.item_id.as_str(), b.viewer_id.as_str()))
        });

        for record in records {
            csv_writer.write_record([
                record.item_id.as_str(),
                record.viewer_id.as_str(),
                &record
                    .first_viewed_at
                    .to_rfc3339_opts(SecondsFormat::AutoSi, true),
                &record.view_count.to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

impl ViewStore for MemoryViewStore {
    fn get_view(&self, item_id: &str, viewer_id: &str) -> Option<ViewRecord> {
        self.records
            .get(&(item_id.to_string(), viewer_id.to_string()))
            .cloned()
    }

    fn create_view(
        &mut self,
        item_id: &str,
        viewer_id: &str,
        view_count: u64,
        first_viewed_at: DateTime<Utc>,
    ) -> Result<()> {
        self.records.insert(
            (item_id.to_string(), viewer_id.to_string()),
            ViewRecord {
                item_id: item_id.to_string(),
                viewer_id: viewer_id.to_string(),
                first_viewed_at,
                view_count,
            },
        );
        Ok(())
    }

    fn increment_view(&mut self, item_id: &str, viewer_id: &str, view_count: u64) -> Result<()> {
        let record = self
            .records
            .get_mut(&(item_id.to_string(), viewer_id.to_string()))
            .ok_or_else(|| EngineError::ViewRecordMissing {
                item_id: item_id.to_string(),
                viewer_id: viewer_id.to_string(),
            })?;
        record.view_count += view_count;
        Ok(())
    }
}
