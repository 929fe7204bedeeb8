//! View event models for CSV parsing and internal representation.

use crate::item::ViewType;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Raw view event record as read from CSV.
///
/// `view_type` and `at` are optional; an omitted view type means a
/// full-attention (focus) view, and an omitted timestamp means "now".
#[derive(Debug, Deserialize)]
pub struct ViewEventRecord {
    /// Viewed item ID
    pub item: String,

    /// Viewer user ID
    pub viewer: String,

    /// Number of views reported by this event (positive)
    pub views: u64,

    /// View type: thumbnail or focus (defaults to focus)
    pub view_type: Option<String>,

    /// Event timestamp, RFC 3339 (defaults to processing time)
    pub at: Option<String>,
}

impl ViewEventRecord {
    /// Parses the raw CSV record into a typed view event.
    ///
    /// Returns `None` if the record is invalid (empty item ID, unknown
    /// view type, malformed timestamp). An empty viewer or a zero view
    /// count is left for the engine to reject, so those anomalies surface
    /// through the normal error taxonomy.
    pub fn parse(&self) -> Option<ParsedViewEvent> {
        let item_id = self.item.trim();
        if item_id.is_empty() {
            return None;
        }

        let view_type = ViewType::parse(self.view_type.as_deref().unwrap_or(""))?;

        let at = match self.at.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => Some(
                DateTime::parse_from_rfc3339(s)
                    .ok()?
                    .with_timezone(&Utc),
            ),
            _ => None,
        };

        Some(ParsedViewEvent {
            item_id: item_id.to_string(),
            viewer_id: self.viewer.trim().to_string(),
            view_count: self.views,
            view_type,
            at,
        })
    }
}

/// A parsed view event ready for processing.
#[derive(Debug, Clone)]
pub struct ParsedViewEvent {
    /// Viewed item ID
    pub item_id: String,

    /// Viewer user ID
    pub viewer_id: String,

    /// Number of views reported
    pub view_count: u64,

    /// How the viewer saw the item
    pub view_type: ViewType,

    /// When the views happened; `None` means use processing time
    pub at: Option<DateTime<Utc>>,
}
