//! Core view accounting engine.
//!
//! Decides, for each recorded view event on a content item, whether to
//! persist the view and whether to trigger a payment to the item's owner.
//! Payment fires at most once per distinct viewer per item, gated on the
//! creation (not increment) of the viewer's view record.

use crate::amount::Amount;
use crate::error::{EngineError, Result};
use crate::event::ViewEventRecord;
use crate::gateway::PaymentGateway;
use crate::item::{ContentItem, ItemCatalog, ItemStatus, ViewType};
use crate::view::ViewStore;
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use std::io::Read;

/// What a single `record_view_count` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOutcome {
    /// Whether this was the viewer's first recorded view of the item.
    pub first_view: bool,

    /// The amount paid to the owner, if payment was triggered.
    pub paid: Option<Amount>,
}

/// The view accounting engine.
///
/// Composes an injected [`ViewStore`] (persists per-viewer view records)
/// with an injected [`PaymentGateway`] (sends pay-for-view requests).
/// Each call executes synchronously to completion; the `&mut self`
/// receiver serializes the per-key read-modify-write the store contract
/// requires.
pub struct ViewAccountingEngine<S, P> {
    store: S,
    gateway: P,
}

impl<S: ViewStore, P: PaymentGateway> ViewAccountingEngine<S, P> {
    /// Creates an engine over the given collaborators.
    pub fn new(store: S, gateway: P) -> Self {
        ViewAccountingEngine { store, gateway }
    }

    /// Records views of `item` by `viewer_id` and triggers payment when due.
    ///
    /// Behavior, in order:
    ///
    /// 1. Rejects an empty `viewer_id` or a zero `view_count` before any
    ///    persistence.
    /// 2. Warns (but proceeds) if the item is not `Completed`.
    /// 3. Creates or increments the viewer's view record; creation is the
    ///    first-view event.
    /// 4. If the item duplicates an original, repeats step 3 against the
    ///    original item's key space.
    /// 5. On a first view of an ad, with a focus view type and a viewer
    ///    other than the owner, pays the owner the item's ad payment.
    ///
    /// A gateway failure propagates unretried; the already-persisted view
    /// records are not rolled back.
    pub fn record_view_count(
        &mut self,
        item: &ContentItem,
        viewer_id: &str,
        view_count: u64,
        view_type: ViewType,
        now: DateTime<Utc>,
    ) -> Result<ViewOutcome> {
        if viewer_id.trim().is_empty() {
            return Err(EngineError::EmptyViewerId {
                item_id: item.id.clone(),
            });
        }
        if view_count == 0 {
            return Err(EngineError::InvalidViewCount {
                item_id: item.id.clone(),
                viewer_id: viewer_id.to_string(),
            });
        }

        if item.status != ItemStatus::Completed {
            warn!(
                "Recording view(s) by user `{}` on non-completed item `{}`",
                viewer_id, item.id
            );
        }

        let first_view = self.persist_view(&item.id, viewer_id, view_count, now)?;

        // A duplicate's views are also attributed to the original, which
        // independently tracks whether this is the viewer's first view of it.
        if let Some(original_id) = &item.original_item_id {
            self.persist_view(original_id, viewer_id, view_count, now)?;
        }

        let mut paid = None;
        if first_view && item.is_ad && view_type == ViewType::Focus && viewer_id != item.owner_id {
            let amount = item
                .ad_payment
                .ok_or_else(|| EngineError::MissingAdPayment {
                    item_id: item.id.clone(),
                })?;
            self.gateway
                .pay_for_ad_view(viewer_id, &item.owner_id, &item.id, amount)?;
            debug!(
                "Paid {} to `{}` for view of ad `{}` by `{}`",
                amount, item.owner_id, item.id, viewer_id
            );
            paid = Some(amount);
        }

        Ok(ViewOutcome { first_view, paid })
    }

    /// Records views with the default view type (focus) at the current time.
    pub fn record_view(
        &mut self,
        item: &ContentItem,
        viewer_id: &str,
        view_count: u64,
    ) -> Result<ViewOutcome> {
        self.record_view_count(item, viewer_id, view_count, ViewType::default(), Utc::now())
    }

    /// Creates or increments the view record for `(item_id, viewer_id)`.
    ///
    /// Returns `true` if a record was created (a first-view event).
    fn persist_view(
        &mut self,
        item_id: &str,
        viewer_id: &str,
        view_count: u64,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        match self.store.get_view(item_id, viewer_id) {
            Some(_) => {
                self.store.increment_view(item_id, viewer_id, view_count)?;
                Ok(false)
            }
            None => {
                self.store.create_view(item_id, viewer_id, view_count, now)?;
                Ok(true)
            }
        }
    }

    /// Processes view events from a CSV reader in streaming fashion.
    ///
    /// Records are read one at a time. Rows that fail to parse, reference
    /// an item missing from the catalog, or are rejected by the engine are
    /// logged at warn level and skipped; the stream keeps going.
    pub fn process_events<R: Read>(&mut self, catalog: &ItemCatalog, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<ViewEventRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(record) => {
                    let Some(event) = record.parse() else {
                        warn!("Row {}: Failed to parse view event record", row_num);
                        continue;
                    };

                    let Some(item) = catalog.get(&event.item_id) else {
                        warn!("Row {}: Unknown item {}", row_num, event.item_id);
                        continue;
                    };

                    let now = event.at.unwrap_or_else(Utc::now);
                    if let Err(e) = self.record_view_count(
                        item,
                        &event.viewer_id,
                        event.view_count,
                        event.view_type,
                        now,
                    ) {
                        warn!("Row {}: {}", row_num, e);
                    }
                }
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                }
            }
        }

        Ok(())
    }

    /// The injected view store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The injected payment gateway.
    pub fn gateway(&self) -> &P {
        &self.gateway
    }
}

impl<S: ViewStore + Default, P: PaymentGateway + Default> Default for ViewAccountingEngine<S, P> {
    fn default() -> Self {
        Self::new(S::default(), P::default())
    }
}
