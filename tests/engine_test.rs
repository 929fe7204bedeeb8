//! Behavioral tests for the view accounting engine.
//!
//! Exercises the payment-gating properties end to end against the
//! in-memory store, plus gateway-failure propagation via a rejecting fake.

use chrono::{DateTime, TimeZone, Utc};
use std::str::FromStr;
use view_accounting::{
    Amount, ContentItem, EngineError, ItemStatus, LedgerGateway, MemoryViewStore, PaymentGateway,
    Result, ViewAccountingEngine, ViewStore, ViewType,
};

fn t(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap()
}

fn amt(s: &str) -> Amount {
    Amount::from_str(s).unwrap()
}

fn ad_item(id: &str, owner: &str, payment: &str) -> ContentItem {
    let mut item = ContentItem::new(id, owner);
    item.is_ad = true;
    item.ad_payment = Some(amt(payment));
    item
}

fn engine() -> ViewAccountingEngine<MemoryViewStore, LedgerGateway> {
    ViewAccountingEngine::new(MemoryViewStore::new(), LedgerGateway::new())
}

/// Gateway fake that rejects every payment, as the external transactions
/// API does on a non-success response.
struct RejectingGateway;

impl PaymentGateway for RejectingGateway {
    fn pay_for_ad_view(
        &mut self,
        _viewer_id: &str,
        _owner_id: &str,
        item_id: &str,
        _amount: Amount,
    ) -> Result<()> {
        Err(EngineError::PaymentRejected {
            item_id: item_id.to_string(),
            message: "Failed to process request".to_string(),
        })
    }

    fn pay_for_item_view(
        &mut self,
        _viewer_id: &str,
        _owner_id: &str,
        item_id: &str,
        _amount: Amount,
    ) -> Result<()> {
        Err(EngineError::PaymentRejected {
            item_id: item_id.to_string(),
            message: "Failed to process request".to_string(),
        })
    }
}

// ==================== PAYMENT GATING ====================

#[test]
fn test_non_ad_items_never_pay_regardless_of_view_type() {
    let mut engine = engine();
    let item = ContentItem::new("post-1", "user-1");

    engine
        .record_view_count(&item, "user-2", 1, ViewType::Focus, t(0))
        .unwrap();
    engine
        .record_view_count(&item, "user-3", 7, ViewType::Thumbnail, t(1))
        .unwrap();

    assert!(engine.gateway().claims().is_empty());
}

#[test]
fn test_repeated_focus_views_pay_exactly_once() {
    let mut engine = engine();
    let ad = ad_item("ad-1", "user-1", "2.5");

    for minute in 0..5 {
        engine
            .record_view_count(&ad, "user-2", 1, ViewType::Focus, t(minute))
            .unwrap();
    }

    assert_eq!(engine.gateway().claims().len(), 1);
    assert_eq!(engine.store().get_view("ad-1", "user-2").unwrap().view_count, 5);
}

#[test]
fn test_distinct_viewers_each_trigger_payment() {
    let mut engine = engine();
    let ad = ad_item("ad-1", "user-1", "2.5");

    engine
        .record_view_count(&ad, "user-2", 1, ViewType::Focus, t(0))
        .unwrap();
    engine
        .record_view_count(&ad, "user-3", 1, ViewType::Focus, t(1))
        .unwrap();

    assert_eq!(engine.gateway().claims().len(), 2);
    assert_eq!(engine.gateway().total_owed("user-1").to_string(), "5.0000");
}

#[test]
fn test_owner_self_view_never_pays() {
    let mut engine = engine();
    let ad = ad_item("ad-1", "user-1", "2.5");

    engine
        .record_view_count(&ad, "user-1", 10, ViewType::Focus, t(0))
        .unwrap();

    assert!(engine.gateway().claims().is_empty());
    // the self-view is still recorded
    assert_eq!(engine.store().get_view("ad-1", "user-1").unwrap().view_count, 10);
}

#[test]
fn test_thumbnail_views_never_pay() {
    let mut engine = engine();
    let ad = ad_item("ad-1", "user-1", "2.5");

    engine
        .record_view_count(&ad, "user-2", 1, ViewType::Thumbnail, t(0))
        .unwrap();

    assert!(engine.gateway().claims().is_empty());
}

#[test]
fn test_thumbnail_first_view_consumes_payment_opportunity() {
    // The first-view event happens on the thumbnail view, so a later
    // focus view is an increment and no longer payment-eligible.
    let mut engine = engine();
    let ad = ad_item("ad-1", "user-1", "2.5");

    engine
        .record_view_count(&ad, "user-2", 1, ViewType::Thumbnail, t(0))
        .unwrap();
    engine
        .record_view_count(&ad, "user-2", 1, ViewType::Focus, t(1))
        .unwrap();

    assert!(engine.gateway().claims().is_empty());
}

// ==================== ORIGINAL-ITEM PROPAGATION ====================

#[test]
fn test_duplicate_views_propagate_to_original() {
    let mut engine = engine();
    let mut repost = ContentItem::new("repost-1", "user-3");
    repost.original_item_id = Some("post-1".to_string());

    engine
        .record_view_count(&repost, "user-2", 2, ViewType::Focus, t(0))
        .unwrap();

    assert_eq!(engine.store().get_view("repost-1", "user-2").unwrap().view_count, 2);
    assert_eq!(engine.store().get_view("post-1", "user-2").unwrap().view_count, 2);
}

#[test]
fn test_original_tracks_first_view_independently() {
    let mut engine = engine();
    let original = ContentItem::new("post-1", "user-1");
    let mut repost = ContentItem::new("repost-1", "user-3");
    repost.original_item_id = Some("post-1".to_string());

    // viewer already saw the original directly
    engine
        .record_view_count(&original, "user-2", 1, ViewType::Focus, t(0))
        .unwrap();
    // view of the repost still increments the original's record
    let outcome = engine
        .record_view_count(&repost, "user-2", 1, ViewType::Focus, t(1))
        .unwrap();

    assert!(outcome.first_view); // first view of the repost itself
    assert_eq!(engine.store().get_view("post-1", "user-2").unwrap().view_count, 2);
    assert_eq!(
        engine.store().get_view("post-1", "user-2").unwrap().first_viewed_at,
        t(0)
    );
}

// ==================== END-TO-END SCENARIOS ====================

#[test]
fn test_ad_two_calls_scenario() {
    let mut engine = engine();
    let ad = ad_item("ad-a", "user-1", "2.50");

    let outcome = engine
        .record_view_count(&ad, "user-2", 1, ViewType::Focus, t(0))
        .unwrap();
    assert!(outcome.first_view);
    assert_eq!(outcome.paid.unwrap().to_string(), "2.5000");

    let claims = engine.gateway().claims();
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0].viewer_id, "user-2");
    assert_eq!(claims[0].owner_id, "user-1");
    assert_eq!(claims[0].item_id, "ad-a");
    assert_eq!(claims[0].amount.to_string(), "2.5000");

    let outcome = engine
        .record_view_count(&ad, "user-2", 1, ViewType::Focus, t(1))
        .unwrap();
    assert!(!outcome.first_view);
    assert!(outcome.paid.is_none());
    assert_eq!(engine.store().get_view("ad-a", "user-2").unwrap().view_count, 2);
    assert_eq!(engine.gateway().claims().len(), 1);
}

#[test]
fn test_non_ad_count_five_scenario() {
    let mut engine = engine();
    let item = ContentItem::new("post-b", "user-1");

    engine
        .record_view_count(&item, "user-3", 5, ViewType::Focus, t(0))
        .unwrap();

    assert_eq!(engine.store().get_view("post-b", "user-3").unwrap().view_count, 5);
    assert!(engine.gateway().claims().is_empty());
}

#[test]
fn test_archived_item_scenario() {
    let mut engine = engine();
    let mut item = ContentItem::new("post-c", "user-1");
    item.status = ItemStatus::Archived;

    let outcome = engine
        .record_view_count(&item, "user-4", 1, ViewType::Focus, t(0))
        .unwrap();

    assert!(outcome.first_view);
    assert!(engine.store().get_view("post-c", "user-4").is_some());
}

// ==================== FAILURE PROPAGATION ====================

#[test]
fn test_gateway_failure_propagates_but_view_survives() {
    let mut engine = ViewAccountingEngine::new(MemoryViewStore::new(), RejectingGateway);
    let ad = ad_item("ad-1", "user-1", "2.5");

    let err = engine
        .record_view_count(&ad, "user-2", 1, ViewType::Focus, t(0))
        .unwrap_err();
    assert!(matches!(err, EngineError::PaymentRejected { .. }));

    // view persistence is not rolled back on payment failure
    assert_eq!(engine.store().get_view("ad-1", "user-2").unwrap().view_count, 1);
}

#[test]
fn test_failed_payment_is_not_retried_on_next_view() {
    // After a failed payment the view record exists, so the next view is
    // an increment and no payment attempt is made; reconciliation is the
    // caller's responsibility.
    let mut engine = ViewAccountingEngine::new(MemoryViewStore::new(), RejectingGateway);
    let ad = ad_item("ad-1", "user-1", "2.5");

    engine
        .record_view_count(&ad, "user-2", 1, ViewType::Focus, t(0))
        .unwrap_err();
    let outcome = engine
        .record_view_count(&ad, "user-2", 1, ViewType::Focus, t(1))
        .unwrap();

    assert!(!outcome.first_view);
    assert!(outcome.paid.is_none());
}

#[test]
fn test_missing_ad_payment_is_a_data_integrity_fault() {
    let mut engine = engine();
    let mut ad = ContentItem::new("ad-1", "user-1");
    ad.is_ad = true;

    let err = engine
        .record_view_count(&ad, "user-2", 1, ViewType::Focus, t(0))
        .unwrap_err();
    assert!(matches!(err, EngineError::MissingAdPayment { .. }));
    assert!(engine.gateway().claims().is_empty());
}
