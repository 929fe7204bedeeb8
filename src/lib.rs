//! # View Accounting
//!
//! A streaming view-event processor for a social platform: records which
//! viewer has seen which content item, and triggers at-most-once ad-view
//! payouts to item owners.
//!
//! ## Design Principles
//!
//! - **Exact money**: fixed 4-decimal-place amounts via `rust_decimal`,
//!   strings on every wire surface
//! - **Injected collaborators**: the view store and payment gateway are
//!   explicit dependencies, never ambient singletons
//! - **At-most-once payment**: gated on view-record creation per
//!   `(item, viewer)` pair
//! - **Deterministic output**: view records sorted by `(item, viewer)`
//!
//! ## Example
//!
//! ```no_run
//! use view_accounting::{
//!     ItemCatalog, LedgerGateway, MemoryViewStore, ViewAccountingEngine,
//! };
//! use std::io::Cursor;
//!
//! let items = "id,owner,status,is_ad,ad_payment,original\nad-1,u1,completed,true,2.50,\n";
//! let events = "item,viewer,views,view_type,at\nad-1,u2,1,focus,\n";
//!
//! let catalog = ItemCatalog::load_csv(Cursor::new(items)).unwrap();
//! let mut engine = ViewAccountingEngine::new(MemoryViewStore::new(), LedgerGateway::new());
//! engine.process_events(&catalog, Cursor::new(events)).unwrap();
//! engine.store().write_csv(std::io::stdout()).unwrap();
//! ```

pub mod amount;
pub mod engine;
pub mod error;
pub mod event;
pub mod gateway;
pub mod item;
pub mod view;

pub use amount::Amount;
pub use engine::{ViewAccountingEngine, ViewOutcome};
pub use error::{EngineError, Result};
pub use event::{ParsedViewEvent, ViewEventRecord};
pub use gateway::{ClaimKind, LedgerGateway, PaymentClaim, PaymentGateway};
pub use item::{ContentItem, ItemCatalog, ItemRecord, ItemStatus, ViewType};
pub use view::{MemoryViewStore, ViewRecord, ViewStore};
