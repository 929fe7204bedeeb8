//! Payment gateway interface and the in-process ledger implementation.
//!
//! The real gateway is an external transactions API; each call is a single
//! outbound request that fails on any non-success response. Amounts are
//! exact decimals, serialized as strings on the wire (see [`Amount`]).

use crate::amount::Amount;
use crate::error::Result;
use std::io::Write;

/// What a payment claim compensates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimKind {
    /// A qualifying full-attention view of an advertisement.
    AdView,

    /// A qualifying view of a monetized non-ad item.
    ItemView,
}

impl ClaimKind {
    /// Stable string form used in ledger output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimKind::AdView => "ad_view",
            ClaimKind::ItemView => "item_view",
        }
    }
}

/// A single pay-for-view request as handed to the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentClaim {
    /// What kind of view is being compensated
    pub kind: ClaimKind,

    /// The viewer whose view earned the payout
    pub viewer_id: String,

    /// The item owner being paid
    pub owner_id: String,

    /// The viewed item
    pub item_id: String,

    /// Exact payout amount
    pub amount: Amount,
}

/// Outbound interface to the payments service.
///
/// Both methods represent one fallible external call; a returned error
/// means the payment must be treated as NOT completed. This crate never
/// retries — reconciliation is the caller's responsibility.
pub trait PaymentGateway {
    /// Pays `owner_id` for a qualifying view of ad `item_id` by `viewer_id`.
    fn pay_for_ad_view(
        &mut self,
        viewer_id: &str,
        owner_id: &str,
        item_id: &str,
        amount: Amount,
    ) -> Result<()>;

    /// Pays `owner_id` for a qualifying view of non-ad item `item_id`.
    fn pay_for_item_view(
        &mut self,
        viewer_id: &str,
        owner_id: &str,
        item_id: &str,
        amount: Amount,
    ) -> Result<()>;
}

/// In-process gateway that records every claim instead of calling out.
///
/// Used by the CLI and as a test double; the claims it accumulates are the
/// payment ledger written alongside the view-record output.
#[derive(Debug, Default)]
pub struct LedgerGateway {
    claims: Vec<PaymentClaim>,
}

impl LedgerGateway {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        LedgerGateway { claims: Vec::new() }
    }

    /// All claims recorded so far, in arrival order.
    pub fn claims(&self) -> &[PaymentClaim] {
        &self.claims
    }

    /// Total amount owed to the given owner across all claims.
    pub fn total_owed(&self, owner_id: &str) -> Amount {
        let mut total = Amount::ZERO;
        for claim in self.claims.iter().filter(|c| c.owner_id == owner_id) {
            total += claim.amount;
        }
        total
    }

    /// Writes the ledger to CSV, in arrival order.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["kind", "viewer", "owner", "item", "amount"])?;

        for claim in &self.claims {
            csv_writer.write_record([
                claim.kind.as_str(),
                claim.viewer_id.as_str(),
                claim.owner_id.as_str(),
                claim.item_id.as_str(),
                &claim.amount.to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    fn record(
        &mut self,
        kind: ClaimKind,
        viewer_id: &str,
        owner_id: &str,
        item_id: &str,
        amount: Amount,
    ) {
        self.claims.push(PaymentClaim {
            kind,
            viewer_id: viewer_id.to_string(),
            owner_id: owner_id.to_string(),
            item_id: item_id.to_string(),
            amount,
        });
    }
}

impl PaymentGateway for LedgerGateway {
    fn pay_for_ad_view(
        &mut self,
        viewer_id: &str,
        owner_id: &str,
        item_id: &str,
        amount: Amount,
    ) -> Result<()> {
        self.record(ClaimKind::AdView, viewer_id, owner_id, item_id, amount);
        Ok(())
    }

    fn pay_for_item_view(
        &mut self,
        viewer_id: &str,
        owner_id: &str,
        item_id: &str,
        amount: Amount,
    ) -> Result<()> {
        self.record(ClaimKind::ItemView, viewer_id, owner_id, item_id, amount);
        Ok(())
    }
}
