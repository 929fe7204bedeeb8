//! Error types for the view accounting engine.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur during engine operation.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to open or read an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// A view event arrived without a viewer identifier
    #[error("Empty viewer ID for item {item_id}")]
    EmptyViewerId { item_id: String },

    /// A view event carried a non-positive view count
    #[error("View count must be positive for item {item_id}, viewer {viewer_id}")]
    InvalidViewCount { item_id: String, viewer_id: String },

    /// An ad item reached payment gating without a payment amount.
    /// Indicates a defect in the upstream content-approval workflow.
    #[error("Ad item {item_id} has no payment amount set")]
    MissingAdPayment { item_id: String },

    /// The payment gateway returned a non-success response
    #[error("Payment for item {item_id} rejected: {message}")]
    PaymentRejected { item_id: String, message: String },

    /// A view-record increment targeted a record that does not exist
    #[error("No view record for item {item_id}, viewer {viewer_id}")]
    ViewRecordMissing { item_id: String, viewer_id: String },

    /// Missing input file arguments
    #[error("Missing input files. Usage: view-accounting <items.csv> <events.csv> [payments.csv]")]
    MissingArgument,
}
