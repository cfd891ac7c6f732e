//! Error types for the payment optimizer.

use thiserror::Error;

/// Result type alias for optimizer operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while loading input or allocating payments.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to open or read an input file, or to write the output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON document or unparseable numeric field
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to write the result lines
    #[error("Output error: {0}")]
    Csv(#[from] csv::Error),

    /// A record parsed but holds an invalid value
    #[error("Invalid {kind} at index {index}: {message}")]
    InvalidRecord {
        kind: &'static str,
        index: usize,
        message: String,
    },

    /// Two records of the same document share an id
    #[error("Duplicate {kind} id {id:?}")]
    DuplicateId { kind: &'static str, id: String },

    /// Orders remain unpaid after every phase
    #[error(
        "Infeasible allocation: {} order(s) could not be paid in full: {}",
        .unsettled.len(),
        .unsettled.join(", ")
    )]
    InfeasibleAllocation { unsettled: Vec<String> },

    /// Missing input file arguments
    #[error("Missing input file arguments. Usage: payment-optimizer <orders.json> <paymentmethods.json>")]
    MissingArgument,
}
