//! Error types for the usage ledger.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur during a ledger run.
///
/// Everything here is fatal for the run. Conditions the user can correct at
/// the prompt (impossible dates, out-of-range numbers) never surface as a
/// `LedgerError`; the input layer re-prompts instead.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Failed to read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Config or layout JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Atomic replace of a saved file failed
    #[error("Failed to persist file: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// Missing data folder argument
    #[error("Missing data folder argument. Usage: thermo-ledger <data-folder>")]
    MissingArgument,

    /// The registry file does not exist
    #[error("Registry file not found: {}", path.display())]
    MissingRegistry { path: PathBuf },

    /// The registry holds no devices
    #[error("Registry contains no devices")]
    EmptyRegistry,

    /// A registry row could not be read
    #[error("Invalid registry entry at row {row}: {message}")]
    InvalidRegistryRow { row: usize, message: String },

    /// A cell expected to hold a number holds text or nothing
    #[error("Cell at row {row}, column {column} is not numeric")]
    NonNumericCell { row: usize, column: usize },

    /// A computed value is too large to represent
    #[error("Value at row {row}, column {column} is too large to compute")]
    Overflow { row: usize, column: usize },

    /// The input stream ended while a prompt was waiting
    #[error("Input closed before the prompt was answered")]
    InputClosed,
}
