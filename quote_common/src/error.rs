//! Error types shared by the quote crates

use thiserror::Error;

/// Unified error type for quote ingestion and session operations
#[derive(Debug, Error)]
pub enum QuoteError {
    /// File extension is not a supported spreadsheet format
    #[error("Unsupported file type '{0}': expected .xlsx, .xls, .xlsm, .xlsb, .ods or .csv")]
    UnsupportedFormat(String),
    /// File could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Workbook could not be decoded
    #[error("Failed to decode workbook: {0}")]
    Workbook(String),
    /// CSV could not be decoded
    #[error("Failed to decode CSV: {0}")]
    Csv(String),
    /// Workbook has no sheets, or the first sheet has no data
    #[error("No data found in the spreadsheet")]
    EmptySheet,
    /// Fewer than two rows
    #[error("Spreadsheet needs a header row and at least one data row")]
    MissingDataRows,
    /// No header was classified as a supplier
    #[error("No supplier columns found in the spreadsheet")]
    NoSuppliers,
    /// Every price cell was empty, unparseable or non-positive
    #[error("No valid prices found in the spreadsheet")]
    NoValidPrices,
    /// No active record for the given pair
    #[error("No offer for '{product}' from '{supplier}'")]
    RecordNotFound { product: String, supplier: String },
    /// Restore requested for a pair that is not in the removed list
    #[error("Offer for '{product}' from '{supplier}' has not been removed")]
    NotRemoved { product: String, supplier: String },
    /// Price for a synthesized record is not a positive finite number
    #[error("Invalid price: {0}")]
    InvalidPrice(f64),
    /// Product is not part of the working set
    #[error("Unknown product: {0}")]
    UnknownProduct(String),
    /// Supplier is not part of the working set
    #[error("Unknown supplier: {0}")]
    UnknownSupplier(String),
    /// Snapshot could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl QuoteError {
    /// True for failures of an ingestion attempt (bad file, bad sheet layout).
    ///
    /// These end the current load; the user retries with another file.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            QuoteError::UnsupportedFormat(_)
                | QuoteError::Io(_)
                | QuoteError::Workbook(_)
                | QuoteError::Csv(_)
                | QuoteError::EmptySheet
                | QuoteError::MissingDataRows
                | QuoteError::NoSuppliers
                | QuoteError::NoValidPrices
        )
    }
}

/// Result alias for quote operations
pub type Result<T> = std::result::Result<T, QuoteError>;
