//! Spreadsheet ingestion for supplier quotes.
//!
//! Turns a raw cell grid into validated price records, inferring which columns
//! are suppliers and which are metadata.
//!
//! # Module Structure
//!
//! - [`grid`] - File decoding (xlsx/xls/ods via calamine, CSV via csv)
//! - [`classifier`] - Quantity, system and supplier column detection
//! - [`price_parser`] - Price string normalization
//!
//! # Example
//!
//! ```no_run
//! use quote_analyzer::ingest::SheetIngestor;
//!
//! #[tokio::main]
//! async fn main() -> quote_common::Result<()> {
//!     let ingestor = SheetIngestor::new();
//!     let ingestion = ingestor.load_from_path("cotacao.xlsx").await?;
//!     println!(
//!         "{} offers from {} suppliers",
//!         ingestion.records.len(),
//!         ingestion.suppliers.len()
//!     );
//!     Ok(())
//! }
//! ```

pub mod classifier;
pub mod grid;
pub mod price_parser;

use log::{debug, info, warn};
use quote_common::{PriceRecord, QuoteError, RecordKey, Result};
use std::collections::HashSet;
use std::path::Path;

pub use classifier::{ColumnClassifier, KeywordClassifier};
pub use grid::Cell;
pub use price_parser::{parse_price, parse_price_cell};

/// Outcome of a successful ingestion
#[derive(Debug, Clone, PartialEq)]
pub struct Ingestion {
    /// Supplier names in spreadsheet column order
    pub suppliers: Vec<String>,
    /// One record per accepted (product, supplier) price
    pub records: Vec<PriceRecord>,
    /// Column detected as quantity, if any
    pub quantity_column: Option<usize>,
    /// Price cells that were present but unusable
    pub skipped_cells: usize,
}

/// Spreadsheet ingestor with a pluggable column classifier.
pub struct SheetIngestor {
    classifier: Box<dyn ColumnClassifier>,
}

impl Default for SheetIngestor {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetIngestor {
    /// Creates an ingestor using the default keyword classifier.
    pub fn new() -> Self {
        Self::with_classifier(KeywordClassifier::new())
    }

    pub fn with_classifier<C: ColumnClassifier + 'static>(classifier: C) -> Self {
        debug!("Creating sheet ingestor");
        Self {
            classifier: Box::new(classifier),
        }
    }

    /// Reads a spreadsheet file and ingests its first sheet.
    ///
    /// # Arguments
    /// * `path` - Path to the quote spreadsheet
    ///
    /// # Returns
    /// The ingested records, or an input error describing why the file was rejected.
    pub async fn load_from_path<P: AsRef<Path>>(&self, path: P) -> Result<Ingestion> {
        let rows = grid::load_grid(path).await?;
        self.ingest_grid(&rows)
    }

    /// Ingests a cell grid whose first row holds the headers.
    ///
    /// Column 0 is the product. Remaining columns are classified as quantity,
    /// metadata or supplier; each supplier cell with a positive price becomes a
    /// record. Unusable price cells are skipped, not reported as errors.
    ///
    /// # Arguments
    /// * `rows` - Header row followed by data rows
    ///
    /// # Returns
    /// The ingestion result, or an error if the grid has no data rows, no
    /// supplier columns, or no valid prices.
    pub fn ingest_grid(&self, rows: &[Vec<Cell>]) -> Result<Ingestion> {
        if rows.len() < 2 {
            warn!("Spreadsheet has {} row(s), needs header and data", rows.len());
            return Err(QuoteError::MissingDataRows);
        }

        let headers: Vec<String> = rows[0]
            .iter()
            .map(|cell| cell.as_text().trim().to_string())
            .collect();
        debug!("Headers: {headers:?}");

        let quantity_column = classifier::find_quantity_column(&headers, self.classifier.as_ref());
        debug!("Quantity column: {quantity_column:?}");

        let supplier_columns =
            classifier::detect_suppliers(&headers, quantity_column, self.classifier.as_ref());
        if supplier_columns.is_empty() {
            warn!("No supplier columns detected in headers {headers:?}");
            return Err(QuoteError::NoSuppliers);
        }

        let mut records = Vec::new();
        let mut seen: HashSet<RecordKey> = HashSet::new();
        let mut skipped_cells = 0;

        for (offset, row) in rows[1..].iter().enumerate() {
            let row_number = offset + 2;
            let product = row
                .first()
                .map(|cell| cell.as_text().trim().to_string())
                .unwrap_or_default();

            if product.is_empty() {
                debug!("Skipping row {row_number}: empty product");
                continue;
            }

            for (supplier, column) in &supplier_columns {
                let Some(cell) = row.get(*column) else {
                    continue;
                };
                if cell.is_blank() {
                    continue;
                }

                let price = match price_parser::parse_price_cell(cell) {
                    Some(price) if price > 0.0 => price,
                    other => {
                        debug!(
                            "Skipping price for '{product}' / '{supplier}' (row {row_number}): {:?} -> {other:?}",
                            cell.as_text()
                        );
                        skipped_cells += 1;
                        continue;
                    }
                };

                let key = RecordKey::new(product.as_str(), supplier.as_str());
                if !seen.insert(key) {
                    warn!(
                        "Duplicate offer for '{product}' from '{supplier}' at row {row_number}, keeping the first"
                    );
                    skipped_cells += 1;
                    continue;
                }

                records.push(PriceRecord::new(
                    product.as_str(),
                    supplier.as_str(),
                    price,
                    row_number,
                ));
            }
        }

        if records.is_empty() {
            warn!("No valid prices found in {} data rows", rows.len() - 1);
            return Err(QuoteError::NoValidPrices);
        }

        let suppliers: Vec<String> = supplier_columns.into_iter().map(|(name, _)| name).collect();
        info!(
            "Ingested {} offers for {} suppliers ({} price cells skipped)",
            records.len(),
            suppliers.len(),
            skipped_cells
        );

        Ok(Ingestion {
            suppliers,
            records,
            quantity_column,
            skipped_cells,
        })
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
