//! Quote Analyzer - lowest price per product from supplier quote spreadsheets
//!
//! Loads a quote spreadsheet (one row per product, one column per supplier),
//! flags the cheapest supplier(s) for every product and keeps a session in
//! which quantities are entered, products are moved between suppliers and
//! offers are removed or restored. Sessions are saved as a JSON snapshot and
//! can be exported as a CSV grid or shared as plain text.

pub mod engine;
pub mod export;
pub mod ingest;
pub mod persistence;
pub mod session;
pub mod share;

pub use engine::{compute_lowest_prices, WinningOffer};
pub use ingest::{parse_price, Cell, ColumnClassifier, Ingestion, KeywordClassifier, SheetIngestor};
pub use persistence::{Snapshot, StateStore};
pub use quote_common::{LowestPriceIndex, PriceRecord, QuoteError, RecordKey, RemovedRecord, Result};
pub use session::{OrderLine, QuoteSession, SessionStats, SupplierOrder};
