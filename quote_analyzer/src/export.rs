//! Price grid export.
//!
//! Writes a semicolon-separated product × supplier grid with comma decimals.
//! Cells holding the lowest price for their product end with ` *`. The
//! exported file can be loaded again: its metadata headers are classified as
//! system columns and the marker is ignored by the price parser.

use log::info;
use quote_common::{QuoteError, RecordKey, Result};
use std::io::Write;
use std::path::Path;

use crate::session::QuoteSession;
use crate::share::format_decimal;

/// Marker appended to lowest-price cells
pub const LOWEST_MARKER: &str = " *";

/// Writes the price grid of the session's active offers.
///
/// # Arguments
/// * `session` - Session to export
/// * `writer` - Destination for the CSV bytes
pub fn write_price_grid<W: Write>(session: &QuoteSession, writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().delimiter(b';').from_writer(writer);

    let mut header = vec![
        "Produto".to_string(),
        "Unidade".to_string(),
        "Quantidade".to_string(),
    ];
    header.extend(session.suppliers().iter().cloned());
    csv_writer.write_record(&header).map_err(csv_error)?;

    for product in session.products() {
        let quantity: u32 = session
            .offers_for(product)
            .iter()
            .map(|record| record.quantity)
            .sum();

        let mut row = vec![
            product.to_string(),
            session.unit(product).unwrap_or_default().to_string(),
            quantity.to_string(),
        ];

        for supplier in session.suppliers() {
            let key = RecordKey::new(product, supplier.as_str());
            let cell = match session.record(&key) {
                Some(record) if session.is_lowest(&key) => {
                    format!("{}{}", format_decimal(record.price), LOWEST_MARKER)
                }
                Some(record) => format_decimal(record.price),
                None => String::new(),
            };
            row.push(cell);
        }

        csv_writer.write_record(&row).map_err(csv_error)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes the price grid to a file, replacing it if present.
pub fn export_to_path<P: AsRef<Path>>(session: &QuoteSession, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)?;
    write_price_grid(session, file)?;

    info!(
        "Exported {} products x {} suppliers to {}",
        session.products().len(),
        session.suppliers().len(),
        path.display()
    );
    Ok(())
}

fn csv_error(err: csv::Error) -> QuoteError {
    QuoteError::Csv(err.to_string())
}
