//! Spreadsheet decoding into a rectangular cell grid.
//!
//! Workbooks (xlsx, xls, xlsb, ods) are decoded with calamine, CSV exports with
//! the csv crate. Only the first worksheet is read.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use log::{debug, info, warn};
use quote_common::{QuoteError, Result};
use std::io::Cursor;
use std::path::Path;

/// Extensions decoded as workbooks
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// A single spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    /// Cell content as the spreadsheet would display it, untrimmed
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(text) => text.clone(),
            Cell::Number(value) => format_number(*value),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(text) => text.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// Builds a grid from string rows; empty strings become [`Cell::Empty`].
pub fn grid_from_strings(rows: &[&[&str]]) -> Vec<Vec<Cell>> {
    rows.iter()
        .map(|row| row.iter().map(|value| Cell::from(*value)).collect())
        .collect()
}

/// Integral values print without a fractional part ("12" rather than "12.0")
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Reads a spreadsheet file and decodes its first sheet.
///
/// Reading the bytes is the only asynchronous step; decoding runs inline.
///
/// # Arguments
/// * `path` - Path to a `.xlsx`, `.xlsm`, `.xls`, `.xlsb`, `.ods` or `.csv` file
///
/// # Returns
/// Non-empty rows of the first sheet, header row first.
pub async fn load_grid<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<Cell>>> {
    let path = path.as_ref();
    let extension = file_extension(path);
    info!("Loading spreadsheet: {}", path.display());

    if extension != "csv" && !WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
        warn!("Rejected file with extension '{extension}'");
        return Err(QuoteError::UnsupportedFormat(format!(".{extension}")));
    }

    let bytes = tokio::fs::read(path).await?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());

    decode_grid(bytes, &extension)
}

/// Decodes raw file bytes according to the (lowercase) extension.
pub fn decode_grid(bytes: Vec<u8>, extension: &str) -> Result<Vec<Vec<Cell>>> {
    let rows = if extension == "csv" {
        decode_csv(&bytes)?
    } else if WORKBOOK_EXTENSIONS.contains(&extension) {
        decode_workbook(bytes)?
    } else {
        return Err(QuoteError::UnsupportedFormat(format!(".{extension}")));
    };

    let total = rows.len();
    let rows: Vec<Vec<Cell>> = rows
        .into_iter()
        .filter(|row| row.iter().any(|cell| !cell.is_blank()))
        .collect();

    if rows.is_empty() {
        warn!("Spreadsheet contains no data");
        return Err(QuoteError::EmptySheet);
    }

    debug!("Kept {} of {} rows after dropping blank rows", rows.len(), total);
    Ok(rows)
}

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default()
}

fn decode_workbook(bytes: Vec<u8>) -> Result<Vec<Vec<Cell>>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| QuoteError::Workbook(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(QuoteError::EmptySheet)?;
    debug!("Reading worksheet '{sheet_name}'");

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| QuoteError::Workbook(e.to_string()))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect())
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(text) => Cell::from(text.as_str()),
        Data::Float(value) => Cell::Number(*value),
        Data::Int(value) => Cell::Number(*value as f64),
        other => Cell::Text(other.to_string()),
    }
}

fn decode_csv(bytes: &[u8]) -> Result<Vec<Vec<Cell>>> {
    let delimiter = sniff_delimiter(bytes);
    debug!("Using CSV delimiter '{}'", delimiter as char);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| QuoteError::Csv(e.to_string()))?;
        rows.push(record.iter().map(Cell::from).collect());
    }

    Ok(rows)
}

/// Semicolon when the header line has more `;` than `,` (spreadsheet exports
/// in comma-decimal locales), otherwise comma.
fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let header = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
    let semicolons = header.iter().filter(|b| **b == b';').count();
    let commas = header.iter().filter(|b| **b == b',').count();

    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

#[cfg(test)]
#[path = "grid_tests.rs"]
mod tests;
