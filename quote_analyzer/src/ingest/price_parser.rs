//! Price string normalization.
//!
//! Quote spreadsheets mix Brazilian ("R$ 1.234,56") and international
//! ("1,234.56") formatting, sometimes in the same column. This is the only
//! place where that ambiguity is resolved.

use log::debug;

use super::grid::Cell;

/// Parses a price string, handling currency markers and both separator styles.
///
/// Returns `None` when no number can be recovered (the NaN case).
///
/// # Arguments
/// * `raw` - A price as typed in a cell (e.g., "R$ 1.234,56", "12,50", "1,234.56")
///
/// # Returns
/// The parsed value. Sign and magnitude are not validated here; callers decide
/// which values are acceptable.
pub fn parse_price(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return None;
    }

    let stripped: String = raw
        .chars()
        .filter(|c| *c != 'R' && *c != '$' && !c.is_whitespace())
        .collect();

    if let Ok(value) = stripped.parse::<f64>() {
        debug!("Parsed price '{raw}' directly: {value}");
        return value.is_finite().then_some(value);
    }

    if is_radix_literal(&stripped) {
        // Accepted as a number, but only the leading "0" is a decimal value
        let result = parse_leading_float(&stripped);
        debug!("Parsed price '{raw}' as radix literal: {result:?}");
        return result;
    }

    let numeric: String = stripped
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();
    let normalized = normalize_separators(&numeric);
    let result = parse_leading_float(&normalized);

    debug!("Parsed price '{raw}' via '{normalized}': {result:?}");
    result
}

/// Parses a spreadsheet cell as a price.
///
/// Numeric cells are used as-is; text cells go through [`parse_price`].
pub fn parse_price_cell(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Empty => None,
        Cell::Number(value) if value.is_finite() => Some(*value),
        Cell::Number(_) => None,
        Cell::Text(text) => parse_price(text.trim()),
    }
}

/// Rewrites a digits/comma/period string so that `.` is the only separator
/// and it marks the decimal part.
fn normalize_separators(numeric: &str) -> String {
    let last_comma = numeric.rfind(',');
    let last_period = numeric.rfind('.');

    match (last_comma, last_period) {
        (Some(comma), Some(period)) if comma > period => {
            // 1.234,56; only the first comma becomes the decimal point
            numeric.replace('.', "").replacen(',', ".", 1)
        }
        (Some(_), Some(_)) => {
            // 1,234.56
            numeric.replace(',', "")
        }
        (Some(comma), None) => {
            let decimals = &numeric[comma + 1..];
            if decimals.len() <= 2 {
                rewrite_decimal(numeric, ',')
            } else {
                numeric.replace(',', "")
            }
        }
        _ => numeric.to_string(),
    }
}

/// Keeps the last `separator` as the decimal point and drops the others.
fn rewrite_decimal(numeric: &str, separator: char) -> String {
    match numeric.rfind(separator) {
        Some(pos) => {
            let integer_part = numeric[..pos].replace(separator, "");
            format!("{}.{}", integer_part, &numeric[pos + 1..])
        }
        None => numeric.to_string(),
    }
}

/// `0x1A`, `0o17` or `0b101`: an unsigned integer literal in base 16, 8 or 2.
fn is_radix_literal(s: &str) -> bool {
    let radix = match s.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => return false,
    };
    let digits = &s[2..];
    !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix))
}

/// Reads the longest `-?digits(.digits)?` prefix, ignoring trailing garbage.
fn parse_leading_float(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;

    if bytes.first() == Some(&b'-') {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    s[..end].parse::<f64>().ok()
}

#[cfg(test)]
#[path = "price_parser_tests.rs"]
mod tests;
