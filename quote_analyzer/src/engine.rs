//! Lowest-price selection.
//!
//! Groups offers by product and flags every offer matching the product's
//! minimum price. Ties stay tied: two suppliers quoting the same minimum are
//! both flagged.

use log::debug;
use quote_common::{LowestPriceIndex, PriceRecord};
use std::collections::BTreeMap;

/// Builds the lowest-price index for a set of active records.
///
/// The result replaces any previous index; nothing is carried over.
/// Prices are compared exactly, without tolerance.
///
/// # Arguments
/// * `records` - Active offers (removed offers must not be passed in)
///
/// # Returns
/// An index flagging every minimum-price offer per product.
pub fn compute_lowest_prices<'a, I>(records: I) -> LowestPriceIndex
where
    I: IntoIterator<Item = &'a PriceRecord>,
{
    let mut groups: BTreeMap<&str, Vec<&PriceRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.product.as_str()).or_default().push(record);
    }

    let mut index = LowestPriceIndex::new();
    for (product, offers) in &groups {
        let min_price = offers
            .iter()
            .map(|record| record.price)
            .fold(f64::INFINITY, f64::min);

        for record in offers.iter().filter(|record| record.price == min_price) {
            index.mark(record.key());
        }
        debug!("Lowest price for '{product}': {min_price:.2}");
    }

    debug!(
        "Computed lowest prices: {} flagged offers across {} products",
        index.len(),
        groups.len()
    );
    index
}

/// A product won by a supplier, for the per-supplier view
#[derive(Debug, Clone, PartialEq)]
pub struct WinningOffer {
    pub product: String,
    pub price: f64,
    pub quantity: u32,
}

/// Flagged offers grouped by supplier, products sorted by name.
///
/// Suppliers appear in the order given by `supplier_order`; suppliers without a
/// flagged offer are left out.
pub fn lowest_by_supplier<'a, I>(
    records: I,
    index: &LowestPriceIndex,
    supplier_order: &[String],
) -> Vec<(String, Vec<WinningOffer>)>
where
    I: IntoIterator<Item = &'a PriceRecord>,
{
    let mut grouped: BTreeMap<&str, Vec<WinningOffer>> = BTreeMap::new();
    for record in records {
        if index.is_lowest(&record.key()) {
            grouped
                .entry(record.supplier.as_str())
                .or_default()
                .push(WinningOffer {
                    product: record.product.clone(),
                    price: record.price,
                    quantity: record.quantity,
                });
        }
    }

    supplier_order
        .iter()
        .filter_map(|supplier| {
            grouped.remove(supplier.as_str()).map(|mut offers| {
                offers.sort_by(|a, b| a.product.cmp(&b.product));
                (supplier.clone(), offers)
            })
        })
        .collect()
}
