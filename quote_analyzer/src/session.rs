//! Quote session: the single owner of all mutable quote state.
//!
//! Holds the active offers, the removed list, finished suppliers, custom units
//! and the original ingested snapshot. Every mutation goes through a method
//! here and ends with a fresh lowest-price index.

use log::{debug, info, warn};
use quote_common::{LowestPriceIndex, PriceRecord, QuoteError, RecordKey, RemovedRecord, Result};
use std::collections::{BTreeMap, BTreeSet};

use crate::engine::{self, WinningOffer};
use crate::ingest::Ingestion;

/// Summary counters for a session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    pub products: usize,
    pub suppliers: usize,
    pub offers: usize,
    pub lowest_prices: usize,
    /// Suppliers holding at least one lowest price
    pub suppliers_with_lowest: usize,
    pub removed: usize,
    /// Sum of price * quantity over active offers
    pub order_total: f64,
}

/// One product line of a supplier order
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub product: String,
    pub quantity: u32,
    pub unit: Option<String>,
    pub price: f64,
    pub total: f64,
    pub is_lowest: bool,
}

/// Everything to be ordered from one supplier
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierOrder {
    pub supplier: String,
    pub finished: bool,
    pub lines: Vec<OrderLine>,
}

impl SupplierOrder {
    pub fn total(&self) -> f64 {
        self.lines.iter().map(|line| line.total).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteSession {
    pub(crate) suppliers: Vec<String>,
    pub(crate) records: BTreeMap<RecordKey, PriceRecord>,
    pub(crate) removed: Vec<RemovedRecord>,
    pub(crate) finished: BTreeSet<String>,
    pub(crate) units: BTreeMap<String, String>,
    pub(crate) original_suppliers: Vec<String>,
    pub(crate) original: Vec<PriceRecord>,
    pub(crate) lowest: LowestPriceIndex,
}

impl QuoteSession {
    /// Starts a session from a successful ingestion.
    pub fn from_ingestion(ingestion: Ingestion) -> Self {
        let records: BTreeMap<RecordKey, PriceRecord> = ingestion
            .records
            .iter()
            .map(|record| (record.key(), record.clone()))
            .collect();

        let mut session = Self {
            suppliers: ingestion.suppliers.clone(),
            records,
            removed: Vec::new(),
            finished: BTreeSet::new(),
            units: BTreeMap::new(),
            original_suppliers: ingestion.suppliers,
            original: ingestion.records,
            lowest: LowestPriceIndex::new(),
        };
        session.recompute();

        info!(
            "Started session: {} offers, {} products, {} suppliers",
            session.records.len(),
            session.products().len(),
            session.suppliers.len()
        );
        session
    }

    /// Rebuilds the lowest-price index from the active offers.
    pub(crate) fn recompute(&mut self) {
        self.lowest = engine::compute_lowest_prices(self.records.values());
    }

    // ==================== Queries ====================

    /// Supplier names in spreadsheet column order
    pub fn suppliers(&self) -> &[String] {
        &self.suppliers
    }

    /// Distinct products with at least one active offer, sorted
    pub fn products(&self) -> Vec<&str> {
        let products: BTreeSet<&str> = self.records.keys().map(|key| key.product.as_str()).collect();
        products.into_iter().collect()
    }

    /// Active offers in key order
    pub fn records(&self) -> impl Iterator<Item = &PriceRecord> {
        self.records.values()
    }

    pub fn record(&self, key: &RecordKey) -> Option<&PriceRecord> {
        self.records.get(key)
    }

    pub fn removed(&self) -> &[RemovedRecord] {
        &self.removed
    }

    pub fn lowest_prices(&self) -> &LowestPriceIndex {
        &self.lowest
    }

    pub fn is_lowest(&self, key: &RecordKey) -> bool {
        self.lowest.is_lowest(key)
    }

    pub fn is_finished(&self, supplier: &str) -> bool {
        self.finished.contains(supplier)
    }

    pub fn finished_suppliers(&self) -> impl Iterator<Item = &str> {
        self.finished.iter().map(String::as_str)
    }

    pub fn unit(&self, product: &str) -> Option<&str> {
        self.units.get(product).map(String::as_str)
    }

    /// Offers as originally ingested
    pub fn original(&self) -> &[PriceRecord] {
        &self.original
    }

    /// Active offers for one product, cheapest first
    pub fn offers_for(&self, product: &str) -> Vec<&PriceRecord> {
        let mut offers: Vec<&PriceRecord> = self
            .records
            .values()
            .filter(|record| record.product == product)
            .collect();
        offers.sort_by(|a, b| a.price.total_cmp(&b.price));
        offers
    }

    /// Flagged offers grouped by supplier
    pub fn lowest_by_supplier(&self) -> Vec<(String, Vec<WinningOffer>)> {
        engine::lowest_by_supplier(self.records.values(), &self.lowest, &self.suppliers)
    }

    pub fn stats(&self) -> SessionStats {
        let suppliers_with_lowest: BTreeSet<&str> = self
            .lowest
            .iter()
            .map(|key| key.supplier.as_str())
            .collect();

        SessionStats {
            products: self.products().len(),
            suppliers: self.suppliers.len(),
            offers: self.records.len(),
            lowest_prices: self.lowest.len(),
            suppliers_with_lowest: suppliers_with_lowest.len(),
            removed: self.removed.len(),
            order_total: self.records.values().map(PriceRecord::total_price).sum(),
        }
    }

    /// Offers with a quantity, grouped by supplier in column order.
    pub fn supplier_orders(&self) -> Vec<SupplierOrder> {
        self.suppliers
            .iter()
            .filter_map(|supplier| {
                let lines: Vec<OrderLine> = self
                    .records
                    .values()
                    .filter(|record| &record.supplier == supplier && record.quantity > 0)
                    .map(|record| OrderLine {
                        product: record.product.clone(),
                        quantity: record.quantity,
                        unit: self.units.get(&record.product).cloned(),
                        price: record.price,
                        total: record.total_price(),
                        is_lowest: self.lowest.is_lowest(&record.key()),
                    })
                    .collect();

                if lines.is_empty() {
                    None
                } else {
                    Some(SupplierOrder {
                        supplier: supplier.clone(),
                        finished: self.finished.contains(supplier),
                        lines,
                    })
                }
            })
            .collect()
    }

    // ==================== Mutations ====================

    /// Sets the order quantity of an active offer.
    pub fn set_quantity(&mut self, key: &RecordKey, quantity: u32) -> Result<()> {
        let record = self.records.get_mut(key).ok_or_else(|| not_found(key))?;
        record.quantity = quantity;
        debug!("Quantity for {key} set to {quantity}");
        self.recompute();
        Ok(())
    }

    /// Moves a product's order from one supplier to another.
    ///
    /// The target receives the source quantity and the source is zeroed. If the
    /// target has no active offer, one is created at `new_price` with zero
    /// quantity before the move. An existing target keeps its own price.
    ///
    /// # Arguments
    /// * `product` - Product being moved
    /// * `from` - Supplier currently holding the order
    /// * `to` - Supplier receiving the order
    /// * `new_price` - Price used only when the target offer must be created
    pub fn reassign(&mut self, product: &str, from: &str, to: &str, new_price: f64) -> Result<()> {
        if from == to {
            debug!("Reassign of '{product}' to the same supplier '{from}', nothing to do");
            return Ok(());
        }

        let from_key = RecordKey::new(product, from);
        let to_key = RecordKey::new(product, to);

        let quantity = self
            .records
            .get(&from_key)
            .map(|record| record.quantity)
            .ok_or_else(|| not_found(&from_key))?;

        if !self.records.contains_key(&to_key) {
            if !new_price.is_finite() || new_price <= 0.0 {
                return Err(QuoteError::InvalidPrice(new_price));
            }
            warn!("No offer for {to_key}, creating one at {new_price:.2}");
            self.records
                .insert(to_key.clone(), PriceRecord::new(product, to, new_price, 0));
            if !self.suppliers.iter().any(|supplier| supplier == to) {
                self.suppliers.push(to.to_string());
            }
        }

        if let Some(target) = self.records.get_mut(&to_key) {
            target.quantity = quantity;
        }
        if let Some(source) = self.records.get_mut(&from_key) {
            source.quantity = 0;
        }

        self.recompute();
        info!("Moved '{product}' (quantity {quantity}) from '{from}' to '{to}'");
        Ok(())
    }

    /// Takes an offer out of the active set.
    ///
    /// The offer no longer competes for the lowest price, which may promote
    /// another supplier for that product.
    pub fn remove(&mut self, key: &RecordKey) -> Result<()> {
        let record = self.records.remove(key).ok_or_else(|| not_found(key))?;
        self.removed.retain(|entry| &entry.key() != key);
        self.removed.push(RemovedRecord::new(record));

        self.recompute();
        info!("Removed offer {key}");
        Ok(())
    }

    /// Puts a removed offer back into the active set.
    ///
    /// If an offer with the same key became active in the meantime, it is kept
    /// and the removed entry is only discarded.
    pub fn restore(&mut self, key: &RecordKey) -> Result<()> {
        let position = self
            .removed
            .iter()
            .position(|entry| &entry.key() == key)
            .ok_or_else(|| QuoteError::NotRemoved {
                product: key.product.clone(),
                supplier: key.supplier.clone(),
            })?;

        let entry = self.removed.remove(position);
        if self.records.contains_key(key) {
            warn!("Offer {key} is already active, dropping removed copy");
        } else {
            self.records.insert(key.clone(), entry.record);
        }

        self.recompute();
        info!("Restored offer {key}");
        Ok(())
    }

    /// Discards every change and returns to the ingested offers.
    pub fn reset(&mut self) {
        self.records = self
            .original
            .iter()
            .map(|record| (record.key(), record.clone()))
            .collect();
        self.suppliers = self.original_suppliers.clone();
        self.removed.clear();
        self.finished.clear();
        self.units.clear();

        self.recompute();
        info!("Session reset to {} original offers", self.records.len());
    }

    /// Sets the unit label shown for a product (e.g. "kg", "cx").
    ///
    /// A blank unit clears the label.
    pub fn set_unit(&mut self, product: &str, unit: &str) -> Result<()> {
        if !self.knows_product(product) {
            return Err(QuoteError::UnknownProduct(product.to_string()));
        }

        let unit = unit.trim();
        if unit.is_empty() {
            self.units.remove(product);
            debug!("Cleared unit for '{product}'");
        } else {
            self.units.insert(product.to_string(), unit.to_string());
            debug!("Unit for '{product}' set to '{unit}'");
        }
        Ok(())
    }

    pub fn clear_unit(&mut self, product: &str) -> Result<()> {
        self.set_unit(product, "")
    }

    /// Marks a supplier's order as done.
    pub fn mark_finished(&mut self, supplier: &str) -> Result<()> {
        self.ensure_supplier(supplier)?;
        self.finished.insert(supplier.to_string());
        info!("Supplier '{supplier}' marked as finished");
        Ok(())
    }

    pub fn unmark_finished(&mut self, supplier: &str) -> Result<()> {
        self.ensure_supplier(supplier)?;
        self.finished.remove(supplier);
        info!("Supplier '{supplier}' marked as open");
        Ok(())
    }

    fn knows_product(&self, product: &str) -> bool {
        self.records.keys().any(|key| key.product == product)
            || self.removed.iter().any(|entry| entry.record.product == product)
    }

    fn ensure_supplier(&self, supplier: &str) -> Result<()> {
        if self.suppliers.iter().any(|name| name == supplier) {
            Ok(())
        } else {
            Err(QuoteError::UnknownSupplier(supplier.to_string()))
        }
    }
}

fn not_found(key: &RecordKey) -> QuoteError {
    QuoteError::RecordNotFound {
        product: key.product.clone(),
        supplier: key.supplier.clone(),
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
