//! Plain-text summaries for pasting into a chat or e-mail.

use crate::session::{QuoteSession, SupplierOrder};

/// Formats a value with two decimals and a comma separator ("1234,50")
pub fn format_decimal(value: f64) -> String {
    format!("{value:.2}").replace('.', ",")
}

/// Formats a value as Brazilian currency ("R$ 1234,50")
pub fn format_brl(value: f64) -> String {
    format!("R$ {}", format_decimal(value))
}

/// Formats one supplier order.
///
/// ```text
/// *Fornecedor B*
/// - 2 kg Arroz x R$ 9,50 = R$ 19,00
/// Total: R$ 19,00
/// ```
pub fn format_supplier_order(order: &SupplierOrder) -> String {
    let mut output = String::new();

    if order.finished {
        output.push_str(&format!("*{}* (finalizado)\n", order.supplier));
    } else {
        output.push_str(&format!("*{}*\n", order.supplier));
    }

    for line in &order.lines {
        let quantity = match &line.unit {
            Some(unit) => format!("{} {}", line.quantity, unit),
            None => line.quantity.to_string(),
        };
        output.push_str(&format!(
            "- {quantity} {} x {} = {}\n",
            line.product,
            format_brl(line.price),
            format_brl(line.total)
        ));
    }

    output.push_str(&format!("Total: {}\n", format_brl(order.total())));
    output
}

/// Formats every supplier order, optionally restricted to one supplier.
///
/// Returns an empty string when nothing has a quantity.
pub fn format_orders(session: &QuoteSession, supplier: Option<&str>) -> String {
    let orders: Vec<SupplierOrder> = session
        .supplier_orders()
        .into_iter()
        .filter(|order| supplier.map_or(true, |name| order.supplier == name))
        .collect();

    if orders.is_empty() {
        return String::new();
    }

    let total: f64 = orders.iter().map(SupplierOrder::total).sum();
    let mut output = orders
        .iter()
        .map(format_supplier_order)
        .collect::<Vec<_>>()
        .join("\n");

    if orders.len() > 1 {
        output.push_str(&format!("\nTotal geral: {}\n", format_brl(total)));
    }
    output
}

/// Lists the products each supplier wins on price.
pub fn format_lowest_prices(session: &QuoteSession) -> String {
    let mut output = String::new();

    for (supplier, offers) in session.lowest_by_supplier() {
        output.push_str(&format!(
            "{supplier} ({} menores preços)\n",
            offers.len()
        ));
        for offer in offers {
            output.push_str(&format!(
                "    {} - {}\n",
                offer.product,
                format_brl(offer.price)
            ));
        }
    }

    output
}
