//! Header classification: which columns hold quantities, which are metadata,
//! and which are supplier price columns.
//!
//! Matching is case-insensitive substring matching. A supplier whose name
//! contains a keyword ("Data Express" contains "data") is treated as metadata,
//! and the single-letter quantity keyword "q" makes the first header holding
//! that letter ("Quitanda Boa") the quantity column. Both are known
//! limitations of the heuristic.

use log::debug;

/// Headers that mark the quantity column
pub const QUANTITY_KEYWORDS: &[&str] = &[
    "quantidade",
    "qtd",
    "qtde",
    "quantity",
    "qty",
    "unidade",
    "unidades",
    "qnt",
    "quant",
    "q",
];

/// Headers that are never supplier names
pub const SYSTEM_KEYWORDS: &[&str] = &[
    // product
    "produto", "product", "item", "nome", "descrição", "descricao", "desc",
    // quantity
    "quantidade", "qtd", "qtde", "quantity", "qty", "unidade", "unidades", "qnt",
    // code
    "código", "codigo", "id", "sku", "referencia", "ref",
    // price
    "preço", "price", "valor", "custo", "cost", "total", "subtotal",
    // status
    "status", "situacao", "ativo", "inativo", "disponivel",
    // category / brand
    "categoria", "category", "tipo", "marca", "brand",
    // measure
    "peso", "weight", "volume", "medida", "measure",
    // date
    "data", "date", "criado", "created", "atualizado", "updated",
];

/// Decides what a header column holds.
pub trait ColumnClassifier {
    /// True if the header names the quantity column
    fn is_quantity_header(&self, header: &str) -> bool;

    /// True if the header is metadata rather than a supplier
    fn is_system_header(&self, header: &str) -> bool;
}

/// Keyword-list classifier used by default
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    quantity_keywords: Vec<String>,
    system_keywords: Vec<String>,
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self {
            quantity_keywords: QUANTITY_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            system_keywords: SYSTEM_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl KeywordClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds keywords that mark metadata columns on top of the defaults.
    ///
    /// Blank keywords are ignored; they would match every header.
    pub fn with_system_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() && !self.system_keywords.contains(&keyword) {
                debug!("Adding system keyword '{keyword}'");
                self.system_keywords.push(keyword);
            }
        }
        self
    }

    fn matches_any(header: &str, keywords: &[String]) -> bool {
        let header = header.to_lowercase();
        keywords.iter().any(|keyword| header.contains(keyword.as_str()))
    }
}

impl ColumnClassifier for KeywordClassifier {
    fn is_quantity_header(&self, header: &str) -> bool {
        Self::matches_any(header, &self.quantity_keywords)
    }

    fn is_system_header(&self, header: &str) -> bool {
        Self::matches_any(header, &self.system_keywords)
    }
}

/// Index of the quantity column, skipping the product column (index 0).
pub fn find_quantity_column(headers: &[String], classifier: &dyn ColumnClassifier) -> Option<usize> {
    headers
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, header)| classifier.is_quantity_header(header))
        .map(|(index, _)| index)
}

/// Supplier names in column order, with the column each one is read from.
///
/// Skips the product column, the quantity column, blank headers and system
/// headers. A repeated supplier header keeps its first column.
pub fn detect_suppliers(
    headers: &[String],
    quantity_column: Option<usize>,
    classifier: &dyn ColumnClassifier,
) -> Vec<(String, usize)> {
    let mut suppliers: Vec<(String, usize)> = Vec::new();

    for (index, header) in headers.iter().enumerate() {
        if index == 0 || Some(index) == quantity_column || header.is_empty() {
            continue;
        }

        if classifier.is_system_header(header) {
            debug!("Ignoring system column '{header}' (column {index})");
            continue;
        }

        if suppliers.iter().any(|(name, _)| name == header) {
            debug!("Supplier '{header}' repeated in column {index}, keeping first column");
            continue;
        }

        debug!("Detected supplier '{header}' (column {index})");
        suppliers.push((header.clone(), index));
    }

    suppliers
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
