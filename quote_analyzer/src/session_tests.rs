//! Unit tests for the quote session.

use super::*;
use crate::ingest::grid::grid_from_strings;
use crate::ingest::SheetIngestor;

fn sample_session() -> QuoteSession {
    let rows = grid_from_strings(&[
        &["Produto", "Qtd", "Fornecedor A", "Fornecedor B", "Fornecedor C"],
        &["Arroz", "", "10,00", "R$ 9,50", "9,90"],
        &["Feijão", "", "7,00", "8,00", ""],
        &["Óleo", "", "6,50", "6,50", "7,00"],
    ]);
    let ingestion = SheetIngestor::new().ingest_grid(&rows).unwrap();
    QuoteSession::from_ingestion(ingestion)
}

fn key(product: &str, supplier: &str) -> RecordKey {
    RecordKey::new(product, supplier)
}

mod construction_tests {
    use super::*;

    #[test]
    fn flags_lowest_on_start() {
        let session = sample_session();

        assert!(session.is_lowest(&key("Arroz", "Fornecedor B")));
        assert!(!session.is_lowest(&key("Arroz", "Fornecedor A")));
        assert!(session.is_lowest(&key("Feijão", "Fornecedor A")));
        assert!(session.is_lowest(&key("Óleo", "Fornecedor A")));
        assert!(session.is_lowest(&key("Óleo", "Fornecedor B")));
    }

    #[test]
    fn lists_products_and_suppliers() {
        let session = sample_session();

        assert_eq!(session.products(), vec!["Arroz", "Feijão", "Óleo"]);
        assert_eq!(
            session.suppliers(),
            &["Fornecedor A", "Fornecedor B", "Fornecedor C"]
        );
        assert_eq!(session.original().len(), 8);
    }

    #[test]
    fn offers_for_sorts_cheapest_first() {
        let session = sample_session();
        let offers: Vec<_> = session
            .offers_for("Arroz")
            .into_iter()
            .map(|r| r.supplier.as_str())
            .collect();

        assert_eq!(offers, vec!["Fornecedor B", "Fornecedor C", "Fornecedor A"]);
    }

    #[test]
    fn stats_count_lowest_and_winners() {
        let mut session = sample_session();
        session.set_quantity(&key("Arroz", "Fornecedor B"), 2).unwrap();

        let stats = session.stats();

        assert_eq!(stats.products, 3);
        assert_eq!(stats.suppliers, 3);
        assert_eq!(stats.offers, 8);
        assert_eq!(stats.lowest_prices, 4);
        assert_eq!(stats.suppliers_with_lowest, 2);
        assert_eq!(stats.removed, 0);
        assert!((stats.order_total - 19.0).abs() < 1e-9);
    }
}

mod quantity_tests {
    use super::*;

    #[test]
    fn sets_quantity() {
        let mut session = sample_session();
        session.set_quantity(&key("Arroz", "Fornecedor B"), 5).unwrap();

        assert_eq!(session.record(&key("Arroz", "Fornecedor B")).unwrap().quantity, 5);
    }

    #[test]
    fn unknown_offer_is_an_error() {
        let mut session = sample_session();
        let result = session.set_quantity(&key("Feijão", "Fornecedor C"), 1);

        assert!(matches!(result, Err(QuoteError::RecordNotFound { .. })));
    }

    #[test]
    fn supplier_orders_list_quantities_by_supplier() {
        let mut session = sample_session();
        session.set_quantity(&key("Arroz", "Fornecedor B"), 2).unwrap();
        session.set_quantity(&key("Feijão", "Fornecedor A"), 3).unwrap();
        session.set_quantity(&key("Óleo", "Fornecedor B"), 1).unwrap();
        session.set_unit("Arroz", "saco 5kg").unwrap();

        let orders = session.supplier_orders();

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].supplier, "Fornecedor A");
        assert!((orders[0].total() - 21.0).abs() < 1e-9);
        assert_eq!(orders[1].supplier, "Fornecedor B");
        assert_eq!(orders[1].lines.len(), 2);
        assert_eq!(orders[1].lines[0].unit.as_deref(), Some("saco 5kg"));
        assert!((orders[1].total() - 25.5).abs() < 1e-9);
    }
}

mod reassign_tests {
    use super::*;

    #[test]
    fn moves_quantity_and_zeroes_source() {
        let mut session = sample_session();
        session.set_quantity(&key("Arroz", "Fornecedor B"), 4).unwrap();

        session
            .reassign("Arroz", "Fornecedor B", "Fornecedor A", 0.0)
            .unwrap();

        assert_eq!(session.record(&key("Arroz", "Fornecedor A")).unwrap().quantity, 4);
        assert_eq!(session.record(&key("Arroz", "Fornecedor B")).unwrap().quantity, 0);
    }

    #[test]
    fn existing_target_keeps_its_price() {
        let mut session = sample_session();

        session
            .reassign("Arroz", "Fornecedor B", "Fornecedor A", 1.0)
            .unwrap();

        assert_eq!(session.record(&key("Arroz", "Fornecedor A")).unwrap().price, 10.0);
        assert!(session.is_lowest(&key("Arroz", "Fornecedor B")));
    }

    #[test]
    fn round_trip_restores_quantity_and_flags() {
        let mut session = sample_session();
        session.set_quantity(&key("Arroz", "Fornecedor B"), 4).unwrap();
        let before = session.clone();

        session
            .reassign("Arroz", "Fornecedor B", "Fornecedor A", 10.0)
            .unwrap();
        session
            .reassign("Arroz", "Fornecedor A", "Fornecedor B", 9.5)
            .unwrap();

        assert_eq!(session.record(&key("Arroz", "Fornecedor B")).unwrap().quantity, 4);
        assert_eq!(session.lowest_prices(), before.lowest_prices());
        assert_eq!(session, before);
    }

    #[test]
    fn same_supplier_is_a_no_op() {
        let mut session = sample_session();
        session.set_quantity(&key("Arroz", "Fornecedor B"), 4).unwrap();
        let before = session.clone();

        session
            .reassign("Arroz", "Fornecedor B", "Fornecedor B", 1.0)
            .unwrap();

        assert_eq!(session, before);
    }

    #[test]
    fn missing_target_is_synthesized() {
        let mut session = sample_session();
        session.set_quantity(&key("Feijão", "Fornecedor A"), 2).unwrap();

        session
            .reassign("Feijão", "Fornecedor A", "Fornecedor C", 6.0)
            .unwrap();

        let created = session.record(&key("Feijão", "Fornecedor C")).unwrap();
        assert_eq!(created.price, 6.0);
        assert_eq!(created.quantity, 2);
        assert!(session.is_lowest(&key("Feijão", "Fornecedor C")));
        assert!(!session.is_lowest(&key("Feijão", "Fornecedor A")));
    }

    #[test]
    fn unknown_target_supplier_is_added() {
        let mut session = sample_session();

        session
            .reassign("Arroz", "Fornecedor B", "Atacadão", 9.0)
            .unwrap();

        assert_eq!(session.suppliers().last().map(String::as_str), Some("Atacadão"));
    }

    #[test]
    fn synthesized_target_needs_positive_price() {
        let mut session = sample_session();

        let result = session.reassign("Feijão", "Fornecedor A", "Fornecedor C", 0.0);

        assert!(matches!(result, Err(QuoteError::InvalidPrice(_))));
        assert!(session.record(&key("Feijão", "Fornecedor C")).is_none());
    }

    #[test]
    fn missing_source_is_an_error() {
        let mut session = sample_session();

        let result = session.reassign("Feijão", "Fornecedor C", "Fornecedor A", 7.0);

        assert!(matches!(result, Err(QuoteError::RecordNotFound { .. })));
    }
}

mod removal_tests {
    use super::*;

    #[test]
    fn removal_promotes_next_cheapest() {
        let mut session = sample_session();

        session.remove(&key("Arroz", "Fornecedor B")).unwrap();

        assert!(session.record(&key("Arroz", "Fornecedor B")).is_none());
        assert!(!session.is_lowest(&key("Arroz", "Fornecedor B")));
        assert!(session.is_lowest(&key("Arroz", "Fornecedor C")));
        assert_eq!(session.removed().len(), 1);
    }

    #[test]
    fn removal_keeps_quantity_snapshot() {
        let mut session = sample_session();
        session.set_quantity(&key("Arroz", "Fornecedor B"), 3).unwrap();

        session.remove(&key("Arroz", "Fornecedor B")).unwrap();

        let entry = &session.removed()[0];
        assert_eq!(entry.record.quantity, 3);
        assert_eq!(entry.record.price, 9.5);
    }

    #[test]
    fn remove_then_restore_round_trips() {
        let mut session = sample_session();
        session.set_quantity(&key("Arroz", "Fornecedor B"), 3).unwrap();
        let before = session.clone();

        session.remove(&key("Arroz", "Fornecedor B")).unwrap();
        session.restore(&key("Arroz", "Fornecedor B")).unwrap();

        assert_eq!(session, before);
    }

    #[test]
    fn removing_unknown_offer_fails() {
        let mut session = sample_session();
        let result = session.remove(&key("Feijão", "Fornecedor C"));
        assert!(matches!(result, Err(QuoteError::RecordNotFound { .. })));
    }

    #[test]
    fn restoring_offer_that_was_not_removed_fails() {
        let mut session = sample_session();
        let result = session.restore(&key("Arroz", "Fornecedor A"));
        assert!(matches!(result, Err(QuoteError::NotRemoved { .. })));
    }

    #[test]
    fn restore_does_not_duplicate_active_offer() {
        let mut session = sample_session();
        session.remove(&key("Feijão", "Fornecedor B")).unwrap();
        session
            .reassign("Feijão", "Fornecedor A", "Fornecedor B", 5.0)
            .unwrap();

        session.restore(&key("Feijão", "Fornecedor B")).unwrap();

        assert_eq!(session.record(&key("Feijão", "Fornecedor B")).unwrap().price, 5.0);
        assert!(session.removed().is_empty());
    }

    #[test]
    fn removing_every_offer_of_product_drops_it() {
        let mut session = sample_session();
        session.remove(&key("Feijão", "Fornecedor A")).unwrap();
        session.remove(&key("Feijão", "Fornecedor B")).unwrap();

        assert_eq!(session.products(), vec!["Arroz", "Óleo"]);
        assert!(session.lowest_prices().iter().all(|k| k.product != "Feijão"));
    }
}

mod reset_tests {
    use super::*;

    #[test]
    fn reset_discards_all_changes() {
        let pristine = sample_session();
        let mut session = pristine.clone();

        session.set_quantity(&key("Arroz", "Fornecedor B"), 3).unwrap();
        session.remove(&key("Feijão", "Fornecedor A")).unwrap();
        session
            .reassign("Arroz", "Fornecedor B", "Atacadão", 9.0)
            .unwrap();
        session.mark_finished("Fornecedor A").unwrap();
        session.set_unit("Arroz", "kg").unwrap();

        session.reset();

        assert_eq!(session, pristine);
    }
}

mod side_state_tests {
    use super::*;

    #[test]
    fn units_are_set_and_cleared() {
        let mut session = sample_session();

        session.set_unit("Arroz", " kg ").unwrap();
        assert_eq!(session.unit("Arroz"), Some("kg"));

        session.set_unit("Arroz", "").unwrap();
        assert_eq!(session.unit("Arroz"), None);

        session.set_unit("Arroz", "cx").unwrap();
        session.clear_unit("Arroz").unwrap();
        assert_eq!(session.unit("Arroz"), None);
    }

    #[test]
    fn unit_for_unknown_product_fails() {
        let mut session = sample_session();
        let result = session.set_unit("Macarrão", "pct");
        assert!(matches!(result, Err(QuoteError::UnknownProduct(_))));
    }

    #[test]
    fn unit_survives_removal_of_offers() {
        let mut session = sample_session();
        session.remove(&key("Feijão", "Fornecedor A")).unwrap();
        session.remove(&key("Feijão", "Fornecedor B")).unwrap();

        session.set_unit("Feijão", "kg").unwrap();
        assert_eq!(session.unit("Feijão"), Some("kg"));
    }

    #[test]
    fn finished_flags_toggle() {
        let mut session = sample_session();

        session.mark_finished("Fornecedor B").unwrap();
        assert!(session.is_finished("Fornecedor B"));

        session.unmark_finished("Fornecedor B").unwrap();
        assert!(!session.is_finished("Fornecedor B"));
    }

    #[test]
    fn finishing_unknown_supplier_fails() {
        let mut session = sample_session();
        let result = session.mark_finished("Fornecedor Z");
        assert!(matches!(result, Err(QuoteError::UnknownSupplier(_))));
    }
}
