use chrono::NaiveDate;
use extrato_core::{Direction, Transaction};
use extrato_finance::{
    by_category, by_merchant, merchant_overview, to_csv_bytes, totals, Ledger, TransactionFilter,
};

fn statement() -> Vec<Transaction> {
    let d = |day| NaiveDate::from_ymd_opt(2025, 12, day).unwrap();
    vec![
        Transaction::new(d(15), "CREDITO DE SALARIO ACME LTDA", Direction::Credit, 1350.0).unwrap(),
        Transaction::new(d(17), "PIX ENVIADO STRIPE BRASIL SOLUCOES DE", Direction::Debit, 119.90).unwrap(),
        Transaction::new(d(18), "COMPRA CARTAO PADARIA PAO QUENTE", Direction::Debit, 23.50).unwrap(),
        Transaction::new(d(19), "PAGAMENTO DE BOLETO - CONDOMINIO", Direction::Debit, 480.0).unwrap(),
    ]
}

/// Import two months, categorize a merchant between imports, persist, reload and report.
#[test]
fn test_categories_follow_merchants_across_imports() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");

    let mut ledger = Ledger::load(&path).unwrap();
    assert_eq!(ledger.record(statement()), 4);
    ledger.assign_category("CONDOMINIO", "Moradia").unwrap();
    ledger.save(&path).unwrap();

    let mut ledger = Ledger::load(&path).unwrap();
    ledger.record(statement());
    assert_eq!(ledger.len(), 8);

    let moradia = ledger.query(&TransactionFilter {
        category: Some("Moradia".to_string()),
        ..Default::default()
    });
    assert_eq!(moradia.len(), 2);
    assert!(moradia.iter().all(|s| s.transaction.merchant_normalized() == "CONDOMINIO"));

    let all = ledger.query(&TransactionFilter::default());
    let t = totals(&all);
    assert!((t.spent - 2.0 * 623.40).abs() < 1e-9);
    assert_eq!(t.received, 2700.0);

    let merchants = by_merchant(&all);
    assert_eq!(merchants[0].0, "CONDOMINIO");
    assert_eq!(merchants.len(), 3);

    let categories = by_category(&all);
    assert_eq!(categories[0], ("Moradia".to_string(), 960.0));
    assert_eq!(categories[1].0, "Outros");

    let overview = merchant_overview(&ledger);
    assert_eq!(overview.assigned.len(), 1);
    assert_eq!(overview.unassigned.len(), 2);

    let csv = String::from_utf8(to_csv_bytes(&all).unwrap()).unwrap();
    assert_eq!(csv.matches("Moradia").count(), 2);
    assert!(csv.contains("2025-12-17;PIX ENVIADO STRIPE BRASIL SOLUCOES DE;STRIPE BRASIL SOLUCOES DE;debit;119,90;"));
}
