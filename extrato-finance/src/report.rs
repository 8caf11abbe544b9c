//! Totals and breakdowns over queried ledger records.

use std::collections::HashMap;

use serde::Serialize;

use crate::ledger::{Ledger, StoredTransaction, UNCATEGORIZED};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub spent: f64,
    pub received: f64,
    /// `received - spent`
    pub balance: f64,
}

pub fn totals(rows: &[&StoredTransaction]) -> Totals {
    let mut t = Totals::default();
    for row in rows {
        let txn = &row.transaction;
        if txn.is_debit() {
            t.spent += txn.amount();
        } else {
            t.received += txn.amount();
        }
    }
    t.balance = t.received - t.spent;
    t
}

/// Running totals that remember first-seen key order, so the final
/// stable sort breaks ties in encounter order.
#[derive(Debug, Default)]
struct Tally {
    index: HashMap<String, usize>,
    entries: Vec<(String, f64)>,
}

impl Tally {
    fn add(&mut self, key: &str, amount: f64) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += amount,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), amount));
            }
        }
    }

    fn into_sorted(self) -> Vec<(String, f64)> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        entries
    }
}

/// Debit totals per merchant, largest first.
pub fn by_merchant(rows: &[&StoredTransaction]) -> Vec<(String, f64)> {
    let mut tally = Tally::default();
    for row in rows.iter().filter(|r| r.transaction.is_debit()) {
        tally.add(row.transaction.merchant_normalized(), row.transaction.amount());
    }
    tally.into_sorted()
}

/// Debit totals per category, largest first; uncategorized as "Outros".
pub fn by_category(rows: &[&StoredTransaction]) -> Vec<(String, f64)> {
    let mut tally = Tally::default();
    for row in rows.iter().filter(|r| r.transaction.is_debit()) {
        let category = row.transaction.category().unwrap_or(UNCATEGORIZED);
        tally.add(category, row.transaction.amount());
    }
    tally.into_sorted()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MerchantSummary {
    pub merchant: String,
    pub total: f64,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MerchantOverview {
    pub assigned: Vec<MerchantSummary>,
    pub unassigned: Vec<MerchantSummary>,
}

/// Every merchant with debits in the ledger, split by whether it has a category.
///
/// The remembered category wins; otherwise the greatest category label
/// stored on any of the merchant's transactions is used.
pub fn merchant_overview(ledger: &Ledger) -> MerchantOverview {
    let debits: Vec<&StoredTransaction> = ledger
        .transactions()
        .iter()
        .filter(|s| s.transaction.is_debit())
        .collect();

    let mut stored_category: HashMap<&str, &str> = HashMap::new();
    for row in &debits {
        if let Some(category) = row.transaction.category() {
            let slot = stored_category
                .entry(row.transaction.merchant_normalized())
                .or_insert(category);
            if category > *slot {
                *slot = category;
            }
        }
    }

    let mut overview = MerchantOverview::default();
    for (merchant, total) in by_merchant(&debits) {
        let category = ledger
            .memory()
            .lookup(&merchant)
            .or_else(|| stored_category.get(merchant.as_str()).copied())
            .map(str::to_string);
        let summary = MerchantSummary { merchant, total, category };
        if summary.category.is_some() {
            overview.assigned.push(summary);
        } else {
            overview.unassigned.push(summary);
        }
    }
    overview
}
