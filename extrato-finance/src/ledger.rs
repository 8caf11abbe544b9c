//! JSON-backed store of imported transactions plus the category memory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use extrato_core::{Direction, Transaction};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::category_memory::CategoryMemory;

/// Label used for transactions without a category.
pub const UNCATEGORIZED: &str = "Outros";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTransaction {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub transaction: Transaction,
}

impl StoredTransaction {
    /// Category, or "" when none is set.
    pub fn category_or_empty(&self) -> &str {
        self.transaction.category().unwrap_or("")
    }
}

/// Query filter; every `None` field matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub direction: Option<Direction>,
    /// Case-insensitive substring of the normalized merchant.
    pub merchant: Option<String>,
    /// Exact category; `Some("")` selects uncategorized transactions.
    pub category: Option<String>,
}

impl TransactionFilter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        if self.start.is_some_and(|start| txn.date() < start) {
            return false;
        }
        if self.end.is_some_and(|end| txn.date() > end) {
            return false;
        }
        if self.direction.is_some_and(|d| txn.direction() != d) {
            return false;
        }
        if let Some(needle) = &self.merchant {
            let needle = needle.trim().to_lowercase();
            if !txn.merchant_normalized().to_lowercase().contains(&needle) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if txn.category().unwrap_or("") != category {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    transactions: Vec<StoredTransaction>,
    #[serde(default)]
    categories: CategoryMemory,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `path`; a missing file is an empty ledger.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no ledger yet");
            return Ok(Self::default());
        }
        let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let ledger: Ledger =
            serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
        debug!(path = %path.display(), transactions = ledger.transactions.len(), "ledger loaded");
        Ok(ledger)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    /// Store transactions, applying remembered categories. Returns how many were stored.
    pub fn record<I>(&mut self, transactions: I) -> usize
    where
        I: IntoIterator<Item = Transaction>,
    {
        let now = Utc::now();
        let before = self.transactions.len();
        for txn in transactions {
            self.next_id += 1;
            self.transactions.push(StoredTransaction {
                id: self.next_id,
                created_at: now,
                transaction: self.categories.categorize(txn),
            });
        }
        let stored = self.transactions.len() - before;
        info!(stored, total = self.transactions.len(), "recorded transactions");
        stored
    }

    /// Remember a category and apply it to every stored transaction of the merchant.
    /// Returns how many stored transactions were updated.
    pub fn assign_category(&mut self, merchant: &str, category: &str) -> Result<usize> {
        self.categories.assign(merchant, category)?;
        let merchant = merchant.trim();
        let category = category.trim().to_string();
        Ok(self.set_category_for(merchant, Some(category)))
    }

    /// Forget a merchant's category and clear it on its stored transactions.
    pub fn clear_category(&mut self, merchant: &str) -> usize {
        let merchant = merchant.trim();
        self.categories.clear(merchant);
        self.set_category_for(merchant, None)
    }

    fn set_category_for(&mut self, merchant: &str, category: Option<String>) -> usize {
        let mut updated = 0;
        for stored in self
            .transactions
            .iter_mut()
            .filter(|s| s.transaction.merchant_normalized() == merchant)
        {
            stored.transaction = stored.transaction.clone().with_category(category.clone());
            updated += 1;
        }
        debug!(merchant, updated, "category updated");
        updated
    }

    /// Matching records ordered by date, then id.
    pub fn query(&self, filter: &TransactionFilter) -> Vec<&StoredTransaction> {
        let mut rows: Vec<&StoredTransaction> = self
            .transactions
            .iter()
            .filter(|s| filter.matches(&s.transaction))
            .collect();
        rows.sort_by_key(|s| (s.transaction.date(), s.id));
        rows
    }

    /// Distinct categories in use, uncategorized shown as [`UNCATEGORIZED`].
    pub fn categories(&self) -> Vec<String> {
        let mut labels: Vec<String> = self
            .transactions
            .iter()
            .map(|s| s.transaction.category().unwrap_or(UNCATEGORIZED).to_string())
            .collect();
        labels.sort();
        labels.dedup();
        labels
    }

    pub fn memory(&self) -> &CategoryMemory {
        &self.categories
    }

    pub fn transactions(&self) -> &[StoredTransaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
