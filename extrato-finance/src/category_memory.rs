//! Remembered merchant → category assignments.
//!
//! Keys are `merchant_normalized` values, so every statement line that
//! normalizes to the same merchant picks up the same category.

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use extrato_core::Transaction;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryMemory {
    entries: BTreeMap<String, String>,
}

impl CategoryMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the category for a merchant.
    pub fn assign(&mut self, merchant: &str, category: &str) -> Result<()> {
        let merchant = merchant.trim();
        let category = category.trim();
        if merchant.is_empty() {
            bail!("merchant is required");
        }
        if category.is_empty() {
            bail!("category is required");
        }
        self.entries.insert(merchant.to_string(), category.to_string());
        Ok(())
    }

    /// Forget a merchant; `true` when a mapping existed.
    pub fn clear(&mut self, merchant: &str) -> bool {
        self.entries.remove(merchant.trim()).is_some()
    }

    pub fn lookup(&self, merchant: &str) -> Option<&str> {
        self.entries.get(merchant).map(String::as_str)
    }

    /// Apply the remembered category; unknown merchants pass through unchanged.
    pub fn categorize(&self, txn: Transaction) -> Transaction {
        match self.lookup(txn.merchant_normalized()) {
            Some(category) => {
                let category = category.to_string();
                txn.with_category(Some(category))
            }
            None => txn,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(m, c)| (m.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
