//! Transaction record produced by the extraction pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::merchant::normalize_merchant;
use crate::text::collapse_whitespace;

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    #[serde(rename = "credit")]
    Credit,
    #[serde(rename = "debit")]
    Debit,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Credit => "credit",
            Direction::Debit => "debit",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "credit" | "credito" | "crédito" => Ok(Direction::Credit),
            "debit" | "debito" | "débito" => Ok(Direction::Debit),
            other => Err(format!("unknown direction '{other}' (expected credit or debit)")),
        }
    }
}

/// A single monetary movement parsed from a statement.
///
/// Fields are private so the invariants hold for every value in
/// circulation: `amount` is finite and strictly positive, and
/// `merchant_normalized` is always `normalize_merchant(description_full)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    date: NaiveDate,
    description_full: String,
    merchant_normalized: String,
    direction: Direction,
    /// Magnitude only; `direction` carries the sign.
    amount: f64,
    /// Set downstream from the merchant-category memory, never by parsing.
    category: Option<String>,
}

impl Transaction {
    /// Build a transaction from a raw description.
    ///
    /// Returns `None` for zero, negative or non-finite magnitudes; an empty
    /// amount column is not a transaction.
    pub fn new(
        date: NaiveDate,
        description: &str,
        direction: Direction,
        amount: f64,
    ) -> Option<Self> {
        if !amount.is_finite() || amount <= 0.0 {
            return None;
        }
        let description_full = collapse_whitespace(description);
        let merchant_normalized = normalize_merchant(&description_full);
        Some(Self {
            date,
            description_full,
            merchant_normalized,
            direction,
            amount,
            category: None,
        })
    }

    /// Same transaction with `category` replaced.
    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn description_full(&self) -> &str {
        &self.description_full
    }

    pub fn merchant_normalized(&self) -> &str {
        &self.merchant_normalized
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn is_credit(&self) -> bool {
        self.direction == Direction::Credit
    }

    pub fn is_debit(&self) -> bool {
        self.direction == Direction::Debit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 17).unwrap()
    }

    #[test]
    fn test_transaction_creation() {
        let txn = Transaction::new(
            date(),
            "PIX ENVIADO   STRIPE BRASIL ",
            Direction::Debit,
            119.90,
        )
        .unwrap();
        assert_eq!(txn.description_full(), "PIX ENVIADO STRIPE BRASIL");
        assert_eq!(txn.merchant_normalized(), "STRIPE BRASIL");
        assert_eq!(txn.amount(), 119.90);
        assert!(txn.is_debit());
        assert_eq!(txn.category(), None);
    }

    #[test]
    fn test_rejects_non_positive_amounts() {
        assert!(Transaction::new(date(), "X", Direction::Credit, 0.0).is_none());
        assert!(Transaction::new(date(), "X", Direction::Credit, -1.0).is_none());
        assert!(Transaction::new(date(), "X", Direction::Credit, f64::NAN).is_none());
        assert!(Transaction::new(date(), "X", Direction::Credit, f64::INFINITY).is_none());
    }

    #[test]
    fn test_with_category() {
        let txn = Transaction::new(date(), "PADARIA", Direction::Debit, 10.0)
            .unwrap()
            .with_category(Some("Alimentação".to_string()));
        assert_eq!(txn.category(), Some("Alimentação"));
        assert_eq!(txn.clone().with_category(None).category(), None);
    }

    #[test]
    fn test_direction_roundtrip() {
        assert_eq!("credit".parse::<Direction>(), Ok(Direction::Credit));
        assert_eq!("Débito".parse::<Direction>(), Ok(Direction::Debit));
        assert!("sideways".parse::<Direction>().is_err());
        assert_eq!(Direction::Credit.to_string(), "credit");
    }

    #[test]
    fn test_serializes_lowercase_direction() {
        let txn = Transaction::new(date(), "PADARIA", Direction::Debit, 10.0).unwrap();
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["direction"], "debit");
        assert_eq!(json["date"], "2025-12-17");
        assert_eq!(json["merchant_normalized"], "PADARIA");
    }
}
