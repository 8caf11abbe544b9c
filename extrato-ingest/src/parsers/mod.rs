//! Row and line parsers that turn extracted statement text into transactions.

pub mod table_rows;
pub mod text_lines;

use chrono::NaiveDate;
use extrato_core::{Direction, Transaction};

pub use table_rows::parse_table_rows;
pub use text_lines::parse_text_lines;

/// Build the transactions for one statement row.
///
/// A row carries a credit and a debit column; each non-zero magnitude
/// becomes its own transaction, debit first. Signs printed in the columns
/// are ignored since the column already says which way the money moved.
pub(crate) fn emit_movements(
    date: NaiveDate,
    description: &str,
    credit: Option<f64>,
    debit: Option<f64>,
) -> Vec<Transaction> {
    [(Direction::Debit, debit), (Direction::Credit, credit)]
        .into_iter()
        .filter_map(|(direction, value)| {
            Transaction::new(date, description, direction, value?.abs())
        })
        .collect()
}
