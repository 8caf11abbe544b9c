//! Statement tables with a "Data / Descrição / Crédito / Débito" header.
//!
//! Expected table shape (column order varies between banks):
//!   Data        Descrição                  Crédito     Débito     Saldo
//!   15/12/2025  CREDITO DE SALARIO ACME    1.350,00               1.350,00

use extrato_core::{fold_upper, parse_br_date, parse_brl_amount, Transaction};
use tracing::debug;

use super::emit_movements;
use crate::types::RawRow;

/// Where each role lives in the detected header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: usize,
    pub description: usize,
    pub credit: usize,
    pub debit: usize,
}

impl ColumnMap {
    /// Map header cells to roles; `None` when any role is missing.
    ///
    /// Each cell is checked for DATA, DESCRI, CREDITO, DEBITO in that order
    /// and goes to the first role it matches. Repeated roles keep the
    /// leftmost cell.
    pub fn from_header(header: &[String]) -> Option<Self> {
        let mut date = None;
        let mut description = None;
        let mut credit = None;
        let mut debit = None;

        for (idx, cell) in header.iter().enumerate() {
            let key = fold_upper(cell);
            let slot = if key.contains("DATA") {
                &mut date
            } else if key.contains("DESCRI") {
                &mut description
            } else if key.contains("CREDITO") {
                &mut credit
            } else if key.contains("DEBITO") {
                &mut debit
            } else {
                continue;
            };
            slot.get_or_insert(idx);
        }

        Some(Self {
            date: date?,
            description: description?,
            credit: credit?,
            debit: debit?,
        })
    }
}

fn is_header(row: &[String]) -> bool {
    let joined = fold_upper(&row.join(" "));
    ["DATA", "DESCRI", "CREDITO"].iter().all(|k| joined.contains(k))
}

/// Parse table rows into transactions. Rows before the header are ignored;
/// a table without a usable header yields nothing.
pub fn parse_table_rows(rows: &[RawRow]) -> Vec<Transaction> {
    let Some(header_idx) = rows.iter().position(|r| is_header(r)) else {
        debug!(rows = rows.len(), "no statement header in table rows");
        return Vec::new();
    };
    let header = &rows[header_idx];
    let Some(cols) = ColumnMap::from_header(header) else {
        debug!(?header, "header is missing a date/description/credit/debit column");
        return Vec::new();
    };

    let mut out = Vec::new();
    for row in &rows[header_idx + 1..] {
        if row.len() < header.len() {
            continue;
        }

        let date_cell = row[cols.date].trim();
        let description = row[cols.description].trim();
        if date_cell.is_empty() || description.is_empty() {
            continue;
        }
        let Some(date) = parse_br_date(date_cell) else {
            continue;
        };

        let credit = parse_brl_amount(&row[cols.credit]);
        let debit = parse_brl_amount(&row[cols.debit]);
        if credit.is_none() && debit.is_none() {
            continue;
        }

        out.extend(emit_movements(date, description, credit, debit));
    }

    out
}
