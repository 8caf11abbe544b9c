//! Spreadsheet-friendly CSV export (`;`-separated, UTF-8 with BOM, comma decimals).

use std::io::Write;

use anyhow::{Context, Result};

use crate::ledger::StoredTransaction;

const BOM: &[u8] = b"\xEF\xBB\xBF";

pub const HEADER: [&str; 6] = [
    "Data",
    "Descrição completa",
    "Favorecido",
    "Tipo",
    "Valor",
    "Categoria",
];

/// "1350.5" → "1350,50"
pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}").replace('.', ",")
}

pub fn write_csv<W: Write>(rows: &[&StoredTransaction], mut out: W) -> Result<()> {
    out.write_all(BOM).context("write CSV byte-order mark")?;

    let mut w = csv::WriterBuilder::new()
        .delimiter(b';')
        .terminator(csv::Terminator::CRLF)
        .from_writer(out);
    w.write_record(HEADER)?;
    for row in rows {
        let txn = &row.transaction;
        w.write_record([
            txn.date().format("%Y-%m-%d").to_string(),
            txn.description_full().to_string(),
            txn.merchant_normalized().to_string(),
            txn.direction().as_str().to_string(),
            format_amount(txn.amount()),
            row.category_or_empty().to_string(),
        ])?;
    }
    w.flush().context("flush CSV")?;
    Ok(())
}

pub fn to_csv_bytes(rows: &[&StoredTransaction]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    Ok(buf)
}
