use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use extrato_core::{parse_br_date, Direction};
use extrato_finance::{
    by_category, by_merchant, merchant_overview, totals, write_csv, Ledger, StoredTransaction,
    TransactionFilter,
};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use crate::config::{ledger_path, Config};

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// First day, inclusive (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long, value_parser = parse_date_arg)]
    pub from: Option<NaiveDate>,

    /// Last day, inclusive (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long, value_parser = parse_date_arg)]
    pub to: Option<NaiveDate>,

    /// credit or debit
    #[arg(long)]
    pub direction: Option<Direction>,

    /// Substring of the normalized merchant (case-insensitive)
    #[arg(long)]
    pub merchant: Option<String>,

    /// Exact category; pass "" for uncategorized
    #[arg(long)]
    pub category: Option<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> TransactionFilter {
        TransactionFilter {
            start: self.from,
            end: self.to,
            direction: self.direction,
            merchant: self.merchant.clone().filter(|m| !m.trim().is_empty()),
            category: self.category.clone(),
        }
    }
}

pub fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .ok()
        .or_else(|| parse_br_date(s))
        .ok_or_else(|| format!("invalid date '{s}' (expected YYYY-MM-DD or DD/MM/YYYY)"))
}

/// "1350.5" → "R$ 1.350,50"
pub fn format_brl(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (int, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    format!("{sign}R$ {grouped},{cents}")
}

fn load_ledger(cfg: &Config) -> Result<(Ledger, PathBuf)> {
    let path = ledger_path(cfg)?;
    Ok((Ledger::load(&path)?, path))
}

fn print_row(row: &StoredTransaction) {
    let txn = &row.transaction;
    let category = txn.category().map(|c| format!("  [{c}]")).unwrap_or_default();
    println!(
        "{:>5}  {}  {:<6}  {:>16}  {}{}",
        row.id,
        txn.date(),
        txn.direction().as_str(),
        format_brl(txn.amount()),
        txn.merchant_normalized(),
        category
    );
}

pub fn list(cfg: &Config, filters: &FilterArgs) -> Result<()> {
    let (ledger, _) = load_ledger(cfg)?;
    let rows = ledger.query(&filters.to_filter());
    for row in &rows {
        print_row(row);
    }
    println!("\n{} transactions", rows.len());
    Ok(())
}

pub fn report(cfg: &Config, filters: &FilterArgs, top: usize) -> Result<()> {
    let (ledger, _) = load_ledger(cfg)?;
    let rows = ledger.query(&filters.to_filter());
    let t = totals(&rows);

    println!("# Summary\n");
    println!("Received: {}", format_brl(t.received));
    println!("Spent:    {}", format_brl(t.spent));
    println!("Balance:  {}", format_brl(t.balance));

    println!("\n## Top merchants\n");
    for (merchant, total) in by_merchant(&rows).iter().take(top) {
        println!("{:>16}  {}", format_brl(*total), merchant);
    }

    println!("\n## By category\n");
    for (category, total) in by_category(&rows) {
        println!("{:>16}  {}", format_brl(total), category);
    }
    Ok(())
}

pub fn merchants(cfg: &Config) -> Result<()> {
    let (ledger, _) = load_ledger(cfg)?;
    let overview = merchant_overview(&ledger);

    println!("## Without category ({})\n", overview.unassigned.len());
    for m in &overview.unassigned {
        println!("{:>16}  {}", format_brl(m.total), m.merchant);
    }

    println!("\n## With category ({})\n", overview.assigned.len());
    for m in &overview.assigned {
        println!(
            "{:>16}  {}  [{}]",
            format_brl(m.total),
            m.merchant,
            m.category.as_deref().unwrap_or_default()
        );
    }
    Ok(())
}

pub fn categories(cfg: &Config) -> Result<()> {
    let (ledger, _) = load_ledger(cfg)?;
    for line in category_listing(&ledger) {
        println!("{line}");
    }
    Ok(())
}

/// Categories on stored transactions, then the merchant to category memory.
fn category_listing(ledger: &Ledger) -> Vec<String> {
    let in_use = ledger.categories();
    let mut lines = vec![format!("## Categories in use ({})", in_use.len()), String::new()];
    lines.extend(in_use.into_iter().map(|c| format!("  {c}")));

    let memory = ledger.memory();
    lines.push(String::new());
    lines.push(format!("## Remembered merchants ({})", memory.len()));
    lines.push(String::new());
    lines.extend(memory.iter().map(|(merchant, category)| format!("  {merchant} -> {category}")));
    lines
}

pub fn categorize(cfg: &Config, merchant: &str, category: &str) -> Result<()> {
    let (mut ledger, path) = load_ledger(cfg)?;
    let updated = ledger.assign_category(merchant, category)?;
    ledger.save(&path)?;
    println!(
        "{} -> {} ({} stored transactions updated)",
        merchant.trim(),
        category.trim(),
        updated
    );
    Ok(())
}

pub fn uncategorize(cfg: &Config, merchant: &str) -> Result<()> {
    let (mut ledger, path) = load_ledger(cfg)?;
    let updated = ledger.clear_category(merchant);
    ledger.save(&path)?;
    println!("{}: category cleared ({} stored transactions updated)", merchant.trim(), updated);
    Ok(())
}

pub fn export(cfg: &Config, filters: &FilterArgs, out: Option<&Path>) -> Result<()> {
    let (ledger, _) = load_ledger(cfg)?;
    let rows = ledger.query(&filters.to_filter());
    match out {
        Some(p) => {
            let file = File::create(p).with_context(|| format!("create {}", p.display()))?;
            write_csv(&rows, BufWriter::new(file))?;
            eprintln!("Wrote {} transactions to {}", rows.len(), p.display());
        }
        None => write_csv(&rows, io::stdout().lock())?,
    }
    Ok(())
}
