//! Free-text statement lines, as recovered by text extraction or OCR.
//!
//! Expected line shape:
//!   15/12/2025 CREDITO DE SALARIO ACME LTDA   000000  000000   1.350,00   0,00   1.350,00
//!   DATE       DESCRIPTION                    DOC     REF      CREDIT     DEBIT  BALANCE

use std::sync::LazyLock;

use extrato_core::{fold_upper, parse_br_date, parse_brl_amount, Transaction};
use regex::Regex;

use super::emit_movements;

static DATED_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<date>\d{2}/\d{2}/\d{4})\s+(?P<rest>.*)$").expect("valid dated-line regex")
});

static MONEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d{1,3}(?:\.\d{3})*,\d{2}").expect("valid money regex"));

const CREDIT_KEYWORDS: &[&str] = &["CREDITO", "PIX RECEBIDO", "DEPOSITO"];

fn looks_like_credit(description: &str) -> bool {
    let key = fold_upper(description);
    CREDIT_KEYWORDS.iter().any(|k| key.contains(k))
}

fn is_reference(token: &str) -> bool {
    token.len() >= 4 && token.bytes().all(|b| b.is_ascii_digit())
}

/// The description without the document/reference columns printed between
/// it and the amounts.
///
/// A trailing number of four or more digits is a reference when it is
/// zero-padded or follows another such number; "LOJA 2024" keeps its 2024.
fn description_span(span: &str) -> &str {
    let mut rest = span.trim();
    while let Some((head, last)) = rest.rsplit_once(char::is_whitespace) {
        let head = head.trim_end();
        let follows_reference = head.rsplit(char::is_whitespace).next().is_some_and(is_reference);
        if !(is_reference(last) && (last.starts_with('0') || follows_reference)) {
            break;
        }
        rest = head;
    }
    rest
}

/// Parse one line; `None` when it is not a transaction line.
fn parse_line(line: &str) -> Option<Vec<Transaction>> {
    let line = line.trim();
    let caps = DATED_LINE.captures(line)?;
    let date = parse_br_date(&caps["date"])?;
    let rest = caps.name("rest")?.as_str();

    if fold_upper(rest).starts_with("DATA ") {
        return None;
    }

    let amounts: Vec<_> = MONEY.find_iter(rest).collect();
    if amounts.len() < 2 {
        return None;
    }

    let description = description_span(&rest[..amounts[0].start()]);

    let (credit, debit) = if amounts.len() >= 3 {
        // [credit] [debit] [balance]
        let n = amounts.len();
        (
            parse_brl_amount(amounts[n - 3].as_str()),
            parse_brl_amount(amounts[n - 2].as_str()),
        )
    } else {
        // [amount] [balance]
        let value = parse_brl_amount(amounts[0].as_str());
        if looks_like_credit(description) {
            (value, None)
        } else {
            (None, value)
        }
    };

    if credit.is_none() && debit.is_none() {
        return None;
    }
    Some(emit_movements(date, description, credit, debit))
}

/// Parse extracted text lines into transactions, in line order.
pub fn parse_text_lines<S: AsRef<str>>(lines: &[S]) -> Vec<Transaction> {
    lines
        .iter()
        .filter_map(|line| parse_line(line.as_ref()))
        .flatten()
        .collect()
}
