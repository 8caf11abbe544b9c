//! Merchant-name normalization.
//!
//! Turns a statement description into a stable grouping key by stripping
//! the transaction-type prefix banks put in front of the counterparty.

use crate::text::collapse_whitespace;

/// Known transaction-type prefixes, checked in order; first match wins.
///
/// Longer prefixes must come before shorter ones they overlap with.
pub const NORMALIZATION_PREFIXES: &[&str] = &[
    "PIX ENVIADO",
    "PIX RECEBIDO",
    "PAGAMENTO DE BOLETO",
    "PAGAMENTO BOLETO",
    "PAGTO BOLETO",
    "CREDITO DE SALARIO",
    "DEBITO AUT.",
    "COMPRA CARTAO",
];

const SEPARATORS: &[char] = &[' ', '-', ':', '/'];

/// Normalize a description into a merchant key.
///
/// Pure and deterministic. Diacritic-sensitive: "CRÉDITO DE SALÁRIO"
/// does not match the unaccented prefix.
pub fn normalize_merchant(description: &str) -> String {
    let upper = collapse_whitespace(description).to_uppercase();

    for prefix in NORMALIZATION_PREFIXES {
        if let Some(rest) = upper.strip_prefix(*prefix) {
            return collapse_whitespace(rest.trim_matches(SEPARATORS));
        }
    }

    upper
}
