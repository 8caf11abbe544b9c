//! Property-based tests for the pt-BR parsers and the merchant normalizer.

use chrono::{Datelike, NaiveDate};
use extrato_core::{normalize_merchant, parse_br_date, parse_brl_amount, NORMALIZATION_PREFIXES};
use proptest::prelude::*;

/// Render cents the way statements print them: "1.234.567,89".
fn format_brl(cents: u64) -> String {
    let int = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    format!("{},{:02}", grouped, cents % 100)
}

fn arb_word() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("STRIPE".to_string()),
        Just("acme".to_string()),
        Just("Ltda".to_string()),
        Just("BRASIL".to_string()),
        Just("Solucoes".to_string()),
        Just("MERCADO".to_string()),
        Just("são".to_string()),
        Just("123".to_string()),
    ]
}

fn arb_description() -> impl Strategy<Value = String> {
    (
        prop::option::of(prop::sample::select(NORMALIZATION_PREFIXES.to_vec())),
        prop::sample::select(vec![" ", "  ", " - ", ": ", "\t"]),
        prop::collection::vec(arb_word(), 1..5),
    )
        .prop_map(|(prefix, sep, words)| {
            let body = words.join("   ");
            match prefix {
                Some(p) => format!("{p}{sep}{body}"),
                None => body,
            }
        })
}

proptest! {
    #[test]
    fn prop_amount_parser_never_panics(s in "\\PC*") {
        let _ = parse_brl_amount(&s);
    }

    #[test]
    fn prop_amount_roundtrips_statement_format(cents in 0u64..10_000_000_000u64, negative in any::<bool>()) {
        let rendered = if negative {
            format!("-{}", format_brl(cents))
        } else {
            format!("R$ {}", format_brl(cents))
        };
        let parsed = parse_brl_amount(&rendered).unwrap();
        let expected = cents as f64 / 100.0;
        let expected = if negative { -expected } else { expected };
        prop_assert!((parsed - expected).abs() < 1e-6, "{} -> {}", rendered, parsed);
    }

    #[test]
    fn prop_date_parser_accepts_both_year_widths(y in 2000i32..2068, m in 1u32..13, d in 1u32..29) {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let long = format!("{:02}/{:02}/{:04}", d, m, y);
        let short = format!("{:02}/{:02}/{:02}", d, m, y % 100);
        prop_assert_eq!(parse_br_date(&long), Some(date));
        prop_assert_eq!(parse_br_date(&short), Some(date));
        prop_assert_eq!(parse_br_date(&long).map(|d| d.year()), Some(y));
    }

    #[test]
    fn prop_date_parser_never_panics(s in "\\PC*") {
        let _ = parse_br_date(&s);
    }

    #[test]
    fn prop_normalize_is_idempotent(desc in arb_description()) {
        let once = normalize_merchant(&desc);
        prop_assert_eq!(normalize_merchant(&once), once.clone());
    }

    #[test]
    fn prop_normalize_output_is_collapsed_uppercase(desc in arb_description()) {
        let key = normalize_merchant(&desc);
        prop_assert_eq!(key.clone(), key.to_uppercase());
        prop_assert!(!key.contains("  "));
        prop_assert_eq!(key.trim(), key.as_str());
    }
}
