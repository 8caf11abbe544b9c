//! Brazilian (pt-BR) amount and date parsing.
//!
//! Both parsers return `Option`: an unparseable cell is the normal
//! "nothing here" case when scanning statement rows, not an error.

use chrono::NaiveDate;

/// Parse a Brazilian-formatted amount ("R$ 1.350,00", "-2.636,87", "119,90").
///
/// `.` is a thousands separator and is discarded; `,` is the decimal
/// separator. A `-` anywhere in the token marks the value negative.
pub fn parse_brl_amount(raw: &str) -> Option<f64> {
    let txt = raw.trim().replace("R$", "");
    let negative = txt.contains('-');
    let cleaned = txt
        .replace('-', "")
        .trim()
        .replace('.', "")
        .replace(',', ".");

    if !is_plain_decimal(&cleaned) {
        return None;
    }

    let value: f64 = cleaned.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Digits with at most one decimal point and at least one digit.
///
/// Keeps `f64::from_str` extras ("inf", "NaN", "1e5", "+1") out.
fn is_plain_decimal(s: &str) -> bool {
    let mut digits = 0usize;
    let mut points = 0usize;
    for c in s.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => points += 1,
            _ => return false,
        }
    }
    digits > 0 && points <= 1
}

/// Parse a `DD/MM/YYYY` or `DD/MM/YY` date, in that order.
pub fn parse_br_date(raw: &str) -> Option<NaiveDate> {
    let mut it = raw.trim().split('/');
    let day = it.next()?;
    let month = it.next()?;
    let year = it.next()?;
    if it.next().is_some() {
        return None;
    }

    let day = parse_digits(day, 1, 2)?;
    let month = parse_digits(month, 1, 2)?;
    let year = match year.len() {
        4 => parse_digits(year, 4, 4)? as i32,
        2 => expand_two_digit_year(parse_digits(year, 2, 2)?),
        _ => return None,
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_digits(s: &str, min: usize, max: usize) -> Option<u32> {
    if s.len() < min || s.len() > max || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// POSIX `%y` pivot: 69-99 -> 1969-1999, 00-68 -> 2000-2068.
fn expand_two_digit_year(yy: u32) -> i32 {
    let yy = yy as i32;
    if yy >= 69 { 1900 + yy } else { 2000 + yy }
}
