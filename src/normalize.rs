//! Value normalizers: dates, tax identifiers, numbers and XML text.
//!
//! Every function here is total: unparseable input degrades to a zero,
//! `None` or the input itself, never to an error.

use crate::model::{Cell, InnKpp};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

/// Russian month names in the genitive case, as used in document dates.
const MONTHS: [(&str, u32); 12] = [
    ("января", 1),
    ("февраля", 2),
    ("марта", 3),
    ("апреля", 4),
    ("мая", 5),
    ("июня", 6),
    ("июля", 7),
    ("августа", 8),
    ("сентября", 9),
    ("октября", 10),
    ("ноября", 11),
    ("декабря", 12),
];

fn month_date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let names = MONTHS
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join("|");
        // Day may be wrapped in quotes: «15» января 2026 г.
        Regex::new(&format!(
            r#"(?i)[«"]?(\d{{1,2}})[»"]?\s+({names})\s+(\d{{4}})"#
        ))
        .expect("month date pattern is valid")
    })
}

fn numeric_date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{2}\.\d{2}\.\d{4}").expect("numeric date pattern is valid"))
}

fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    MONTHS
        .iter()
        .find(|(month, _)| *month == lower)
        .map(|(_, number)| *number)
}

/// Recognize a date inside arbitrary text.
///
/// Returns `DD.MM.YYYY` for `"15 января 2026"` style dates (day zero-padded)
/// or the first `DD.MM.YYYY` substring verbatim; `None` when neither occurs.
pub fn recognize_date(text: &str) -> Option<String> {
    if let Some(caps) = month_date_regex().captures(text) {
        let day: u32 = caps[1].parse().ok()?;
        let month = month_number(&caps[2])?;
        return Some(format!("{:02}.{:02}.{}", day, month, &caps[3]));
    }

    numeric_date_regex()
        .find(text)
        .map(|m| m.as_str().to_string())
}

/// Normalize a document date.
///
/// Empty input yields `None`; otherwise a recognized date in `DD.MM.YYYY`
/// form, or the trimmed input unchanged.
pub fn parse_date(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(recognize_date(trimmed).unwrap_or_else(|| trimmed.to_string()))
}

/// Interpret a `DD.MM.YYYY` string as a calendar date.
pub fn to_naive_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%d.%m.%Y").ok()
}

/// Split an `INN/KPP` string.
///
/// All whitespace is removed first. Text left of `/` is the INN, text to the
/// right (if any) is the KPP; without `/` the whole string is the INN.
pub fn parse_inn_kpp(input: Option<&str>) -> InnKpp {
    let compact: String = input
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if compact.is_empty() {
        return InnKpp::default();
    }

    let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
    match compact.split_once('/') {
        Some((inn, rest)) => {
            let kpp = rest.split('/').next().unwrap_or_default();
            InnKpp {
                inn: non_empty(inn),
                kpp: non_empty(kpp),
            }
        }
        None => InnKpp {
            inn: Some(compact),
            kpp: None,
        },
    }
}

/// Leading run of ASCII letters, digits and hyphens of an item name.
pub fn extract_article(name: &str) -> String {
    name.chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

/// Escape XML special characters.
///
/// `&` is replaced first so entity references produced by the later
/// replacements are not escaped twice.
pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Parse a decimal leniently.
///
/// Whitespace (including non-breaking spaces) is dropped and `,` is read as
/// the decimal separator. The longest numeric prefix is used, so `"20%"`
/// is `20`.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    let end = numeric_prefix_len(cleaned.as_bytes());
    cleaned[..end].parse::<f64>().ok()
}

fn numeric_prefix_len(bytes: &[u8]) -> usize {
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }
    let int_start = i;
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    let mut digits = i - int_start;
    if bytes.get(i) == Some(&b'.') {
        let frac_start = i + 1;
        let mut j = frac_start;
        while bytes.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        if digits > 0 || j > frac_start {
            digits += j - frac_start;
            i = j;
        }
    }
    if digits == 0 {
        0
    } else {
        i
    }
}

/// Parse the leading integer of a string (`"12."` is `12`).
pub fn parse_leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    let bytes = trimmed.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'+') | Some(b'-')));
    let digits = bytes[sign..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    trimmed[..sign + digits].parse().ok()
}

/// Round half away from zero at `decimals` places.
///
/// Values whose binary representation sits just below a tie (`1.005`) are
/// treated as the tie, matching currency display.
pub fn round_half_up(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    let frac = (scaled - scaled.trunc()).abs();
    let rounded = if (frac - 0.5).abs() < 1e-9 {
        scaled.trunc() + scaled.signum()
    } else {
        scaled.round()
    };
    let result = rounded / factor;
    if result == 0.0 {
        0.0
    } else {
        result
    }
}

/// Format an optional amount with exactly `decimals` digits.
pub fn format_amount(value: Option<f64>, decimals: usize) -> String {
    let number = value.filter(|v| v.is_finite()).unwrap_or(0.0);
    format!("{:.*}", decimals, round_half_up(number, decimals))
}

/// Format a cell value as a number with exactly `decimals` digits.
///
/// Non-numeric or empty cells format as zero.
pub fn format_number(value: &Cell, decimals: usize) -> String {
    format_amount(value.as_number(), decimals)
}

/// Format a quantity: bare integer when whole, otherwise two decimals.
pub fn format_quantity(value: Option<f64>) -> String {
    let number = value.filter(|v| v.is_finite()).unwrap_or(0.0);
    if number.fract() == 0.0 {
        format!("{}", number as i64)
    } else {
        format_amount(Some(number), 2)
    }
}
