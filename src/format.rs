//! Display formatting with Brazilian Portuguese conventions.
//!
//! Decimal comma, `.` thousands separator and an `R$` prefix. The locale is
//! fixed; nothing here reads configuration.

use chrono::{Datelike, NaiveDate};
use num_format::{Locale, ToFormattedString};

/// Placeholder shown when a value is unknown.
pub const EMPTY: &str = "—";

const MONTHS_LONG: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Round to an integer and insert thousands separators: `12345.6` -> `12.346`.
pub fn format_int(value: f64) -> String {
    (value.round() as i64).to_formatted_string(&Locale::pt)
}

/// Up to two fraction digits, trailing zeros dropped: `94.256` -> `94,26`, `80.0` -> `80`.
pub fn format_decimal(value: f64) -> String {
    let (int_part, frac) = split_cents(value);
    let mut out = int_part.to_formatted_string(&Locale::pt);
    if frac != 0 {
        let digits = format!("{:02}", frac);
        out.push(',');
        out.push_str(digits.trim_end_matches('0'));
    }
    with_sign(value, int_part, frac, out)
}

/// Always two fraction digits with the currency prefix: `1234.5` -> `R$ 1.234,50`.
pub fn format_currency(value: f64) -> String {
    let (int_part, frac) = split_cents(value);
    let out = format!(
        "R$ {},{:02}",
        int_part.to_formatted_string(&Locale::pt),
        frac
    );
    with_sign(value, int_part, frac, out)
}

pub fn format_percent(value: f64) -> String {
    format!("{}%", format_decimal(value))
}

/// `EMPTY` for a missing value, otherwise a percentage.
pub fn format_optional_percent(value: Option<f64>) -> String {
    value.map(format_percent).unwrap_or_else(|| EMPTY.to_string())
}

/// Relative change in percent. `None` when `prev` is zero.
pub fn delta(curr: f64, prev: f64) -> Option<f64> {
    if prev == 0.0 {
        None
    } else {
        Some((curr - prev) / prev * 100.0)
    }
}

/// `↑ 12,5%` / `↓ 3%`, or `EMPTY` when there is no baseline.
pub fn format_delta(delta: Option<f64>) -> String {
    match delta {
        None => EMPTY.to_string(),
        Some(d) => {
            let arrow = if d >= 0.0 { "↑" } else { "↓" };
            format!("{} {}%", arrow, format_decimal(d.abs()))
        }
    }
}

/// CSS-style width for a progress bar, clamped into `[0, 100]`.
pub fn bar_width(percent: Option<f64>) -> String {
    match percent {
        None => "0%".to_string(),
        Some(p) => format!("{}%", p.clamp(0.0, 100.0)),
    }
}

/// Qualitative label for the efficiency gauge.
pub fn efficiency_status(percent: Option<f64>) -> &'static str {
    match percent {
        None => "Sem dados",
        Some(p) if p >= 90.0 => "Ótimo",
        Some(p) if p >= 75.0 => "Bom",
        Some(_) => "Atenção",
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `outubro de 2026`
pub fn month_long(date: NaiveDate) -> String {
    format!("{} de {}", MONTHS_LONG[date.month0() as usize], date.year())
}

/// `Jan` ... `Dez`
pub fn month_short(date: NaiveDate) -> &'static str {
    MONTHS_SHORT[date.month0() as usize]
}

/// Parse a `dd/mm/yyyy` string, rejecting any other shape.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    if bytes.len() != 10 || bytes[2] != b'/' || bytes[5] != b'/' {
        return None;
    }
    NaiveDate::parse_from_str(s, "%d/%m/%Y").ok()
}

/// Read back a value produced by [`format_currency`] (or a plain number).
pub fn parse_currency(s: &str) -> Option<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != 'R' && *c != '$' && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Days since 1899-12-30, the spreadsheet epoch.
pub fn excel_serial(date: NaiveDate) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN);
    (date - epoch).num_days() as f64
}

fn split_cents(value: f64) -> (i64, i64) {
    let cents = (value.abs() * 100.0).round() as i64;
    (cents / 100, cents % 100)
}

fn with_sign(value: f64, int_part: i64, frac: i64, out: String) -> String {
    if value < 0.0 && (int_part != 0 || frac != 0) {
        format!("-{}", out)
    } else {
        out
    }
}
