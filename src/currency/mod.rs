//! Display formatting for amounts and dates.

use chrono::{Datelike, NaiveDate, Weekday};

const GROUPING_SEPARATOR: char = ',';

/// Symbol printed before amounts in `code`; unknown codes print the code itself.
pub fn currency_symbol(code: &str) -> String {
    match code.to_ascii_uppercase().as_str() {
        "TWD" => "NT$".into(),
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        other => format!("{other} "),
    }
}

/// Formats `amount` rounded to whole units with grouping separators, e.g.
/// `NT$1,234` or `-NT$40`. Non-finite amounts are shown as zero.
pub fn format_currency(amount: f64, code: &str) -> String {
    let value = if amount.is_finite() { amount.round() } else { 0.0 };
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{}{}", currency_symbol(code), group_digits(value.abs()))
}

/// Like [`format_currency`] but always shows the sign, for deltas.
pub fn format_signed(amount: f64, code: &str) -> String {
    let formatted = format_currency(amount, code);
    if formatted.starts_with('-') || formatted == format_currency(0.0, code) {
        formatted
    } else {
        format!("+{formatted}")
    }
}

pub fn format_percent(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.2}%")
    } else {
        "0.00%".into()
    }
}

/// Short English weekday name, e.g. `Mon`.
pub fn weekday_label(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// `2024-01-01 (Mon)`
pub fn format_date_with_weekday(date: NaiveDate) -> String {
    format!("{} ({})", date.format("%Y-%m-%d"), weekday_label(date))
}

fn group_digits(value: f64) -> String {
    let digits = format!("{value:.0}");
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(GROUPING_SEPARATOR);
        }
        grouped.push(ch);
    }
    grouped
}
