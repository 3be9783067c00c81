use chrono::NaiveDate;

use super::entry::DerivedEntry;

/// Headline figures comparing the latest entry with the earliest one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerSummary {
    pub entry_count: usize,
    pub first_date: NaiveDate,
    pub latest_date: NaiveDate,
    pub initial_total: f64,
    pub latest_total: f64,
    pub total_gain: f64,
    /// `None` when the earliest total is zero.
    pub gain_percent: Option<f64>,
}

/// Summarizes a date-ordered derived series. Returns `None` when it is empty.
pub fn summarize(derived: &[DerivedEntry]) -> Option<LedgerSummary> {
    let first = derived.first()?;
    let latest = derived.last()?;
    let total_gain = latest.total - first.total;
    let gain_percent = if first.total == 0.0 {
        None
    } else {
        Some(total_gain / first.total * 100.0)
    };
    Some(LedgerSummary {
        entry_count: derived.len(),
        first_date: first.date,
        latest_date: latest.date,
        initial_total: first.total,
        latest_total: latest.total,
        total_gain,
        gain_percent,
    })
}
