use std::{fmt, str::FromStr};

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::entry::DerivedEntry;
use crate::errors::LedgerError;

/// Trailing window used to filter the derived series for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum RangeSelection {
    #[default]
    All,
    Days(u32),
}

/// Choices offered by the range selectors.
pub const PRESET_RANGES: [RangeSelection; 6] = [
    RangeSelection::Days(7),
    RangeSelection::Days(30),
    RangeSelection::Days(90),
    RangeSelection::Days(180),
    RangeSelection::Days(365),
    RangeSelection::All,
];

impl RangeSelection {
    /// First date kept by this range, or `None` when nothing is cut off.
    pub fn cutoff(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            RangeSelection::All => None,
            RangeSelection::Days(days) => today.checked_sub_days(Days::new(u64::from(*days))),
        }
    }
}

impl fmt::Display for RangeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeSelection::All => write!(f, "all"),
            RangeSelection::Days(days) => write!(f, "{days}"),
        }
    }
}

impl FromStr for RangeSelection {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(RangeSelection::All);
        }
        let digits = trimmed.strip_suffix('d').unwrap_or(trimmed);
        digits.parse::<u32>().map(RangeSelection::Days).map_err(|_| {
            LedgerError::InvalidInput(format!(
                "range `{trimmed}` must be `all` or a number of days"
            ))
        })
    }
}

impl From<RangeSelection> for String {
    fn from(value: RangeSelection) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for RangeSelection {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Keeps entries dated on or after `today - n` days. Future-dated entries are
/// never excluded, and `All` returns the input unchanged.
pub fn filter_by_range(
    derived: &[DerivedEntry],
    range: RangeSelection,
    today: NaiveDate,
) -> Vec<DerivedEntry> {
    match range.cutoff(today) {
        None => derived.to_vec(),
        Some(cutoff) => derived
            .iter()
            .filter(|entry| entry.date >= cutoff)
            .copied()
            .collect(),
    }
}
