use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

/// Calendar format used for entry dates everywhere they are written as text.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One user-submitted observation of both holdings on a given date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    pub date: NaiveDate,
    pub asset1: f64,
    pub asset2: f64,
}

impl RawEntry {
    pub fn new(date: NaiveDate, asset1: f64, asset2: f64) -> Self {
        Self {
            date,
            asset1,
            asset2,
        }
    }

    /// Builds an entry from user-supplied text, rejecting dates that are not
    /// `YYYY-MM-DD` and amounts that are not finite, non-negative numbers.
    pub fn parse(date: &str, asset1: &str, asset2: &str) -> Result<Self> {
        Self::with_amounts(parse_date(date)?, asset1, asset2)
    }

    /// Like [`RawEntry::parse`] for a date that is already resolved.
    pub fn with_amounts(date: NaiveDate, asset1: &str, asset2: &str) -> Result<Self> {
        let asset1 = parse_amount("asset1", asset1)?;
        let asset2 = parse_amount("asset2", asset2)?;
        Ok(Self::new(date, asset1, asset2))
    }

    pub fn total(&self) -> f64 {
        self.asset1 + self.asset2
    }
}

/// A raw entry enriched with its total and the change against the previous
/// entry in date order. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedEntry {
    pub date: NaiveDate,
    pub asset1: f64,
    pub asset2: f64,
    pub total: f64,
    pub delta1: f64,
    pub delta2: f64,
    pub delta_total: f64,
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        LedgerError::InvalidInput(format!("`{}` is not a YYYY-MM-DD date", value.trim()))
    })
}

pub(crate) fn parse_amount(field: &str, value: &str) -> Result<f64> {
    let amount: f64 = value
        .trim()
        .parse()
        .map_err(|_| LedgerError::InvalidInput(format!("{field} `{value}` is not a number")))?;
    if !amount.is_finite() {
        return Err(LedgerError::InvalidInput(format!(
            "{field} must be a finite number"
        )));
    }
    if amount < 0.0 {
        return Err(LedgerError::InvalidInput(format!(
            "{field} cannot be negative"
        )));
    }
    Ok(amount)
}
