//! Import and export of the raw records as standalone JSON files.
//!
//! Exports use the persisted layout verbatim. Imports are validated in full
//! before anything is replaced: the document must be an array, every element
//! an object with a `YYYY-MM-DD` `date` and numeric `asset1`/`asset2` (zero is
//! a valid amount), and no date may appear twice.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde_json::Value;

use crate::{
    errors::{LedgerError, Result},
    ledger::{entry::parse_date, Ledger, RawEntry},
};

pub const EXPORT_MIME_TYPE: &str = "application/json";

const EXPORT_PREFIX: &str = "asset-records";

pub fn export_json(ledger: &Ledger) -> Result<String> {
    Ok(serde_json::to_string_pretty(ledger)?)
}

/// File name for an export taken on `date`, e.g. `asset-records-2024-01-31.json`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{EXPORT_PREFIX}-{}.json", date.format("%Y-%m-%d"))
}

pub fn parse_import(json: &str) -> Result<Vec<RawEntry>> {
    let document: Value = serde_json::from_str(json)
        .map_err(|err| LedgerError::Import(format!("file is not valid JSON: {err}")))?;
    let Value::Array(items) = document else {
        return Err(LedgerError::Import(
            "expected a JSON array of records".into(),
        ));
    };

    let mut seen: HashMap<NaiveDate, usize> = HashMap::new();
    let mut entries = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let position = index + 1;
        let entry = parse_record(position, item)?;
        if let Some(first) = seen.insert(entry.date, position) {
            return Err(LedgerError::Import(format!(
                "records {first} and {position} share the date {}",
                entry.date
            )));
        }
        entries.push(entry);
    }
    Ok(entries)
}

fn parse_record(position: usize, item: &Value) -> Result<RawEntry> {
    let Value::Object(fields) = item else {
        return Err(LedgerError::Import(format!(
            "record {position} is not an object"
        )));
    };
    let date = match fields.get("date") {
        Some(Value::String(raw)) => parse_date(raw)
            .map_err(|err| LedgerError::Import(format!("record {position}: {err}")))?,
        _ => {
            return Err(LedgerError::Import(format!(
                "record {position} is missing a `date` string"
            )))
        }
    };
    let amount = |name: &str| -> Result<f64> {
        let value = fields.get(name).and_then(Value::as_f64).ok_or_else(|| {
            LedgerError::Import(format!("record {position} is missing a numeric `{name}`"))
        })?;
        if value < 0.0 {
            return Err(LedgerError::Import(format!(
                "record {position}: `{name}` cannot be negative"
            )));
        }
        Ok(value)
    };
    Ok(RawEntry::new(date, amount("asset1")?, amount("asset2")?))
}
