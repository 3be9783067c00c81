use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    derivation::derive_entries,
    entry::{DerivedEntry, RawEntry},
};

/// The set of raw observations for one user. Serializes as a bare JSON array
/// of entries, which is the persisted and exported layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    entries: Vec<RawEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerState {
    Empty,
    Populated,
}

/// Result of [`Ledger::upsert`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpsertOutcome {
    /// No entry existed for the date.
    Inserted,
    /// The candidate total was higher and replaced the stored entry.
    Replaced { previous: RawEntry },
    /// The stored total was equal or higher; the candidate was discarded.
    Rejected { existing: RawEntry },
}

impl UpsertOutcome {
    pub fn changed(&self) -> bool {
        !matches!(self, UpsertOutcome::Rejected { .. })
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<RawEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[RawEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn state(&self) -> LedgerState {
        if self.is_empty() {
            LedgerState::Empty
        } else {
            LedgerState::Populated
        }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&RawEntry> {
        self.entries.iter().find(|entry| entry.date == date)
    }

    /// Inserts `candidate`, or replaces the entry sharing its date when the
    /// candidate total is strictly higher. A date's stored total never drops
    /// through this path.
    pub fn upsert(&mut self, candidate: RawEntry) -> UpsertOutcome {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.date == candidate.date)
        {
            None => {
                self.entries.push(candidate);
                UpsertOutcome::Inserted
            }
            Some(existing) if candidate.total() > existing.total() => {
                let previous = *existing;
                *existing = candidate;
                UpsertOutcome::Replaced { previous }
            }
            Some(existing) => UpsertOutcome::Rejected {
                existing: *existing,
            },
        }
    }

    /// Removes every entry dated `date`. Returns whether anything was removed.
    pub fn delete(&mut self, date: NaiveDate) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.date != date);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replaces the collection verbatim; no ratchet and no deduplication.
    pub fn replace_all(&mut self, entries: Vec<RawEntry>) {
        self.entries = entries;
    }

    pub fn derive(&self) -> Vec<DerivedEntry> {
        derive_entries(&self.entries)
    }

    /// Dates that appear more than once, in ascending order.
    pub fn duplicate_dates(&self) -> Vec<NaiveDate> {
        let mut seen = BTreeSet::new();
        let mut duplicates = BTreeSet::new();
        for entry in &self.entries {
            if !seen.insert(entry.date) {
                duplicates.insert(entry.date);
            }
        }
        duplicates.into_iter().collect()
    }
}
