use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;

use crate::core::clock::Clock;
use crate::errors::Result;
use crate::ledger::{
    filter_by_range, summarize, DerivedEntry, Ledger, LedgerState, LedgerSummary, RangeSelection,
    RawEntry, UpsertOutcome,
};
use crate::storage::{transfer, StorageBackend};

/// Owns the raw records and their derived series, and persists every change
/// through a [`StorageBackend`].
///
/// Mutations are applied to a copy of the ledger, written out, and then
/// reloaded from storage, so a failed write leaves both the in-memory and the
/// persisted state as they were.
pub struct LedgerStore {
    ledger: Ledger,
    derived: Vec<DerivedEntry>,
    warnings: Vec<String>,
    storage: Box<dyn StorageBackend>,
    clock: Box<dyn Clock>,
}

impl LedgerStore {
    /// Creates a store and immediately loads whatever the backend holds.
    pub fn open(storage: Box<dyn StorageBackend>, clock: Box<dyn Clock>) -> Result<Self> {
        let mut store = Self {
            ledger: Ledger::new(),
            derived: Vec::new(),
            warnings: Vec::new(),
            storage,
            clock,
        };
        store.load()?;
        Ok(store)
    }

    /// Re-reads the persisted records and recomputes the derived series.
    /// Missing or malformed storage yields an empty ledger.
    pub fn load(&mut self) -> Result<&[DerivedEntry]> {
        let report = self.storage.load()?;
        for warning in &report.warnings {
            tracing::warn!(path = %report.path.display(), "{warning}");
        }
        self.derived = report.ledger.derive();
        self.ledger = report.ledger;
        self.warnings = report.warnings;
        tracing::debug!(entries = self.ledger.len(), "ledger loaded");
        Ok(&self.derived)
    }

    /// Inserts `entry`, or replaces the stored entry for its date only when
    /// the new total is strictly higher. Persists and reloads in every case.
    pub fn upsert(&mut self, entry: RawEntry) -> Result<UpsertOutcome> {
        let mut next = self.ledger.clone();
        let outcome = next.upsert(entry);
        self.commit(&next)?;
        match outcome {
            UpsertOutcome::Inserted => tracing::info!(date = %entry.date, "entry inserted"),
            UpsertOutcome::Replaced { .. } => tracing::info!(date = %entry.date, "entry replaced"),
            UpsertOutcome::Rejected { existing } => tracing::info!(
                date = %entry.date,
                existing_total = existing.total(),
                candidate_total = entry.total(),
                "entry kept; candidate total is not higher"
            ),
        }
        Ok(outcome)
    }

    /// Removes the entry for `date`. Returns `false` when there was none.
    pub fn delete(&mut self, date: NaiveDate) -> Result<bool> {
        let mut next = self.ledger.clone();
        let removed = next.delete(date);
        self.commit(&next)?;
        tracing::info!(%date, removed, "delete requested");
        Ok(removed)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.commit(&Ledger::new())?;
        tracing::info!("ledger cleared");
        Ok(())
    }

    /// Replaces every record verbatim, bypassing the upsert rule.
    pub fn replace_all(&mut self, entries: Vec<RawEntry>) -> Result<()> {
        let count = entries.len();
        self.commit(&Ledger::from_entries(entries))?;
        tracing::info!(entries = count, "ledger replaced");
        Ok(())
    }

    /// Validates `json` as an import document and, only if it is valid,
    /// backs up the current records and replaces them. Returns the number of
    /// records imported.
    pub fn import_json(&mut self, json: &str) -> Result<usize> {
        let entries = transfer::parse_import(json)?;
        let count = entries.len();
        if let Some(backup) = self.storage.backup(Some("before-import"))? {
            tracing::info!(backup = %backup.display(), "previous records backed up");
        }
        self.replace_all(entries)?;
        Ok(count)
    }

    pub fn import_file(&mut self, path: &Path) -> Result<usize> {
        let json = fs::read_to_string(path)?;
        self.import_json(&json)
    }

    pub fn export_json(&self) -> Result<String> {
        transfer::export_json(&self.ledger)
    }

    /// Writes an export named after today's date into `dir`.
    pub fn export_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(transfer::export_file_name(self.clock.today()));
        fs::write(&path, self.export_json()?)?;
        tracing::info!(
            path = %path.display(),
            entries = self.ledger.len(),
            mime = transfer::EXPORT_MIME_TYPE,
            "records exported"
        );
        Ok(path)
    }

    /// Filters the derived series against the clock's current date.
    pub fn filter(&self, range: RangeSelection) -> Vec<DerivedEntry> {
        filter_by_range(&self.derived, range, self.clock.today())
    }

    pub fn summary(&self) -> Option<LedgerSummary> {
        summarize(&self.derived)
    }

    pub fn derived(&self) -> &[DerivedEntry] {
        &self.derived
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn state(&self) -> LedgerState {
        self.ledger.state()
    }

    /// Warnings produced by the most recent load.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub fn list_backups(&self) -> Result<Vec<String>> {
        self.storage.list_backups()
    }

    pub fn set_backup_retention(&mut self, retention: usize) {
        self.storage.set_retention(retention);
        tracing::debug!(retention, "backup retention updated");
    }

    pub fn restore_backup(&mut self, backup_name: &str) -> Result<usize> {
        let ledger = self.storage.restore(backup_name)?;
        self.load()?;
        tracing::info!(backup = backup_name, "backup restored");
        Ok(ledger.len())
    }

    fn commit(&mut self, next: &Ledger) -> Result<()> {
        self.storage.save(next)?;
        self.load()?;
        Ok(())
    }
}
