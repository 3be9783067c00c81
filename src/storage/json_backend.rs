use chrono::{NaiveDateTime, Utc};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{ensure_dir, PathResolver, STORAGE_SLOT},
    errors::{LedgerError, Result},
    ledger::Ledger,
};

use super::{LoadReport, StorageBackend};

const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;
const MALFORMED_NOTE: &str = "malformed";

/// Stores the raw records as a pretty-printed JSON array in a single file.
#[derive(Clone)]
pub struct JsonStorage {
    slot_file: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let root = PathResolver::resolve_base(root);
        ensure_dir(&root)?;
        let backups_dir = PathResolver::backup_dir_in(&root);
        ensure_dir(&backups_dir)?;
        Ok(Self {
            slot_file: PathResolver::slot_file_in(&root),
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn backup_path(&self, backup_name: &str) -> PathBuf {
        self.backups_dir.join(backup_name)
    }

    fn copy_slot_to_backup(&self, note: Option<&str>) -> Result<Option<PathBuf>> {
        if !self.slot_file.exists() {
            return Ok(None);
        }
        ensure_dir(&self.backups_dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let label = sanitize_backup_note(note);
        let mut attempt = 1;
        let path = loop {
            let mut stem = format!("{STORAGE_SLOT}_{timestamp}");
            if attempt > 1 {
                stem.push_str(&format!("-{attempt}"));
            }
            if let Some(label) = &label {
                stem.push('_');
                stem.push_str(label);
            }
            let candidate = self.backup_path(&format!("{stem}.{BACKUP_EXTENSION}"));
            if !candidate.exists() {
                break candidate;
            }
            attempt += 1;
        };
        fs::copy(&self.slot_file, &path)?;
        tracing::debug!(backup = %path.display(), "backed up storage slot");
        self.prune_backups()?;
        Ok(Some(path))
    }

    /// Keeps the newest `retention` backups of each kind. Copies of malformed
    /// slots are counted apart so they never push out restorable backups.
    fn prune_backups(&self) -> Result<()> {
        let (malformed, regular): (Vec<String>, Vec<String>) = self
            .list_backups()?
            .into_iter()
            .partition(|name| is_malformed_copy(name));
        for name in [regular, malformed]
            .iter()
            .flat_map(|group| group.iter().skip(self.retention))
        {
            let path = self.backup_path(name);
            if let Err(err) = fs::remove_file(&path) {
                tracing::warn!(backup = %path.display(), error = %err, "could not prune backup");
            }
        }
        Ok(())
    }

    /// Copies a slot that failed to parse, unless an identical copy exists.
    fn keep_malformed_slot(&self, data: &str) -> Result<Option<PathBuf>> {
        for name in self.list_backups()? {
            if !is_malformed_copy(&name) {
                continue;
            }
            let path = self.backup_path(&name);
            if fs::read_to_string(&path).is_ok_and(|existing| existing == data) {
                return Ok(Some(path));
            }
        }
        self.copy_slot_to_backup(Some(MALFORMED_NOTE))
    }
}

impl StorageBackend for JsonStorage {
    fn load(&self) -> Result<LoadReport> {
        let mut report = LoadReport {
            ledger: Ledger::new(),
            warnings: Vec::new(),
            path: self.slot_file.clone(),
        };
        if !self.slot_file.exists() {
            return Ok(report);
        }
        let data = fs::read_to_string(&self.slot_file)?;
        match serde_json::from_str::<Ledger>(&data) {
            Ok(ledger) => {
                for date in ledger.duplicate_dates() {
                    report
                        .warnings
                        .push(format!("stored records contain more than one entry for {date}"));
                }
                report.ledger = ledger;
            }
            Err(err) => {
                tracing::warn!(error = %err, "stored records are malformed; starting empty");
                let mut warning = format!("stored records are malformed ({err}); starting empty");
                if let Some(backup) = self.keep_malformed_slot(&data)? {
                    warning.push_str(&format!(", original kept at {}", backup.display()));
                }
                report.warnings.push(warning);
            }
        }
        Ok(report)
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        let json = serde_json::to_string_pretty(ledger)?;
        let tmp = tmp_path(&self.slot_file);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.slot_file)?;
        tracing::debug!(entries = ledger.len(), "saved storage slot");
        Ok(())
    }

    fn backup(&self, note: Option<&str>) -> Result<Option<PathBuf>> {
        self.copy_slot_to_backup(note)
    }

    fn list_backups(&self) -> Result<Vec<String>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(name.to_string());
            }
        }
        entries.sort_by(|a, b| {
            parse_backup_timestamp(b)
                .cmp(&parse_backup_timestamp(a))
                .then_with(|| b.cmp(a))
        });
        Ok(entries)
    }

    fn restore(&self, backup_name: &str) -> Result<Ledger> {
        let path = self.backup_path(backup_name);
        if !path.exists() {
            return Err(LedgerError::Persistence(format!(
                "backup `{backup_name}` not found"
            )));
        }
        let data = fs::read_to_string(&path)?;
        let ledger: Ledger = serde_json::from_str(&data).map_err(|err| {
            LedgerError::Persistence(format!("backup `{backup_name}` is unreadable: {err}"))
        })?;
        self.copy_slot_to_backup(Some("before-restore"))?;
        self.save(&ledger)?;
        Ok(ledger)
    }

    fn slot_path(&self) -> PathBuf {
        self.slot_file.clone()
    }

    fn set_retention(&mut self, retention: usize) {
        self.retention = retention.max(1);
    }
}

fn is_malformed_copy(name: &str) -> bool {
    name.ends_with(&format!("_{MALFORMED_NOTE}.{BACKUP_EXTENSION}"))
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Extracts the timestamp and same-second attempt counter from a backup name
/// shaped like `<slot>_<YYYYMMDD>_<HHMMSS>[-n][_note].json`.
fn parse_backup_timestamp(name: &str) -> Option<(NaiveDateTime, u32)> {
    let stem = name.strip_suffix(&format!(".{BACKUP_EXTENSION}"))?;
    let parts: Vec<&str> = stem.split('_').collect();
    parts.windows(2).find_map(|pair| {
        let (time, attempt) = match pair[1].split_once('-') {
            Some((time, attempt)) => (time, attempt.parse().ok()?),
            None => (pair[1], 1),
        };
        if !is_digits(pair[0], 8) || !is_digits(time, 6) {
            return None;
        }
        NaiveDateTime::parse_from_str(&format!("{}{}", pair[0], time), "%Y%m%d%H%M%S")
            .ok()
            .map(|stamp| (stamp, attempt))
    })
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

pub(crate) fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
