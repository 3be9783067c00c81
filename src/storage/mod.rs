pub mod json_backend;
pub mod transfer;

use std::path::PathBuf;

use crate::{errors::Result, ledger::Ledger};

/// Outcome of reading the storage slot. Missing or malformed data yields an
/// empty ledger with `warnings` describing what was skipped.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub ledger: Ledger,
    pub warnings: Vec<String>,
    pub path: PathBuf,
}

/// Abstraction over the place the raw records live.
pub trait StorageBackend: Send + Sync {
    fn load(&self) -> Result<LoadReport>;
    fn save(&self, ledger: &Ledger) -> Result<()>;
    /// Copies the current slot into the backups directory. Returns `None`
    /// when there is nothing on disk to back up.
    fn backup(&self, note: Option<&str>) -> Result<Option<PathBuf>>;
    /// Backup file names, newest first.
    fn list_backups(&self) -> Result<Vec<String>>;
    fn restore(&self, backup_name: &str) -> Result<Ledger>;
    /// Number of backups kept per kind; values below one keep one.
    fn set_retention(&mut self, retention: usize);
    fn slot_path(&self) -> PathBuf;
}

pub use json_backend::JsonStorage;
pub use transfer::{export_file_name, export_json, parse_import, EXPORT_MIME_TYPE};
