use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::errors::Result;

const DEFAULT_DIR_NAME: &str = ".asset_tracker";
const HOME_ENV: &str = "ASSET_TRACKER_HOME";
const BACKUP_DIR: &str = "backups";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const HISTORY_FILE: &str = "history.txt";

/// Name of the single storage slot holding the raw records.
pub const STORAGE_SLOT: &str = "asset_tracker_records";

/// Resolves every on-disk location relative to one base directory.
pub struct PathResolver;

impl PathResolver {
    /// Returns the application data directory: `$ASSET_TRACKER_HOME`, else
    /// `~/.asset_tracker`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn resolve_base(custom: Option<PathBuf>) -> PathBuf {
        custom.unwrap_or_else(Self::base_dir)
    }

    pub fn slot_file_in(base: &Path) -> PathBuf {
        base.join(format!("{STORAGE_SLOT}.json"))
    }

    pub fn backup_dir_in(base: &Path) -> PathBuf {
        base.join(BACKUP_DIR)
    }

    pub fn config_dir_in(base: &Path) -> PathBuf {
        base.join(CONFIG_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        Self::config_dir_in(base).join(CONFIG_FILE)
    }

    /// Line history of the interactive shell.
    pub fn history_file_in(base: &Path) -> PathBuf {
        base.join(HISTORY_FILE)
    }
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_rooted_at_base() {
        let base = PathBuf::from("/data");
        assert_eq!(
            PathResolver::slot_file_in(&base),
            PathBuf::from("/data/asset_tracker_records.json")
        );
        assert_eq!(
            PathResolver::config_file_in(&base),
            PathBuf::from("/data/config/config.json")
        );
        assert_eq!(PathResolver::resolve_base(Some(base.clone())), base);
    }
}
