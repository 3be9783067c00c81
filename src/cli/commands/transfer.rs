use std::{fs, path::PathBuf};

use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{CommandError, CommandResult, ShellContext};
use crate::ledger::LedgerState;
use crate::storage::parse_import;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "import",
            "Replace all records with the contents of a JSON export",
            "import <file>",
            cmd_import,
        ),
        CommandEntry::new(
            "export",
            "Write all records to asset-records-<date>.json",
            "export [directory]",
            cmd_export,
        ),
        CommandEntry::new(
            "backups",
            "List automatic backups, newest first",
            "backups",
            cmd_backups,
        ),
        CommandEntry::new(
            "restore",
            "Replace all records with a backup",
            "restore <backup name>",
            cmd_restore,
        ),
    ]
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [file] = args else {
        return Err(CommandError::InvalidArguments("usage: import <file>".into()));
    };
    let json = fs::read_to_string(file)?;
    // Validate before asking, so an invalid file never prompts.
    let incoming = parse_import(&json)?.len();

    if context.store.state() == LedgerState::Populated {
        let existing = context.store.ledger().len();
        let prompt = format!(
            "Replace {existing} existing records with {incoming} imported records?"
        );
        if !context.confirm(&prompt)? {
            output::info("Import cancelled.");
            return Ok(());
        }
    }

    let imported = context.store.import_json(&json)?;
    output::success(format!("Imported {imported} records from {file}."));
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let dir = match args {
        [] => PathBuf::from("."),
        [dir] => PathBuf::from(*dir),
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: export [directory]".into(),
            ))
        }
    };
    if context.store.ledger().is_empty() {
        output::warning("There are no records; the export will be an empty list.");
    }
    let path = context.store.export_to_dir(&dir)?;
    output::success(format!(
        "Exported {} records to {}.",
        context.store.ledger().len(),
        path.display()
    ));
    Ok(())
}

fn cmd_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let backups = context.store.list_backups()?;
    if backups.is_empty() {
        output::info("No backups yet.");
        return Ok(());
    }
    output::section("Backups");
    for (index, name) in backups.iter().enumerate() {
        output::line(format!("{:>3}. {name}", index + 1));
    }
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [target] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: restore <backup name>".into(),
        ));
    };
    let name = resolve_backup(context, target)?;
    if !context.confirm(&format!(
        "Replace the current records with backup {name}?"
    ))? {
        output::info("Restore cancelled.");
        return Ok(());
    }
    let restored = context.store.restore_backup(&name)?;
    output::success(format!("Restored {restored} records from {name}."));
    Ok(())
}

/// Accepts a file name or the 1-based position shown by `backups`.
fn resolve_backup(context: &ShellContext, target: &str) -> Result<String, CommandError> {
    let Ok(position) = target.parse::<usize>() else {
        return Ok(target.to_string());
    };
    let backups = context.store.list_backups()?;
    position
        .checked_sub(1)
        .and_then(|index| backups.get(index))
        .cloned()
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "there is no backup number {position}; run `backups` to list them"
            ))
        })
}
