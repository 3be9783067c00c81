use chrono::NaiveDate;

use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{CommandError, CommandResult, ShellContext};
use crate::currency::{format_currency, format_date_with_weekday};
use crate::ledger::{entry::parse_date, RawEntry, UpsertOutcome};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add",
            "Record both holdings for a date (keeps the higher total per date)",
            "add [<YYYY-MM-DD|today> <asset1> <asset2>]",
            cmd_add,
        ),
        CommandEntry::new(
            "delete",
            "Delete the record for a date",
            "delete <YYYY-MM-DD>",
            cmd_delete,
        ),
        CommandEntry::new("clear", "Delete every record", "clear", cmd_clear),
    ]
}

/// Accepts `today` in addition to `YYYY-MM-DD`.
pub(crate) fn resolve_date(
    context: &ShellContext,
    value: &str,
) -> Result<NaiveDate, CommandError> {
    if value.eq_ignore_ascii_case("today") {
        return Ok(context.store.today());
    }
    Ok(parse_date(value)?)
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let entry = match args {
        [] => context.prompt_entry()?,
        [date, asset1, asset2] => {
            let date = resolve_date(context, date)?;
            RawEntry::with_amounts(date, asset1, asset2)?
        }
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: add [<YYYY-MM-DD|today> <asset1> <asset2>]".into(),
            ))
        }
    };
    let outcome = context.store.upsert(entry)?;

    let currency = context.config.currency.as_str();
    let label = format_date_with_weekday(entry.date);
    match outcome {
        UpsertOutcome::Inserted => {
            output::success(format!(
                "New record for {label} saved (total {}).",
                format_currency(entry.total(), currency)
            ));
        }
        UpsertOutcome::Replaced { previous } => {
            output::success(format!(
                "Record for {label} updated: total {} -> {}.",
                format_currency(previous.total(), currency),
                format_currency(entry.total(), currency)
            ));
        }
        UpsertOutcome::Rejected { existing } => {
            output::info(format!(
                "Record for {label} kept: stored total {} is not lower than {}.",
                format_currency(existing.total(), currency),
                format_currency(entry.total(), currency)
            ));
        }
    }
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [date] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: delete <YYYY-MM-DD>".into(),
        ));
    };
    let date = resolve_date(context, date)?;
    let label = format_date_with_weekday(date);

    if context.store.ledger().get(date).is_some()
        && !context.confirm(&format!(
            "Delete the record for {label}? This cannot be undone."
        ))?
    {
        output::info("Operation cancelled.");
        return Ok(());
    }

    if context.store.delete(date)? {
        output::success(format!("Record for {label} deleted."));
    } else {
        output::info(format!("No record for {label}; nothing deleted."));
    }
    Ok(())
}

fn cmd_clear(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let count = context.store.ledger().len();
    if count > 0
        && !context.confirm(&format!(
            "Delete all {count} records? This cannot be undone."
        ))?
    {
        output::info("Operation cancelled.");
        return Ok(());
    }
    context.store.clear()?;
    output::success("All records cleared.");
    Ok(())
}
