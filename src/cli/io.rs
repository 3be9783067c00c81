//! Interactive prompts. Only reached in interactive mode; script mode takes
//! every value from the command line.

use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};

use crate::cli::shell_context::CommandError;
use crate::ledger::entry::{parse_amount, parse_date, RawEntry};

/// Prompt the user for confirmation with a yes/no question.
pub fn confirm_action(
    theme: &ColorfulTheme,
    prompt: &str,
    default: bool,
) -> Result<bool, CommandError> {
    Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(CommandError::from)
}

/// Asks for the date and both amounts of a new record. The date defaults to
/// `today`; each answer is validated before the next question.
pub fn prompt_entry(
    theme: &ColorfulTheme,
    today: NaiveDate,
    labels: (&str, &str),
) -> Result<RawEntry, CommandError> {
    let date: String = Input::with_theme(theme)
        .with_prompt("Date (YYYY-MM-DD)")
        .default(today.to_string())
        .validate_with(|value: &String| {
            parse_date(value).map(|_| ()).map_err(|err| err.to_string())
        })
        .interact_text()?;
    let asset1 = prompt_amount(theme, labels.0)?;
    let asset2 = prompt_amount(theme, labels.1)?;
    Ok(RawEntry::new(parse_date(&date)?, asset1, asset2))
}

fn prompt_amount(theme: &ColorfulTheme, label: &str) -> Result<f64, CommandError> {
    let raw: String = Input::with_theme(theme)
        .with_prompt(label)
        .validate_with(|value: &String| {
            parse_amount(label, value).map(|_| ()).map_err(|err| err.to_string())
        })
        .interact_text()?;
    Ok(parse_amount(label, &raw)?)
}
