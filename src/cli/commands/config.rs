use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{CommandError, CommandResult, ShellContext};
use crate::config::Config;
use crate::currency::currency_symbol;

pub(crate) const KEYS: [&str; 6] = [
    "currency",
    "asset1_label",
    "asset2_label",
    "list_range",
    "chart_range",
    "backup_retention",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show or change display and backup preferences",
        "config [show|set <key> <value>|reset]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            show(&context.config);
            Ok(())
        }
        ["set", key, value @ ..] if !value.is_empty() => {
            let value = value.join(" ");
            apply(&mut context.config, key, &value)?;
            context.persist_config()?;
            output::success(format!("{key} set to {value}."));
            Ok(())
        }
        ["reset"] => {
            if !context.confirm("Reset every preference to its default?")? {
                output::info("Operation cancelled.");
                return Ok(());
            }
            context.config = Config::default();
            context.persist_config()?;
            output::success("Preferences reset to defaults.");
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(format!(
            "usage: config [show|set <key> <value>|reset]; keys: {}",
            KEYS.join(", ")
        ))),
    }
}

fn show(config: &Config) {
    output::section("Preferences");
    output::line(format!(
        "  currency         : {} ({})",
        config.currency,
        currency_symbol(&config.currency)
    ));
    output::line(format!("  asset1_label     : {}", config.asset1_label));
    output::line(format!("  asset2_label     : {}", config.asset2_label));
    output::line(format!("  list_range       : {}", config.list_range));
    output::line(format!("  chart_range      : {}", config.chart_range));
    output::line(format!("  backup_retention : {}", config.backup_retention));
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<(), CommandError> {
    let value = value.trim();
    match key.to_lowercase().as_str() {
        "currency" => {
            if value.is_empty() || !value.chars().all(|ch| ch.is_ascii_alphabetic()) {
                return Err(CommandError::InvalidArguments(format!(
                    "`{value}` is not a currency code such as TWD or USD"
                )));
            }
            config.currency = value.to_ascii_uppercase();
        }
        "asset1_label" => config.asset1_label = non_empty(value)?,
        "asset2_label" => config.asset2_label = non_empty(value)?,
        "list_range" => config.list_range = value.parse()?,
        "chart_range" => config.chart_range = value.parse()?,
        "backup_retention" => {
            config.backup_retention = value
                .parse()
                .ok()
                .filter(|retention: &usize| *retention >= 1)
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!(
                        "backup_retention must be a positive whole number, got `{value}`"
                    ))
                })?;
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown key `{other}`; expected one of {}",
                KEYS.join(", ")
            )))
        }
    }
    Ok(())
}

fn non_empty(value: &str) -> Result<String, CommandError> {
    if value.is_empty() {
        return Err(CommandError::InvalidArguments("labels cannot be empty".into()));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::RangeSelection;

    #[test]
    fn apply_updates_known_keys() {
        let mut config = Config::default();
        apply(&mut config, "currency", "usd").unwrap();
        apply(&mut config, "chart_range", "90").unwrap();
        apply(&mut config, "asset1_label", "Bank").unwrap();
        assert_eq!(config.currency, "USD");
        assert_eq!(config.chart_range, RangeSelection::Days(90));
        assert_eq!(config.asset1_label, "Bank");
    }

    #[test]
    fn apply_rejects_bad_values() {
        let mut config = Config::default();
        assert!(apply(&mut config, "currency", "N$").is_err());
        assert!(apply(&mut config, "backup_retention", "-1").is_err());
        assert!(apply(&mut config, "backup_retention", "0").is_err());
        assert!(apply(&mut config, "colour", "red").is_err());
        assert_eq!(config, Config::default());
    }
}
