use crate::cli::chart::{render_delta_chart, render_total_chart};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{CommandError, CommandResult, ShellContext};
use crate::currency::{format_currency, format_date_with_weekday, format_percent, format_signed};
use crate::ledger::{RangeSelection, PRESET_RANGES};

const CHART_WIDTH: usize = 40;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "list",
            "List records newest first",
            "list [all|<days>]",
            cmd_list,
        ),
        CommandEntry::new(
            "chart",
            "Chart total assets and daily changes",
            "chart [all|<days>]",
            cmd_chart,
        ),
        CommandEntry::new(
            "summary",
            "Show the latest total and the gain since the first record",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new(
            "range",
            "Show or set the default range of the list or chart view",
            "range [list|chart] [all|<days>]",
            cmd_range,
        ),
    ]
}

fn describe(range: RangeSelection) -> String {
    match range {
        RangeSelection::All => "all time".into(),
        RangeSelection::Days(1) => "last day".into(),
        RangeSelection::Days(days) => format!("last {days} days"),
    }
}

fn range_arg(args: &[&str], default: RangeSelection) -> Result<RangeSelection, CommandError> {
    match args {
        [] => Ok(default),
        [value] => Ok(value.parse()?),
        _ => Err(CommandError::InvalidArguments(
            "expected at most one range argument".into(),
        )),
    }
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let range = range_arg(args, context.config.list_range)?;
    let entries = context.store.filter(range);
    output::section(format!("Records ({})", describe(range)));
    if entries.is_empty() {
        output::info("No records to show.");
        return Ok(());
    }

    let currency = context.config.currency.as_str();
    let (label1, label2) = (&context.config.asset1_label, &context.config.asset2_label);
    for entry in entries.iter().rev() {
        output::line(format!(
            "{}  total {:>14}  change {:>13}  {label1} {} / {label2} {}",
            format_date_with_weekday(entry.date),
            format_currency(entry.total, currency),
            format_signed(entry.delta_total, currency),
            format_currency(entry.asset1, currency),
            format_currency(entry.asset2, currency),
        ));
    }
    Ok(())
}

fn cmd_chart(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let range = range_arg(args, context.config.chart_range)?;
    let entries = context.store.filter(range);
    if entries.is_empty() {
        output::info(format!("No records to chart ({}).", describe(range)));
        return Ok(());
    }

    let config = &context.config;
    output::section(format!("Total assets ({})", describe(range)));
    for line in render_total_chart(&entries, &config.currency, CHART_WIDTH) {
        output::line(line);
    }
    output::section(format!("Daily change ({})", describe(range)));
    let labels = (config.asset1_label.as_str(), config.asset2_label.as_str());
    for line in render_delta_chart(&entries, labels, &config.currency, CHART_WIDTH) {
        output::line(line);
    }
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let Some(summary) = context.store.summary() else {
        output::info("No records yet. Add the first one with `add`.");
        return Ok(());
    };
    let currency = context.config.currency.as_str();
    output::section("Summary");
    output::line(format!(
        "Latest record:   {}",
        format_date_with_weekday(summary.latest_date)
    ));
    output::line(format!(
        "Latest total:    {}",
        format_currency(summary.latest_total, currency)
    ));
    let percent = summary
        .gain_percent
        .map(|value| format!(" ({})", format_percent(value)))
        .unwrap_or_default();
    output::line(format!(
        "Gain since {}: {}{percent}",
        summary.first_date,
        format_signed(summary.total_gain, currency)
    ));
    output::line(format!("Records:         {}", summary.entry_count));
    Ok(())
}

fn cmd_range(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let presets: Vec<String> = PRESET_RANGES.iter().map(ToString::to_string).collect();
    match args {
        [] => {
            output::info(format!("list:  {}", describe(context.config.list_range)));
            output::info(format!("chart: {}", describe(context.config.chart_range)));
            output::hint(format!("Presets: {}", presets.join(", ")));
            Ok(())
        }
        [view, value] => {
            let range: RangeSelection = value.parse()?;
            match view.to_lowercase().as_str() {
                "list" => context.config.list_range = range,
                "chart" => context.config.chart_range = range,
                other => {
                    return Err(CommandError::InvalidArguments(format!(
                        "unknown view `{other}`; use `list` or `chart`"
                    )))
                }
            }
            context.persist_config()?;
            output::success(format!("{view} range set to {}.", describe(range)));
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: range [list|chart] [all|<days>]".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_ranges() {
        assert_eq!(describe(RangeSelection::All), "all time");
        assert_eq!(describe(RangeSelection::Days(30)), "last 30 days");
    }

    #[test]
    fn range_argument_falls_back_to_default() {
        assert_eq!(
            range_arg(&[], RangeSelection::Days(7)).unwrap(),
            RangeSelection::Days(7)
        );
        assert_eq!(range_arg(&["all"], RangeSelection::Days(7)).unwrap(), RangeSelection::All);
        assert!(range_arg(&["x"], RangeSelection::All).is_err());
        assert!(range_arg(&["1", "2"], RangeSelection::All).is_err());
    }
}
