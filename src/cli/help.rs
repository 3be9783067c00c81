use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub fn print_overview(registry: &CommandRegistry) {
    output::section("Available commands");
    let width = registry
        .names()
        .map(str::len)
        .max()
        .unwrap_or_default();
    for entry in registry.entries() {
        output::line(format!("  {:<width$}  {}", entry.name, entry.description));
    }
    output::hint("Use `help <command>` for usage details.");
}

pub fn print_command(entry: &CommandEntry) {
    output::section(format!("Help: {}", entry.name));
    output::line(format!("  {}", entry.description));
    output::line(format!("  usage: {}", entry.usage));
}
