use std::{
    borrow::Cow,
    fmt,
    io::{self, BufRead},
};

use colored::Colorize;
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::cli::commands::config::KEYS as CONFIG_KEYS;
use crate::cli::output;
use crate::cli::registry::CommandRegistry;
use crate::cli::shell_context::{CliError, CliMode, ShellContext};
use crate::core::utils::PathResolver;
use crate::ledger::PRESET_RANGES;

pub fn run_cli() -> Result<(), CliError> {
    let mode = CliMode::from_env();
    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.registry())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    let history = PathResolver::history_file_in(&PathResolver::base_dir());
    if editor.load_history(&history).is_err() {
        tracing::debug!(path = %history.display(), "no shell history loaded");
    }
    output::info("Type `help` to list commands.");

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                match context.process_line(trimmed) {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(err) => context.report_error(err),
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    if let Err(err) = editor.save_history(&history) {
        tracing::warn!(path = %history.display(), error = %err, "could not save shell history");
    }
    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        match context.process_line(&line) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => context.report_error(err),
        }
    }
    Ok(())
}

/// Completion and usage hints for the interactive editor.
struct CommandHelper {
    /// `(name, arguments)` sorted by name.
    commands: Vec<(&'static str, &'static str)>,
}

impl CommandHelper {
    fn new(registry: &CommandRegistry) -> Self {
        let mut commands: Vec<_> = registry
            .entries()
            .map(|entry| (entry.name, entry.arguments()))
            .collect();
        commands.sort_unstable();
        Self { commands }
    }

    fn arguments(&self, name: &str) -> Option<&'static str> {
        self.commands
            .iter()
            .find(|(command, _)| command.eq_ignore_ascii_case(name))
            .map(|(_, arguments)| *arguments)
    }

    fn names(&self) -> Vec<String> {
        self.commands.iter().map(|(name, _)| name.to_string()).collect()
    }

    /// Values worth offering for the argument after `before`.
    fn candidates(&self, command: &str, before: &[&str]) -> Vec<String> {
        let ranges = || -> Vec<String> {
            PRESET_RANGES.iter().map(ToString::to_string).collect()
        };
        let words = |items: &[&str]| -> Vec<String> {
            items.iter().map(ToString::to_string).collect()
        };
        match (command, before) {
            ("list" | "chart", []) => ranges(),
            ("range", []) => words(&["list", "chart"]),
            ("range", [_]) => ranges(),
            ("add" | "delete", []) => words(&["today"]),
            ("config", []) => words(&["show", "set", "reset"]),
            ("config", ["set"]) => words(&CONFIG_KEYS),
            ("config", ["set", key]) if key.ends_with("_range") => ranges(),
            ("help", []) => self.names(),
            _ => Vec::new(),
        }
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let mut words: Vec<&str> = prefix.split_whitespace().collect();
        let current = if prefix.ends_with(char::is_whitespace) {
            ""
        } else {
            words.pop().unwrap_or("")
        };
        let start = pos - current.len();
        let needle = current.to_ascii_lowercase();

        let options = match words.split_first() {
            None => self.names(),
            Some((command, before)) => self.candidates(&command.to_ascii_lowercase(), before),
        };
        let pairs = options
            .into_iter()
            .filter(|option| option.to_ascii_lowercase().starts_with(&needle))
            .map(|option| Pair {
                display: option.clone(),
                replacement: option,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    /// After `<command> ` shows the rest of that command's usage.
    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos < line.len() || !line.ends_with(' ') {
            return None;
        }
        let mut words = line.split_whitespace();
        let command = words.next()?;
        if words.next().is_some() {
            return None;
        }
        let arguments = self.arguments(command)?;
        (!arguments.is_empty()).then(|| arguments.to_string())
    }
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        if output::preferences().plain {
            Cow::Borrowed(hint)
        } else {
            Cow::Owned(hint.dimmed().to_string())
        }
    }
}

impl Validator for CommandHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not parse command: {}", self.message)
    }
}
