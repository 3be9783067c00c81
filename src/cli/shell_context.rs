//! Shell state, command dispatch, and CLI error types.

use std::{env, io};

use dialoguer::theme::ColorfulTheme;
use thiserror::Error;

use crate::{
    cli::{
        commands,
        io as cli_io,
        output::{self, OutputPreferences},
        registry::{CommandEntry, CommandRegistry},
    },
    config::{Config, ConfigManager},
    core::{
        clock::{Clock, FixedClock, SystemClock},
        ledger_store::LedgerStore,
    },
    errors::LedgerError,
    ledger::{entry::parse_date, RawEntry},
    storage::JsonStorage,
};

const SCRIPT_ENV: &str = "ASSET_TRACKER_CLI_SCRIPT";
const TODAY_ENV: &str = "ASSET_TRACKER_TODAY";
const SUGGESTION_DISTANCE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    /// Commands come from stdin; confirmations are accepted automatically.
    Script,
}

impl CliMode {
    pub fn from_env() -> Self {
        if env::var_os(SCRIPT_ENV).is_some() {
            CliMode::Script
        } else {
            CliMode::Interactive
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Command(#[from] CommandError),
}

pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) registry: CommandRegistry,
    pub(crate) store: LedgerStore,
    pub(crate) config: Config,
    config_manager: ConfigManager,
    theme: ColorfulTheme,
    pub(crate) running: bool,
}

impl ShellContext {
    /// Builds a shell over the default data directory, honouring
    /// `ASSET_TRACKER_HOME` and `ASSET_TRACKER_TODAY`.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let storage = JsonStorage::new(None, Some(config.backup_retention))?;
        let clock = clock_from_env()?;
        let store = LedgerStore::open(Box::new(storage), clock)?;
        Ok(Self::with_parts(mode, store, config, config_manager))
    }

    pub fn with_parts(
        mode: CliMode,
        store: LedgerStore,
        config: Config,
        config_manager: ConfigManager,
    ) -> Self {
        output::set_preferences(OutputPreferences {
            plain: mode == CliMode::Script,
        });
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);
        let context = Self {
            mode,
            registry,
            store,
            config,
            config_manager,
            theme: ColorfulTheme::default(),
            running: true,
        };
        for warning in context.store.warnings() {
            output::warning(warning);
        }
        context
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn prompt(&self) -> String {
        format!("assets ({})> ", self.store.ledger().len())
    }

    /// Saves the preferences and applies the ones the store reads at runtime.
    pub(crate) fn persist_config(&mut self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        self.store.set_backup_retention(self.config.backup_retention);
        Ok(())
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.get(command).map(|entry| entry.handler) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(command);
            Ok(LoopControl::Continue)
        }
    }

    /// Tokenizes and runs one line of input.
    pub fn process_line(&mut self, line: &str) -> Result<bool, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                return Ok(true);
            }
        };
        let Some((command, args)) = tokens.split_first() else {
            return Ok(true);
        };
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        match self.dispatch(command, &args)? {
            LoopControl::Continue => Ok(true),
            LoopControl::Exit => {
                self.running = false;
                Ok(false)
            }
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        if let Some(name) = self.registry.suggest(input, SUGGESTION_DISTANCE) {
            output::hint(format!("Did you mean `{name}`?"));
        }
    }

    /// Collects a new record through prompts. Script mode has no prompts, so
    /// the values must come as arguments.
    pub(crate) fn prompt_entry(&self) -> Result<RawEntry, CommandError> {
        if self.mode == CliMode::Script {
            return Err(CommandError::InvalidArguments(
                "usage: add <YYYY-MM-DD|today> <asset1> <asset2>".into(),
            ));
        }
        let labels = (
            self.config.asset1_label.as_str(),
            self.config.asset2_label.as_str(),
        );
        cli_io::prompt_entry(&self.theme, self.store.today(), labels)
    }

    /// Asks before a destructive action. Script mode always proceeds.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit shell?", true)?)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            other => output::error(other),
        }
    }
}

fn clock_from_env() -> Result<Box<dyn Clock>, LedgerError> {
    match env::var(TODAY_ENV) {
        Ok(value) if !value.trim().is_empty() => {
            let date = parse_date(&value)?;
            tracing::debug!(%date, "clock pinned from environment");
            Ok(Box::new(FixedClock::new(date)))
        }
        _ => Ok(Box::new(SystemClock)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::RangeSelection;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn script_context() -> (ShellContext, TempDir) {
        let temp = TempDir::new().unwrap();
        let storage = JsonStorage::new(Some(temp.path().to_path_buf()), Some(3)).unwrap();
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        let store = LedgerStore::open(Box::new(storage), Box::new(clock)).unwrap();
        let config_manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let context =
            ShellContext::with_parts(CliMode::Script, store, Config::default(), config_manager);
        (context, temp)
    }

    #[test]
    fn add_and_delete_through_dispatch() {
        let (mut context, _guard) = script_context();
        assert!(context.process_line("add 2024-01-01 100 50").unwrap());
        assert!(context.process_line("add 2024-01-01 50 50").unwrap());
        assert_eq!(context.store().derived()[0].total, 150.0);
        assert!(context.process_line("delete 2024-01-01").unwrap());
        assert!(context.store().ledger().is_empty());
    }

    #[test]
    fn bad_arguments_surface_as_errors() {
        let (mut context, _guard) = script_context();
        assert!(matches!(
            context.process_line("add 2024-01-01 abc 1"),
            Err(CommandError::Core(LedgerError::InvalidInput(_)))
        ));
        assert!(matches!(
            context.process_line("add 2024-01-01"),
            Err(CommandError::InvalidArguments(_))
        ));
    }

    #[test]
    fn unknown_commands_do_not_fail() {
        let (mut context, _guard) = script_context();
        assert!(context.process_line("lst").unwrap());
        assert!(context.process_line("").unwrap());
    }

    #[test]
    fn range_command_persists_config() {
        let (mut context, guard) = script_context();
        context.process_line("range list 90").unwrap();
        assert_eq!(context.config().list_range, RangeSelection::Days(90));
        let reloaded = ConfigManager::with_base_dir(guard.path().to_path_buf())
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(reloaded.list_range, RangeSelection::Days(90));
    }

    #[test]
    fn retention_change_applies_within_the_session() {
        let (mut context, guard) = script_context();
        let import = guard.path().join("import.json");
        std::fs::write(&import, r#"[{"date":"2024-01-05","asset1":1,"asset2":1}]"#).unwrap();
        let import_line = format!("import \"{}\"", import.display());

        context.process_line("add 2024-01-01 1 1").unwrap();
        context.process_line("config set backup_retention 1").unwrap();
        context.process_line(&import_line).unwrap();
        context.process_line(&import_line).unwrap();
        assert_eq!(context.store().list_backups().unwrap().len(), 1);

        context.process_line("config reset").unwrap();
        for _ in 0..6 {
            context.process_line(&import_line).unwrap();
        }
        assert_eq!(
            context.store().list_backups().unwrap().len(),
            Config::default().backup_retention
        );
    }

    #[test]
    fn exit_stops_the_loop() {
        let (mut context, _guard) = script_context();
        assert!(!context.process_line("exit").unwrap());
        assert!(!context.running);
    }
}
