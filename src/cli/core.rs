//! Shell context, dispatch, and error reporting.

use std::io;

use rustyline::error::ReadlineError;
use shell_words::split;
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    clock::{Clock, ManualClock, SystemClock},
    config::{ClockMode, Config, ConfigManager},
    errors::{ConfigError, LedgerError},
    ledger::Ledger,
    vehicle::PlateParseError,
};

use super::commands::{all_definitions, CommandRegistry};
use super::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Errors raised by a single command. The shell reports them and keeps going.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Plate(#[from] PlateParseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error("exit requested")]
    ExitRequested,
}

/// Errors that stop the shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub ledger: Ledger<Box<dyn Clock>>,
    /// Handle onto the ledger's clock when it runs on manual time.
    pub manual_clock: Option<ManualClock>,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let mut config = config_manager.load()?;
        config.apply_env_overrides()?;
        Ok(Self::with_config(mode, config_manager, config))
    }

    pub fn with_config(mode: CliMode, config_manager: ConfigManager, config: Config) -> Self {
        let (clock, manual_clock): (Box<dyn Clock>, Option<ManualClock>) = match config.clock {
            ClockMode::System => (Box::new(SystemClock), None),
            ClockMode::Manual => {
                let clock = ManualClock::new();
                (Box::new(clock.clone()), Some(clock))
            }
        };
        tracing::info!(
            rate = %config.rate(),
            clock = config.clock.label(),
            "parking ledger shell started"
        );

        Self {
            mode,
            registry: CommandRegistry::new(all_definitions()),
            ledger: Ledger::new(config.rate(), clock),
            manual_clock,
            config_manager,
            config,
            last_command: None,
            running: true,
        }
    }

    pub fn prompt(&self) -> String {
        match &self.manual_clock {
            Some(clock) => format!("parking[t+{}s]> ", clock.elapsed_since_origin()),
            None => "parking> ".to_string(),
        }
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let handler = self.registry.get(command).map(|definition| definition.handler);
        if let Some(handler) = handler {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    /// Runs one shell line. Blank lines and `#` comments are skipped.
    pub(crate) fn execute_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = split(line).map_err(|err| {
            CommandError::InvalidArguments(format!("Could not read `{}`: {err}", line.trim()))
        })?;
        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        if raw.starts_with('#') {
            return Ok(LoopControl::Continue);
        }

        self.last_command = Some(line.trim().to_string());
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        let control = self.dispatch(&raw.to_lowercase(), raw, &args)?;
        if control == LoopControl::Exit {
            self.running = false;
        }
        Ok(control)
    }

    /// Runs one line and reports any command error, leaving the shell alive.
    pub(crate) fn run_line(&mut self, line: &str) -> LoopControl {
        match self.execute_line(line) {
            Ok(control) => control,
            Err(err) => {
                self.report_error(err);
                LoopControl::Continue
            }
        }
    }

    /// Warns about state that is lost when the shell exits.
    pub(crate) fn farewell(&self) {
        let snapshot = self.ledger.snapshot();
        if !snapshot.active.is_empty() {
            output::warning(format!(
                "{} vehicle(s) still parked; sessions are not persisted.",
                snapshot.active.len()
            ));
        }
        if !snapshot.settled.is_empty() {
            output::warning(format!(
                "{} unsettled balance(s) discarded; run `settle` first to bill them.",
                snapshot.settled.len()
            ));
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = self.closest_command(input) {
            output::hint(format!("Suggestion: `{}`?", best));
        }
    }

    fn closest_command(&self, input: &str) -> Option<&'static str> {
        let needle = input.to_lowercase();
        self.registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance)
            .filter(|(distance, _)| *distance <= 3)
            .map(|(_, name)| name)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(&message);
                output::hint("Use `help <command>` for usage details.");
            }
            other => {
                tracing::debug!(error = %other, command = ?self.last_command, "command failed");
                output::error(other);
            }
        }
    }
}
