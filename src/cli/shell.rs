use std::io::{self, BufRead};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::cli::core::{CliError, CliMode, LoopControl, ShellContext};
use crate::cli::output;

pub const SCRIPT_MODE_ENV: &str = "PARKING_LEDGER_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_MODE_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

/// What a line source hands back to the driver.
enum Input {
    Line(String),
    Cancelled,
    Closed,
}

/// Feeds lines to the context until the source closes or `exit` runs.
/// The prompt is rebuilt before every read so it tracks the manual clock.
fn drive<F>(context: &mut ShellContext, mut next: F) -> Result<(), CliError>
where
    F: FnMut(&str) -> Result<Input, CliError>,
{
    while context.running {
        let prompt = context.prompt();
        match next(&prompt)? {
            Input::Line(line) => {
                if context.run_line(&line) == LoopControl::Exit {
                    break;
                }
            }
            Input::Cancelled => continue,
            Input::Closed => break,
        }
    }
    Ok(())
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.command_names())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    output::info("Parking Ledger shell. Type `help` to list commands.");

    drive(context, |prompt| match editor.readline(prompt) {
        Ok(line) => {
            if !line.trim().is_empty() {
                editor.add_history_entry(line.trim()).ok();
            }
            Ok(Input::Line(line))
        }
        // Ctrl-C drops the pending line only
        Err(ReadlineError::Interrupted) => Ok(Input::Cancelled),
        Err(ReadlineError::Eof) => Ok(Input::Closed),
        Err(err) => Err(err.into()),
    })?;

    context.farewell();
    output::info("Exiting shell.");
    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let mut lines = io::stdin().lock().lines();
    drive(context, |_prompt| match lines.next() {
        Some(line) => Ok(Input::Line(line?)),
        None => Ok(Input::Closed),
    })
}

struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names.into_iter().map(str::to_ascii_lowercase).collect();
        commands.sort();
        commands.dedup();
        Self { commands }
    }

    fn candidates(&self, prefix: &str) -> Vec<Pair> {
        let needle = prefix.to_ascii_lowercase();
        self.commands
            .iter()
            .filter(|name| name.starts_with(&needle))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect()
    }

    /// Completes the command word only; plates are free text.
    fn complete_head(&self, head: &str) -> (usize, Vec<Pair>) {
        let word = head.trim_start();
        let start = head.len() - word.len();
        if word.contains(char::is_whitespace) {
            return (head.len(), Vec::new());
        }
        (start, self.candidates(word))
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
        Ok(self.complete_head(&line[..pos]))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}
