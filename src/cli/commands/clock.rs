use super::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::clock::{Clock, ManualClock};
use crate::errors::ClockRangeError;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("now", "Show the ledger clock", "now", cmd_now),
        CommandDefinition::new(
            "time",
            "Set the manual clock to SECONDS after its origin",
            "time <SECONDS>",
            cmd_time,
        ),
        CommandDefinition::new(
            "advance",
            "Move the manual clock forward",
            "advance <SECONDS>",
            cmd_advance,
        ),
    ]
}

fn cmd_now(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let now = context.ledger.clock().now();
    match &context.manual_clock {
        Some(clock) => output::info(format!(
            "Now: {} (t+{}s)",
            now.format("%Y-%m-%d %H:%M:%S"),
            clock.elapsed_since_origin()
        )),
        None => output::info(format!("Now: {}", now.format("%Y-%m-%d %H:%M:%S"))),
    }
    Ok(())
}

fn cmd_time(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let seconds = seconds_arg(args, "time <SECONDS>")?;
    let clock = manual_clock(context, "time")?;
    clock.set_now(seconds).map_err(out_of_range)?;
    output::info(format!("Clock set to t+{}s.", clock.elapsed_since_origin()));
    Ok(())
}

fn cmd_advance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let seconds = seconds_arg(args, "advance <SECONDS>")?;
    if seconds < 0 {
        return Err(CommandError::InvalidArguments(
            "The clock only moves forward; use `time` to jump back.".into(),
        ));
    }
    let clock = manual_clock(context, "advance")?;
    clock.advance(seconds).map_err(out_of_range)?;
    output::info(format!("Clock advanced to t+{}s.", clock.elapsed_since_origin()));
    Ok(())
}

fn manual_clock<'a>(
    context: &'a ShellContext,
    command: &str,
) -> Result<&'a ManualClock, CommandError> {
    context.manual_clock.as_ref().ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "`{command}` needs the manual clock; start the shell with PARKING_LEDGER_CLOCK=manual."
        ))
    })
}

fn out_of_range(err: ClockRangeError) -> CommandError {
    CommandError::InvalidArguments(format!("{err}; the clock was not moved."))
}

fn seconds_arg(args: &[&str], usage: &str) -> Result<i64, CommandError> {
    match args {
        [raw] => raw.parse().map_err(|_| {
            CommandError::InvalidArguments(format!("`{raw}` is not a whole number of seconds."))
        }),
        _ => Err(CommandError::InvalidArguments(format!("Usage: {usage}"))),
    }
}
