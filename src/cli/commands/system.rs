use super::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::output;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "config",
            "Show or save the shell configuration",
            "config [save]",
            cmd_config,
        ),
        CommandDefinition::new("version", "Show build metadata", "version", cmd_version),
        CommandDefinition::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandDefinition::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            output::section("Configuration");
            output::info(format!("  Path         : {}", context.config_manager.path().display()));
            output::info(format!("  Rate         : {}", context.config.rate()));
            output::info(format!("  Clock        : {}", context.config.clock.label()));
            Ok(())
        }
        ["save"] => {
            context.config_manager.save(&context.config)?;
            output::success(format!(
                "Configuration saved to {}.",
                context.config_manager.path().display()
            ));
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments("Usage: config [save]".into())),
    }
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section(format!("Parking Ledger {}", env!("CARGO_PKG_VERSION")));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first().map(|name| name.to_lowercase()) {
        if let Some(command) = context.registry.get(&name) {
            help::print_command(command);
        } else {
            context.suggest_command(args[0]);
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
