use super::{json_flag, plate_arg, CommandDefinition};
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("park", "Start a parking session", "park <PLATE>", cmd_park),
        CommandDefinition::new(
            "withdraw",
            "End a parking session",
            "withdraw <PLATE>",
            cmd_withdraw,
        ),
        CommandDefinition::new(
            "bill",
            "Show the amount a vehicle owes right now",
            "bill <PLATE>",
            cmd_bill,
        ),
        CommandDefinition::new(
            "settle",
            "Close the billing period and print charges",
            "settle [--json]",
            cmd_settle,
        ),
        CommandDefinition::new(
            "status",
            "Show parked vehicles and settled balances",
            "status [--json]",
            cmd_status,
        ),
    ]
}

fn cmd_park(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let plate = plate_arg(args, "park <PLATE>")?;
    context.ledger.park(plate)?;
    output::success(format!("Vehicle {plate} parked."));
    Ok(())
}

fn cmd_withdraw(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let plate = plate_arg(args, "withdraw <PLATE>")?;
    context.ledger.withdraw(&plate)?;
    output::success(format!("Vehicle {plate} withdrawn."));
    Ok(())
}

fn cmd_bill(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let plate = plate_arg(args, "bill <PLATE>")?;
    let amount = context.ledger.current_bill(&plate);
    output::info(format!("Current bill for {plate}: {amount}"));
    Ok(())
}

fn cmd_settle(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let as_json = json_flag(args, "settle [--json]")?;
    let settlement = context.ledger.settle_all();

    if as_json {
        output::raw(serde_json::to_string_pretty(&settlement)?);
        return Ok(());
    }

    output::section("Settlement");
    if settlement.is_empty() {
        output::info("No charges for this period.");
        return Ok(());
    }
    for (plate, amount) in &settlement {
        output::info(format!("{plate}: {amount}"));
    }
    Ok(())
}

fn cmd_status(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let as_json = json_flag(args, "status [--json]")?;
    let snapshot = context.ledger.snapshot();

    if as_json {
        output::raw(serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    output::section(format!("Ledger status ({})", snapshot.rate));
    if snapshot.is_empty() {
        output::info("No parked vehicles and no unsettled balances.");
        return Ok(());
    }
    for session in &snapshot.active {
        output::info(format!(
            "{:<10} parked   {:>6}s  since {}",
            session.plate.to_string(),
            session.elapsed_seconds,
            session.started_at.format("%Y-%m-%d %H:%M:%S")
        ));
    }
    for (plate, seconds) in &snapshot.settled {
        output::info(format!(
            "{:<10} settled  {:>6}s  owes {}",
            plate.to_string(),
            seconds,
            snapshot.rate.charge(*seconds)
        ));
    }
    Ok(())
}
