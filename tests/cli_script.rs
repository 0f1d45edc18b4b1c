use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn script_command(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("parking_ledger_cli").unwrap();
    cmd.env("PARKING_LEDGER_CLI_SCRIPT", "1")
        .env("PARKING_LEDGER_CONFIG", dir.path().join("config.json"))
        .env("PARKING_LEDGER_CLOCK", "manual")
        .env("PARKING_LEDGER_RATE", "10")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn script_mode_replays_billing_period() {
    let dir = TempDir::new().unwrap();
    let input = "\
time 10
park AA111A99
time 20
withdraw AA111A99
park BB222B99
time 40
bill AA111A99
bill BB222B99
park AA111A99
time 50
bill CC333C99
withdraw BB222B99
time 70
settle --json
exit
";

    script_command(&dir)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Vehicle AA111A99 parked."))
        .stdout(contains("Current bill for AA111A99: 100"))
        .stdout(contains("Current bill for BB222B99: 200"))
        .stdout(contains("Current bill for CC333C99: 0"))
        .stdout(contains("\"AA111A99\": 400"))
        .stdout(contains("\"BB222B99\": 300"));
}

#[test]
fn second_settlement_only_bills_new_time() {
    let dir = TempDir::new().unwrap();
    let input = "\
park AA111A99
park BB222B99
time 5
withdraw BB222B99
time 30
settle
time 32
settle --json
";

    script_command(&dir)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("AA111A99: 300"))
        .stdout(contains("BB222B99: 50"))
        .stdout(contains("\"AA111A99\": 20"))
        .stdout(contains("\"BB222B99\"").count(0));
}

#[test]
fn domain_errors_are_reported_and_the_script_continues() {
    let dir = TempDir::new().unwrap();
    let input = "\
withdraw CC333C99
park AA111A99
park AA111A99
park not-a-plate
status
";

    script_command(&dir)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("vehicle CC333C99 is not parked"))
        .stdout(contains("vehicle AA111A99 is already parked"))
        .stdout(contains("not-a-plate"))
        .stdout(contains("AA111A99   parked"));
}

#[test]
fn unknown_commands_get_a_suggestion() {
    let dir = TempDir::new().unwrap();
    script_command(&dir)
        .write_stdin("setle\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `setle`"))
        .stdout(contains("Suggestion: `settle`?"));
}

#[test]
fn invalid_rate_override_is_fatal() {
    let dir = TempDir::new().unwrap();
    script_command(&dir)
        .env("PARKING_LEDGER_RATE", "ten")
        .write_stdin("exit\n")
        .assert()
        .failure()
        .stderr(contains("PARKING_LEDGER_RATE"));
}

#[test]
fn config_save_persists_effective_settings() {
    let dir = TempDir::new().unwrap();
    script_command(&dir)
        .env("PARKING_LEDGER_RATE", "3")
        .write_stdin("config save\n")
        .assert()
        .success()
        .stdout(contains("Configuration saved"));

    let json = std::fs::read_to_string(dir.path().join("config.json")).unwrap();
    assert!(json.contains("\"rate_per_second\": 3"));
    assert!(json.contains("\"clock\": \"manual\""));
}

#[test]
fn out_of_range_clock_moves_are_reported_not_fatal() {
    let dir = TempDir::new().unwrap();
    let input = "\
time 5
park AA111A99
time 9223372036854775807
advance 9223372036854775807
time -9223372036854775808
now
bill AA111A99
";

    script_command(&dir)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("leaves the supported time range").count(3))
        .stdout(contains("(t+5s)"))
        .stdout(contains("Current bill for AA111A99: 0"));
}

#[test]
fn unbalanced_quotes_are_reported_and_skipped() {
    let dir = TempDir::new().unwrap();
    script_command(&dir)
        .write_stdin("park \"AA111A99\npark BB222B99\nstatus\n")
        .assert()
        .success()
        .stdout(contains("Could not read"))
        .stdout(contains("BB222B99   parked"));
}
