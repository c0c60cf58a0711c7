
use assert_cmd::{cargo, Command};
use predicates::prelude::*;
use tempfile::TempDir;

fn setup_temp_home() -> TempDir {
    TempDir::new().expect("failed to create temp home")
}

fn base_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("fundledger"));
    cmd.env("HOME", home.path());
    cmd.env_remove("FUNDLEDGER_DB");
    cmd.arg("--no-color").arg("--as-of").arg("2024-05-20");
    cmd
}

fn import_fixture(home: &TempDir) {
    base_cmd(home)
        .arg("import")
        .arg("tests/data/ledger.csv")
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported: 6"));
}

#[test]
fn menu_lists_four_reports() {
    let home = setup_temp_home();
    base_cmd(&home)
        .arg("menu")
        .assert()
        .success()
        .stdout(predicate::str::contains("1  Sales Summary"))
        .stdout(predicate::str::contains("2  Assets Under Management"))
        .stdout(predicate::str::contains("3  Break Report"))
        .stdout(predicate::str::contains("4  Investor Profit"));
}

#[test]
fn report_on_empty_ledger_is_friendly() {
    let home = setup_temp_home();
    base_cmd(&home)
        .arg("report")
        .arg("aum")
        .assert()
        .success()
        .stdout(predicate::str::contains("No transactions found"))
        .stdout(predicate::str::contains("\u{001b}[").not());
}

#[test]
fn import_dry_run_does_not_create_db() {
    let home = setup_temp_home();
    let db_path = sqlite_helpers::db_path(&home);

    base_cmd(&home)
        .arg("import")
        .arg("tests/data/ledger.csv")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 6 valid transactions"))
        .stdout(predicate::str::contains("Dry run"));

    assert!(!db_path.exists(), "dry-run should not create db");
}

#[test]
fn import_then_break_report_shows_flag() {
    let home = setup_temp_home();
    import_fixture(&home);

    base_cmd(&home)
        .arg("report")
        .arg("3")
        .assert()
        .success()
        .stdout(predicate::str::contains("Yolanda"))
        .stdout(predicate::str::contains("-$260.00"))
        .stdout(predicate::str::contains("Negative cash balance"))
        .stdout(predicate::str::contains("\u{001b}[").not());
}

#[test]
fn sales_summary_uses_as_of_date() {
    let home = setup_temp_home();
    import_fixture(&home);

    base_cmd(&home)
        .arg("report")
        .arg("sales")
        .assert()
        .success()
        .stdout(predicate::str::contains("$1,260.00"))
        .stdout(predicate::str::contains("$500.00"));
}

#[test]
fn json_output_is_machine_readable() {
    let home = setup_temp_home();
    import_fixture(&home);

    let output = base_cmd(&home)
        .arg("--json")
        .arg("report")
        .arg("profit")
        .output()
        .expect("run report");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["report"], "investor_profit");
    assert_eq!(json["rows"][0]["investor"], "Xavier");
    assert_eq!(json["rows"][0]["fund"], "STOCK_FUND");
    assert_eq!(json["rows"][0]["net_value"], "500.00");
}

#[test]
fn unknown_report_id_is_rejected() {
    let home = setup_temp_home();
    base_cmd(&home)
        .arg("report")
        .arg("9")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No report with id 9"));
}

#[test]
fn db_flag_overrides_default_location() {
    let home = setup_temp_home();
    let custom = home.path().join("custom.db");

    base_cmd(&home)
        .arg("--db")
        .arg(&custom)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ledger ready"));

    assert!(custom.exists());
    assert!(!sqlite_helpers::db_path(&home).exists());
}

#[test]
fn interactive_session_reads_piped_selections() {
    let home = setup_temp_home();
    import_fixture(&home);

    base_cmd(&home)
        .write_stdin("2\nbogus\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Assets Under Management"))
        .stdout(predicate::str::contains("$2,000.00"))
        .stdout(predicate::str::contains("Goodbye!"))
        .stderr(predicate::str::contains("Unknown report 'bogus'"));
}
