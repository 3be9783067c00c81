mod common;

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

fn shell(base: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("asset_tracker_cli").unwrap();
    cmd.env("ASSET_TRACKER_HOME", base)
        .env("ASSET_TRACKER_CLI_SCRIPT", "1")
        .env("ASSET_TRACKER_TODAY", "2024-01-31")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn script_mode_reports_each_upsert_outcome() {
    let base = common::temp_base();
    shell(&base)
        .write_stdin("add 2024-01-01 100 50\nadd 2024-01-01 200 50\nadd 2024-01-01 1 1\nexit\n")
        .assert()
        .success()
        .stdout(contains("New record for 2024-01-01 (Mon)"))
        .stdout(contains("updated: total NT$150 -> NT$250"))
        .stdout(contains("kept"));

    let raw = fs::read_to_string(base.join("asset_tracker_records.json")).unwrap();
    assert!(raw.contains("\"2024-01-01\""));
    assert!(raw.contains("200"));
}

#[test]
fn list_and_summary_show_derived_values() {
    let base = common::temp_base();
    shell(&base)
        .write_stdin(
            "add 2024-01-01 100 50\nadd today 130 70\nlist\nsummary\nchart all\nexit\n",
        )
        .assert()
        .success()
        .stdout(contains("2024-01-31 (Wed)"))
        .stdout(contains("+NT$50"))
        .stdout(contains("NT$200"))
        .stdout(contains("=== Summary ==="));
}

#[test]
fn export_and_import_through_the_shell() {
    let base = common::temp_base();
    let out = common::temp_base();
    shell(&base)
        .write_stdin(format!(
            "add 2024-01-10 1 2\nexport \"{}\"\nexit\n",
            out.display()
        ))
        .assert()
        .success()
        .stdout(contains("Exported 1 records"));
    let export = out.join("asset-records-2024-01-31.json");
    assert!(export.exists());

    let other = common::temp_base();
    shell(&other)
        .write_stdin(format!("import \"{}\"\nlist all\nexit\n", export.display()))
        .assert()
        .success()
        .stdout(contains("Imported 1 records"))
        .stdout(contains("2024-01-10"));
}

#[test]
fn invalid_input_is_reported_and_the_shell_continues() {
    let base = common::temp_base();
    shell(&base)
        .write_stdin("add 2024-13-01 1 1\nadd 2024-01-01 -3 1\nlsit\nadd 2024-01-02 1 1\nexit\n")
        .assert()
        .success()
        .stderr(contains("is not a YYYY-MM-DD date"))
        .stderr(contains("cannot be negative"))
        .stdout(contains("Did you mean `list`?"))
        .stdout(contains("New record for 2024-01-02"));
}

#[test]
fn range_preference_survives_restart() {
    let base = common::temp_base();
    shell(&base)
        .write_stdin("range chart 90\nexit\n")
        .assert()
        .success();
    shell(&base)
        .write_stdin("range\nexit\n")
        .assert()
        .success()
        .stdout(contains("chart: last 90 days"))
        .stdout(contains("[ok]").not());
}
