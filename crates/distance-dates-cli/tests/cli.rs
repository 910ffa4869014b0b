//! CLI integration tests. The clock is pinned with `--now` so output does
//! not depend on the day the tests run.

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

const NOW: &str = "2020-01-01T15:00:00Z";

fn distance_dates() -> Command {
    let mut cmd = cargo_bin_cmd!("distance-dates");
    cmd.env_remove("RUST_LOG").args(["--now", NOW]);
    cmd
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn test_help_lists_subcommands() {
    cargo_bin_cmd!("distance-dates")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("sequence"))
        .stdout(predicate::str::contains("relative"))
        .stdout(predicate::str::contains("link"));
}

// ── show ────────────────────────────────────────────────────────────────────

#[test]
fn test_show_defaults_to_today() {
    let snapshot = json_stdout(distance_dates().args(["show", "--json"]));
    assert_eq!(snapshot["min"], "2020-01-01");
    assert_eq!(snapshot["max"], "2020-01-01");
    assert_eq!(snapshot["today"], "2020-01-01");
    assert_eq!(snapshot["direction"], "FUTURE");
    assert_eq!(snapshot["anchor"], false);
    assert_eq!(snapshot["duration"], 0);
}

#[test]
fn test_show_applies_query() {
    let snapshot = json_stdout(distance_dates().args([
        "--query",
        "?min=2020-01-01&max=2020-03-01&unit=weeks&locale=fr-CA&ignored=1",
        "show",
        "--json",
    ]));
    assert_eq!(snapshot["unit"], "weeks");
    assert_eq!(snapshot["locale"], "fr-CA");
    // 60 days is 8.57 weeks.
    assert_eq!(snapshot["duration"], 9);
}

#[test]
fn test_show_anchor_pins_max_to_today() {
    let snapshot = json_stdout(distance_dates().args([
        "--query",
        "min=2019-12-01&max=2030-01-01&anchor=max",
        "show",
        "--json",
    ]));
    assert_eq!(snapshot["max"], "2020-01-01");
    assert_eq!(snapshot["anchor"], "max");
    assert_eq!(snapshot["duration"], 31);
}

#[test]
fn test_show_invalid_unit_is_skipped() {
    let snapshot = json_stdout(distance_dates().args([
        "--query",
        "unit=fortnights&max=2020-01-03",
        "show",
        "--json",
    ]));
    assert_eq!(snapshot["unit"], "days");
    assert_eq!(snapshot["duration"], 2);
}

#[test]
fn test_show_plain_is_default_command() {
    distance_dates()
        .args(["--query", "max=2020-01-11"])
        .assert()
        .success()
        .stdout(predicate::str::contains("duration:  10 days"));
}

#[test]
fn test_show_bad_bound_fails() {
    distance_dates()
        .args(["--query", "max=someday", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("someday"));
}

// ── sequence ────────────────────────────────────────────────────────────────

#[test]
fn test_sequence_lists_dates() {
    distance_dates()
        .args([
            "--query",
            "min=2020-01-01&max=2020-01-07",
            "sequence",
            "--count",
            "2",
        ])
        .assert()
        .success()
        .stdout("2020-01-01\tJanuary 1, 2020\n2020-01-03\tJanuary 3, 2020\n2020-01-05\tJanuary 5, 2020\n");
}

#[test]
fn test_sequence_limit_and_offset() {
    distance_dates()
        .args([
            "--query",
            "max=2021-01-01&unit=months",
            "sequence",
            "--offset",
            "1",
            "--limit",
            "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("2020-01-02\t"))
        .stdout(predicate::str::contains("2020-02-02\t"))
        .stdout(predicate::str::contains("2020-03-02").not());
}

#[test]
fn test_sequence_zero_count_fails() {
    distance_dates()
        .args(["--query", "max=2021-01-01", "sequence", "--count", "0"])
        .assert()
        .failure();
}

// ── relative ────────────────────────────────────────────────────────────────

#[test]
fn test_relative_months_ahead() {
    distance_dates()
        .args([
            "relative",
            "--count",
            "2",
            "--unit",
            "months",
            "--direction",
            "FUTURE",
        ])
        .assert()
        .success()
        .stdout("2020-03-01T10:00:00\tMarch 1, 2020\n");
}

#[test]
fn test_relative_rejects_fractional_count() {
    distance_dates()
        .args([
            "relative",
            "--count",
            "1.5",
            "--unit",
            "days",
            "--direction",
            "PAST",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1.5"));
}

#[test]
fn test_relative_rejects_unknown_direction() {
    distance_dates()
        .args([
            "relative",
            "--count",
            "1",
            "--unit",
            "days",
            "--direction",
            "SIDEWAYS",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("SIDEWAYS"));
}

// ── link ────────────────────────────────────────────────────────────────────

#[test]
fn test_link_url() {
    distance_dates()
        .args([
            "--query",
            "max=2020-12-31",
            "link",
            "--date",
            "2020-03-04",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "https://calendar.google.com/calendar/render?action=TEMPLATE",
        ))
        .stdout(predicate::str::contains(
            "dates=20200304T190000%2F20200304T200000",
        ));
}

#[test]
fn test_link_text() {
    distance_dates()
        .args([
            "--query",
            "max=2020-12-31",
            "link",
            "--date",
            "2020-03-04",
            "--text",
        ])
        .assert()
        .success()
        .stdout(
            "Début: January 1, 2020\nFin: December 31, 2020\nDepuis le début: 2 mois, 3 jours\n",
        );
}

// ── config ──────────────────────────────────────────────────────────────────

#[test]
fn test_config_file_sets_defaults() {
    let path = std::env::temp_dir().join(format!(
        "distance-dates-cli-{}.toml",
        std::process::id()
    ));
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "default_unit = \"hours\"\nlocale = \"fr-CA\"").unwrap();
    drop(file);

    let snapshot = json_stdout(distance_dates().args([
        "--config",
        path.to_str().unwrap(),
        "--query",
        "max=2020-01-02",
        "show",
        "--json",
    ]));
    std::fs::remove_file(&path).ok();

    assert_eq!(snapshot["unit"], "hours");
    assert_eq!(snapshot["locale"], "fr-CA");
    assert_eq!(snapshot["duration"], 24);
}

#[test]
fn test_missing_config_file_fails() {
    distance_dates()
        .args(["--config", "/nonexistent/distance-dates.toml", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load options"));
}
