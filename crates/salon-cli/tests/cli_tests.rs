//! Integration tests for the `salon` CLI binary.
//!
//! Every test runs the real binary against the `salon.json` fixture. Commands
//! that write a snapshot work on a copy in a temporary directory.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use chrono::{DateTime, Utc};
use predicates::prelude::*;
use serde_json::Value;

const ANA: &str = "6f1c2a9e-4b1d-4c3e-9a55-0a1b2c3d4e01";
const BEA: &str = "6f1c2a9e-4b1d-4c3e-9a55-0a1b2c3d4e02";
const HAIRCUT: &str = "9b7e0c1a-2d3f-4e5a-8b6c-7d8e9f0a1b01";
const OLD_PERM: &str = "9b7e0c1a-2d3f-4e5a-8b6c-7d8e9f0a1b02";
const MONDAY: &str = "2026-03-16";
const EARLY: &str = "2026-03-16T06:00:00Z";

fn salon_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/salon.json")
}

fn salon_toml_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/salon.toml")
}

/// Copy the snapshot fixture into `dir` so a test may overwrite it.
fn scratch_snapshot(dir: &Path) -> PathBuf {
    let path = dir.join("salon.json");
    std::fs::copy(salon_json_path(), &path).expect("salon.json fixture must exist");
    path
}

fn salon() -> Command {
    Command::cargo_bin("salon").unwrap()
}

fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).expect("stdout must be valid JSON")
}

/// Start times of the slots in one `availability` entry, as `HH:MM`.
fn slot_starts(entry: &Value) -> Vec<String> {
    entry["slots"]
        .as_array()
        .expect("slots array")
        .iter()
        .map(|slot| {
            let start: DateTime<Utc> = slot["start"].as_str().unwrap().parse().unwrap();
            start.format("%H:%M").to_string()
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// slots
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn slots_for_one_professional() {
    let output = salon()
        .args(["slots", "--data", salon_json_path(), "--service", HAIRCUT])
        .args(["--date", MONDAY, "--professional", ANA, "--now", EARLY])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json = stdout_json(&output);
    let availability = json["availability"].as_array().unwrap();
    assert_eq!(availability.len(), 1);
    assert_eq!(availability[0]["professional_id"], ANA);
    assert_eq!(availability[0]["date"], MONDAY);
    // 10:00-11:00 is booked, the 15:00 cancellation is free again, and time
    // off starts at 16:30.
    assert_eq!(
        slot_starts(&availability[0]),
        vec!["09:00", "11:00", "15:00", "15:30"]
    );
    assert_eq!(json["failures"], Value::Array(vec![]));
}

#[test]
fn slots_default_to_active_professionals() {
    let output = salon()
        .args(["slots", "--data", salon_json_path(), "--service", HAIRCUT])
        .args(["--date", MONDAY, "--now", EARLY])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json = stdout_json(&output);
    let ids: Vec<&str> = json["availability"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["professional_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![ANA, BEA], "sorted by name, inactive Carla skipped");
}

#[test]
fn slots_hide_the_past() {
    let output = salon()
        .args(["slots", "--data", salon_json_path(), "--service", HAIRCUT])
        .args(["--date", MONDAY, "--professional", BEA])
        .args(["--now", "2026-03-16T10:45:00Z"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json = stdout_json(&output);
    assert_eq!(slot_starts(&json["availability"][0]), vec!["11:00"]);
}

#[test]
fn slots_over_several_days() {
    let output = salon()
        .args(["slots", "--data", salon_json_path(), "--service", HAIRCUT])
        .args(["--date", MONDAY, "--days", "7", "--professional", BEA])
        .args(["--now", EARLY])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json = stdout_json(&output);
    let availability = json["availability"].as_array().unwrap();
    assert_eq!(availability.len(), 7);
    let booked_days: Vec<&str> = availability
        .iter()
        .filter(|entry| !entry["slots"].as_array().unwrap().is_empty())
        .map(|entry| entry["date"].as_str().unwrap())
        .collect();
    // Bea's Tuesday block is inactive.
    assert_eq!(booked_days, vec![MONDAY]);
}

#[test]
fn slots_use_configured_step() {
    let output = salon()
        .args(["slots", "--data", salon_json_path(), "--service", HAIRCUT])
        .args(["--date", MONDAY, "--professional", BEA, "--now", EARLY])
        .args(["--config", salon_toml_path()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json = stdout_json(&output);
    assert_eq!(
        slot_starts(&json["availability"][0]),
        vec!["10:00", "10:15", "10:30", "10:45", "11:00"]
    );
}

#[test]
fn slots_report_unknown_professional_as_failure() {
    let ghost = "00000000-0000-4000-8000-000000000099";
    let output = salon()
        .args(["slots", "--data", salon_json_path(), "--service", HAIRCUT])
        .args(["--date", MONDAY, "--now", EARLY])
        .args(["--professional", ghost, "--professional", BEA])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json = stdout_json(&output);
    assert_eq!(json["failures"][0]["professional_id"], ghost);
    assert_eq!(json["availability"][0]["professional_id"], BEA);
    assert_eq!(slot_starts(&json["availability"][0]).len(), 3);
}

#[test]
fn slots_reject_inactive_service() {
    salon()
        .args(["slots", "--data", salon_json_path(), "--service", OLD_PERM])
        .args(["--date", MONDAY])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown or inactive service"));
}

#[test]
fn slots_missing_snapshot_fails() {
    salon()
        .args(["slots", "--data", "/nonexistent/salon.json", "--service", HAIRCUT])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn slots_reject_bad_date() {
    salon()
        .args(["slots", "--data", salon_json_path(), "--service", HAIRCUT])
        .args(["--date", "16/03/2026"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--date"));
}

// ─────────────────────────────────────────────────────────────────────────────
// check
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn check_lists_overlapping_appointments() {
    let output = salon()
        .args(["check", "--data", salon_json_path(), "--professional", ANA])
        .args(["--start", "2026-03-16T10:30:00Z", "--end", "2026-03-16T11:30:00Z"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json = stdout_json(&output);
    let conflicts = json.as_array().unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0]["overlap_minutes"], 30);
    assert_eq!(conflicts[0]["booking"]["status"], "confirmed");
}

#[test]
fn check_ignores_cancelled_and_adjacent() {
    // 11:00-12:00 touches the confirmed booking; 15:00-16:00 is cancelled.
    for (start, end) in [
        ("2026-03-16T11:00:00Z", "2026-03-16T12:00:00Z"),
        ("2026-03-16T15:00:00Z", "2026-03-16T16:00:00Z"),
    ] {
        let output = salon()
            .args(["check", "--data", salon_json_path(), "--professional", ANA])
            .args(["--start", start, "--end", end])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        assert_eq!(stdout_json(&output), Value::Array(vec![]));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// book
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn book_writes_to_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("after.json");

    let output = salon()
        .args(["book", "--data", salon_json_path(), "--service", HAIRCUT])
        .args(["--professional", ANA, "--start", "2026-03-16T11:00:00Z"])
        .args(["--name", "Marta Gomez", "--phone", "1166667777", "--now", EARLY])
        .args(["-o", out_path.to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let appointment = stdout_json(&output);
    assert_eq!(appointment["status"], "pending");
    assert_eq!(appointment["origin"], "online");
    assert_eq!(appointment["payment_method"], "cash");
    assert_eq!(appointment["price_cents"], 1_500_000);
    let end: DateTime<Utc> = appointment["end"].as_str().unwrap().parse().unwrap();
    assert_eq!(end.to_rfc3339(), "2026-03-16T12:00:00+00:00");

    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(saved["appointments"].as_array().unwrap().len(), 3);
    assert_eq!(saved["clients"].as_array().unwrap().len(), 2);

    let original: Value =
        serde_json::from_str(&std::fs::read_to_string(salon_json_path()).unwrap()).unwrap();
    assert_eq!(original["appointments"].as_array().unwrap().len(), 2);
}

#[test]
fn book_updates_snapshot_in_place_and_blocks_rebooking() {
    let dir = tempfile::tempdir().unwrap();
    let data = scratch_snapshot(dir.path());
    let data = data.to_str().unwrap();

    salon()
        .args(["book", "--data", data, "--service", HAIRCUT])
        .args(["--professional", BEA, "--start", "2026-03-16T10:00:00Z"])
        .args(["--name", "Lucia Perez", "--phone", "1155551234", "--now", EARLY])
        .assert()
        .success();

    salon()
        .args(["book", "--data", data, "--service", HAIRCUT])
        .args(["--professional", BEA, "--start", "2026-03-16T10:30:00Z"])
        .args(["--name", "Marta Gomez", "--phone", "1166667777", "--now", EARLY])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no longer available"));

    let output = salon()
        .args(["slots", "--data", data, "--service", HAIRCUT])
        .args(["--date", MONDAY, "--professional", BEA, "--now", EARLY])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(slot_starts(&stdout_json(&output)["availability"][0]), vec!["11:00"]);

    // The existing client was reused.
    let saved: Value = serde_json::from_str(&std::fs::read_to_string(data).unwrap()).unwrap();
    assert_eq!(saved["clients"].as_array().unwrap().len(), 1);
}

#[test]
fn book_conflict_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let data = scratch_snapshot(dir.path());

    salon()
        .args(["book", "--data", data.to_str().unwrap(), "--service", HAIRCUT])
        .args(["--professional", ANA, "--start", "2026-03-16T10:30:00Z"])
        .args(["--name", "Marta Gomez", "--phone", "1166667777"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no longer available"))
        .stderr(predicate::str::contains("choose another time"));

    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&data).unwrap()).unwrap();
    assert_eq!(saved["appointments"].as_array().unwrap().len(), 2);
}

#[test]
fn book_rejects_short_phone() {
    let dir = tempfile::tempdir().unwrap();
    let data = scratch_snapshot(dir.path());

    salon()
        .args(["book", "--data", data.to_str().unwrap(), "--service", HAIRCUT])
        .args(["--professional", ANA, "--start", "2026-03-16T11:00:00Z"])
        .args(["--name", "Marta Gomez", "--phone", "12345"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Phone must have at least 8 characters"));
}

#[test]
fn book_rejects_mismatched_end() {
    let dir = tempfile::tempdir().unwrap();
    let data = scratch_snapshot(dir.path());

    salon()
        .args(["book", "--data", data.to_str().unwrap(), "--service", HAIRCUT])
        .args(["--professional", ANA, "--start", "2026-03-16T11:00:00Z"])
        .args(["--end", "2026-03-16T11:30:00Z"])
        .args(["--name", "Marta Gomez", "--phone", "1166667777"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("End must be"));
}

#[test]
fn no_subcommand_shows_usage() {
    salon()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
