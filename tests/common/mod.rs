#![allow(dead_code)]

use assert_cmd::cargo_bin;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use std::path::Path;
use std::process::Command;
use tuition_journal::domain::month::MonthIndex;
use tuition_journal::domain::student::{StudentId, StudentRecord};

pub const PASSWORD: &str = "star7777";

/// Noon on the 15th of `month` (1-based), 2025.
pub fn in_month(month: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, month, 15, 12, 0, 0).unwrap()
}

/// A legacy-shaped record billed for `month_index` with paid events for `paid`.
pub fn record(month_index: i64, paid: &[i64]) -> StudentRecord {
    let mut record = StudentRecord::new(
        StudentId::generate(),
        "Ergashev Sarvar".to_string(),
        "Mavlon".to_string(),
        in_month(1),
    );
    record.billing_year = None;
    for &month in paid {
        record.current_month_index = MonthIndex::new(month).unwrap();
        record.confirm_payment(in_month(1));
    }
    record.current_month_index = MonthIndex::new(month_index).unwrap();
    record
}

/// The binary pointed at `data`, authenticated, isolated from the caller's environment.
pub fn journal(data: &Path) -> Command {
    journal_as(data, PASSWORD)
}

pub fn journal_as(data: &Path, password: &str) -> Command {
    let mut cmd = Command::new(cargo_bin!("tuition-journal"));
    cmd.env_remove("JOURNAL_DATA_FILE")
        .env_remove("JOURNAL_DB_PATH")
        .env_remove("JOURNAL_OVERDUE_POLICY")
        .env_remove("JOURNAL_PASSWORD")
        .env("RUST_LOG", "info")
        .arg("--data")
        .arg(data)
        .arg("--password")
        .arg(password);
    cmd
}

/// Writes a journal file holding `records` the way the file store lays it out.
pub fn write_journal(data: &Path, records: &[StudentRecord]) {
    let roster = serde_json::to_string(records).unwrap();
    let document = serde_json::json!({ "sa_students": roster });
    std::fs::write(data, serde_json::to_vec_pretty(&document).unwrap()).unwrap();
}

pub fn read_roster(data: &Path) -> Vec<StudentRecord> {
    let document: serde_json::Value =
        serde_json::from_slice(&std::fs::read(data).unwrap()).unwrap();
    let roster = document["sa_students"].as_str().unwrap();
    serde_json::from_str(roster).unwrap()
}

pub fn current_month() -> MonthIndex {
    MonthIndex::wrapping(i64::from(Utc::now().month0()))
}
