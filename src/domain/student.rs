use super::month::MonthIndex;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque, immutable identifier of a student record.
///
/// Newly created students get a UUID; identifiers loaded from existing data
/// are accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(String);

impl StudentId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StudentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for StudentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Only successful payments are ever recorded; due and overdue are derived.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Paid,
}

impl EventStatus {
    pub fn label(self) -> &'static str {
        match self {
            EventStatus::Paid => "To'langan",
        }
    }
}

/// A completed payment for one billing month.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEvent {
    /// The billing month this payment covers.
    pub month_index: MonthIndex,
    pub status: EventStatus,
    /// When the payment was recorded, stored as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
    /// Billing year of the covered month, when the record tracks one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_year: Option<i32>,
}

/// One student on the roster together with their payment history.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: StudentId,
    pub name: String,
    pub teacher: String,
    /// The month the student currently owes for.
    pub current_month_index: MonthIndex,
    /// Append-only; insertion order is chronological order.
    pub history: Vec<PaymentEvent>,
    /// Calendar year of `current_month_index`. Absent in legacy data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_year: Option<i32>,
}

impl StudentRecord {
    /// Creates a student billed from the calendar month of `now`.
    pub fn new(id: StudentId, name: String, teacher: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            teacher,
            current_month_index: MonthIndex::of(now),
            history: Vec::new(),
            billing_year: Some(now.year()),
        }
    }

    /// Whether the history holds a payment for the current month of the year,
    /// in any year.
    pub fn has_paid_current_month(&self) -> bool {
        self.history.iter().any(|event| {
            event.status == EventStatus::Paid && event.month_index == self.current_month_index
        })
    }

    /// Like [`has_paid_current_month`](Self::has_paid_current_month), but a
    /// payment stamped with a different billing year does not count. Falls
    /// back to the month alone when either side has no year.
    pub fn has_paid_current_period(&self) -> bool {
        self.history.iter().any(|event| {
            event.status == EventStatus::Paid
                && event.month_index == self.current_month_index
                && match (event.billing_year, self.billing_year) {
                    (Some(paid_year), Some(billed_year)) => paid_year == billed_year,
                    _ => true,
                }
        })
    }

    /// Records a payment for the current billing month and advances to the next one.
    ///
    /// Both steps happen together. This does not check whether the month was
    /// already paid: calling it twice appends two events and advances two months.
    pub fn confirm_payment(&mut self, now: DateTime<Utc>) -> &PaymentEvent {
        let covered = self.current_month_index;
        self.history.push(PaymentEvent {
            month_index: covered,
            status: EventStatus::Paid,
            date: now,
            billing_year: self.billing_year,
        });

        self.current_month_index = covered.next();
        if covered == MonthIndex::DECEMBER {
            self.billing_year = self.billing_year.map(|year| year + 1);
        }

        &self.history[self.history.len() - 1]
    }

    /// History for display, most recent payment first.
    pub fn history_newest_first(&self) -> impl Iterator<Item = &PaymentEvent> {
        self.history.iter().rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(year: i32, month: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, 10, 9, 30, 0).unwrap()
    }

    fn student(month: i64) -> StudentRecord {
        let mut record = StudentRecord::new(
            StudentId::from("abc1234"),
            "Ergashev Sarvar".to_string(),
            "Mavlon".to_string(),
            at(2025, 1),
        );
        record.current_month_index = MonthIndex::new(month).unwrap();
        record
    }

    #[test]
    fn test_new_student_starts_at_current_month() {
        let record = StudentRecord::new(
            StudentId::generate(),
            "A".to_string(),
            "B".to_string(),
            at(2025, 9),
        );
        assert_eq!(record.current_month_index.value(), 8);
        assert_eq!(record.billing_year, Some(2025));
        assert!(record.history.is_empty());
    }

    #[test]
    fn test_confirm_payment_appends_and_advances() {
        let mut record = student(3);
        let event = record.confirm_payment(at(2025, 4)).clone();

        assert_eq!(event.month_index.value(), 3);
        assert_eq!(event.status, EventStatus::Paid);
        assert_eq!(event.date, at(2025, 4));
        assert_eq!(record.current_month_index.value(), 4);
        assert_eq!(record.history.len(), 1);
    }

    #[test]
    fn test_confirm_payment_is_not_idempotent() {
        let mut record = student(3);
        record.confirm_payment(at(2025, 4));
        record.confirm_payment(at(2025, 4));

        assert_eq!(record.history.len(), 2);
        assert_eq!(record.current_month_index.value(), 5);
        assert_eq!(record.history[0].month_index.value(), 3);
        assert_eq!(record.history[1].month_index.value(), 4);
    }

    #[test]
    fn test_confirm_payment_wraps_december() {
        let mut record = student(11);
        record.billing_year = Some(2025);
        record.confirm_payment(at(2025, 12));

        assert_eq!(record.current_month_index, MonthIndex::JANUARY);
        assert_eq!(record.billing_year, Some(2026));
        assert_eq!(record.history[0].billing_year, Some(2025));
    }

    #[test]
    fn test_paid_month_checks_after_a_full_year() {
        let mut record = student(0);
        record.billing_year = Some(2025);
        record.confirm_payment(at(2025, 1));
        // Advance eleven more months to land on January of the next year.
        for _ in 0..11 {
            record.confirm_payment(at(2025, 6));
        }
        assert_eq!(record.current_month_index, MonthIndex::JANUARY);
        assert_eq!(record.billing_year, Some(2026));
        // January 2025 was paid: that counts by month, not by period.
        assert!(record.has_paid_current_month());
        assert!(!record.has_paid_current_period());
    }

    #[test]
    fn test_legacy_json_round_trip() {
        let json = r#"{"id":"k3j9x0a","name":"Muxtarov Shaxriyor","teacher":"Mavlon","currentMonthIndex":4,"history":[{"monthIndex":3,"status":"paid","date":1746000000000}]}"#;
        let record: StudentRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id.as_str(), "k3j9x0a");
        assert_eq!(record.current_month_index.value(), 4);
        assert_eq!(record.billing_year, None);
        assert_eq!(record.history[0].date.timestamp_millis(), 1_746_000_000_000);

        assert_eq!(serde_json::to_string(&record).unwrap(), json);
    }

    #[test]
    fn test_rejects_out_of_range_month_in_data() {
        let json = r#"{"id":"x","name":"n","teacher":"t","currentMonthIndex":12,"history":[]}"#;
        assert!(serde_json::from_str::<StudentRecord>(json).is_err());
    }

    #[test]
    fn test_history_newest_first() {
        let mut record = student(2);
        record.confirm_payment(at(2025, 3));
        record.confirm_payment(at(2025, 4));

        let months: Vec<u8> = record
            .history_newest_first()
            .map(|event| event.month_index.value())
            .collect();
        assert_eq!(months, vec![3, 2]);
    }
}
