use super::month::{MonthIndex, absolute_month};
use super::student::StudentRecord;
use crate::error::JournalError;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Derived payment state of a student. Never persisted.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Due,
    Overdue,
}

impl PaymentStatus {
    /// Fixed display label shown next to each student.
    pub fn label(self) -> &'static str {
        match self {
            PaymentStatus::Paid => "To'langan",
            PaymentStatus::Due => "Joriy oy",
            PaymentStatus::Overdue => "Kechiktirilgan",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How the overdue comparison treats the billing month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverduePolicy {
    /// Compares the raw month of the year. A student billed for January is
    /// overdue in every later month, even when that January is next year.
    #[default]
    MonthOfYear,
    /// Compares `year * 12 + month`. Records without a billing year fall
    /// back to `MonthOfYear`.
    Absolute,
}

impl FromStr for OverduePolicy {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month-of-year" | "month" => Ok(Self::MonthOfYear),
            "absolute" => Ok(Self::Absolute),
            other => Err(JournalError::ConfigError(format!(
                "unknown overdue policy '{other}' (expected 'month-of-year' or 'absolute')"
            ))),
        }
    }
}

/// Computes payment status from a record and an explicit point in time.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusEngine {
    policy: OverduePolicy,
}

impl StatusEngine {
    pub fn new(policy: OverduePolicy) -> Self {
        Self { policy }
    }

    pub fn status_of(&self, record: &StudentRecord, now: DateTime<Utc>) -> PaymentStatus {
        if self.is_behind(record, now) {
            PaymentStatus::Overdue
        } else if self.has_paid(record) {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Due
        }
    }

    fn has_paid(&self, record: &StudentRecord) -> bool {
        match self.policy {
            OverduePolicy::MonthOfYear => record.has_paid_current_month(),
            OverduePolicy::Absolute => record.has_paid_current_period(),
        }
    }

    fn is_behind(&self, record: &StudentRecord, now: DateTime<Utc>) -> bool {
        let calendar_month = MonthIndex::of(now);
        match (self.policy, record.billing_year) {
            (OverduePolicy::Absolute, Some(year)) => {
                absolute_month(year, record.current_month_index)
                    < absolute_month(now.year(), calendar_month)
            }
            _ => record.current_month_index < calendar_month,
        }
    }
}

/// Status under the default month-of-year comparison.
pub fn status_of(record: &StudentRecord, now: DateTime<Utc>) -> PaymentStatus {
    StatusEngine::default().status_of(record, now)
}
