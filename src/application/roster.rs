use crate::domain::month::MonthIndex;
use crate::domain::ports::KeyValueStoreBox;
use crate::domain::student::{StudentId, StudentRecord};
use crate::error::{JournalError, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Key under which the roster is persisted.
pub const STUDENTS_KEY: &str = "sa_students";

/// Key holding roster data that could not be decoded, so a later save does
/// not destroy it.
pub const UNREADABLE_STUDENTS_KEY: &str = "sa_students_unreadable";

/// Owns the persisted roster.
///
/// Every call goes straight to the backing store: `load_all` always reflects
/// the last `save_all`. Callers that mutate must hold their own lock across
/// load and save.
pub struct StudentRecordStore {
    store: KeyValueStoreBox,
}

impl StudentRecordStore {
    pub fn new(store: KeyValueStoreBox) -> Self {
        Self { store }
    }

    /// Reads the full roster.
    ///
    /// Missing data yields an empty roster. Out-of-range month indices are
    /// wrapped into `[0, 11]`. Records that still cannot be decoded are
    /// skipped, and the whole roster is skipped when it is not a JSON array;
    /// in both cases the raw data is copied to [`UNREADABLE_STUDENTS_KEY`].
    /// Only failures of the backing store itself are returned as errors.
    pub async fn load_all(&self) -> Result<Vec<StudentRecord>> {
        let Some(bytes) = self.store.get(STUDENTS_KEY).await? else {
            tracing::debug!("no roster stored yet");
            return Ok(Vec::new());
        };

        let values = match serde_json::from_slice::<Option<Vec<Value>>>(&bytes) {
            Ok(values) => values.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    backup = UNREADABLE_STUDENTS_KEY,
                    "stored roster is corrupt; treating it as empty"
                );
                self.store.put(UNREADABLE_STUDENTS_KEY, bytes).await?;
                return Ok(Vec::new());
            }
        };

        let mut records = Vec::with_capacity(values.len());
        let mut unreadable = Vec::new();
        for (position, mut value) in values.into_iter().enumerate() {
            wrap_month_indices(&mut value, position);
            match serde_json::from_value::<StudentRecord>(value.clone()) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(position, error = %e, "skipping unreadable student record");
                    unreadable.push(value);
                }
            }
        }

        if !unreadable.is_empty() {
            self.store
                .put(UNREADABLE_STUDENTS_KEY, serde_json::to_vec(&unreadable)?)
                .await?;
        }

        tracing::debug!(count = records.len(), skipped = unreadable.len(), "loaded roster");
        Ok(records)
    }

    /// Persists the full roster, replacing whatever was stored before.
    pub async fn save_all(&self, records: &[StudentRecord]) -> Result<()> {
        let bytes = serde_json::to_vec(records)?;
        self.store.put(STUDENTS_KEY, bytes).await?;
        tracing::debug!(count = records.len(), "saved roster");
        Ok(())
    }

    /// Builds a new student billed from the month of `now`. Nothing is persisted.
    pub fn create(&self, name: &str, teacher: &str, now: DateTime<Utc>) -> Result<StudentRecord> {
        let name = name.trim();
        if name.is_empty() {
            return Err(JournalError::ValidationError(
                "Student name must not be empty".to_string(),
            ));
        }

        Ok(StudentRecord::new(
            StudentId::generate(),
            name.to_string(),
            teacher.trim().to_string(),
            now,
        ))
    }

    /// Removes one student and persists the remaining roster.
    pub async fn delete(&self, id: &StudentId) -> Result<StudentRecord> {
        let mut records = self.load_all().await?;
        let position = records
            .iter()
            .position(|record| &record.id == id)
            .ok_or_else(|| JournalError::StudentNotFound(id.clone()))?;

        let removed = records.remove(position);
        self.save_all(&records).await?;
        Ok(removed)
    }
}

fn wrap_month_indices(record: &mut Value, position: usize) {
    let Some(fields) = record.as_object_mut() else {
        return;
    };
    if let Some(month) = fields.get_mut("currentMonthIndex") {
        wrap_month(month, position);
    }
    if let Some(Value::Array(history)) = fields.get_mut("history") {
        for month in history.iter_mut().filter_map(|event| event.get_mut("monthIndex")) {
            wrap_month(month, position);
        }
    }
}

fn wrap_month(month: &mut Value, position: usize) {
    let Some(raw) = month.as_i64() else {
        return;
    };
    if !(0..12).contains(&raw) {
        let wrapped = MonthIndex::wrapping(raw);
        tracing::warn!(position, raw, wrapped = wrapped.value(), "wrapping out-of-range month index");
        *month = Value::from(wrapped.value());
    }
}
