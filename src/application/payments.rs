use crate::application::roster::StudentRecordStore;
use crate::domain::status::{PaymentStatus, StatusEngine};
use crate::domain::student::{StudentId, StudentRecord};
use crate::error::{JournalError, Result};
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

/// Students seeded into an empty journal, as `(name, teacher)`.
pub const STARTER_STUDENTS: [(&str, &str); 3] = [
    ("Muxtarov Shaxriyor", "Mavlon"),
    ("Maxaddinov Shuxrat", "Mavlon"),
    ("Ergashev Sarvar", "Mavlon"),
];

/// A roster record annotated with its status at a given moment.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub record: StudentRecord,
    pub status: PaymentStatus,
}

/// The entry point the front end drives: roster queries and payment mutations.
///
/// `PaymentService` owns the record store and serializes every
/// load-mutate-save cycle behind one lock over the whole roster, so two
/// mutations never work from the same stale snapshot.
pub struct PaymentService {
    store: StudentRecordStore,
    engine: StatusEngine,
    roster_lock: Mutex<()>,
}

impl PaymentService {
    /// Creates a new `PaymentService`.
    ///
    /// # Arguments
    ///
    /// * `store` - The persisted roster.
    /// * `engine` - Status computation, including the overdue policy.
    pub fn new(store: StudentRecordStore, engine: StatusEngine) -> Self {
        Self {
            store,
            engine,
            roster_lock: Mutex::new(()),
        }
    }

    /// Annotated roster, sorted by name.
    ///
    /// `filter` keeps students whose name contains it, ignoring case.
    pub async fn roster(&self, now: DateTime<Utc>, filter: Option<&str>) -> Result<Vec<RosterEntry>> {
        let needle = filter.map(str::to_lowercase).unwrap_or_default();
        let mut entries: Vec<RosterEntry> = self
            .store
            .load_all()
            .await?
            .into_iter()
            .filter(|record| record.name.to_lowercase().contains(&needle))
            .map(|record| self.annotate(record, now))
            .collect();

        entries.sort_by_cached_key(|entry| entry.record.name.to_lowercase());
        Ok(entries)
    }

    /// A single student with current status, for the history view.
    pub async fn student(&self, id: &StudentId, now: DateTime<Utc>) -> Result<RosterEntry> {
        let record = self
            .store
            .load_all()
            .await?
            .into_iter()
            .find(|record| &record.id == id)
            .ok_or_else(|| JournalError::StudentNotFound(id.clone()))?;
        Ok(self.annotate(record, now))
    }

    /// Records payment of the student's current billing month and persists it.
    ///
    /// Rejects students that are already paid for their current month; on any
    /// error nothing is written.
    pub async fn confirm_payment(&self, id: &StudentId, now: DateTime<Utc>) -> Result<RosterEntry> {
        let _guard = self.roster_lock.lock().await;

        let mut records = self.store.load_all().await?;
        let record = records
            .iter_mut()
            .find(|record| &record.id == id)
            .ok_or_else(|| JournalError::StudentNotFound(id.clone()))?;

        if self.engine.status_of(record, now) == PaymentStatus::Paid {
            return Err(JournalError::AlreadyPaid(id.clone()));
        }

        let covered = record.confirm_payment(now).month_index;
        let updated = record.clone();
        self.store.save_all(&records).await?;

        tracing::info!(
            student = %id,
            month = %covered,
            next = %updated.current_month_index,
            "payment confirmed"
        );
        Ok(self.annotate(updated, now))
    }

    /// Creates students from `(name, teacher)` pairs and appends them in one save.
    pub async fn enroll<I, S, T>(&self, students: I, now: DateTime<Utc>) -> Result<Vec<StudentRecord>>
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let created = students
            .into_iter()
            .map(|(name, teacher)| self.store.create(name.as_ref(), teacher.as_ref(), now))
            .collect::<Result<Vec<_>>>()?;

        let _guard = self.roster_lock.lock().await;
        let mut records = self.store.load_all().await?;
        records.extend(created.iter().cloned());
        self.store.save_all(&records).await?;

        tracing::info!(added = created.len(), total = records.len(), "students enrolled");
        Ok(created)
    }

    /// Replaces the whole roster with the starter students.
    pub async fn seed_defaults(&self, now: DateTime<Utc>) -> Result<Vec<StudentRecord>> {
        let records = STARTER_STUDENTS
            .iter()
            .map(|(name, teacher)| self.store.create(name, teacher, now))
            .collect::<Result<Vec<_>>>()?;

        let _guard = self.roster_lock.lock().await;
        self.store.save_all(&records).await?;
        tracing::info!(count = records.len(), "roster seeded with starter students");
        Ok(records)
    }

    pub async fn remove(&self, id: &StudentId) -> Result<StudentRecord> {
        let _guard = self.roster_lock.lock().await;
        let removed = self.store.delete(id).await?;
        tracing::info!(student = %id, name = %removed.name, "student removed");
        Ok(removed)
    }

    fn annotate(&self, record: StudentRecord, now: DateTime<Utc>) -> RosterEntry {
        let status = self.engine.status_of(&record, now);
        RosterEntry { record, status }
    }
}
