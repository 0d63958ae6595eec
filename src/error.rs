use crate::domain::student::StudentId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Student not found: {0}")]
    StudentNotFound(StudentId),
    #[error("Already paid for the current billing month: {0}")]
    AlreadyPaid(StudentId),
    #[error("Month index out of range [0, 11]: {0}")]
    InvalidMonth(i64),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Incorrect password")]
    Unauthorized,
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Storage error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for JournalError {
    fn from(err: rocksdb::Error) -> Self {
        Self::InternalError(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, JournalError>;
