use crate::error::{JournalError, Result};
use serde::Deserialize;
use std::io::Read;

/// One row of an enrollment file.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct NewStudent {
    pub name: String,
    pub teacher: String,
}

/// Reads students to enroll from a `name,teacher` CSV source.
///
/// Whitespace is trimmed and rows may carry extra trailing columns.
pub struct StudentReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> StudentReader<R> {
    /// Creates a new `StudentReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes rows.
    pub fn students(self) -> impl Iterator<Item = Result<NewStudent>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(JournalError::from))
    }
}
