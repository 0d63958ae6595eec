use crate::application::payments::RosterEntry;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct RosterRow<'a> {
    #[serde(rename = "#")]
    number: usize,
    id: &'a str,
    name: &'a str,
    month: &'a str,
    status: &'a str,
    teacher: &'a str,
}

/// Writes the annotated roster as a CSV report, one numbered row per student.
pub struct RosterWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> RosterWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_roster(&mut self, entries: &[RosterEntry]) -> Result<()> {
        for (idx, entry) in entries.iter().enumerate() {
            self.writer.serialize(RosterRow {
                number: idx + 1,
                id: entry.record.id.as_str(),
                name: &entry.record.name,
                month: entry.record.current_month_index.name(),
                status: entry.status.label(),
                teacher: &entry.record.teacher,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
