//! CSV import of new students and export of the annotated roster.

pub mod roster_writer;
pub mod student_reader;
