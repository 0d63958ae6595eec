//! Domain model: billing months, student records, derived payment status,
//! and the storage port the application layer persists through.

pub mod month;
pub mod ports;
pub mod status;
pub mod student;
