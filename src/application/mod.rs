//! Application layer: the persisted roster, the payment service the front end
//! drives, and the password/theme settings.
//!
//! `PaymentService` is the primary entry point. It owns a `StudentRecordStore`
//! and serializes every read-modify-write of the roster behind a single
//! `tokio` mutex.

pub mod payments;
pub mod roster;
pub mod settings;
