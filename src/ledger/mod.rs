//! The shift ledger.
//!
//! An append-only sequence of [`ShiftRecord`](crate::models::ShiftRecord)s.
//! Insertion order is the only ordering and the only identity a record has.
//! Queries filter by start date, company and role scope; exports serialize a
//! filtered sequence without touching the ledger.

mod export;
mod shift_ledger;

pub use export::{EXPORT_CONTENT_TYPE, EXPORT_HEADERS, export_csv, export_file_name};
pub use shift_ledger::{LedgerQuery, ShiftLedger, filter_records};
