//! Spreadsheet export of shift records.
//!
//! Exports are CSV with a fixed header row and one row per record, in the
//! order given. The `registered_by` column is never written.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::ShiftRecord;

/// Column headers of an export, in order.
pub const EXPORT_HEADERS: [&str; 10] = [
    "Start",
    "End",
    "Company",
    "Vehicle Type",
    "Driver",
    "Driver Tax ID",
    "Amount Charged",
    "Amount Paid",
    "Minimum Guaranteed Charged",
    "Minimum Guaranteed Paid",
];

/// MIME type of an export.
pub const EXPORT_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn flag(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

/// Serializes records to CSV bytes.
///
/// Driver tax ids are written as text so leading zeros survive. An empty
/// slice yields just the header row; callers that treat an empty selection
/// as "nothing to export" check before calling.
///
/// # Example
///
/// ```
/// use diaria_ledger::ledger::export_csv;
///
/// let bytes = export_csv(&[]).unwrap();
/// assert!(String::from_utf8(bytes).unwrap().starts_with("Start,End,Company"));
/// ```
pub fn export_csv(records: &[ShiftRecord]) -> EngineResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADERS).map_err(export_error)?;

    for record in records {
        let start = record.start_time.format(TIMESTAMP_FORMAT).to_string();
        let end = record.end_time.format(TIMESTAMP_FORMAT).to_string();
        let charged = record.amount_charged.to_string();
        let paid = record.amount_paid.to_string();
        writer
            .write_record([
                start.as_str(),
                end.as_str(),
                record.company_name.as_str(),
                record.vehicle_type.as_str(),
                record.driver_name.as_str(),
                record.driver_tax_id.as_str(),
                charged.as_str(),
                paid.as_str(),
                flag(record.minimum_guaranteed_charged),
                flag(record.minimum_guaranteed_paid),
            ])
            .map_err(export_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| EngineError::Export {
            message: e.to_string(),
        })?;
    debug!(rows = records.len(), bytes = bytes.len(), "Export serialized");
    Ok(bytes)
}

/// File name of an export generated on `date`: `diarias_YYYYMMDD.csv`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("diarias_{}.csv", date.format("%Y%m%d"))
}

fn export_error(err: csv::Error) -> EngineError {
    EngineError::Export {
        message: err.to_string(),
    }
}
