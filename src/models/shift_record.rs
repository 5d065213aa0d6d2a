//! Shift ("diária") records and their public projections.
//!
//! A [`ShiftRecord`] is immutable once appended to the ledger. It keeps
//! snapshots of everything it was computed from, so later edits to the
//! company or driver registries never rewrite history.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A shift a caller wants to register, before rates are resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftCandidate {
    /// Company the shift is worked for.
    pub company: String,
    /// Driver who worked the shift.
    pub driver: String,
    /// Vehicle used; blank means the company's contracted vehicle type.
    #[serde(default)]
    pub vehicle_type: String,
    /// Local start timestamp.
    pub start_time: NaiveDateTime,
    /// Local end timestamp.
    pub end_time: NaiveDateTime,
}

/// A finalized shift record as kept by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRecord {
    /// Local start timestamp.
    pub start_time: NaiveDateTime,
    /// Local end timestamp.
    pub end_time: NaiveDateTime,
    /// Company name at registration time.
    pub company_name: String,
    /// Driver name at registration time.
    pub driver_name: String,
    /// Vehicle type used for the shift.
    pub vehicle_type: String,
    /// Driver tax id captured at registration time.
    pub driver_tax_id: String,
    /// Amount billed to the company.
    pub amount_charged: Decimal,
    /// Amount owed to the driver.
    pub amount_paid: Decimal,
    /// Company guaranteed a minimum on the charged side.
    pub minimum_guaranteed_charged: bool,
    /// Company guaranteed a minimum on the paid side.
    pub minimum_guaranteed_paid: bool,
    /// Username of whoever registered the shift.
    pub registered_by: String,
}

impl ShiftRecord {
    /// The calendar date the shift started on. Range queries filter on this.
    pub fn start_date(&self) -> NaiveDate {
        self.start_time.date()
    }

    /// Returns the public projection of this record.
    pub fn listing(&self) -> ShiftListing {
        ShiftListing {
            start_time: self.start_time,
            end_time: self.end_time,
            company_name: self.company_name.clone(),
            vehicle_type: self.vehicle_type.clone(),
            driver_name: self.driver_name.clone(),
            driver_tax_id: self.driver_tax_id.clone(),
            amount_charged: self.amount_charged,
            amount_paid: self.amount_paid,
            minimum_guaranteed_charged: self.minimum_guaranteed_charged,
            minimum_guaranteed_paid: self.minimum_guaranteed_paid,
        }
    }
}

/// The fields of a [`ShiftRecord`] shown in listings and exports, in
/// display order. Omits `registered_by`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftListing {
    /// Local start timestamp.
    pub start_time: NaiveDateTime,
    /// Local end timestamp.
    pub end_time: NaiveDateTime,
    /// Company name.
    pub company_name: String,
    /// Vehicle type.
    pub vehicle_type: String,
    /// Driver name.
    pub driver_name: String,
    /// Driver tax id snapshot.
    pub driver_tax_id: String,
    /// Amount billed to the company.
    pub amount_charged: Decimal,
    /// Amount owed to the driver.
    pub amount_paid: Decimal,
    /// Minimum guaranteed on the charged side.
    pub minimum_guaranteed_charged: bool,
    /// Minimum guaranteed on the paid side.
    pub minimum_guaranteed_paid: bool,
}

/// Aggregated totals for a set of shift records.
///
/// # Example
///
/// ```
/// use diaria_ledger::models::LedgerTotals;
///
/// let totals = LedgerTotals::from_records(&[]).unwrap();
/// assert_eq!(totals.shift_count, 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTotals {
    /// Number of shifts.
    pub shift_count: usize,
    /// Sum of the charged amounts.
    pub total_charged: Decimal,
    /// Sum of the paid amounts.
    pub total_paid: Decimal,
}

impl LedgerTotals {
    /// Sums the given records.
    ///
    /// Returns [`EngineError::AmountOverflow`] when a sum leaves the decimal
    /// range.
    pub fn from_records(records: &[ShiftRecord]) -> EngineResult<Self> {
        records.iter().try_fold(Self::default(), |totals, record| {
            Ok(Self {
                shift_count: totals.shift_count + 1,
                total_charged: totals
                    .total_charged
                    .checked_add(record.amount_charged)
                    .ok_or_else(|| EngineError::amount_overflow("total_charged"))?,
                total_paid: totals
                    .total_paid
                    .checked_add(record.amount_paid)
                    .ok_or_else(|| EngineError::amount_overflow("total_paid"))?,
            })
        })
    }
}
