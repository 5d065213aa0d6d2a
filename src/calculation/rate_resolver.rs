//! Shift amount resolution.
//!
//! Given a company plan and a shift interval, computes the amount charged to
//! the company, the amount paid to the driver and the minimum-guaranteed
//! flags that go into the shift record.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{BillingMode, Company, RatePair};

use super::day_detection::{MissingOverridePolicy, RateSource, select_rate_pair};

const SECONDS_PER_HOUR: i64 = 3600;

/// The amounts resolved for one shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateResolution {
    /// Amount billed to the company.
    pub amount_charged: Decimal,
    /// Amount owed to the driver.
    pub amount_paid: Decimal,
    /// Minimum guaranteed on the charged side.
    pub minimum_guaranteed_charged: bool,
    /// Minimum guaranteed on the paid side.
    pub minimum_guaranteed_paid: bool,
    /// The rate pair the amounts were computed from.
    pub rates: RatePair,
    /// Where that pair came from.
    pub rate_source: RateSource,
    /// Hours billed, for hourly plans. `None` for flat plans.
    pub hours: Option<Decimal>,
}

/// Resolves shift amounts, falling back to default rates on an override day
/// without weekend rates.
///
/// Equivalent to [`resolve_with_policy`] with
/// [`MissingOverridePolicy::FallBackToDefault`].
///
/// # Examples
///
/// ```
/// use diaria_ledger::calculation::resolve;
/// use diaria_ledger::models::{BillingMode, Company, MinimumGuaranteed, RatePair, Status};
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let company = Company {
///     name: "Rapido Express".to_string(),
///     vehicle_type: "moto".to_string(),
///     billing_mode: BillingMode::Hourly,
///     default_rates: RatePair { charged: Decimal::new(10, 0), paid: Decimal::new(8, 0) },
///     weekend_rates: None,
///     override_weekdays: vec![],
///     minimum_guaranteed: MinimumGuaranteed::Yes,
///     status: Status::Active,
/// };
///
/// // 2026-01-12 is a Monday
/// let start = NaiveDateTime::parse_from_str("2026-01-12 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let end = NaiveDateTime::parse_from_str("2026-01-12 11:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
///
/// let resolution = resolve(&company, start, end).unwrap();
/// assert_eq!(resolution.amount_charged, Decimal::new(20, 0));
/// assert_eq!(resolution.amount_paid, Decimal::new(16, 0));
/// assert!(resolution.minimum_guaranteed_charged);
/// ```
pub fn resolve(
    company: &Company,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> EngineResult<RateResolution> {
    resolve_with_policy(company, start, end, MissingOverridePolicy::FallBackToDefault)
}

/// Resolves shift amounts under an explicit missing-override policy.
///
/// # Arguments
///
/// * `company` - The company whose plan applies
/// * `start` - Shift start (local, naive)
/// * `end` - Shift end (local, naive)
/// * `policy` - Behavior on an override day without weekend rates
///
/// # Returns
///
/// A [`RateResolution`], or:
/// - [`EngineError::InvalidShiftInterval`] when `end <= start`
/// - [`EngineError::MissingRateConfiguration`] under
///   [`MissingOverridePolicy::Reject`]
/// - [`EngineError::AmountOverflow`] when rate × hours leaves the decimal
///   range
///
/// # Behavior
///
/// - Flat plans: the selected rates are the shift amounts, whatever the
///   duration.
/// - Hourly plans: each rate is multiplied by the exact fractional hours.
///   Nothing is rounded.
/// - Both minimum-guaranteed flags copy the company flag.
pub fn resolve_with_policy(
    company: &Company,
    start: NaiveDateTime,
    end: NaiveDateTime,
    policy: MissingOverridePolicy,
) -> EngineResult<RateResolution> {
    if end <= start {
        return Err(EngineError::InvalidShiftInterval { start, end });
    }

    let selection = select_rate_pair(company, start, policy)?;
    let rates = selection.rates;

    let (amount_charged, amount_paid, hours) = match company.billing_mode {
        BillingMode::Flat => (rates.charged, rates.paid, None),
        BillingMode::Hourly => {
            let hours = shift_hours(start, end);
            let charged = rates
                .charged
                .checked_mul(hours)
                .ok_or_else(|| EngineError::amount_overflow("amount_charged"))?;
            let paid = rates
                .paid
                .checked_mul(hours)
                .ok_or_else(|| EngineError::amount_overflow("amount_paid"))?;
            (charged, paid, Some(hours))
        }
    };

    let guaranteed = company.minimum_guaranteed.is_guaranteed();

    Ok(RateResolution {
        amount_charged,
        amount_paid,
        minimum_guaranteed_charged: guaranteed,
        minimum_guaranteed_paid: guaranteed,
        rates,
        rate_source: selection.source,
        hours,
    })
}

/// Hours between two timestamps, as an exact decimal of seconds / 3600.
///
/// # Example
///
/// ```
/// use diaria_ledger::calculation::shift_hours;
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let start = NaiveDateTime::parse_from_str("2026-01-12 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let end = NaiveDateTime::parse_from_str("2026-01-12 10:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(shift_hours(start, end), Decimal::new(15, 1));
/// ```
pub fn shift_hours(start: NaiveDateTime, end: NaiveDateTime) -> Decimal {
    let seconds = (end - start).num_seconds();
    Decimal::from(seconds) / Decimal::from(SECONDS_PER_HOUR)
}
