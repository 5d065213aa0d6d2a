//! Override-day detection and rate-pair selection.
//!
//! A shift is classified by the weekday of its **start** timestamp only. A
//! shift that starts Friday 22:00 and ends Saturday 04:00 is a Friday shift
//! for rate purposes, even when Saturday is an override day.

use chrono::{Datelike, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{Company, RatePair};

/// What to do when a shift lands on an override weekday but the company has
/// no weekend rate pair configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingOverridePolicy {
    /// Use the default pair and report [`RateSource::OverrideFallback`].
    #[default]
    FallBackToDefault,
    /// Fail with [`EngineError::MissingRateConfiguration`].
    Reject,
}

/// Which rate pair a resolution used, and why.
///
/// # Example
///
/// ```
/// use diaria_ledger::calculation::RateSource;
///
/// assert_eq!(RateSource::OverrideFallback.to_string(), "override_fallback");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// Ordinary day; default pair.
    Default,
    /// Override day; weekend pair.
    Override,
    /// Override day without a weekend pair; default pair used instead.
    OverrideFallback,
}

impl std::fmt::Display for RateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateSource::Default => write!(f, "default"),
            RateSource::Override => write!(f, "override"),
            RateSource::OverrideFallback => write!(f, "override_fallback"),
        }
    }
}

/// The outcome of rate-pair selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateSelection {
    /// The selected pair.
    pub rates: RatePair,
    /// Where the pair came from.
    pub source: RateSource,
    /// Weekday of the shift start.
    pub weekday: Weekday,
}

/// Returns the weekday a shift is classified under: that of its start.
///
/// # Example
///
/// ```
/// use diaria_ledger::calculation::shift_weekday;
/// use chrono::{NaiveDateTime, Weekday};
///
/// // 2026-01-16 is a Friday
/// let start = NaiveDateTime::parse_from_str("2026-01-16 22:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(shift_weekday(start), Weekday::Fri);
/// ```
pub fn shift_weekday(start: NaiveDateTime) -> Weekday {
    start.weekday()
}

/// Selects the rate pair for a shift starting at `start`.
///
/// # Arguments
///
/// * `company` - The company whose plan applies
/// * `start` - The shift start; only its weekday matters
/// * `policy` - What to do on an override day without weekend rates
///
/// # Returns
///
/// The weekend pair on an override day when one is configured, the default
/// pair otherwise. On an override day without a weekend pair the result
/// depends on `policy`: either the default pair tagged
/// [`RateSource::OverrideFallback`], or
/// [`EngineError::MissingRateConfiguration`].
pub fn select_rate_pair(
    company: &Company,
    start: NaiveDateTime,
    policy: MissingOverridePolicy,
) -> EngineResult<RateSelection> {
    let weekday = shift_weekday(start);

    if !company.is_override_weekday(weekday) {
        return Ok(RateSelection {
            rates: company.default_rates,
            source: RateSource::Default,
            weekday,
        });
    }

    match (company.weekend_rates, policy) {
        (Some(rates), _) => Ok(RateSelection {
            rates,
            source: RateSource::Override,
            weekday,
        }),
        (None, MissingOverridePolicy::FallBackToDefault) => {
            warn!(
                company = %company.name,
                weekday = %weekday,
                "Override day without weekend rates, using default rates"
            );
            Ok(RateSelection {
                rates: company.default_rates,
                source: RateSource::OverrideFallback,
                weekday,
            })
        }
        (None, MissingOverridePolicy::Reject) => Err(EngineError::MissingRateConfiguration {
            company: company.name.clone(),
            weekday,
        }),
    }
}
