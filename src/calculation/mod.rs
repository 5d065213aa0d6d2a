//! Rate resolution for shift records.
//!
//! This module turns a company's billing plan and a shift interval into the
//! amounts charged to the company and paid to the driver: override-day
//! detection and rate-pair selection live in `day_detection`, the amount
//! computation in `rate_resolver`.

mod day_detection;
mod rate_resolver;

pub use day_detection::{
    MissingOverridePolicy, RateSelection, RateSource, select_rate_pair, shift_weekday,
};
pub use rate_resolver::{RateResolution, resolve, resolve_with_policy, shift_hours};
