//! Request types for the diária ledger API.
//!
//! Shift timestamps and query dates arrive as text and are parsed here into
//! engine types, so malformed input becomes a validation error naming the
//! field.

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::ledger::LedgerQuery;
use crate::models::ShiftCandidate;
use crate::parse::{parse_date, parse_timestamp};

/// Request body for `POST /shifts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftRequest {
    /// Company name.
    pub company: String,
    /// Driver name.
    pub driver: String,
    /// Vehicle type; omitted or blank means the company's.
    #[serde(default)]
    pub vehicle_type: String,
    /// Start timestamp, e.g. `2026-01-12T09:00`.
    pub start_time: String,
    /// End timestamp.
    pub end_time: String,
}

impl ShiftRequest {
    /// Parses the timestamps into a [`ShiftCandidate`].
    pub fn into_candidate(self) -> EngineResult<ShiftCandidate> {
        let start_time = parse_timestamp("start_time", &self.start_time)?;
        let end_time = parse_timestamp("end_time", &self.end_time)?;
        Ok(ShiftCandidate {
            company: self.company,
            driver: self.driver,
            vehicle_type: self.vehicle_type,
            start_time,
            end_time,
        })
    }
}

/// Query string of `GET /shifts` and `GET /shifts/export`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftQueryParams {
    /// First start date, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last start date, `YYYY-MM-DD`.
    pub end_date: String,
    /// Comma-separated company names; omitted means all.
    #[serde(default)]
    pub companies: Option<String>,
}

impl ShiftQueryParams {
    /// Parses the parameters into a validated [`LedgerQuery`].
    pub fn into_query(self) -> EngineResult<LedgerQuery> {
        let start_date = parse_date("start_date", &self.start_date)?;
        let end_date = parse_date("end_date", &self.end_date)?;
        let companies = self
            .companies
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();

        let query = LedgerQuery::new(start_date, end_date).with_companies(companies);
        query.validate()?;
        Ok(query)
    }
}
