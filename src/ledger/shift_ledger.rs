//! Ledger storage and range queries.

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::access::RoleScope;
use crate::error::{EngineError, EngineResult};
use crate::models::ShiftRecord;
use crate::store::BillingStore;

/// A date-range query over the ledger.
///
/// Both bounds are inclusive and compare against each record's start
/// **date**, not its timestamp. An empty company list means every company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerQuery {
    /// First start date included.
    pub start_date: NaiveDate,
    /// Last start date included.
    pub end_date: NaiveDate,
    /// Company names to keep; empty keeps all.
    #[serde(default)]
    pub companies: Vec<String>,
}

impl LedgerQuery {
    /// A query over `[start_date, end_date]` for every company.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            companies: Vec::new(),
        }
    }

    /// Restricts the query to the given company names.
    pub fn with_companies<I, S>(mut self, companies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.companies = companies.into_iter().map(Into::into).collect();
        self
    }

    /// Fails with [`EngineError::InvalidField`] when the range is reversed.
    pub fn validate(&self) -> EngineResult<()> {
        if self.start_date > self.end_date {
            return Err(EngineError::invalid_field(
                "start_date",
                format!(
                    "{} is after end_date {}",
                    self.start_date, self.end_date
                ),
            ));
        }
        Ok(())
    }

    /// Returns true when the record matches the date range and company
    /// filter. Role scope is applied separately.
    pub fn matches(&self, record: &ShiftRecord) -> bool {
        let date = record.start_date();
        let in_range = date >= self.start_date && date <= self.end_date;
        let company_ok =
            self.companies.is_empty() || self.companies.iter().any(|c| *c == record.company_name);
        in_range && company_ok
    }
}

/// Filters records by query and scope, preserving ledger order.
///
/// # Example
///
/// ```
/// use diaria_ledger::access::RoleScope;
/// use diaria_ledger::ledger::{LedgerQuery, filter_records};
/// use chrono::NaiveDate;
///
/// let query = LedgerQuery::new(
///     NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
/// );
/// assert!(filter_records(Vec::new(), &query, &RoleScope::Admin).is_empty());
/// ```
pub fn filter_records(
    records: Vec<ShiftRecord>,
    query: &LedgerQuery,
    scope: &RoleScope,
) -> Vec<ShiftRecord> {
    records
        .into_iter()
        .filter(|r| query.matches(r) && scope.permits(r))
        .collect()
}

/// The append-only shift ledger over a [`BillingStore`].
///
/// Appends hold the ledger's write lock across the store's full
/// load → push → persist cycle.
pub struct ShiftLedger {
    store: Arc<dyn BillingStore>,
    write_lock: Mutex<()>,
}

impl ShiftLedger {
    /// Creates a ledger over the given store.
    pub fn new(store: Arc<dyn BillingStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Appends a record and returns its position.
    ///
    /// Duplicates are accepted. A store failure is returned as
    /// [`EngineError::Persistence`] and the record is not kept.
    pub fn append(&self, record: ShiftRecord) -> EngineResult<usize> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| EngineError::persistence("append", "ledger lock poisoned"))?;

        let mut records = self.store.load_shift_ledger()?;
        let position = records.len();
        info!(
            position,
            company = %record.company_name,
            driver = %record.driver_name,
            registered_by = %record.registered_by,
            amount_charged = %record.amount_charged,
            amount_paid = %record.amount_paid,
            "Appending shift record"
        );
        records.push(record);
        self.store.persist_shift_ledger(&records)?;

        Ok(position)
    }

    /// Every record, in append order.
    pub fn all(&self) -> EngineResult<Vec<ShiftRecord>> {
        self.store.load_shift_ledger()
    }

    /// Records matching the query, restricted to the scope, in append order.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidField`] for a reversed range;
    /// [`EngineError::Persistence`] when the store cannot be read.
    pub fn query_by_range(
        &self,
        query: &LedgerQuery,
        scope: &RoleScope,
    ) -> EngineResult<Vec<ShiftRecord>> {
        query.validate()?;
        let records = self.all()?;
        let total = records.len();
        let matched = filter_records(records, query, scope);
        debug!(
            start_date = %query.start_date,
            end_date = %query.end_date,
            companies = query.companies.len(),
            total,
            matched = matched.len(),
            "Ledger range query"
        );
        Ok(matched)
    }
}
