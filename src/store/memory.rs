//! In-memory store.

use std::sync::{Mutex, MutexGuard};

use crate::error::{EngineError, EngineResult};
use crate::models::{Company, Driver, ShiftRecord};

use super::BillingStore;

#[derive(Debug, Default)]
struct Collections {
    companies: Vec<Company>,
    drivers: Vec<Driver>,
    shifts: Vec<ShiftRecord>,
}

/// A [`BillingStore`] that keeps everything in process memory.
///
/// Used by tests and by embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<Collections>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with companies and drivers.
    pub fn with_registries(companies: Vec<Company>, drivers: Vec<Driver>) -> Self {
        Self {
            collections: Mutex::new(Collections {
                companies,
                drivers,
                shifts: Vec::new(),
            }),
        }
    }

    fn lock(&self, operation: &str) -> EngineResult<MutexGuard<'_, Collections>> {
        self.collections
            .lock()
            .map_err(|_| EngineError::persistence(operation, "store lock poisoned"))
    }
}

impl BillingStore for MemoryStore {
    fn load_companies(&self) -> EngineResult<Vec<Company>> {
        Ok(self.lock("load_companies")?.companies.clone())
    }

    fn persist_companies(&self, companies: &[Company]) -> EngineResult<()> {
        self.lock("persist_companies")?.companies = companies.to_vec();
        Ok(())
    }

    fn load_drivers(&self) -> EngineResult<Vec<Driver>> {
        Ok(self.lock("load_drivers")?.drivers.clone())
    }

    fn persist_drivers(&self, drivers: &[Driver]) -> EngineResult<()> {
        self.lock("persist_drivers")?.drivers = drivers.to_vec();
        Ok(())
    }

    fn load_shift_ledger(&self) -> EngineResult<Vec<ShiftRecord>> {
        Ok(self.lock("load_shift_ledger")?.shifts.clone())
    }

    fn persist_shift_ledger(&self, records: &[ShiftRecord]) -> EngineResult<()> {
        self.lock("persist_shift_ledger")?.shifts = records.to_vec();
        Ok(())
    }
}
