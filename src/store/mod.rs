//! Persistence collaborators.
//!
//! The engine never touches files or databases itself. It loads and persists
//! whole collections through [`BillingStore`]; the registries and the ledger
//! wrap every mutation in a locked load → modify → persist cycle.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::EngineResult;
use crate::models::{Company, Driver, ShiftRecord};

/// Loads and persists the collections the engine works on.
///
/// Implementations report I/O and decoding failures as
/// [`EngineError::Persistence`](crate::error::EngineError::Persistence).
/// Persist calls replace the whole stored collection.
pub trait BillingStore: Send + Sync {
    /// Loads every company, in registration order.
    fn load_companies(&self) -> EngineResult<Vec<Company>>;

    /// Replaces the stored companies.
    fn persist_companies(&self, companies: &[Company]) -> EngineResult<()>;

    /// Loads every driver, in registration order.
    fn load_drivers(&self) -> EngineResult<Vec<Driver>>;

    /// Replaces the stored drivers.
    fn persist_drivers(&self, drivers: &[Driver]) -> EngineResult<()>;

    /// Loads the shift ledger, in append order.
    fn load_shift_ledger(&self) -> EngineResult<Vec<ShiftRecord>>;

    /// Replaces the stored shift ledger.
    fn persist_shift_ledger(&self, records: &[ShiftRecord]) -> EngineResult<()>;
}
